use axum::http::StatusCode;
use insta::assert_json_snapshot;
use petclinic_records::views::customers::PetDetailsResponse;
use serde_json::{json, Value};

use crate::seeded_server;

#[tokio::test]
async fn lists_pet_types() {
    let server = seeded_server().await;
    let types: Value = server.get("/petTypes").await.json();
    let names: Vec<&str> = types
        .as_array()
        .expect("types")
        .iter()
        .filter_map(|pet_type| pet_type["name"].as_str())
        .collect();
    assert_eq!(names, vec!["cat", "dog", "lizard", "snake", "bird", "hamster"]);
}

#[tokio::test]
async fn pet_details_name_the_owner() {
    let server = seeded_server().await;
    let response = server.get("/owners/6/pets/7").await;
    response.assert_status_ok();
    assert_json_snapshot!(response.json::<PetDetailsResponse>(), @r###"
    {
      "id": 7,
      "name": "Samantha",
      "owner": "Jean Coleman",
      "birthDate": "2012-09-04",
      "type": {
        "id": 1,
        "name": "cat"
      }
    }
    "###);
}

#[tokio::test]
async fn owner_segment_is_not_interpreted() {
    let server = seeded_server().await;
    server.get("/owners/*/pets/7").await.assert_status_ok();
    server.get("/owners/6/pets/999").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn adds_pet_to_owner() {
    let server = seeded_server().await;
    let response = server
        .post("/owners/1/pets")
        .json(&json!({ "name": "Bella", "birthDate": "2020-05-01", "typeId": 2 }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let pet: Value = response.json();
    assert_eq!(pet["id"], 14);
    assert_eq!(pet["type"]["name"], "dog");

    let owner: Value = server.get("/owners/1").await.json();
    let names: Vec<&str> = owner["pets"]
        .as_array()
        .expect("pets")
        .iter()
        .filter_map(|pet| pet["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Bella", "Leo"]);
}

#[tokio::test]
async fn rejects_pets_for_missing_owner_or_type() {
    let server = seeded_server().await;
    server
        .post("/owners/999/pets")
        .json(&json!({ "name": "Bella", "typeId": 2 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .post("/owners/1/pets")
        .json(&json!({ "name": "Bella", "typeId": 99 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .post("/owners/1/pets")
        .json(&json!({ "name": "", "typeId": 2 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn updates_pet() {
    let server = seeded_server().await;
    server
        .put("/owners/1/pets/1")
        .json(&json!({ "name": "Leonardo", "birthDate": "2010-09-07", "typeId": 1 }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let pet: Value = server.get("/owners/1/pets/1").await.json();
    assert_eq!(pet["name"], "Leonardo");
    assert_eq!(pet["owner"], "George Franklin");

    server
        .put("/owners/1/pets/999")
        .json(&json!({ "name": "Ghost", "typeId": 1 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
