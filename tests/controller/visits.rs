use axum::http::StatusCode;
use insta::assert_json_snapshot;
use petclinic_records::views::visits::VisitResponse;
use rstest::rstest;
use serde_json::{json, Value};

use crate::{empty_server, seeded_server};

fn visit_pet_ids(visits: &Value) -> Vec<i64> {
    visits
        .as_array()
        .expect("visits")
        .iter()
        .filter_map(|visit| visit["petId"].as_i64())
        .collect()
}

#[tokio::test]
async fn lists_visits_of_one_pet() {
    let server = seeded_server().await;
    let response = server.get("/owners/6/pets/8/visits").await;
    response.assert_status_ok();
    assert_json_snapshot!(response.json::<Vec<VisitResponse>>(), @r###"
    [
      {
        "id": 2,
        "date": "2013-01-02",
        "description": "rabies shot",
        "petId": 8
      },
      {
        "id": 3,
        "date": "2013-01-03",
        "description": "neutered",
        "petId": 8
      }
    ]
    "###);
}

#[tokio::test]
async fn batch_lookup_gathers_every_listed_pet() {
    let server = seeded_server().await;
    let response = server
        .get("/pets/visits")
        .add_query_param("petId", "7,8")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(visit_pet_ids(&body["items"]), vec![7, 8, 8, 7]);

    let single: Value = server
        .get("/pets/visits")
        .add_query_param("petId", "8")
        .await
        .json();
    let direct: Value = server.get("/owners/*/pets/8/visits").await.json();
    assert_eq!(single["items"], direct);
}

#[rstest]
#[case("99")]
#[case("")]
#[tokio::test]
async fn batch_lookup_without_matches_is_empty(#[case] pet_ids: &str) {
    let server = seeded_server().await;
    let response = server
        .get("/pets/visits")
        .add_query_param("petId", pet_ids)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "items": [] }));
}

#[tokio::test]
async fn batch_lookup_rejects_bad_parameters() {
    let server = seeded_server().await;
    server
        .get("/pets/visits")
        .add_query_param("petId", "7,seven")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/pets/visits")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[rstest]
#[case(8192, StatusCode::CREATED)]
#[case(8193, StatusCode::BAD_REQUEST)]
#[tokio::test]
async fn description_length_is_bounded(#[case] length: usize, #[case] expected: StatusCode) {
    let server = empty_server().await;
    let response = server
        .post("/owners/1/pets/4/visits")
        .json(&json!({ "date": "2024-03-14", "description": "a".repeat(length) }))
        .await;
    response.assert_status(expected);

    let stored: Value = server.get("/owners/1/pets/4/visits").await.json();
    let count = stored.as_array().map(Vec::len);
    assert_eq!(count, Some(usize::from(expected == StatusCode::CREATED)));
}

#[tokio::test]
async fn creates_visit_with_defaults() {
    let server = empty_server().await;
    let response = server
        .post("/owners/*/pets/4/visits")
        .json(&json!({ "description": "Annual checkup" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let visit: Value = response.json();
    assert_eq!(visit["petId"], 4);
    assert_eq!(visit["description"], "Annual checkup");
    assert!(visit["date"].is_string());
}

#[rstest]
#[case("0")]
#[case("-4")]
#[tokio::test]
async fn non_positive_pet_id_is_rejected(#[case] pet_id: &str) {
    let server = empty_server().await;
    server
        .post(&format!("/owners/1/pets/{pet_id}/visits"))
        .json(&json!({ "description": "Annual checkup" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
