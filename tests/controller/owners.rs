use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::{empty_server, seeded_server};

fn betty() -> Value {
    json!({
        "firstName": "Betty",
        "lastName": "Davis",
        "address": "638 Cardinal Ave.",
        "city": "Sun Prairie",
        "telephone": "6085551749"
    })
}

#[tokio::test]
async fn gets_owner_with_pets_sorted_by_name() {
    let server = seeded_server().await;
    let response = server.get("/owners/6").await;
    response.assert_status_ok();

    let owner: Value = response.json();
    assert_eq!(owner["firstName"], "Jean");
    assert_eq!(owner["lastName"], "Coleman");
    let pets: Vec<&str> = owner["pets"]
        .as_array()
        .expect("pets")
        .iter()
        .filter_map(|pet| pet["name"].as_str())
        .collect();
    assert_eq!(pets, vec!["Max", "Samantha"]);
    assert_eq!(owner["pets"][0]["type"]["name"], "cat");
    assert_eq!(owner["pets"][0]["birthDate"], "2012-09-04");
}

#[tokio::test]
async fn unknown_owner_is_not_found() {
    let server = seeded_server().await;
    let response = server.get("/owners/999").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "not_found");
}

#[tokio::test]
async fn non_numeric_owner_id_is_a_bad_request() {
    let server = seeded_server().await;
    server
        .get("/owners/abc")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lists_owners() {
    let server = seeded_server().await;
    let owners: Value = server.get("/owners").await.json();
    assert_eq!(owners.as_array().map(Vec::len), Some(10));
}

#[tokio::test]
async fn creates_owner() {
    let server = empty_server().await;
    let response = server.post("/owners").json(&betty()).await;
    response.assert_status(StatusCode::CREATED);

    let owner: Value = response.json();
    assert_eq!(owner["id"], 1);
    assert_eq!(owner["pets"], json!([]));

    server.get("/owners/1").await.assert_status_ok();
}

#[tokio::test]
async fn invalid_owner_is_rejected() {
    let server = empty_server().await;
    let mut owner = betty();
    owner["telephone"] = json!("608-555-1749");
    let response = server.post("/owners").json(&owner).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Bad Request");

    let response = server.post("/owners").json(&json!({ "firstName": "Betty" })).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let owners: Value = server.get("/owners").await.json();
    assert_eq!(owners, json!([]));
}

#[tokio::test]
async fn updates_owner() {
    let server = seeded_server().await;
    let mut owner = betty();
    owner["city"] = json!("Madison");
    server
        .put("/owners/2")
        .json(&owner)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let updated: Value = server.get("/owners/2").await.json();
    assert_eq!(updated["city"], "Madison");
    assert_eq!(updated["pets"][0]["name"], "Basil");

    server
        .put("/owners/999")
        .json(&owner)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
