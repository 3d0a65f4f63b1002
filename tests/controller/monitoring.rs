use axum::http::StatusCode;
use petclinic_records::{boot, config::Service, tests_cfg, TestServer};
use serde_json::Value;

use crate::empty_server;

#[tokio::test]
async fn monitoring_routes_are_always_mounted() {
    let server = empty_server().await;
    for uri in ["/_ping", "/_health", "/_readiness"] {
        let response = server.get(uri).await;
        assert_eq!(response.status_code(), StatusCode::OK, "{uri}");
        assert_eq!(response.json::<Value>()["ok"], Value::Bool(true));
    }
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let server = empty_server().await;
    let response = server.get("/_ping").await;
    let request_id = response.header("x-request-id");
    assert!(!request_id.is_empty());
}

#[tokio::test]
async fn disabled_services_are_not_routed() {
    let mut config = tests_cfg::config::test_config();
    config.services = [Service::Vets].into_iter().collect();
    let ctx = boot::create_context(&petclinic_records::environment::Environment::Test, config)
        .await
        .expect("context");
    let server = TestServer::new(boot::create_router(ctx)).expect("start test server");

    server.get("/vets").await.assert_status_ok();
    server.get("/owners").await.assert_status(StatusCode::NOT_FOUND);
    server
        .get("/pets/visits")
        .add_query_param("petId", "7")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
