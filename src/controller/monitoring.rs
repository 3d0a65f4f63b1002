//! This module contains a base routes related to readiness checks and status
//! reporting. These routes are commonly used to monitor the readiness of the
//! application and its dependencies.

use axum::{extract::State, response::Response};
use serde::Serialize;

use super::{format, Routes};
use crate::{app::AppContext, Result};

/// Represents the health status of the application.
#[derive(Serialize)]
pub struct Health {
    pub ok: bool,
}

/// Check application ping endpoint
///
/// # Errors
/// This function always returns `Ok` with a JSON response indicating the
/// process is up.
pub async fn ping() -> Result<Response> {
    format::json(Health { ok: true })
}

/// Check application health endpoint
///
/// # Errors
/// This function always returns `Ok` with a JSON response indicating the
/// process is up.
pub async fn health() -> Result<Response> {
    format::json(Health { ok: true })
}

/// Check the readiness of the application by pinging the database, when the
/// services are backed by one.
///
/// # Errors
/// All errors are logged, and the readiness status is returned as a JSON response.
pub async fn readiness(State(ctx): State<AppContext>) -> Result<Response> {
    #[allow(unused_mut)]
    let mut is_ok: bool = true;

    #[cfg(feature = "with-db")]
    if let Some(db) = &ctx.db {
        if let Err(error) = db.ping().await {
            tracing::error!(err.msg = %error, err.detail = ?error, "readiness_db_ping_error");
            is_ok = false;
        }
    }

    #[cfg(not(feature = "with-db"))]
    let _ = ctx;

    format::json(Health { ok: is_ok })
}

/// Defines and returns the readiness-related routes.
pub fn routes() -> Routes {
    Routes::new()
        .get("/_readiness", readiness)
        .get("/_ping", ping)
        .get("/_health", health)
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::{health, ping, readiness};
    use crate::tests_cfg;

    async fn call(router: axum::Router, uri: &str) -> Value {
        let req = axum::http::Request::builder()
            .uri(uri)
            .method("GET")
            .body(axum::body::Body::empty())
            .unwrap();

        let response = router.oneshot(req).await.unwrap();
        assert_eq!(response.status(), 200);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).expect("Valid JSON response")
    }

    #[tokio::test]
    async fn ping_works() {
        let ctx = tests_cfg::app::get_app_context().await;
        let router = axum::Router::new()
            .route("/_ping", get(ping))
            .with_state(ctx);
        assert_eq!(call(router, "/_ping").await["ok"], true);
    }

    #[tokio::test]
    async fn health_works() {
        let ctx = tests_cfg::app::get_app_context().await;
        let router = axum::Router::new()
            .route("/_health", get(health))
            .with_state(ctx);
        assert_eq!(call(router, "/_health").await["ok"], true);
    }

    #[tokio::test]
    async fn readiness_without_database() {
        let ctx = tests_cfg::app::get_app_context().await;
        let router = axum::Router::new()
            .route("/_readiness", get(readiness))
            .with_state(ctx);
        assert_eq!(call(router, "/_readiness").await["ok"], true);
    }

    #[cfg(feature = "with-db")]
    #[tokio::test]
    async fn readiness_with_database() {
        let mut ctx = tests_cfg::app::get_app_context().await;
        ctx.db = Some(crate::models::tests::sqlite().await);
        let router = axum::Router::new()
            .route("/_readiness", get(readiness))
            .with_state(ctx);
        assert_eq!(call(router, "/_readiness").await["ok"], true);
    }
}
