//! HTTP layer: routes of the three clinic services, response formatting and
//! the mapping of [`Error`] to status codes.
//!
//! ```rust,no_run
//! use axum::extract::State;
//! use axum::response::Response;
//! use petclinic_records::{app::AppContext, controller::{format, Routes}, Result};
//!
//! async fn pet_types(State(ctx): State<AppContext>) -> Result<Response> {
//!     let types = ctx.customers.list_pet_types().await?;
//!     format::json(types.len())
//! }
//!
//! fn routes() -> Routes {
//!     Routes::new().get("/petTypes", pet_types)
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    errors::{Error, ErrorDetail},
    store::StoreError,
};

mod app_routes;
pub mod extractor;
pub mod format;
mod routes;

pub mod monitoring;
pub mod owners;
pub mod pets;
pub mod vets;
pub mod visits;

pub use app_routes::{AppRoutes, ListRoutes};
pub use routes::Routes;

impl IntoResponse for Error {
    /// Convert an `Error` into an HTTP response.
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("not_found", "Resource was not found"),
            ),
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("Bad Request".to_string(), message),
            ),
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("Bad Request".to_string(), errors.to_string()),
            ),
            Self::Visit(err) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("Bad Request".to_string(), err.to_string()),
            ),
            Self::Store(StoreError::Unavailable(ref reason)) => {
                tracing::error!(err.msg = %reason, "store_unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorDetail::with_reason("Service Unavailable"),
                )
            }
            err => {
                tracing::error!(err.msg = %err, err.detail = ?err, "controller_error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetail::new("internal_server_error", "Internal Server Error"),
                )
            }
        };

        (status, Json(detail)).into_response()
    }
}
