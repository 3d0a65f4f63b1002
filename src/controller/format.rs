//! Response helpers shared by the controllers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::Result;

/// Returns a `200 OK` response with a JSON body.
///
/// # Errors
///
/// Currently this function doesn't return any error. this is for feature
/// functionality
pub fn json<T: Serialize>(t: T) -> Result<Response> {
    Ok(Json(t).into_response())
}

/// Returns a `201 Created` response with a JSON body.
///
/// # Errors
///
/// Currently this function doesn't return any error. this is for feature
/// functionality
pub fn created<T: Serialize>(t: T) -> Result<Response> {
    Ok((StatusCode::CREATED, Json(t)).into_response())
}

/// Returns an empty `204 No Content` response.
///
/// # Errors
///
/// Currently this function doesn't return any error. this is for feature
/// functionality
pub fn no_content() -> Result<Response> {
    Ok(StatusCode::NO_CONTENT.into_response())
}
