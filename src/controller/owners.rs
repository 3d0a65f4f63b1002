//! Owner endpoints of the customers service.

use axum::{extract::State, response::Response};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{
    extractor::{JsonValidate, PathParams},
    format, Routes,
};
use crate::{
    app::AppContext,
    clinic::OwnerDetails,
    views::customers::OwnerResponse,
    Error, Result,
};

const MAX_TELEPHONE_DIGITS: usize = 12;

fn validate_telephone(telephone: &str) -> std::result::Result<(), ValidationError> {
    let digits_only = telephone.chars().all(|c| c.is_ascii_digit());
    if digits_only && (1..=MAX_TELEPHONE_DIGITS).contains(&telephone.len()) {
        Ok(())
    } else {
        Err(ValidationError::new("telephone")
            .with_message("telephone must be 1 to 12 digits".into()))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OwnerParams {
    #[validate(length(min = 1, message = "first name must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name must not be empty"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: String,
    #[validate(length(min = 1, message = "city must not be empty"))]
    pub city: String,
    #[validate(custom(function = "validate_telephone"))]
    pub telephone: String,
}

impl From<OwnerParams> for OwnerDetails {
    fn from(params: OwnerParams) -> Self {
        Self {
            first_name: params.first_name,
            last_name: params.last_name,
            address: params.address,
            city: params.city,
            telephone: params.telephone,
        }
    }
}

pub async fn list(State(ctx): State<AppContext>) -> Result<Response> {
    let owners = ctx.customers.list_owners().await?;
    format::json(owners.iter().map(OwnerResponse::from).collect::<Vec<_>>())
}

pub async fn get_one(
    PathParams(owner_id): PathParams<i32>,
    State(ctx): State<AppContext>,
) -> Result<Response> {
    let owner = ctx
        .customers
        .find_owner(owner_id)
        .await?
        .ok_or(Error::NotFound)?;
    format::json(OwnerResponse::from(&owner))
}

pub async fn add(
    State(ctx): State<AppContext>,
    JsonValidate(params): JsonValidate<OwnerParams>,
) -> Result<Response> {
    let owner = ctx.customers.create_owner(params.into()).await?;
    format::created(OwnerResponse::from(&owner))
}

pub async fn update(
    PathParams(owner_id): PathParams<i32>,
    State(ctx): State<AppContext>,
    JsonValidate(params): JsonValidate<OwnerParams>,
) -> Result<Response> {
    ctx.customers
        .update_owner(owner_id, params.into())
        .await?
        .ok_or(Error::NotFound)?;
    format::no_content()
}

pub fn routes() -> Routes {
    Routes::new()
        .prefix("owners")
        .get("/", list)
        .post("/", add)
        .get("/{owner_id}", get_one)
        .put("/{owner_id}", update)
}
