//! Pet and pet type endpoints of the customers service.

use axum::{extract::State, response::Response};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{
    extractor::{JsonValidate, PathParams},
    format, Routes,
};
use crate::{
    app::AppContext,
    clinic::PetDraft,
    views::customers::{PetDetailsResponse, PetResponse, PetTypeResponse},
    Error, Result,
};

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PetParams {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub type_id: i32,
}

impl From<PetParams> for PetDraft {
    fn from(params: PetParams) -> Self {
        Self {
            name: params.name,
            birth_date: params.birth_date,
            type_id: params.type_id,
        }
    }
}

pub async fn pet_types(State(ctx): State<AppContext>) -> Result<Response> {
    let pet_types = ctx.customers.list_pet_types().await?;
    format::json(
        pet_types
            .iter()
            .map(PetTypeResponse::from)
            .collect::<Vec<_>>(),
    )
}

pub async fn add(
    PathParams(owner_id): PathParams<i32>,
    State(ctx): State<AppContext>,
    JsonValidate(params): JsonValidate<PetParams>,
) -> Result<Response> {
    let pet = ctx
        .customers
        .create_pet(owner_id, params.into())
        .await?
        .ok_or(Error::NotFound)?;
    format::created(PetResponse::from(&pet))
}

// The owner segment is not interpreted; a pet is addressed by its own id.
pub async fn update(
    PathParams((_owner, pet_id)): PathParams<(String, i32)>,
    State(ctx): State<AppContext>,
    JsonValidate(params): JsonValidate<PetParams>,
) -> Result<Response> {
    ctx.customers
        .update_pet(pet_id, params.into())
        .await?
        .ok_or(Error::NotFound)?;
    format::no_content()
}

pub async fn get_one(
    PathParams((_owner, pet_id)): PathParams<(String, i32)>,
    State(ctx): State<AppContext>,
) -> Result<Response> {
    let pet = ctx
        .customers
        .find_pet(pet_id)
        .await?
        .ok_or(Error::NotFound)?;
    format::json(PetDetailsResponse::from(&pet))
}

pub fn routes() -> Routes {
    Routes::new()
        .get("/petTypes", pet_types)
        .post("/owners/{owner_id}/pets", add)
        .get("/owners/{owner_id}/pets/{pet_id}", get_one)
        .put("/owners/{owner_id}/pets/{pet_id}", update)
}
