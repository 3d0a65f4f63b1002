//! Endpoints of the visits service.

use axum::{extract::State, response::Response};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{
    extractor::{JsonValidate, PathParams, QueryParams},
    format, Routes,
};
use crate::{
    app::AppContext,
    clinic::{PetIds, VisitDraft},
    views::visits::{VisitResponse, VisitsResponse},
    Error, Result,
};

const PET_ID_PARAM: &str = "petId";

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct VisitParams {
    pub date: Option<NaiveDate>,
    #[validate(length(max = 8192, message = "description exceeds maximum length of 8192 characters"))]
    pub description: Option<String>,
}

impl From<VisitParams> for VisitDraft {
    fn from(params: VisitParams) -> Self {
        Self {
            date: params.date,
            description: params.description,
        }
    }
}

/// Gathers every `petId` value, repeated or comma separated, into one set.
fn pet_ids(query: &[(String, String)]) -> Result<PetIds> {
    let values: Vec<&str> = query
        .iter()
        .filter(|(key, _)| key == PET_ID_PARAM)
        .map(|(_, value)| value.as_str())
        .collect();
    if values.is_empty() {
        return Err(Error::BadRequest(format!(
            "missing required parameter `{PET_ID_PARAM}`"
        )));
    }
    values
        .join(",")
        .parse::<PetIds>()
        .map_err(|err| Error::BadRequest(err.to_string()))
}

pub async fn list_for_pet(
    PathParams((_owner, pet_id)): PathParams<(String, i32)>,
    State(ctx): State<AppContext>,
) -> Result<Response> {
    let visits = ctx.visits.visits_for_pet(pet_id).await?;
    format::json(visits.iter().map(VisitResponse::from).collect::<Vec<_>>())
}

pub async fn add(
    PathParams((_owner, pet_id)): PathParams<(String, i32)>,
    State(ctx): State<AppContext>,
    JsonValidate(params): JsonValidate<VisitParams>,
) -> Result<Response> {
    let visit = ctx.visits.create_visit(pet_id, params.into()).await?;
    format::created(VisitResponse::from(&visit))
}

pub async fn list_for_pets(
    State(ctx): State<AppContext>,
    QueryParams(query): QueryParams<Vec<(String, String)>>,
) -> Result<Response> {
    let pet_ids = pet_ids(&query)?;
    let visits = ctx.visits.visits_for_pets(&pet_ids).await?;
    format::json(VisitsResponse::from(&visits))
}

pub fn routes() -> Routes {
    Routes::new()
        .get("/owners/{owner_id}/pets/{pet_id}/visits", list_for_pet)
        .post("/owners/{owner_id}/pets/{pet_id}/visits", add)
        .get("/pets/visits", list_for_pets)
}

#[cfg(test)]
mod tests {
    use super::pet_ids;
    use crate::{clinic::PetIds, Error};

    fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn accepts_comma_separated_and_repeated_values() {
        assert_eq!(
            pet_ids(&query(&[("petId", "7,8")])).unwrap(),
            PetIds::new([7, 8])
        );
        assert_eq!(
            pet_ids(&query(&[("petId", "7"), ("petId", "8"), ("other", "1")])).unwrap(),
            PetIds::new([7, 8])
        );
        assert!(pet_ids(&query(&[("petId", "")])).unwrap().is_empty());
    }

    #[test]
    fn rejects_missing_or_malformed_values() {
        assert!(matches!(
            pet_ids(&query(&[])),
            Err(Error::BadRequest(_))
        ));
        assert!(matches!(
            pet_ids(&query(&[("petId", "7,x")])),
            Err(Error::BadRequest(_))
        ));
    }
}
