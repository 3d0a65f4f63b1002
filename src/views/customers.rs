use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clinic::{Owner, Pet, PetType};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PetTypeResponse {
    pub id: Option<i32>,
    pub name: String,
}

impl From<&PetType> for PetTypeResponse {
    fn from(pet_type: &PetType) -> Self {
        Self {
            id: pet_type.id(),
            name: pet_type.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetResponse {
    pub id: Option<i32>,
    pub name: String,
    pub birth_date: NaiveDate,
    #[serde(rename = "type")]
    pub pet_type: PetTypeResponse,
}

impl From<&Pet> for PetResponse {
    fn from(pet: &Pet) -> Self {
        Self {
            id: pet.id(),
            name: pet.name().to_string(),
            birth_date: pet.birth_date(),
            pet_type: pet.pet_type().into(),
        }
    }
}

/// A pet as seen from outside its owner, with the owner's full name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetDetailsResponse {
    pub id: Option<i32>,
    pub name: String,
    pub owner: String,
    pub birth_date: NaiveDate,
    #[serde(rename = "type")]
    pub pet_type: PetTypeResponse,
}

impl From<&Pet> for PetDetailsResponse {
    fn from(pet: &Pet) -> Self {
        Self {
            id: pet.id(),
            name: pet.name().to_string(),
            owner: pet.owner().map(|owner| owner.full_name()).unwrap_or_default(),
            birth_date: pet.birth_date(),
            pet_type: pet.pet_type().into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
    pub pets: Vec<PetResponse>,
}

impl From<&Owner> for OwnerResponse {
    fn from(owner: &Owner) -> Self {
        Self {
            id: owner.id(),
            first_name: owner.first_name().to_string(),
            last_name: owner.last_name().to_string(),
            address: owner.address().to_string(),
            city: owner.city().to_string(),
            telephone: owner.telephone().to_string(),
            pets: owner.pets().into_iter().map(PetResponse::from).collect(),
        }
    }
}
