use serde::{Deserialize, Serialize};

use crate::clinic::{Specialty, Vet};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SpecialtyResponse {
    pub id: Option<i32>,
    pub name: String,
}

impl From<&Specialty> for SpecialtyResponse {
    fn from(specialty: &Specialty) -> Self {
        Self {
            id: specialty.id(),
            name: specialty.name().to_string(),
        }
    }
}

/// Specialties are listed by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VetResponse {
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub specialties: Vec<SpecialtyResponse>,
    pub nr_of_specialties: usize,
}

impl From<&Vet> for VetResponse {
    fn from(vet: &Vet) -> Self {
        Self {
            id: vet.id(),
            first_name: vet.first_name().to_string(),
            last_name: vet.last_name().to_string(),
            specialties: vet.specialties().iter().map(SpecialtyResponse::from).collect(),
            nr_of_specialties: vet.nr_of_specialties(),
        }
    }
}
