use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clinic::{Visit, Visits};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitResponse {
    pub id: Option<i32>,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub pet_id: i32,
}

impl From<&Visit> for VisitResponse {
    fn from(visit: &Visit) -> Self {
        Self {
            id: visit.id(),
            date: visit.date(),
            description: visit.description().map(ToString::to_string),
            pet_id: visit.pet_id(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct VisitsResponse {
    pub items: Vec<VisitResponse>,
}

impl From<&Visits> for VisitsResponse {
    fn from(visits: &Visits) -> Self {
        Self {
            items: visits.items.iter().map(VisitResponse::from).collect(),
        }
    }
}
