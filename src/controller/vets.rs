//! Endpoint of the vets service.

use axum::{extract::State, response::Response};

use super::{format, Routes};
use crate::{app::AppContext, views::vets::VetResponse, Result};

pub async fn list(State(ctx): State<AppContext>) -> Result<Response> {
    let vets = ctx.vets.list_vets().await?;
    format::json(vets.iter().map(VetResponse::from).collect::<Vec<_>>())
}

pub fn routes() -> Routes {
    Routes::new().get("/vets", list)
}
