use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State as Shared},
    response::IntoResponse,
};
use records::{
    accounts::{Account, Company, CompanyListing},
    trips::Trip,
};
use serde_json::json;

use super::populate;
use crate::{
    auth::AdventurerSession, database::Collection, error::AppError, state::State, utils::listing,
};

pub async fn all_companies(
    Shared(state): Shared<Arc<State>>,
    _: AdventurerSession,
) -> Result<impl IntoResponse, AppError> {
    let mut companies: Vec<CompanyListing> = state
        .database
        .all::<Account<Company>>(Collection::Companies)
        .await?
        .iter()
        .map(|account| CompanyListing::from(&account.profile))
        .collect();
    companies.sort_by(|left, right| left.company_name.cmp(&right.company_name));

    Ok(listing(&companies))
}

pub async fn company_trips(
    Shared(state): Shared<Arc<State>>,
    _: AdventurerSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let company = state
        .database
        .get::<Account<Company>>(Collection::Companies, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Company not found"))?;

    let trips = state
        .database
        .find(Collection::Trips, |trip: &Trip| trip.owned_by(&id))
        .await?;
    let trips = populate(&state.database, trips).await?;

    Ok(Json(json!({
        "status": "success",
        "companyName": company.profile.company_name,
        "results": trips.len(),
        "data": trips,
    })))
}
