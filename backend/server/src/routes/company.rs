use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State as Shared,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use chrono::Utc;
use records::{
    accounts::{Account, Company, CompanyPatch},
    patterns::check,
    trips::Trip,
};
use serde_json::json;
use tracing::info;

use super::{notify_bookers, remove_trips, save_account, trips};
use crate::{
    auth::CompanySession, database::Collection, error::AppError, mail::Email, state::State,
    utils::Payload,
};

pub fn router() -> Router<Arc<State>> {
    Router::new()
        .route("/profile", get(profile).patch(update_profile))
        .route("/delete-account", delete(delete_account))
        .route("/trips", get(trips::company_trips).post(trips::create_trip))
        .route(
            "/trips/{trip_id}",
            get(trips::trip_with_participants)
                .patch(trips::update_trip)
                .delete(trips::delete_trip),
        )
}

pub async fn profile(CompanySession(company): CompanySession) -> impl IntoResponse {
    Json(json!({ "status": "success", "data": company }))
}

pub async fn update_profile(
    Shared(state): Shared<Arc<State>>,
    CompanySession(company): CompanySession,
    Payload(patch): Payload<CompanyPatch>,
) -> Result<impl IntoResponse, AppError> {
    if patch.is_empty() {
        return Err(AppError::invalid("No data provided to update"));
    }

    let mut account = state
        .database
        .get::<Account<Company>>(Collection::Companies, &company.id)
        .await?
        .ok_or_else(|| AppError::not_found("No company found with this ID"))?;

    account.profile.apply(patch);
    check(&account.profile).map_err(AppError::Invalid)?;

    let taken = state
        .database
        .exists(Collection::Companies, |other: &Account<Company>| {
            other.profile.id != account.profile.id
                && (other.profile.phone_number == account.profile.phone_number
                    || other.profile.company_id == account.profile.company_id)
        })
        .await?;

    if taken {
        return Err(AppError::invalid("Phone number or Company ID already exists"));
    }

    save_account(&state.database, &account).await?;

    Ok(Json(json!({ "status": "success", "data": account.profile })))
}

/// Removes the company with all of its trips and their bookings. Adventurers
/// booked on trips that have not happened yet are told first.
pub async fn delete_account(
    Shared(state): Shared<Arc<State>>,
    CompanySession(company): CompanySession,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let trips: Vec<Trip> = state
        .database
        .find(Collection::Trips, |trip: &Trip| trip.owned_by(&company.id))
        .await?;

    let mut notified = 0;
    for trip in trips.iter().filter(|trip| trip.date() >= now) {
        notified += notify_bookers(&state, trip, |adventurer| {
            Email::trip_cancellation(
                &adventurer.email,
                &adventurer.first_name,
                &trip.details.title,
                trip.date(),
            )
        })
        .await?;
    }

    let ids: Vec<String> = trips.into_iter().map(|trip| trip.id).collect();
    remove_trips(&state.database, &ids).await?;
    state
        .database
        .remove(Collection::Companies, &company.id)
        .await?;

    info!(
        "Deleted company {} with {} trips, notified {notified} adventurers",
        company.id,
        ids.len()
    );

    Ok(StatusCode::NO_CONTENT)
}
