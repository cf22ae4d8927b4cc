use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State as Shared,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use records::{
    accounts::{Account, Adventurer, AdventurerPatch},
    bookings::Booking,
    patterns::check,
};
use serde_json::json;
use tracing::info;

use super::{bookings, save_account};
use crate::{
    auth::AdventurerSession, database::Collection, error::AppError, state::State, utils::Payload,
};

pub fn router() -> Router<Arc<State>> {
    Router::new()
        .route("/profile", get(profile).patch(update_profile))
        .route("/delete-account", delete(delete_account))
        .route("/book/{trip_id}", post(bookings::book_trip))
        .route("/my-hikes", get(bookings::my_hikes))
        .route("/cancel-booking/{booking_id}", patch(bookings::cancel_booking))
        .route("/already-booked/{trip_id}", get(bookings::already_booked))
}

pub async fn profile(AdventurerSession(adventurer): AdventurerSession) -> impl IntoResponse {
    Json(json!({ "status": "success", "data": adventurer }))
}

pub async fn update_profile(
    Shared(state): Shared<Arc<State>>,
    AdventurerSession(adventurer): AdventurerSession,
    Payload(patch): Payload<AdventurerPatch>,
) -> Result<impl IntoResponse, AppError> {
    if patch.is_empty() {
        return Err(AppError::invalid("No data provided to update"));
    }

    let mut account = state
        .database
        .get::<Account<Adventurer>>(Collection::Adventurers, &adventurer.id)
        .await?
        .ok_or_else(|| AppError::not_found("No adventurer found with this ID"))?;

    account.profile.apply(patch);
    check(&account.profile).map_err(AppError::Invalid)?;

    let phone_taken = state
        .database
        .exists(Collection::Adventurers, |other: &Account<Adventurer>| {
            other.profile.id != account.profile.id
                && other.profile.phone_number == account.profile.phone_number
        })
        .await?;

    if phone_taken {
        return Err(AppError::invalid("Phone number already exists"));
    }

    save_account(&state.database, &account).await?;

    Ok(Json(json!({ "status": "success", "data": account.profile })))
}

/// Removes the account and every booking it made.
pub async fn delete_account(
    Shared(state): Shared<Arc<State>>,
    AdventurerSession(adventurer): AdventurerSession,
) -> Result<impl IntoResponse, AppError> {
    let bookings: Vec<String> = state
        .database
        .find(Collection::Bookings, |booking: &Booking| {
            booking.is_held_by(&adventurer.id)
        })
        .await?
        .into_iter()
        .map(|booking| booking.id)
        .collect();

    state
        .database
        .remove_many(Collection::Bookings, &bookings)
        .await?;
    state
        .database
        .remove(Collection::Adventurers, &adventurer.id)
        .await?;

    info!(
        "Deleted adventurer {} and {} bookings",
        adventurer.id,
        bookings.len()
    );

    Ok(StatusCode::NO_CONTENT)
}
