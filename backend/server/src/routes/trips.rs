use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State as Shared},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use records::{
    accounts::{Account, Adventurer},
    bookings::{AdventurerContact, TripBooking, TripRoster},
    patterns::check,
    policy::{TripChange, check_new_date, check_trip_change},
    trips::{Trip, TripDetails, TripPatch},
};
use serde_json::json;
use tracing::info;

use super::{confirmed_bookings, notify_bookers, populate, remove_trips};
use crate::{
    auth::CompanySession,
    database::{Collection, Database},
    error::AppError,
    mail::Email,
    state::State,
    utils::{Payload, listing},
};

/// Public listing of every trip that has not started yet.
pub async fn upcoming_trips(Shared(state): Shared<Arc<State>>) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let trips = state
        .database
        .find(Collection::Trips, |trip: &Trip| trip.date() >= now)
        .await?;

    Ok(listing(&populate(&state.database, trips).await?))
}

pub async fn company_trips(
    Shared(state): Shared<Arc<State>>,
    CompanySession(company): CompanySession,
) -> Result<impl IntoResponse, AppError> {
    let trips = state
        .database
        .find(Collection::Trips, |trip: &Trip| trip.owned_by(&company.id))
        .await?;

    Ok(listing(&populate(&state.database, trips).await?))
}

pub async fn create_trip(
    Shared(state): Shared<Arc<State>>,
    CompanySession(company): CompanySession,
    Payload(mut details): Payload<TripDetails>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    check_new_date(details.date, now)?;

    details.normalize();
    check(&details).map_err(AppError::Invalid)?;

    let trip = Trip::new(&company.id, details, now);
    state.database.put(Collection::Trips, &trip.id, &trip).await?;

    info!("Company {} created trip {}", company.id, trip.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Trip created successfully",
            "data": trip,
        })),
    ))
}

async fn owned_trip(
    database: &Database,
    trip_id: &str,
    company: &str,
    missing: &str,
) -> Result<Trip, AppError> {
    database
        .get::<Trip>(Collection::Trips, trip_id)
        .await?
        .filter(|trip| trip.owned_by(company))
        .ok_or_else(|| AppError::not_found(missing))
}

pub async fn trip_with_participants(
    Shared(state): Shared<Arc<State>>,
    CompanySession(company): CompanySession,
    Path(trip_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let trip = owned_trip(
        &state.database,
        &trip_id,
        &company.id,
        "Trip not found or you do not have permission to view it.",
    )
    .await?;

    let mut bookings = Vec::new();
    for booking in confirmed_bookings(&state.database, &trip.id).await? {
        let adventurer = state
            .database
            .get::<Account<Adventurer>>(Collection::Adventurers, &booking.adventurer)
            .await?
            .map(|account| AdventurerContact::from(&account.profile));

        bookings.push(TripBooking {
            id: booking.id,
            adventurer,
            participants: booking.participants,
            ticket_count: booking.ticket_count,
        });
    }

    Ok(Json(json!({
        "status": "success",
        "data": TripRoster { trip, bookings },
    })))
}

/// Booked adventurers are notified once the edit has passed validation.
pub async fn update_trip(
    Shared(state): Shared<Arc<State>>,
    CompanySession(company): CompanySession,
    Path(trip_id): Path<String>,
    Payload(patch): Payload<TripPatch>,
) -> Result<impl IntoResponse, AppError> {
    let mut trip = owned_trip(
        &state.database,
        &trip_id,
        &company.id,
        "Trip not found or you do not own this trip.",
    )
    .await?;

    let now = Utc::now();
    check_trip_change(&trip, TripChange::Edit, now)?;

    if let Some(date) = patch.date {
        check_new_date(date, now)?;
    }

    let mut details = trip.details.clone();
    patch.apply(&mut details);
    check(&details).map_err(AppError::Invalid)?;

    let notified = notify_bookers(&state, &trip, |adventurer| {
        Email::trip_update(&adventurer.email, &adventurer.first_name, &trip.details.title)
    })
    .await?;

    trip.details = details;
    state.database.put(Collection::Trips, &trip.id, &trip).await?;

    info!("Company {} updated trip {}, notified {notified} adventurers", company.id, trip.id);

    Ok(Json(json!({
        "status": "success",
        "message": "Trip updated successfully",
        "data": trip,
    })))
}

pub async fn delete_trip(
    Shared(state): Shared<Arc<State>>,
    CompanySession(company): CompanySession,
    Path(trip_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let trip = owned_trip(
        &state.database,
        &trip_id,
        &company.id,
        "Trip not found or not owned by you.",
    )
    .await?;

    check_trip_change(&trip, TripChange::Delete, Utc::now())?;

    let notified = notify_bookers(&state, &trip, |adventurer| {
        Email::trip_cancellation(
            &adventurer.email,
            &adventurer.first_name,
            &trip.details.title,
            trip.date(),
        )
    })
    .await?;

    remove_trips(&state.database, &[trip.id.clone()]).await?;

    info!("Company {} deleted trip {}, notified {notified} adventurers", company.id, trip.id);

    Ok(StatusCode::NO_CONTENT)
}
