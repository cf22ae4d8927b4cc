use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State as Shared},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use records::{
    bookings::{Booking, BookingRequest, BookingStatus, BookingWithTrip, MyHikes},
    patterns::check,
    policy::{check_booking, check_cancellation},
    trips::Trip,
};
use serde_json::json;
use tracing::info;

use super::confirmed_bookings;
use crate::{
    auth::AdventurerSession, database::Collection, error::AppError, state::State, utils::Payload,
};

pub async fn book_trip(
    Shared(state): Shared<Arc<State>>,
    AdventurerSession(adventurer): AdventurerSession,
    Path(trip_id): Path<String>,
    Payload(mut request): Payload<BookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let trip = state
        .database
        .get::<Trip>(Collection::Trips, &trip_id)
        .await?
        .ok_or_else(|| AppError::not_found("Trip not found"))?;

    request.normalize();

    let now = Utc::now();
    let existing = confirmed_bookings(&state.database, &trip.id).await?;
    check_booking(&trip, &request, &adventurer.id, &existing, now)?;
    check(&request).map_err(AppError::Invalid)?;

    let booking = Booking::new(&trip.id, &adventurer.id, request, now);
    state
        .database
        .put(Collection::Bookings, &booking.id, &booking)
        .await?;

    info!(
        "Adventurer {} booked {} tickets on trip {}",
        adventurer.id, booking.ticket_count, trip.id
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Booking confirmed",
            "data": booking,
        })),
    ))
}

/// Bookings whose trip no longer exists are left out.
pub async fn my_hikes(
    Shared(state): Shared<Arc<State>>,
    AdventurerSession(adventurer): AdventurerSession,
) -> Result<impl IntoResponse, AppError> {
    let mut bookings = state
        .database
        .find(Collection::Bookings, |booking: &Booking| {
            booking.is_held_by(&adventurer.id)
        })
        .await?;
    bookings.sort_by_key(|booking| booking.booked_at);

    let mut populated = Vec::with_capacity(bookings.len());
    for booking in bookings {
        if let Some(trip) = state
            .database
            .get::<Trip>(Collection::Trips, &booking.trip)
            .await?
        {
            populated.push(BookingWithTrip::new(booking, trip));
        }
    }

    let hikes = MyHikes::sort(populated, Utc::now());

    Ok(Json(json!({ "status": "success", "data": hikes })))
}

pub async fn cancel_booking(
    Shared(state): Shared<Arc<State>>,
    AdventurerSession(adventurer): AdventurerSession,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut booking = state
        .database
        .get::<Booking>(Collection::Bookings, &booking_id)
        .await?
        .filter(|booking| booking.is_held_by(&adventurer.id))
        .ok_or_else(|| AppError::not_found("Booking not found"))?;

    let trip = state
        .database
        .get::<Trip>(Collection::Trips, &booking.trip)
        .await?
        .ok_or_else(|| AppError::not_found("Trip not found"))?;

    check_cancellation(&booking, &trip, Utc::now())?;

    booking.status = BookingStatus::Cancelled;
    state
        .database
        .put(Collection::Bookings, &booking.id, &booking)
        .await?;

    info!("Adventurer {} cancelled booking {}", adventurer.id, booking.id);

    Ok(Json(json!({
        "status": "success",
        "message": "Booking cancelled successfully",
        "data": booking,
    })))
}

pub async fn already_booked(
    Shared(state): Shared<Arc<State>>,
    AdventurerSession(adventurer): AdventurerSession,
    Path(trip_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booked = state
        .database
        .exists(Collection::Bookings, |booking: &Booking| {
            booking.trip == trip_id && booking.is_held_by(&adventurer.id) && booking.is_confirmed()
        })
        .await?;

    Ok(Json(json!({ "status": "success", "alreadyBooked": booked })))
}
