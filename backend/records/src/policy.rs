//! # 5-day policy window
//!
//! Booking, cancelling, editing and deleting are only open while the trip is
//! strictly more than five days away: `now < trip date - 5 days`.
//!
//! Cancellation is measured against the trip's date, never the booking's.
//!
//! New trips, and new dates given to existing trips, must be at least five days
//! out: `date >= now + 5 days`.

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

use crate::{
    bookings::{Booking, BookingRequest},
    trips::Trip,
};

pub const POLICY_WINDOW_DAYS: i64 = 5;
pub const MAX_TICKETS_PER_BOOKING: u32 = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("Booking is not allowed less than 5 days before the trip date.")]
    BookingClosed,

    #[error("Invalid ticket count.")]
    InvalidTicketCount,

    #[error("You have already booked this trip.")]
    AlreadyBooked,

    #[error("Number of participants must match the ticket count ({expected}).")]
    ParticipantCount { expected: u32 },

    #[error("All participants must be at least {minimum} years old.")]
    Underage { minimum: u32 },

    #[error("Not enough spots left on this trip. Remaining: {remaining}.")]
    SoldOut { remaining: u32 },

    #[error("Booking is already cancelled.")]
    AlreadyCancelled,

    #[error("Cannot cancel less than 5 days before the trip.")]
    CancellationClosed,

    #[error("Trip cannot be edited less than 5 days before the trip date.")]
    EditClosed,

    #[error("Trip cannot be deleted less than 5 days before the trip date.")]
    DeleteClosed,

    #[error("Trip date must be at least 5 days in the future.")]
    TooSoon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripChange {
    Edit,
    Delete,
}

fn window() -> TimeDelta {
    TimeDelta::days(POLICY_WINDOW_DAYS)
}

/// True while actions on a trip dated `trip_date` are still allowed.
pub fn outside_window(trip_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now < trip_date - window()
}

pub fn meets_lead_time(date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    date >= now + window()
}

pub fn check_new_date(date: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), PolicyViolation> {
    if meets_lead_time(date, now) {
        Ok(())
    } else {
        Err(PolicyViolation::TooSoon)
    }
}

pub fn check_trip_change(
    trip: &Trip,
    change: TripChange,
    now: DateTime<Utc>,
) -> Result<(), PolicyViolation> {
    if outside_window(trip.date(), now) {
        return Ok(());
    }

    Err(match change {
        TripChange::Edit => PolicyViolation::EditClosed,
        TripChange::Delete => PolicyViolation::DeleteClosed,
    })
}

/// Checks a booking request against the trip and every booking already on it.
///
/// Rules run in a fixed order and the first failure is reported.
pub fn check_booking(
    trip: &Trip,
    request: &BookingRequest,
    adventurer: &str,
    existing: &[Booking],
    now: DateTime<Utc>,
) -> Result<(), PolicyViolation> {
    if !outside_window(trip.date(), now) {
        return Err(PolicyViolation::BookingClosed);
    }

    let count = request.ticket_count;
    if count < 1 || count > MAX_TICKETS_PER_BOOKING || count > trip.details.max_tickets_per_booking
    {
        return Err(PolicyViolation::InvalidTicketCount);
    }

    let confirmed = existing
        .iter()
        .filter(|booking| booking.trip == trip.id && booking.is_confirmed());

    if confirmed.clone().any(|booking| booking.is_held_by(adventurer)) {
        return Err(PolicyViolation::AlreadyBooked);
    }

    if request.participants.len() != count as usize {
        return Err(PolicyViolation::ParticipantCount { expected: count });
    }

    let minimum = trip.details.age_required;
    if request.participants.iter().any(|participant| participant.age < minimum) {
        return Err(PolicyViolation::Underage { minimum });
    }

    let taken: u32 = confirmed.map(|booking| booking.ticket_count).sum();
    let remaining = trip.details.max_participants.saturating_sub(taken);
    if count > remaining {
        return Err(PolicyViolation::SoldOut { remaining });
    }

    Ok(())
}

pub fn check_cancellation(
    booking: &Booking,
    trip: &Trip,
    now: DateTime<Utc>,
) -> Result<(), PolicyViolation> {
    if !booking.is_confirmed() {
        return Err(PolicyViolation::AlreadyCancelled);
    }

    if !outside_window(trip.date(), now) {
        return Err(PolicyViolation::CancellationClosed);
    }

    Ok(())
}
