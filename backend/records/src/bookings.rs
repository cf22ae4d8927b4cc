use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    accounts::{Adventurer, Gender},
    new_id,
    patterns::{EMAIL_PATTERN, PHONE_PATTERN, tidy},
    trips::Trip,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Cancelled,
}

/// One person on a booking. The booking adventurer is usually the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(default)]
    #[validate(length(min = 1, message = "Participant name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Age must be at least 1"))]
    pub age: u32,
    pub gender: Gender,
    #[serde(default)]
    #[validate(regex(path = *PHONE_PATTERN, message = "Please provide a valid Jordanian phone number"))]
    pub phone_number: String,
    #[serde(default)]
    #[validate(regex(path = *EMAIL_PATTERN, message = "Please provide a valid email"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(default)]
    #[validate(nested)]
    pub participants: Vec<Participant>,
    pub ticket_count: u32,
}

impl BookingRequest {
    pub fn normalize(&mut self) {
        for participant in &mut self.participants {
            tidy(&mut participant.name);
            tidy(&mut participant.phone_number);
            participant.email = participant.email.trim().to_string();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    pub trip: String,
    pub adventurer: String,
    pub participants: Vec<Participant>,
    pub ticket_count: u32,
    #[serde(default)]
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(trip: &str, adventurer: &str, request: BookingRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            trip: trip.to_string(),
            adventurer: adventurer.to_string(),
            participants: request.participants,
            ticket_count: request.ticket_count,
            status: BookingStatus::Confirmed,
            booked_at: now,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    pub fn is_held_by(&self, adventurer: &str) -> bool {
        self.adventurer == adventurer
    }
}

/// A booking with its trip populated, as listed under my hikes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithTrip {
    #[serde(rename = "_id")]
    pub id: String,
    pub trip: Trip,
    pub adventurer: String,
    pub participants: Vec<Participant>,
    pub ticket_count: u32,
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
}

impl BookingWithTrip {
    pub fn new(booking: Booking, trip: Trip) -> Self {
        Self {
            id: booking.id,
            trip,
            adventurer: booking.adventurer,
            participants: booking.participants,
            ticket_count: booking.ticket_count,
            status: booking.status,
            booked_at: booking.booked_at,
        }
    }
}

/// How a company reaches the adventurer behind a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventurerContact {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl From<&Adventurer> for AdventurerContact {
    fn from(adventurer: &Adventurer) -> Self {
        Self {
            id: adventurer.id.clone(),
            first_name: adventurer.first_name.clone(),
            last_name: adventurer.last_name.clone(),
            email: adventurer.email.clone(),
            phone_number: adventurer.phone_number.clone(),
        }
    }
}

/// A confirmed booking as seen by the company running the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripBooking {
    #[serde(rename = "_id")]
    pub id: String,
    pub adventurer: Option<AdventurerContact>,
    pub participants: Vec<Participant>,
    pub ticket_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRoster {
    pub trip: Trip,
    pub bookings: Vec<TripBooking>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MyHikes {
    pub upcoming: Vec<BookingWithTrip>,
    pub cancelled: Vec<BookingWithTrip>,
    pub past: Vec<BookingWithTrip>,
}

impl MyHikes {
    /// Cancelled first, then anything whose trip date has passed, the rest upcoming.
    pub fn sort(bookings: Vec<BookingWithTrip>, now: DateTime<Utc>) -> Self {
        let mut hikes = Self::default();

        for booking in bookings {
            if booking.status == BookingStatus::Cancelled {
                hikes.cancelled.push(booking);
            } else if booking.trip.date() < now {
                hikes.past.push(booking);
            } else {
                hikes.upcoming.push(booking);
            }
        }

        hikes
    }

    pub fn len(&self) -> usize {
        self.upcoming.len() + self.cancelled.len() + self.past.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};
    use serde_json::json;

    use super::*;
    use crate::{patterns::check, trips::TripDetails};

    fn trip_on(date: DateTime<Utc>) -> Trip {
        let details: TripDetails = serde_json::from_value(json!({
            "title": "Dana to Feynan",
            "date": date.to_rfc3339(),
            "startLocation": "Dana",
            "endLocation": "Feynan",
            "price": 25,
            "ageRequired": 12,
            "maxParticipants": 10,
            "maxTicketsPerBooking": 2,
            "path": "Wadi Dana",
            "description": "Descent through the reserve",
            "companyPhoneNumber": "+962771234567",
            "difficultyLevel": "hard"
        }))
        .unwrap();

        Trip::new("company", details, date)
    }

    fn request(count: u32) -> BookingRequest {
        serde_json::from_value(json!({
            "ticketCount": count,
            "participants": (0..count).map(|i| json!({
                "name": format!("Hiker {i}"),
                "age": 30,
                "gender": "male",
                "phoneNumber": "+962791234567",
                "email": "hiker@example.com"
            })).collect::<Vec<_>>()
        }))
        .unwrap()
    }

    #[test]
    fn test_nested_participant_messages() {
        let mut request = request(2);
        request.participants[1].age = 0;
        request.participants[1].phone_number = "123".into();

        let message = check(&request).unwrap_err();
        assert!(message.contains("Age must be at least 1"));
        assert!(message.contains("Please provide a valid Jordanian phone number"));
    }

    #[test]
    fn test_new_booking_is_confirmed() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let booking = Booking::new("trip", "adventurer", request(1), now);

        assert!(booking.is_confirmed());
        assert!(booking.is_held_by("adventurer"));
        assert_eq!(booking.ticket_count, 1);
        assert_eq!(serde_json::to_value(&booking).unwrap()["status"], "confirmed");
    }

    #[test]
    fn test_my_hikes_grouping() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        let future = trip_on(now + TimeDelta::days(10));
        let past = trip_on(now - TimeDelta::days(3));

        let upcoming = Booking::new(&future.id, "a", request(1), now);
        let mut cancelled = Booking::new(&future.id, "a", request(1), now);
        cancelled.status = BookingStatus::Cancelled;
        let done = Booking::new(&past.id, "a", request(2), now);
        let mut cancelled_past = Booking::new(&past.id, "a", request(1), now);
        cancelled_past.status = BookingStatus::Cancelled;

        let hikes = MyHikes::sort(
            vec![
                BookingWithTrip::new(upcoming, future.clone()),
                BookingWithTrip::new(cancelled, future),
                BookingWithTrip::new(done, past.clone()),
                BookingWithTrip::new(cancelled_past, past),
            ],
            now,
        );

        assert_eq!(hikes.upcoming.len(), 1);
        assert_eq!(hikes.cancelled.len(), 2);
        assert_eq!(hikes.past.len(), 1);
        assert_eq!(hikes.past[0].ticket_count, 2);
        assert_eq!(hikes.len(), 4);
    }
}
