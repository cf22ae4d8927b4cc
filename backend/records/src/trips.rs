use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::{
    accounts::CompanySummary,
    dates, new_id,
    patterns::{PHONE_PATTERN, tidy, tidy_optional},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
    Expert,
}

/// The part of a trip its company may set and edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TripDetails {
    #[serde(default)]
    #[validate(length(min = 1, message = "Trip title is required"))]
    pub title: String,
    #[serde(deserialize_with = "dates::flexible")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Starting location is required"))]
    pub start_location: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Ending location is required"))]
    pub end_location: String,
    #[validate(range(min = 0.0, message = "Price must be at least 0"))]
    pub price: f64,
    pub age_required: u32,
    #[validate(range(min = 1, message = "Must allow at least 1 participant"))]
    pub max_participants: u32,
    #[validate(range(min = 1, max = 3, message = "Tickets per booking must be between 1 and 3"))]
    pub max_tickets_per_booking: u32,
    #[serde(default)]
    #[validate(length(min = 1, message = "Trip path/route is required"))]
    pub path: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Trip description is required"))]
    pub description: String,
    #[serde(default)]
    #[validate(regex(path = *PHONE_PATTERN, message = "Please provide a valid Jordanian phone number"))]
    pub company_phone_number: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub difficulty_level: Difficulty,
}

impl TripDetails {
    pub fn normalize(&mut self) {
        tidy(&mut self.title);
        tidy(&mut self.start_location);
        tidy(&mut self.end_location);
        tidy(&mut self.path);
        tidy(&mut self.company_phone_number);
        tidy_optional(&mut self.image_url);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(rename = "_id")]
    pub id: String,
    /// `_id` of the owning company.
    pub company: String,
    #[serde(flatten)]
    pub details: TripDetails,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn new(company: &str, details: TripDetails, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            company: company.to_string(),
            details,
            created_at: now,
        }
    }

    pub fn owned_by(&self, company: &str) -> bool {
        self.company == company
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.details.date
    }
}

/// Partial trip edit; every present field overwrites the stored one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "dates::flexible_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_required: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tickets_per_booking: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_phone_number: Option<String>,
    /// `null` clears the image, a missing key keeps it.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<Difficulty>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl TripPatch {
    pub fn apply(self, details: &mut TripDetails) {
        if let Some(title) = self.title {
            details.title = title;
        }
        if let Some(date) = self.date {
            details.date = date;
        }
        if let Some(start_location) = self.start_location {
            details.start_location = start_location;
        }
        if let Some(end_location) = self.end_location {
            details.end_location = end_location;
        }
        if let Some(price) = self.price {
            details.price = price;
        }
        if let Some(age_required) = self.age_required {
            details.age_required = age_required;
        }
        if let Some(max_participants) = self.max_participants {
            details.max_participants = max_participants;
        }
        if let Some(max_tickets) = self.max_tickets_per_booking {
            details.max_tickets_per_booking = max_tickets;
        }
        if let Some(path) = self.path {
            details.path = path;
        }
        if let Some(description) = self.description {
            details.description = description;
        }
        if let Some(phone) = self.company_phone_number {
            details.company_phone_number = phone;
        }
        if let Some(image_url) = self.image_url {
            details.image_url = image_url;
        }
        if let Some(difficulty) = self.difficulty_level {
            details.difficulty_level = difficulty;
        }

        details.normalize();
    }
}

/// A trip with its company populated, as browsed by adventurers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripListing {
    #[serde(rename = "_id")]
    pub id: String,
    pub company: CompanySummary,
    #[serde(flatten)]
    pub details: TripDetails,
    pub created_at: DateTime<Utc>,
}

impl TripListing {
    pub fn new(trip: Trip, company: CompanySummary) -> Self {
        Self {
            id: trip.id,
            company,
            details: trip.details,
            created_at: trip.created_at,
        }
    }
}
