//! # Records
//!
//! Documents shared by the HikeJo API server, the seed tool, and the client.
//!
//! ## Collections
//!
//! - adventurers: [`accounts::Account`] wrapping an [`accounts::Adventurer`]
//! - companies: [`accounts::Account`] wrapping a [`accounts::Company`]
//! - trips: [`trips::Trip`], owned by a company
//! - bookings: [`bookings::Booking`], one adventurer against one trip
//! - contacts: [`pages::ContactMessage`]
//! - pages: [`pages::StaticPage`], keyed by slug
//!
//! Every document serializes with camelCase keys and an `_id` string (UUID v4),
//! except static pages which are keyed by their slug.
//!
//! ## Policy
//!
//! The 5-day window and the booking checks live in [`policy`] so the server and
//! the client evaluate them the same way. Nothing in this crate performs I/O.

pub mod accounts;
pub mod bookings;
pub mod dates;
pub mod pages;
pub mod patterns;
pub mod policy;
pub mod trips;

use uuid::Uuid;

/// Fresh document id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
