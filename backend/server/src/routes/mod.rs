use std::{collections::HashMap, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use records::{
    accounts::{Account, Adventurer, Company, CompanySummary, Profile},
    bookings::Booking,
    trips::{Trip, TripListing},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    database::{Collection, Database},
    error::AppError,
    mail::Email,
    state::State,
};

pub mod adventurer;
pub mod auth;
pub mod bookings;
pub mod companies;
pub mod company;
pub mod pages;
pub mod trips;

pub fn router() -> Router<Arc<State>> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/adventurer", adventurer::router())
        .nest("/company", company::router())
        .route("/trips", get(trips::upcoming_trips))
        .route("/pages/{slug}", get(pages::static_page))
        .route("/contact", post(pages::contact))
        .route("/companies", get(companies::all_companies))
        .route("/companies/{id}/trips", get(companies::company_trips))
}

pub async fn account_by_email<P>(database: &Database, email: &str) -> Result<Option<Account<P>>, AppError>
where
    P: Profile + DeserializeOwned,
{
    database
        .find_one(Collection::accounts(P::ROLE), |account: &Account<P>| {
            account.profile.email() == email
        })
        .await
}

pub async fn save_account<P>(database: &Database, account: &Account<P>) -> Result<(), AppError>
where
    P: Profile + Serialize,
{
    database
        .put(Collection::accounts(P::ROLE), account.id(), account)
        .await
}

/// Emails are unique across adventurers and companies.
pub async fn email_in_use(database: &Database, email: &str) -> Result<bool, AppError> {
    Ok(account_by_email::<Adventurer>(database, email).await?.is_some()
        || account_by_email::<Company>(database, email).await?.is_some())
}

/// Attaches each trip's company summary, dropping trips whose company is gone.
pub async fn populate(database: &Database, trips: Vec<Trip>) -> Result<Vec<TripListing>, AppError> {
    let companies: HashMap<String, CompanySummary> = database
        .all::<Account<Company>>(Collection::Companies)
        .await?
        .iter()
        .map(|account| (account.profile.id.clone(), CompanySummary::from(&account.profile)))
        .collect();

    let mut listings: Vec<TripListing> = trips
        .into_iter()
        .filter_map(|trip| {
            let company = companies.get(&trip.company)?.clone();

            Some(TripListing::new(trip, company))
        })
        .collect();

    listings.sort_by(|left, right| left.details.date.cmp(&right.details.date));

    Ok(listings)
}

pub async fn confirmed_bookings(database: &Database, trip: &str) -> Result<Vec<Booking>, AppError> {
    database
        .find(Collection::Bookings, |booking: &Booking| {
            booking.trip == trip && booking.is_confirmed()
        })
        .await
}

/// Emails every adventurer holding a confirmed booking on `trip`.
pub async fn notify_bookers<F>(state: &State, trip: &Trip, notice: F) -> Result<usize, AppError>
where
    F: Fn(&Adventurer) -> Email,
{
    let mut sent = 0;

    for booking in confirmed_bookings(&state.database, &trip.id).await? {
        let Some(account) = state
            .database
            .get::<Account<Adventurer>>(Collection::Adventurers, &booking.adventurer)
            .await?
        else {
            continue;
        };

        state.mailer.send(notice(&account.profile));
        sent += 1;
    }

    Ok(sent)
}

/// Deletes the given trips together with every booking made on them.
pub async fn remove_trips(database: &Database, trips: &[String]) -> Result<(), AppError> {
    let bookings: Vec<String> = database
        .find(Collection::Bookings, |booking: &Booking| trips.contains(&booking.trip))
        .await?
        .into_iter()
        .map(|booking| booking.id)
        .collect();

    database.remove_many(Collection::Bookings, &bookings).await?;
    database.remove_many(Collection::Trips, trips).await?;

    Ok(())
}
