mod common;

use reqwest::StatusCode;
use serde_json::json;

use common::{booking_body, in_days, spawn};

#[tokio::test]
async fn test_book_list_and_cancel() {
    let app = spawn().await;
    let company = app.company().await;
    let adventurer = app.adventurer().await;
    let trip = app.insert_trip(&company.id, in_days(10), 10).await;
    let token = Some(adventurer.token.as_str());

    let (status, body) = app
        .post(&format!("/adventurer/book/{}", trip.id), token, booking_body(&[24, 30]))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["message"], "Booking confirmed");
    assert_eq!(body["data"]["status"], "confirmed");
    assert_eq!(body["data"]["ticketCount"], 2);
    let booking = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(&format!("/adventurer/book/{}", trip.id), token, booking_body(&[24]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You have already booked this trip.");

    let (_, body) = app
        .get(&format!("/adventurer/already-booked/{}", trip.id), token)
        .await;
    assert_eq!(body["alreadyBooked"], true);

    let (status, body) = app.get("/adventurer/my-hikes", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["upcoming"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["upcoming"][0]["trip"]["_id"], trip.id.as_str());

    let (status, body) = app
        .patch(&format!("/adventurer/cancel-booking/{booking}"), token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");

    let (status, body) = app
        .patch(&format!("/adventurer/cancel-booking/{booking}"), token, json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Booking is already cancelled.");

    let (_, body) = app.get("/adventurer/my-hikes", token).await;
    assert_eq!(body["data"]["upcoming"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["cancelled"].as_array().unwrap().len(), 1);

    let (_, body) = app
        .get(&format!("/adventurer/already-booked/{}", trip.id), token)
        .await;
    assert_eq!(body["alreadyBooked"], false);

    let (status, _) = app
        .post(&format!("/adventurer/book/{}", trip.id), token, booking_body(&[24]))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_booking_window_closes_five_days_out() {
    let app = spawn().await;
    let company = app.company().await;
    let adventurer = app.adventurer().await;
    let trip = app.insert_trip(&company.id, in_days(3), 10).await;

    let (status, body) = app
        .post(
            &format!("/adventurer/book/{}", trip.id),
            Some(&adventurer.token),
            booking_body(&[24]),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Booking is not allowed less than 5 days before the trip date."
    );
}

#[tokio::test]
async fn test_ticket_rules() {
    let app = spawn().await;
    let company = app.company().await;
    let adventurer = app.adventurer().await;
    let trip = app.insert_trip(&company.id, in_days(20), 10).await;
    let path = format!("/adventurer/book/{}", trip.id);
    let token = Some(adventurer.token.as_str());

    let (status, body) = app.post(&path, token, booking_body(&[20, 21, 22, 23])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid ticket count.");

    let (status, body) = app.post(&path, token, booking_body(&[])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid ticket count.");

    let mut mismatched = booking_body(&[20]);
    mismatched["ticketCount"] = json!(2);
    let (status, body) = app.post(&path, token, mismatched).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Number of participants must match the ticket count (2)."
    );

    let (status, body) = app.post(&path, token, booking_body(&[20, 12])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All participants must be at least 16 years old.");
}

#[tokio::test]
async fn test_capacity_counts_confirmed_tickets() {
    let app = spawn().await;
    let company = app.company().await;
    let first = app.adventurer().await;
    let second = app.adventurer().await;
    let trip = app.insert_trip(&company.id, in_days(10), 3).await;
    let path = format!("/adventurer/book/{}", trip.id);

    let (status, _) = app.post(&path, Some(&first.token), booking_body(&[20, 20])).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post(&path, Some(&second.token), booking_body(&[20, 20]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Not enough spots left on this trip. Remaining: 1."
    );

    let (status, _) = app.post(&path, Some(&second.token), booking_body(&[20])).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_cancellation_follows_the_trip_date() {
    let app = spawn().await;
    let company = app.company().await;
    let adventurer = app.adventurer().await;
    let trip = app.insert_trip(&company.id, in_days(10), 10).await;
    let token = Some(adventurer.token.as_str());

    let (_, body) = app
        .post(&format!("/adventurer/book/{}", trip.id), token, booking_body(&[30]))
        .await;
    let booking = body["data"]["_id"].as_str().unwrap().to_string();

    app.move_trip(&trip, in_days(4)).await;

    let (status, body) = app
        .patch(&format!("/adventurer/cancel-booking/{booking}"), token, json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot cancel less than 5 days before the trip.");
}

#[tokio::test]
async fn test_bookings_are_private() {
    let app = spawn().await;
    let company = app.company().await;
    let owner = app.adventurer().await;
    let other = app.adventurer().await;
    let trip = app.insert_trip(&company.id, in_days(10), 10).await;

    let (_, body) = app
        .post(
            &format!("/adventurer/book/{}", trip.id),
            Some(&owner.token),
            booking_body(&[30]),
        )
        .await;
    let booking = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, body) = app
        .patch(
            &format!("/adventurer/cancel-booking/{booking}"),
            Some(&other.token),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Booking not found");

    let (status, body) = app
        .post(
            "/adventurer/book/missing-trip",
            Some(&owner.token),
            booking_body(&[30]),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Trip not found");
}

#[tokio::test]
async fn test_past_trips_and_deleted_accounts() {
    let app = spawn().await;
    let company = app.company().await;
    let adventurer = app.adventurer().await;
    let trip = app.insert_trip(&company.id, in_days(10), 10).await;
    let token = Some(adventurer.token.as_str());

    app.post(&format!("/adventurer/book/{}", trip.id), token, booking_body(&[30]))
        .await;
    app.move_trip(&trip, in_days(-2)).await;

    let (_, body) = app.get("/adventurer/my-hikes", token).await;
    assert_eq!(body["data"]["past"].as_array().unwrap().len(), 1);

    let (status, body) = app.delete("/adventurer/delete-account", token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let bookings: Vec<records::bookings::Booking> = app
        .state
        .database
        .all(hikejo::database::Collection::Bookings)
        .await
        .unwrap();
    assert!(bookings.is_empty());
}

#[tokio::test]
async fn test_bookings_outliving_their_trip() {
    let app = spawn().await;
    let company = app.company().await;
    let adventurer = app.adventurer().await;
    let trip = app.insert_trip(&company.id, in_days(10), 10).await;
    let token = Some(adventurer.token.as_str());

    let (status, body) = app
        .post(&format!("/adventurer/book/{}", trip.id), token, booking_body(&[30]))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let booking = body["data"]["_id"].as_str().unwrap().to_string();

    assert!(app
        .state
        .database
        .remove(hikejo::database::Collection::Trips, &trip.id)
        .await
        .unwrap());

    let (status, body) = app.get("/adventurer/my-hikes", token).await;
    assert_eq!(status, StatusCode::OK);
    for group in ["upcoming", "past", "cancelled"] {
        assert!(body["data"][group].as_array().unwrap().is_empty());
    }

    let (status, body) = app
        .patch(&format!("/adventurer/cancel-booking/{booking}"), token, json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Trip not found");
}
