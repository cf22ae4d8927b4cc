#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

use chrono::{DateTime, TimeDelta, Utc};
use hikejo::{
    config::Config,
    database::{Collection, Database},
    mail::{Email, Mailer},
    state::State,
};
use records::trips::{Trip, TripDetails};
use reqwest::{Client, Method, StatusCode};
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::mpsc::UnboundedReceiver};

static NEXT_USER: AtomicU32 = AtomicU32::new(1);

pub struct TestApp {
    pub base: String,
    pub client: Client,
    pub state: Arc<State>,
    pub inbox: UnboundedReceiver<Email>,
}

pub struct User {
    pub id: String,
    pub token: String,
    pub email: String,
    pub profile: Value,
}

pub async fn spawn() -> TestApp {
    let mut config = Config::local("integration-secret");
    config.bcrypt_cost = 4;
    config.mail.contact_inbox = "inbox@hikejo.local".to_string();

    let (mailer, inbox) = Mailer::detached();
    let state = State::with_parts(config, Database::memory(), mailer);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let app = hikejo::app(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        base: format!("http://{address}"),
        client: Client::new(),
        state,
        inbox,
    }
}

fn next_user() -> u32 {
    NEXT_USER.fetch_add(1, Ordering::Relaxed)
}

pub fn phone(n: u32) -> String {
    format!("+96279{n:07}")
}

pub fn in_days(days: i64) -> DateTime<Utc> {
    Utc::now() + TimeDelta::days(days)
}

pub fn trip_body(date: DateTime<Utc>) -> Value {
    json!({
        "title": "Wadi Mujib Siq",
        "date": date.to_rfc3339(),
        "startLocation": "Mujib Bridge",
        "endLocation": "Mujib Waterfall",
        "price": 35,
        "ageRequired": 16,
        "maxParticipants": 10,
        "maxTicketsPerBooking": 3,
        "path": "Siq trail",
        "description": "Wet hike up the siq",
        "companyPhoneNumber": "+962781234567",
        "difficultyLevel": "moderate"
    })
}

pub fn booking_body(ages: &[u32]) -> Value {
    json!({
        "ticketCount": ages.len(),
        "participants": ages.iter().enumerate().map(|(i, age)| json!({
            "name": format!("Hiker {i}"),
            "age": age,
            "gender": "female",
            "phoneNumber": "+962771234567",
            "email": "hiker@example.com"
        })).collect::<Vec<_>>()
    })
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = self.client.request(method, format!("{}{path}", self.base));

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.unwrap();
        let status = response.status();
        let text = response.text().await.unwrap();

        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap()
        };

        (status, body)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, path, token, Some(body)).await
    }

    pub async fn patch(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, path, token, None).await
    }

    pub async fn adventurer(&self) -> User {
        let n = next_user();
        let email = format!("adventurer{n}@example.com");

        let (status, body) = self
            .post(
                "/auth/signup/adventurer",
                None,
                json!({
                    "firstName": "Lina",
                    "lastName": "Haddad",
                    "gender": "female",
                    "age": 24,
                    "city": "Amman",
                    "email": email,
                    "phoneNumber": phone(n),
                    "password": "secret1"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        User {
            id: body["data"]["adventurer"]["_id"].as_str().unwrap().to_string(),
            token: body["data"]["token"].as_str().unwrap().to_string(),
            email,
            profile: body["data"]["adventurer"].clone(),
        }
    }

    pub async fn company(&self) -> User {
        let n = next_user();
        let email = format!("company{n}@example.com");

        let (status, body) = self
            .post(
                "/auth/signup/company",
                None,
                json!({
                    "companyName": format!("Petra Trails {n}"),
                    "companyId": format!("JO-{n}"),
                    "location": "Wadi Musa",
                    "yearsInBusiness": 7,
                    "email": email,
                    "phoneNumber": phone(n),
                    "password": "longsecret",
                    "website": "https://petratrails.jo"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        User {
            id: body["data"]["company"]["_id"].as_str().unwrap().to_string(),
            token: body["data"]["token"].as_str().unwrap().to_string(),
            email,
            profile: body["data"]["company"].clone(),
        }
    }

    /// Stores a trip directly, skipping the lead-time rule on creation.
    pub async fn insert_trip(&self, company: &str, date: DateTime<Utc>, max_participants: u32) -> Trip {
        let mut body = trip_body(date);
        body["maxParticipants"] = json!(max_participants);
        let details: TripDetails = serde_json::from_value(body).unwrap();

        let trip = Trip::new(company, details, Utc::now());
        self.state
            .database
            .put(Collection::Trips, &trip.id, &trip)
            .await
            .unwrap();

        trip
    }

    pub async fn move_trip(&self, trip: &Trip, date: DateTime<Utc>) {
        let mut moved = trip.clone();
        moved.details.date = date;

        self.state
            .database
            .put(Collection::Trips, &moved.id, &moved)
            .await
            .unwrap();
    }

    pub fn emails(&mut self) -> Vec<Email> {
        let mut emails = Vec::new();
        while let Ok(email) = self.inbox.try_recv() {
            emails.push(email);
        }

        emails
    }
}
