//! # HikeJo Client
//!
//! Typed wrapper over the HikeJo REST API, used by the `hikejo` command line
//! app and usable from any tokio program.
//!
//! ```no_run
//! # async fn run() -> hikejo_client::Result<()> {
//! let mut api = hikejo_client::ApiClient::new("http://localhost:3000")?;
//! api.login_adventurer("lina@example.com", "secret1").await?;
//!
//! for trip in api.upcoming_trips().await? {
//!     println!("{} on {}", trip.details.title, trip.details.date);
//! }
//! # Ok(())
//! # }
//! ```
use std::time::Duration;

use records::{
    accounts::{
        Adventurer, AdventurerLogin, AdventurerPatch, AdventurerSignup, Company, CompanyListing,
        CompanyLogin, CompanyPatch, CompanySignup, ForgotPassword, PasswordReset, ResetCode,
    },
    bookings::{Booking, BookingRequest, MyHikes, TripRoster},
    pages::{ContactMessage, ContactRequest, PageSlug, StaticPage},
    trips::{Trip, TripDetails, TripListing, TripPatch},
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

pub mod stats;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} ({status})")]
    Api { status: StatusCode, message: String },

    #[error("Not logged in")]
    NoToken,
}

impl ClientError {
    /// Status of a rejected request, `None` for transport failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            ClientError::NoToken => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct Notice {
    message: String,
}

#[derive(Deserialize)]
struct AdventurerAuth {
    adventurer: Adventurer,
    token: String,
}

#[derive(Deserialize)]
struct CompanyAuth {
    company: Company,
    token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlreadyBooked {
    already_booked: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyTrips {
    pub company_name: String,
    pub results: usize,
    pub data: Vec<TripListing>,
}

pub struct ApiClient {
    client: Client,
    base: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, format!("{}{path}", self.base));

        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        if self.token.is_none() {
            return Err(ClientError::NoToken);
        }

        Ok(self.request(method, path))
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<Notice>().await {
            Ok(notice) => notice.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        };

        Err(ClientError::Api { status, message })
    }

    async fn parse<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = ApiClient::check(request.send().await?).await?;

        Ok(response.json().await?)
    }

    async fn data<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let envelope: Envelope<T> = ApiClient::parse(request).await?;

        Ok(envelope.data)
    }

    async fn message<B: Serialize>(&self, path: &str, body: &B) -> Result<String> {
        let notice: Notice = ApiClient::parse(self.request(Method::POST, path).json(body)).await?;

        Ok(notice.message)
    }

    async fn empty(request: RequestBuilder) -> Result<()> {
        ApiClient::check(request.send().await?).await?;

        Ok(())
    }

    pub async fn signup_adventurer(&mut self, signup: &AdventurerSignup) -> Result<Adventurer> {
        let request = self
            .request(Method::POST, "/auth/signup/adventurer")
            .json(signup);
        let auth: AdventurerAuth = ApiClient::data(request).await?;

        self.token = Some(auth.token);
        Ok(auth.adventurer)
    }

    pub async fn login_adventurer(&mut self, email: &str, password: &str) -> Result<Adventurer> {
        let login = AdventurerLogin {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = self.request(Method::POST, "/auth/login/adventurer").json(&login);
        let auth: AdventurerAuth = ApiClient::data(request).await?;

        self.token = Some(auth.token);
        Ok(auth.adventurer)
    }

    pub async fn signup_company(&mut self, signup: &CompanySignup) -> Result<Company> {
        let request = self.request(Method::POST, "/auth/signup/company").json(signup);
        let auth: CompanyAuth = ApiClient::data(request).await?;

        self.token = Some(auth.token);
        Ok(auth.company)
    }

    pub async fn login_company(&mut self, company_id: &str, password: &str) -> Result<Company> {
        let login = CompanyLogin {
            company_id: company_id.to_string(),
            password: password.to_string(),
        };
        let request = self.request(Method::POST, "/auth/login/company").json(&login);
        let auth: CompanyAuth = ApiClient::data(request).await?;

        self.token = Some(auth.token);
        Ok(auth.company)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<String> {
        let body = ForgotPassword {
            email: email.to_string(),
        };

        self.message("/auth/forgot-password", &body).await
    }

    pub async fn verify_reset_code(&self, email: &str, code: &str) -> Result<String> {
        let body = ResetCode {
            email: email.to_string(),
            code: code.to_string(),
        };

        self.message("/auth/verify-reset-code", &body).await
    }

    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<String> {
        self.message("/auth/reset-password", reset).await
    }

    pub async fn upcoming_trips(&self) -> Result<Vec<TripListing>> {
        ApiClient::data(self.request(Method::GET, "/trips")).await
    }

    pub async fn page(&self, slug: PageSlug) -> Result<StaticPage> {
        ApiClient::data(self.request(Method::GET, &format!("/pages/{slug}"))).await
    }

    pub async fn contact(&self, request: &ContactRequest) -> Result<ContactMessage> {
        ApiClient::data(self.authed(Method::POST, "/contact")?.json(request)).await
    }

    pub async fn companies(&self) -> Result<Vec<CompanyListing>> {
        ApiClient::data(self.authed(Method::GET, "/companies")?).await
    }

    pub async fn company_trips(&self, company: &str) -> Result<CompanyTrips> {
        ApiClient::parse(self.authed(Method::GET, &format!("/companies/{company}/trips"))?).await
    }

    pub async fn adventurer_profile(&self) -> Result<Adventurer> {
        ApiClient::data(self.authed(Method::GET, "/adventurer/profile")?).await
    }

    pub async fn update_adventurer_profile(&self, patch: &AdventurerPatch) -> Result<Adventurer> {
        ApiClient::data(self.authed(Method::PATCH, "/adventurer/profile")?.json(patch)).await
    }

    pub async fn delete_adventurer_account(&mut self) -> Result<()> {
        ApiClient::empty(self.authed(Method::DELETE, "/adventurer/delete-account")?).await?;

        self.token = None;
        Ok(())
    }

    pub async fn book(&self, trip: &str, request: &BookingRequest) -> Result<Booking> {
        let path = format!("/adventurer/book/{trip}");

        ApiClient::data(self.authed(Method::POST, &path)?.json(request)).await
    }

    pub async fn my_hikes(&self) -> Result<MyHikes> {
        ApiClient::data(self.authed(Method::GET, "/adventurer/my-hikes")?).await
    }

    pub async fn cancel_booking(&self, booking: &str) -> Result<Booking> {
        let path = format!("/adventurer/cancel-booking/{booking}");

        ApiClient::data(self.authed(Method::PATCH, &path)?).await
    }

    pub async fn already_booked(&self, trip: &str) -> Result<bool> {
        let path = format!("/adventurer/already-booked/{trip}");
        let answer: AlreadyBooked = ApiClient::parse(self.authed(Method::GET, &path)?).await?;

        Ok(answer.already_booked)
    }

    pub async fn company_profile(&self) -> Result<Company> {
        ApiClient::data(self.authed(Method::GET, "/company/profile")?).await
    }

    pub async fn update_company_profile(&self, patch: &CompanyPatch) -> Result<Company> {
        ApiClient::data(self.authed(Method::PATCH, "/company/profile")?.json(patch)).await
    }

    pub async fn delete_company_account(&mut self) -> Result<()> {
        ApiClient::empty(self.authed(Method::DELETE, "/company/delete-account")?).await?;

        self.token = None;
        Ok(())
    }

    pub async fn my_trips(&self) -> Result<Vec<TripListing>> {
        ApiClient::data(self.authed(Method::GET, "/company/trips")?).await
    }

    pub async fn create_trip(&self, details: &TripDetails) -> Result<Trip> {
        ApiClient::data(self.authed(Method::POST, "/company/trips")?.json(details)).await
    }

    pub async fn trip_roster(&self, trip: &str) -> Result<TripRoster> {
        let path = format!("/company/trips/{trip}");

        ApiClient::data(self.authed(Method::GET, &path)?).await
    }

    pub async fn update_trip(&self, trip: &str, patch: &TripPatch) -> Result<Trip> {
        let path = format!("/company/trips/{trip}");

        ApiClient::data(self.authed(Method::PATCH, &path)?.json(patch)).await
    }

    pub async fn delete_trip(&self, trip: &str) -> Result<()> {
        let path = format!("/company/trips/{trip}");

        ApiClient::empty(self.authed(Method::DELETE, &path)?).await
    }
}
