//! # Sessions
//!
//! Stateless HS256 tokens carrying the account `_id` and role. Every protected
//! handler takes one of the extractors below, which reloads the account so a
//! deleted user is locked out even while their token is still valid.
//!
//! | Extractor | Accepts |
//! |-----------|---------|
//! | [`Session`] | any logged-in account |
//! | [`AdventurerSession`] | adventurers, 403 for companies |
//! | [`CompanySession`] | companies, 403 for adventurers |
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use records::accounts::{Account, Adventurer, Company, Role};
use serde::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use tracing::debug;

use crate::{config::Config, database::Collection, error::AppError, state::State};

const NOT_LOGGED_IN: &str = "You are not logged in. Please log in to access this resource.";
const BAD_TOKEN: &str = "Invalid or expired token. Please log in again.";
const ACCOUNT_GONE: &str = "The user belonging to this token no longer exists.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue_token(config: &Config, id: &str, role: Role) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let exp = i64::try_from(config.token_ttl.as_secs())
        .ok()
        .and_then(|ttl| now.checked_add(ttl))
        .ok_or_else(|| AppError::internal("token lifetime out of range"))?;

    let claims = Claims {
        sub: id.to_string(),
        role,
        iat: now,
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(AppError::internal)
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}

/// Runs on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(AppError::internal)?
        .map_err(AppError::internal)
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(AppError::internal)?
        .map_err(AppError::internal)
}

/// Six digits, never starting with zero.
pub fn reset_code() -> String {
    rand::rng().random_range(100_000..1_000_000).to_string()
}

fn bearer(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[derive(Debug, Clone)]
pub enum Session {
    Adventurer(Adventurer),
    Company(Company),
}

impl Session {
    pub fn role(&self) -> Role {
        match self {
            Session::Adventurer(_) => Role::Adventurer,
            Session::Company(_) => Role::Company,
        }
    }
}

impl FromRequestParts<Arc<State>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<State>) -> Result<Self, Self::Rejection> {
        let token = bearer(parts).ok_or(AppError::Unauthorized(NOT_LOGGED_IN))?;

        let claims = verify_token(&state.config.jwt_secret, token).map_err(|e| {
            debug!("Rejected token: {e}");

            AppError::Unauthorized(BAD_TOKEN)
        })?;

        let session = match claims.role {
            Role::Adventurer => state
                .database
                .get::<Account<Adventurer>>(Collection::Adventurers, &claims.sub)
                .await?
                .map(|account| Session::Adventurer(account.profile)),
            Role::Company => state
                .database
                .get::<Account<Company>>(Collection::Companies, &claims.sub)
                .await?
                .map(|account| Session::Company(account.profile)),
        };

        session.ok_or(AppError::Unauthorized(ACCOUNT_GONE))
    }
}

pub struct AdventurerSession(pub Adventurer);

impl FromRequestParts<Arc<State>> for AdventurerSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<State>) -> Result<Self, Self::Rejection> {
        match Session::from_request_parts(parts, state).await? {
            Session::Adventurer(adventurer) => Ok(AdventurerSession(adventurer)),
            Session::Company(_) => Err(AppError::Forbidden),
        }
    }
}

pub struct CompanySession(pub Company);

impl FromRequestParts<Arc<State>> for CompanySession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<State>) -> Result<Self, Self::Rejection> {
        match Session::from_request_parts(parts, state).await? {
            Session::Company(company) => Ok(CompanySession(company)),
            Session::Adventurer(_) => Err(AppError::Forbidden),
        }
    }
}
