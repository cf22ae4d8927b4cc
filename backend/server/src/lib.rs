//! Documentation of HikeJo, a marketplace where hiking companies publish trips
//! and adventurers book them.
//!
//!
//!
//! # General Infrastructure
//! - One axum server exposes the REST API consumed by the web frontend and the `hikejo` CLI
//! - Documents live in Redis, one hash per collection, see [`database`]
//! - Without `REDIS_URL` the server runs on an in-memory store, handy for local runs
//! - Emails go through a background worker so no request waits on mail, see [`mail`]
//! - Static pages (about, faq, terms, privacy) are loaded by the `seed` tool
//!
//!
//!
//! # Roles
//!
//! | Role | Can |
//! |------|-----|
//! | Adventurer | browse trips and companies, book, cancel, manage a profile |
//! | Company | publish, edit and delete trips, see who booked, manage a profile |
//!
//! Both roles log in for a bearer token, see [`auth`].
//!
//!
//!
//! # 5-day Policy Window
//!
//! Booking, cancelling, editing and deleting only work while the trip is more
//! than five days away. The rules live in the `records` crate so the client
//! shows the same answer the server enforces.
//!
//! Editing or deleting a trip emails every adventurer holding a confirmed
//! booking on it.
//!
//!
//!
//! # Notes
//!
//! ## Redis over a document database
//! Collections are small and every hot lookup is by `_id`, so a hash per collection
//! gives O(1) reads without another service to run. Filters such as "trips of this
//! company" scan the hash, which is fine at this size.
//!
//! There are no transactions. Two adventurers racing for the last spot can both get
//! through; that is accepted for now.
//!
//!
//!
//! # Setup
//!
//! Run locally with the in-memory store.
//! ```sh
//! JWT_SECRET=dev RUST_LOG=info cargo run --bin hikejo-server
//! ```
//!
//! Run against Redis.
//! ```sh
//! REDIS_URL=redis://127.0.0.1:6379 JWT_SECRET=dev cargo run --bin hikejo-server
//! ```
//!
//! Load the static pages.
//! ```sh
//! cargo run --bin seed -- pages content/pages
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    http::{
        HeaderValue, Method, StatusCode, Uri,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    response::IntoResponse,
};
use serde_json::json;
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod mail;
pub mod routes;
pub mod state;
pub mod utils;

use config::Config;
use error::ServerError;
use state::State;

pub async fn start_server() -> Result<(), ServerError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config).await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

pub fn app(state: Arc<State>) -> Router {
    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    match state.config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(_) => warn!(
            "Invalid CORS_ORIGIN {}, cross-origin requests will be refused",
            state.config.cors_origin
        ),
    }

    routes::router()
        .fallback(unknown_route)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn unknown_route(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "fail",
            "message": format!("Can't find {} on this server", uri.path()),
        })),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
