use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State as Shared},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use records::{
    pages::{ContactMessage, ContactRequest, PageSlug, StaticPage},
    patterns::check,
};
use serde_json::json;
use tracing::info;

use crate::{
    auth::Session, database::Collection, error::AppError, mail::Email, state::State,
    utils::Payload,
};

pub async fn static_page(
    Shared(state): Shared<Arc<State>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let missing = || AppError::NotFound(format!("Page with slug '{slug}' not found"));

    let known: PageSlug = slug.parse().map_err(|_| missing())?;
    let page = state
        .database
        .get::<StaticPage>(Collection::Pages, known.as_str())
        .await?
        .ok_or_else(missing)?;

    Ok(Json(json!({ "status": "success", "data": page })))
}

/// Stores the message, then forwards it to the contact inbox.
pub async fn contact(
    Shared(state): Shared<Arc<State>>,
    session: Session,
    Payload(mut request): Payload<ContactRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.normalize();
    check(&request).map_err(AppError::Invalid)?;

    let message = ContactMessage::new(request, Utc::now());
    state
        .database
        .put(Collection::Contacts, &message.id, &message)
        .await?;

    state
        .mailer
        .send(Email::contact_forward(&state.config.mail.contact_inbox, &message));

    info!("Contact message {} from a {}", message.id, session.role());

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Your message has been sent successfully!",
            "data": message,
        })),
    ))
}
