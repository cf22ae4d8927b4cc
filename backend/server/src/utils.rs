use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::AppError;

/// `Json<T>` whose rejections come back in the usual `fail` envelope.
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| AppError::MalformedPayload(rejection.body_text()))?;

        Ok(Payload(value))
    }
}

/// `{ status, results, data }`, the shape of every list response.
pub fn listing<T: Serialize>(items: &[T]) -> Json<Value> {
    Json(json!({
        "status": "success",
        "results": items.len(),
        "data": items,
    }))
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::header::CONTENT_TYPE};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Ticket {
        count: u32,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_payload_parses() {
        let Payload(ticket) = Payload::<Ticket>::from_request(request(r#"{"count":2}"#), &())
            .await
            .unwrap();

        assert_eq!(ticket.count, 2);
    }

    #[tokio::test]
    async fn test_payload_rejection_is_malformed() {
        let result = Payload::<Ticket>::from_request(request(r#"{"count":"two"}"#), &()).await;

        assert!(matches!(result, Err(AppError::MalformedPayload(_))));
    }

    #[test]
    fn test_listing_counts() {
        let Json(body) = listing(&["a", "b"]);

        assert_eq!(body["results"], 2);
        assert_eq!(body["data"][1], "b");
    }
}
