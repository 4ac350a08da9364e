//! Stripe webhook receiver

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/stripe/webhook - raw-body receiver for Stripe events.
///
/// Stays outside the auth middleware: Stripe authenticates with its signature
/// header, and verification needs the untouched body bytes.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(billing) = state.billing_service() else {
        tracing::error!("Webhook received but Stripe is not configured");
        return processing_failed();
    };

    let Some(signature) = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
    else {
        tracing::warn!("Webhook request without Stripe-Signature header");
        return invalid_signature();
    };

    let payload = match std::str::from_utf8(&body) {
        Ok(payload) => payload,
        Err(_) => {
            tracing::warn!("Webhook body is not valid UTF-8");
            return invalid_signature();
        }
    };

    let event = match billing.webhooks.verify_event(payload, signature) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Webhook signature verification failed");
            return invalid_signature();
        }
    };

    match billing.webhooks.handle_event(event).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "received": true }))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Webhook processing failed");
            processing_failed()
        }
    }
}

fn invalid_signature() -> Response {
    ApiError::Validation("Invalid signature".to_string()).into_response()
}

fn processing_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Webhook processing failed" })),
    )
        .into_response()
}
