//! Billing error types

use thiserror::Error;

pub type BillingResult<T> = Result<T, BillingError>;

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Stripe API error: {0}")]
    Stripe(#[from] stripe::StripeError),

    #[error("Webhook signature verification failed")]
    WebhookSignatureInvalid,

    #[error("Unsupported webhook event payload: {0}")]
    WebhookEventNotSupported(String),

    #[error("Invalid session metadata: {0}")]
    InvalidMetadata(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Billing configuration error: {0}")]
    Configuration(String),

    #[error("Internal billing error: {0}")]
    Internal(String),
}
