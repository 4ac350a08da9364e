//! Stripe client wrapper and configuration

use crate::error::{BillingError, BillingResult};

/// Stripe configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (`sk_test_...` or `sk_live_...`)
    pub secret_key: String,
    /// Webhook endpoint signing secret (`whsec_...`)
    pub webhook_secret: String,
    /// Base URL of the customer-facing app, used to build checkout redirect URLs
    pub app_base_url: String,
}

impl StripeConfig {
    pub fn from_env() -> BillingResult<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| BillingError::Configuration("STRIPE_SECRET_KEY not set".to_string()))?;
        let webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .map_err(|_| BillingError::Configuration("STRIPE_WEBHOOK_SECRET not set".to_string()))?;
        let app_base_url = std::env::var("APP_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            secret_key,
            webhook_secret,
            app_base_url,
        })
    }
}

/// Thin wrapper around the Stripe SDK client that carries our configuration
#[derive(Clone)]
pub struct StripeClient {
    client: stripe::Client,
    config: StripeConfig,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Self {
        let client = stripe::Client::new(config.secret_key.clone());
        Self { client, config }
    }

    pub fn from_env() -> BillingResult<Self> {
        let config = StripeConfig::from_env()?;
        tracing::info!("Stripe client configured");
        Ok(Self::new(config))
    }

    /// The underlying SDK client for direct API calls
    pub fn inner(&self) -> &stripe::Client {
        &self.client
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }
}
