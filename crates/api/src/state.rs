//! Application state

use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;

use crate::{auth::AuthState, config::Config, notifications::NotificationService};

use leadstore_billing::BillingService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    /// Billing service; None when Stripe env vars are absent, in which case
    /// checkout and webhook endpoints reject their requests
    pub billing: Option<Arc<BillingService>>,
    pub notifications: Arc<NotificationService>,
    pub http_client: Client,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        // Try to initialize billing if Stripe env vars are set
        let billing = match BillingService::from_env(pool.clone()) {
            Ok(svc) => {
                tracing::info!("Stripe billing service initialized");
                Some(Arc::new(svc))
            }
            Err(e) => {
                tracing::warn!("Stripe billing not configured: {}", e);
                None
            }
        };

        // HTTP client for external API calls (Supabase token verification)
        let http_client = Client::new();

        if config.supabase_anon_key.is_empty() {
            tracing::warn!(
                "SUPABASE_ANON_KEY is empty - API token verification will fail"
            );
        } else {
            tracing::info!(
                "Supabase API verification enabled via {}",
                config.supabase_url
            );
        }

        let notifications = Arc::new(NotificationService::from_env());

        Self {
            pool,
            config: Arc::new(config),
            billing,
            notifications,
            http_client,
        }
    }

    /// Get auth state for middleware
    pub fn auth_state(&self) -> AuthState {
        AuthState {
            supabase_url: self.config.supabase_url.clone(),
            supabase_anon_key: self.config.supabase_anon_key.clone(),
            http_client: self.http_client.clone(),
        }
    }

    /// Get billing service reference (None when Stripe is not configured)
    pub fn billing_service(&self) -> Option<&Arc<BillingService>> {
        self.billing.as_ref()
    }
}
