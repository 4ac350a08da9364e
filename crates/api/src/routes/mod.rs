//! HTTP route registration

pub mod checkout;
pub mod diagnostics;
pub mod leads;
pub mod organizations;
pub mod webhook;

#[cfg(test)]
mod route_tests;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::require_auth;
use crate::state::AppState;

/// Build the application router.
///
/// Protected routes sit behind the Supabase auth middleware. The webhook and
/// diagnostics endpoints stay public; the webhook authenticates with its
/// signature header instead.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/leads", get(leads::list_leads).post(leads::create_lead))
        .route("/api/leads/seed", post(leads::seed_leads))
        .route("/api/organization", get(organizations::get_organization))
        .route(
            "/api/stripe/checkout",
            post(checkout::create_checkout_session),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth_state(),
            require_auth,
        ));

    let public = Router::new()
        .route("/api/stripe/webhook", post(webhook::stripe_webhook))
        .route("/api/test", get(diagnostics::api_test))
        .route("/health", get(diagnostics::health));

    Router::new()
        .merge(protected)
        .merge(public)
        .with_state(state)
}
