// API crate clippy configuration
// Test code patterns:
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! GetLead.Store API Library
//!
//! This crate contains the API server components for GetLead.Store: lead
//! ingestion and query, activation checkout, the Stripe webhook receiver,
//! and new-lead notification fan-out.

pub mod auth;
pub mod config;
pub mod error;
pub mod notifications;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
