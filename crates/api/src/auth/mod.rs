//! Authentication module for GetLead.Store

pub mod middleware;
#[cfg(test)]
mod middleware_tests;

pub use middleware::{require_auth, AuthError, AuthState, AuthUser};
