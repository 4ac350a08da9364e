//! Authentication middleware for Axum
//!
//! Every protected route requires a Supabase-issued bearer token. Tokens are
//! verified against Supabase's user endpoint on every request; no
//! verification state is held between requests.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// State handed to the auth middleware, derived from the app configuration
#[derive(Clone)]
pub struct AuthState {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub http_client: reqwest::Client,
}

/// Authenticated user extracted from a verified Supabase token.
///
/// Inserted into request extensions by [`require_auth`] so handlers can take
/// it via `Extension<AuthUser>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization token")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Token verification failed")]
    VerificationFailed,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingToken => tracing::debug!("Request without bearer token"),
            AuthError::InvalidToken => tracing::debug!("Request with invalid token"),
            AuthError::VerificationFailed => {
                tracing::warn!("Token verification unavailable, rejecting request");
            }
        }

        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized" })),
        )
            .into_response()
    }
}

/// Shape of Supabase's `/auth/v1/user` response, reduced to what we keep
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SupabaseUserResponse {
    pub id: String,
    pub email: Option<String>,
}

/// Require a valid Supabase bearer token on the request.
///
/// On success the verified [`AuthUser`] is inserted into request extensions
/// and the request continues down the stack. Any failure short-circuits with
/// a 401 response.
pub async fn require_auth(
    State(auth_state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_bearer_token(request.headers()) {
        Some(token) => token.to_string(),
        None => return AuthError::MissingToken.into_response(),
    };

    match verify_supabase_token(&auth_state, &token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header
pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verify a token by asking Supabase who it belongs to
pub(crate) async fn verify_supabase_token(
    state: &AuthState,
    token: &str,
) -> Result<AuthUser, AuthError> {
    let url = format!("{}/auth/v1/user", state.supabase_url);

    let response = state
        .http_client
        .get(&url)
        .header("apikey", &state.supabase_anon_key)
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Supabase auth request failed");
            AuthError::VerificationFailed
        })?;

    if !response.status().is_success() {
        tracing::debug!(status = %response.status(), "Supabase rejected token");
        return Err(AuthError::InvalidToken);
    }

    let user: SupabaseUserResponse = response.json().await.map_err(|e| {
        tracing::error!(error = %e, "Supabase auth response malformed");
        AuthError::VerificationFailed
    })?;

    let user_id = Uuid::parse_str(&user.id).map_err(|_| {
        tracing::error!(raw_id = %user.id, "Supabase returned a non-UUID user id");
        AuthError::InvalidToken
    })?;

    Ok(AuthUser {
        user_id,
        email: user.email,
    })
}
