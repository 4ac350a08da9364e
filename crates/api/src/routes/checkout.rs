//! Plan activation checkout

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::routes::organizations::organization_for_owner;
use crate::state::AppState;

use leadstore_billing::ActivationPlan;

#[derive(Debug, Deserialize, Default)]
pub struct CheckoutRequest {
    pub plan: Option<String>,
}

/// Checkout session handed back to the dashboard, which redirects to `url`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResponse {
    pub session_id: String,
    pub url: String,
}

/// POST /api/stripe/checkout - create a hosted checkout session charging the
/// activation fee. Unknown or absent plan names fall back to starter.
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CheckoutRequest>,
) -> ApiResult<Json<CheckoutSessionResponse>> {
    let billing = state
        .billing_service()
        .ok_or_else(|| ApiError::Internal("Stripe is not configured".to_string()))?;

    let org = organization_for_owner(&state.pool, auth_user.user_id).await?;
    let plan = ActivationPlan::from_name(payload.plan.as_deref().unwrap_or("starter"));

    let session = billing
        .checkout
        .create_activation_session(org.id, auth_user.user_id, auth_user.email.as_deref(), plan)
        .await?;

    Ok(Json(CheckoutSessionResponse {
        session_id: session.session_id,
        url: session.url,
    }))
}
