//! Organization lookup

use axum::{extract::State, Extension, Json};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// An organization row as stored.
///
/// `stripe_customer_id` doubles as the activation marker: null means the
/// organization is still pending, non-null means activated.
#[derive(Debug, Serialize, FromRow)]
pub struct OrganizationRow {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub stripe_customer_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    pub organization: OrganizationRow,
}

/// Resolve the caller's organization by ownership.
///
/// One organization per owner, enforced by lookup rather than constraint.
pub(crate) async fn organization_for_owner(
    pool: &PgPool,
    owner_id: Uuid,
) -> ApiResult<OrganizationRow> {
    let org: Option<OrganizationRow> = sqlx::query_as(
        r#"
        SELECT id, name, owner_id, stripe_customer_id, created_at, updated_at
        FROM organizations
        WHERE owner_id = $1
        LIMIT 1
        "#,
    )
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    org.ok_or_else(|| ApiError::NotFound("Organization not found".to_string()))
}

/// GET /api/organization - the caller's organization
pub async fn get_organization(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<OrganizationResponse>> {
    let organization = organization_for_owner(&state.pool, auth_user.user_id).await?;
    Ok(Json(OrganizationResponse { organization }))
}
