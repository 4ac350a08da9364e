//! Lead ingestion, query, and seeding

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::organizations::organization_for_owner;
use crate::state::AppState;

use leadstore_shared::LeadStatus;

/// Flat price in dollars every ingested lead is recorded at
pub const LEAD_PRICE: f64 = 20.0;

const INSERT_LEAD: &str = r#"
    INSERT INTO leads (name, phone, description, address, city, state, status, price, organization_id)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    RETURNING id, name, phone, description, address, city, state, status, price,
              organization_id, created_at
"#;

/// A lead row as stored and returned to the dashboard
#[derive(Debug, Serialize, FromRow)]
pub struct LeadRow {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub status: LeadStatus,
    pub price: f64,
    pub organization_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Incoming lead payload.
///
/// Price and status are deliberately absent: callers cannot set them, every
/// ingested lead lands as `new` at the flat per-lead price.
#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub name: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub lead: LeadRow,
}

#[derive(Debug, Serialize)]
pub struct LeadsResponse {
    pub leads: Vec<LeadRow>,
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: String,
    pub leads: Vec<LeadRow>,
    pub count: usize,
}

/// GET /api/leads - all leads for the caller's organization, newest first
pub async fn list_leads(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<LeadsResponse>> {
    let org = organization_for_owner(&state.pool, auth_user.user_id).await?;

    let leads: Vec<LeadRow> = sqlx::query_as(
        r#"
        SELECT id, name, phone, description, address, city, state, status, price,
               organization_id, created_at
        FROM leads
        WHERE organization_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(org.id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(LeadsResponse { leads }))
}

/// POST /api/leads - record a new lead for the caller's organization
pub async fn create_lead(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateLeadRequest>,
) -> ApiResult<Json<LeadResponse>> {
    let org = organization_for_owner(&state.pool, auth_user.user_id).await?;

    let lead: LeadRow = sqlx::query_as(INSERT_LEAD)
        .bind(&payload.name)
        .bind(&payload.phone)
        .bind(&payload.description)
        .bind(&payload.address)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(LeadStatus::New)
        .bind(LEAD_PRICE)
        .bind(org.id)
        .fetch_one(&state.pool)
        .await?;

    tracing::info!(
        lead_id = %lead.id,
        org_id = %org.id,
        "Lead recorded"
    );

    state
        .notifications
        .notify_new_lead(
            auth_user.email.as_deref(),
            &lead.name,
            lead.description.as_deref(),
        )
        .await;

    Ok(Json(LeadResponse { lead }))
}

/// POST /api/leads/seed - insert the five sample leads for the caller's org.
///
/// Every call inserts a fresh batch inside one transaction: five rows or
/// none. Repeated calls duplicate the samples; the dashboard's test-data
/// button owns de-duping.
pub async fn seed_leads(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<SeedResponse>> {
    let org = organization_for_owner(&state.pool, auth_user.user_id).await?;

    let mut tx = state.pool.begin().await?;
    let mut leads = Vec::with_capacity(SEED_LEADS.len());

    for seed in SEED_LEADS {
        let lead: LeadRow = sqlx::query_as(INSERT_LEAD)
            .bind(seed.name)
            .bind(seed.phone)
            .bind(seed.description)
            .bind(seed.address)
            .bind(seed.city)
            .bind(seed.state)
            .bind(seed.status)
            .bind(seed.price)
            .bind(org.id)
            .fetch_one(&mut *tx)
            .await?;
        leads.push(lead);
    }

    tx.commit().await?;

    tracing::info!(org_id = %org.id, count = leads.len(), "Seeded sample leads");

    Ok(Json(SeedResponse {
        message: "Test leads created successfully".to_string(),
        count: leads.len(),
        leads,
    }))
}

struct SeedLead {
    name: &'static str,
    phone: &'static str,
    description: &'static str,
    address: &'static str,
    city: &'static str,
    state: &'static str,
    status: LeadStatus,
    price: f64,
}

const SEED_LEADS: [SeedLead; 5] = [
    SeedLead {
        name: "John Smith",
        phone: "+1 (555) 123-4567",
        description: "Locked out of house, need emergency locksmith",
        address: "123 Main St, San Francisco, CA",
        city: "San Francisco",
        state: "CA",
        status: LeadStatus::New,
        price: 150.0,
    },
    SeedLead {
        name: "Sarah Johnson",
        phone: "+1 (555) 987-6543",
        description: "Garage door won't open, motor making noise",
        address: "456 Oak Ave, San Francisco, CA",
        city: "San Francisco",
        state: "CA",
        status: LeadStatus::Assigned,
        price: 200.0,
    },
    SeedLead {
        name: "Mike Davis",
        phone: "+1 (555) 456-7890",
        description: "Need new locks installed on front door",
        address: "789 Pine St, San Francisco, CA",
        city: "San Francisco",
        state: "CA",
        status: LeadStatus::Completed,
        price: 180.0,
    },
    SeedLead {
        name: "Lisa Wilson",
        phone: "+1 (555) 321-9876",
        description: "Car keys locked inside vehicle",
        address: "321 Elm St, San Francisco, CA",
        city: "San Francisco",
        state: "CA",
        status: LeadStatus::New,
        price: 120.0,
    },
    SeedLead {
        name: "Robert Brown",
        phone: "+1 (555) 654-3210",
        description: "Safe won't open, forgot combination",
        address: "654 Maple Ave, San Francisco, CA",
        city: "San Francisco",
        state: "CA",
        status: LeadStatus::Assigned,
        price: 250.0,
    },
];
