//! Unauthenticated diagnostics endpoints

use axum::Json;
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// GET /api/test - reports which identity-provider env vars are present.
/// Values are presence flags only; never the configured secrets themselves.
pub async fn api_test() -> Json<serde_json::Value> {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(json!({
        "message": "API is working",
        "supabaseUrl": presence("SUPABASE_URL"),
        "supabaseKey": presence("SUPABASE_ANON_KEY"),
        "serviceKey": presence("SUPABASE_SERVICE_ROLE_KEY"),
        "timestamp": timestamp,
    }))
}

/// GET /health - liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn presence(key: &str) -> &'static str {
    if std::env::var(key).is_ok_and(|value| !value.is_empty()) {
        "Set"
    } else {
        "Not set"
    }
}
