//! Application configuration loaded from the environment

use anyhow::{Context, Result};

/// Application configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string
    pub database_url: String,
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Supabase project URL, used for auth token verification
    pub supabase_url: String,
    /// Supabase anon (publishable) key
    pub supabase_anon_key: String,
    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let supabase_url = std::env::var("SUPABASE_URL").context("SUPABASE_URL must be set")?;
        let supabase_anon_key =
            std::env::var("SUPABASE_ANON_KEY").context("SUPABASE_ANON_KEY must be set")?;
        let allowed_origins = parse_allowed_origins(
            &std::env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );

        Ok(Self {
            database_url,
            bind_address,
            supabase_url,
            supabase_anon_key,
            allowed_origins,
        })
    }
}

/// Split a comma-separated origin list, dropping empty entries
fn parse_allowed_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_origins() {
        let origins = parse_allowed_origins("http://localhost:3000, https://getlead.store");
        assert_eq!(
            origins,
            vec![
                "http://localhost:3000".to_string(),
                "https://getlead.store".to_string()
            ]
        );
    }

    #[test]
    fn drops_empty_entries() {
        let origins = parse_allowed_origins("https://getlead.store,,");
        assert_eq!(origins, vec!["https://getlead.store".to_string()]);
    }
}
