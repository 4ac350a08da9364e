//! Domain types shared across workspace crates

use serde::{Deserialize, Serialize};

/// Lifecycle state of a lead.
///
/// Ingestion always creates leads as `New`. The remaining states exist for
/// dashboard display and seeded demo data; no handler transitions them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "lead_status", rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Assigned,
    Completed,
    Rejected,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Assigned => "assigned",
            LeadStatus::Completed => "completed",
            LeadStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LeadStatus::New).unwrap(),
            "\"new\""
        );
        assert_eq!(
            serde_json::to_string(&LeadStatus::Assigned).unwrap(),
            "\"assigned\""
        );
    }

    #[test]
    fn lead_status_round_trips() {
        for status in [
            LeadStatus::New,
            LeadStatus::Assigned,
            LeadStatus::Completed,
            LeadStatus::Rejected,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let back: LeadStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(status, back);
        }
    }
}
