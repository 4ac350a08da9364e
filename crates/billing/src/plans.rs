//! Activation plans and pricing

use serde::{Deserialize, Serialize};

/// One-time activation fee in cents, flat across every plan
pub const ACTIVATION_FEE_CENTS: i64 = 20_000;

/// Pricing plan a business activates under.
///
/// The plan tier is recorded on the payment and carried through checkout
/// metadata; the activation fee itself does not vary by tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationPlan {
    Starter,
    Growth,
    Pro,
}

impl ActivationPlan {
    /// Parse a plan name, falling back to Starter for anything unrecognized
    pub fn from_name(name: &str) -> Self {
        match name {
            "growth" => ActivationPlan::Growth,
            "pro" => ActivationPlan::Pro,
            _ => ActivationPlan::Starter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivationPlan::Starter => "starter",
            ActivationPlan::Growth => "growth",
            ActivationPlan::Pro => "pro",
        }
    }

    /// Human-readable name shown on the checkout line item
    pub fn display_name(&self) -> &'static str {
        match self {
            ActivationPlan::Starter => "Starter",
            ActivationPlan::Growth => "Growth",
            ActivationPlan::Pro => "Pro",
        }
    }

    /// Activation fee in cents
    pub fn activation_fee_cents(&self) -> i64 {
        ACTIVATION_FEE_CENTS
    }
}

impl std::fmt::Display for ActivationPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
