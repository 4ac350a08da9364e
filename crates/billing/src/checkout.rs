//! Hosted checkout session creation for plan activation

use std::collections::HashMap;

use stripe::{
    CheckoutSession, CheckoutSessionCustomerCreation, CheckoutSessionMode, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, Currency,
};
use uuid::Uuid;

use crate::client::StripeClient;
use crate::error::{BillingError, BillingResult};
use crate::plans::ActivationPlan;

/// Result of creating a hosted checkout session
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
}

/// Creates Stripe hosted checkout sessions for the one-time activation fee
#[derive(Clone)]
pub struct CheckoutService {
    stripe: StripeClient,
}

impl CheckoutService {
    pub fn new(stripe: StripeClient) -> Self {
        Self { stripe }
    }

    /// Create a hosted checkout session charging the activation fee.
    ///
    /// The organization id, user id, and plan name ride along as session
    /// metadata so the webhook receiver can correlate the completed payment
    /// back to the organization.
    pub async fn create_activation_session(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        customer_email: Option<&str>,
        plan: ActivationPlan,
    ) -> BillingResult<CheckoutResponse> {
        let base_url = &self.stripe.config().app_base_url;
        let success_url = format!("{base_url}/dashboard/success");
        let cancel_url = format!("{base_url}/pricing");
        let org_ref = org_id.to_string();

        let mut metadata = HashMap::new();
        metadata.insert("organization_id".to_string(), org_id.to_string());
        metadata.insert("user_id".to_string(), user_id.to_string());
        metadata.insert("plan".to_string(), plan.as_str().to_string());

        let line_item = CreateCheckoutSessionLineItems {
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency: Currency::USD,
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: format!("{} Plan Activation", plan.display_name()),
                    description: Some(format!(
                        "One-time activation fee for the {} plan",
                        plan.display_name()
                    )),
                    ..Default::default()
                }),
                unit_amount: Some(plan.activation_fee_cents()),
                ..Default::default()
            }),
            quantity: Some(1),
            ..Default::default()
        };

        let params = CreateCheckoutSession {
            mode: Some(CheckoutSessionMode::Payment),
            // One-time payments default to if_required, which would complete
            // the session without a customer id to stamp on the organization
            customer_creation: Some(CheckoutSessionCustomerCreation::Always),
            line_items: Some(vec![line_item]),
            success_url: Some(&success_url),
            cancel_url: Some(&cancel_url),
            client_reference_id: Some(&org_ref),
            customer_email,
            metadata: Some(metadata),
            ..Default::default()
        };

        let session = CheckoutSession::create(self.stripe.inner(), params).await?;

        let url = session.url.clone().ok_or_else(|| {
            BillingError::Internal("Stripe returned a checkout session without a URL".to_string())
        })?;

        tracing::info!(
            org_id = %org_id,
            user_id = %user_id,
            plan = %plan,
            session_id = %session.id,
            "Created activation checkout session"
        );

        Ok(CheckoutResponse {
            session_id: session.id.to_string(),
            url,
        })
    }
}
