//! Stripe webhook verification and processing
//!
//! Verifies inbound event signatures, then applies organization activation
//! for completed checkout sessions. All writes for one event happen in a
//! single transaction keyed on the Stripe event id, so redelivered events
//! are no-ops and failed deliveries leave nothing behind for the retry.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use sqlx::PgPool;
use stripe::{Event, EventObject, EventType, Expandable, Webhook};
use uuid::Uuid;

use crate::client::StripeClient;
use crate::error::{BillingError, BillingResult};

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of a webhook signature timestamp, in seconds
const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Webhook handler for Stripe events
pub struct WebhookHandler {
    stripe: StripeClient,
    pool: PgPool,
}

impl WebhookHandler {
    pub fn new(stripe: StripeClient, pool: PgPool) -> Self {
        Self { stripe, pool }
    }

    /// Verify a webhook payload's signature and parse it into an event.
    ///
    /// Tries the SDK's verification first, then falls back to manual
    /// signature verification for payloads the SDK rejects on API version
    /// grounds rather than signature grounds.
    pub fn verify_event(&self, payload: &str, signature: &str) -> BillingResult<Event> {
        let webhook_secret = &self.stripe.config().webhook_secret;

        match Webhook::construct_event(payload, signature, webhook_secret) {
            Ok(event) => return Ok(event),
            Err(e) => {
                tracing::debug!(
                    stripe_error = %e,
                    "SDK webhook parsing failed, trying manual verification"
                );
            }
        }

        verify_signature(payload, signature, webhook_secret)?;

        let event: Event = serde_json::from_str(payload).map_err(|e| {
            tracing::error!(parse_error = %e, "Webhook payload is not a valid Stripe event");
            BillingError::WebhookSignatureInvalid
        })?;

        tracing::info!(
            event_type = %event.type_,
            event_id = %event.id,
            "Manual webhook verification succeeded"
        );

        Ok(event)
    }

    /// Process a verified Stripe event
    pub async fn handle_event(&self, event: Event) -> BillingResult<()> {
        match event.type_ {
            EventType::CheckoutSessionCompleted => self.handle_checkout_completed(event).await,
            EventType::PaymentIntentSucceeded => {
                if let EventObject::PaymentIntent(intent) = &event.data.object {
                    tracing::info!(payment_intent_id = %intent.id, "Payment succeeded");
                }
                Ok(())
            }
            EventType::PaymentIntentPaymentFailed => {
                if let EventObject::PaymentIntent(intent) = &event.data.object {
                    tracing::warn!(payment_intent_id = %intent.id, "Payment failed");
                }
                Ok(())
            }
            _ => {
                tracing::debug!(
                    event_type = %event.type_,
                    event_id = %event.id,
                    "Ignoring unhandled webhook event type"
                );
                Ok(())
            }
        }
    }

    /// Activate the organization named in a completed checkout session.
    ///
    /// Claims the event id, stamps the organization with its Stripe customer
    /// id, and records the activation payment, all in one transaction. A
    /// redelivered event finds its id already claimed and returns without
    /// writing; any failure rolls the whole set back so Stripe's retry starts
    /// from a clean slate.
    async fn handle_checkout_completed(&self, event: Event) -> BillingResult<()> {
        let event_id = event.id.to_string();
        let event_type = event.type_.to_string();

        let session = match event.data.object {
            EventObject::CheckoutSession(session) => session,
            _ => {
                return Err(BillingError::WebhookEventNotSupported(
                    "checkout.session.completed without a session object".to_string(),
                ));
            }
        };

        let Some(details) = ActivationDetails::from_session(&session)? else {
            tracing::warn!(
                event_id = %event_id,
                session_id = %session.id,
                "Completed checkout session has no metadata, nothing to activate"
            );
            return Ok(());
        };

        let ActivationDetails {
            org_id,
            user_id,
            plan,
            customer_id,
            payment_intent_id,
            amount,
            currency,
        } = details;

        let description = format!("Activation fee for {plan} plan");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| BillingError::Database(e.to_string()))?;

        let claimed: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO stripe_webhook_events (stripe_event_id, event_type)
            VALUES ($1, $2)
            ON CONFLICT (stripe_event_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&event_id)
        .bind(&event_type)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| BillingError::Database(e.to_string()))?;

        if claimed.is_none() {
            tracing::info!(
                event_id = %event_id,
                org_id = %org_id,
                "Duplicate webhook delivery, event already processed"
            );
            return Ok(());
        }

        match &customer_id {
            Some(customer_id) => {
                sqlx::query(
                    "UPDATE organizations SET stripe_customer_id = $1, updated_at = NOW() WHERE id = $2",
                )
                .bind(customer_id)
                .bind(org_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| BillingError::Database(e.to_string()))?;
            }
            None => {
                // Checkout asks Stripe to always create a customer; a session
                // without one still records its payment.
                tracing::warn!(
                    event_id = %event_id,
                    org_id = %org_id,
                    "Completed checkout session has no customer, activation marker unchanged"
                );
            }
        }

        sqlx::query(
            r#"
            INSERT INTO payments (organization_id, stripe_payment_intent_id, amount, currency, status, description)
            VALUES ($1, $2, $3, $4, 'succeeded', $5)
            ON CONFLICT (stripe_payment_intent_id) DO NOTHING
            "#,
        )
        .bind(org_id)
        .bind(&payment_intent_id)
        .bind(amount)
        .bind(&currency)
        .bind(&description)
        .execute(&mut *tx)
        .await
        .map_err(|e| BillingError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| BillingError::Database(e.to_string()))?;

        tracing::info!(
            event_id = %event_id,
            org_id = %org_id,
            user_id = ?user_id,
            plan = %plan,
            customer_id = ?customer_id,
            amount = amount,
            "Organization activated and payment recorded"
        );

        Ok(())
    }
}

/// Everything the activation writes need, pulled out of a completed session
#[derive(Debug)]
pub(crate) struct ActivationDetails {
    pub(crate) org_id: Uuid,
    pub(crate) user_id: Option<String>,
    pub(crate) plan: String,
    pub(crate) customer_id: Option<String>,
    pub(crate) payment_intent_id: Option<String>,
    pub(crate) amount: f64,
    pub(crate) currency: String,
}

impl ActivationDetails {
    /// Extract activation details from a completed checkout session.
    ///
    /// `Ok(None)` means the session carries no metadata and there is nothing
    /// to activate. A missing customer is tolerated rather than treated as
    /// an error: the payment is still recorded, and erroring here would only
    /// put Stripe into an endless redelivery loop.
    pub(crate) fn from_session(session: &stripe::CheckoutSession) -> BillingResult<Option<Self>> {
        let Some(metadata) = &session.metadata else {
            return Ok(None);
        };

        let org_id = metadata
            .get("organization_id")
            .ok_or_else(|| BillingError::InvalidMetadata("missing organization_id".to_string()))
            .and_then(|raw| {
                Uuid::parse_str(raw).map_err(|e| {
                    BillingError::InvalidMetadata(format!("invalid organization_id: {e}"))
                })
            })?;
        let user_id = metadata.get("user_id").cloned();
        let plan = metadata
            .get("plan")
            .cloned()
            .unwrap_or_else(|| "starter".to_string());

        let customer_id = match &session.customer {
            Some(Expandable::Id(id)) => Some(id.to_string()),
            Some(Expandable::Object(customer)) => Some(customer.id.to_string()),
            None => None,
        };

        let payment_intent_id = match &session.payment_intent {
            Some(Expandable::Id(id)) => Some(id.to_string()),
            Some(Expandable::Object(intent)) => Some(intent.id.to_string()),
            None => None,
        };

        let amount = amount_major_units(session.amount_total);
        let currency = session
            .currency
            .map(|c| c.to_string())
            .unwrap_or_else(|| "usd".to_string());

        Ok(Some(Self {
            org_id,
            user_id,
            plan,
            customer_id,
            payment_intent_id,
            amount,
            currency,
        }))
    }
}

/// Convert a Stripe minor-unit amount to the major units stored on payments.
/// A session without a total records a zero payment rather than failing.
pub(crate) fn amount_major_units(amount_total: Option<i64>) -> f64 {
    amount_total.unwrap_or(0) as f64 / 100.0
}

/// Manual Stripe signature verification.
///
/// Parses the `t=` and `v1=` pairs out of the signature header, enforces the
/// timestamp tolerance, and compares an HMAC-SHA256 over `"{t}.{payload}"`
/// against the supplied signature.
pub(crate) fn verify_signature(
    payload: &str,
    signature: &str,
    webhook_secret: &str,
) -> BillingResult<()> {
    let mut timestamp: Option<i64> = None;
    let mut v1_signature: Option<String> = None;

    for part in signature.split(',') {
        let kv: Vec<&str> = part.splitn(2, '=').collect();
        if kv.len() == 2 {
            match kv[0] {
                "t" => timestamp = kv[1].parse().ok(),
                "v1" => v1_signature = Some(kv[1].to_string()),
                _ => {}
            }
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        tracing::warn!("Webhook signature header has no timestamp");
        BillingError::WebhookSignatureInvalid
    })?;

    let v1_signature = v1_signature.ok_or_else(|| {
        tracing::warn!("Webhook signature header has no v1 signature");
        BillingError::WebhookSignatureInvalid
    })?;

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(|e| {
            tracing::error!("System time error: {e}");
            BillingError::WebhookSignatureInvalid
        })?
        .as_secs() as i64;

    if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        tracing::warn!(
            timestamp = timestamp,
            now = now,
            "Webhook timestamp outside tolerance"
        );
        return Err(BillingError::WebhookSignatureInvalid);
    }

    // The "whsec_" prefix is an identifier, not part of the signing key
    let secret_key = webhook_secret
        .strip_prefix("whsec_")
        .unwrap_or(webhook_secret);
    let signed_payload = format!("{timestamp}.{payload}");

    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|_| BillingError::WebhookSignatureInvalid)?;
    mac.update(signed_payload.as_bytes());
    let computed = hex::encode(mac.finalize().into_bytes());

    if computed != v1_signature {
        tracing::warn!("Webhook signature mismatch");
        return Err(BillingError::WebhookSignatureInvalid);
    }

    Ok(())
}
