// Test file - these are expected patterns in test code
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Edge Case Tests for Billing
//!
//! Tests critical boundary conditions in:
//! - Webhook signature verification (BILL-W01 to BILL-W13)
//! - Activation plans (BILL-P01 to BILL-P04)
//! - Amount conversion (BILL-A01 to BILL-A04)
//! - Checkout-session activation extraction (BILL-C01 to BILL-C05)

#[cfg(test)]
mod webhook_signature_tests {
    use crate::error::BillingError;
    use crate::webhooks::verify_signature;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;
    use std::time::{SystemTime, UNIX_EPOCH};

    type HmacSha256 = Hmac<Sha256>;

    const SECRET: &str = "whsec_test_secret_abc123";

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
    }

    /// Build a signature header the way Stripe does, signing with the
    /// secret's key material (the part after the `whsec_` prefix).
    fn sign_payload(payload: &str, secret: &str, timestamp: i64) -> String {
        let key = secret.strip_prefix("whsec_").unwrap_or(secret);
        let signed_payload = format!("{timestamp}.{payload}");
        let mut mac = HmacSha256::new_from_slice(key.as_bytes()).unwrap();
        mac.update(signed_payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        format!("t={timestamp},v1={signature}")
    }

    // =========================================================================
    // BILL-W01: Correctly signed payload with fresh timestamp - accepted
    // =========================================================================
    #[test]
    fn test_valid_signature_accepted() {
        let payload = r#"{"id":"evt_1","type":"checkout.session.completed"}"#;
        let header = sign_payload(payload, SECRET, now());

        assert!(verify_signature(payload, &header, SECRET).is_ok());
    }

    // =========================================================================
    // BILL-W02: Payload modified after signing - rejected
    // =========================================================================
    #[test]
    fn test_tampered_payload_rejected() {
        let payload = r#"{"id":"evt_1","amount_total":20000}"#;
        let header = sign_payload(payload, SECRET, now());
        let tampered = r#"{"id":"evt_1","amount_total":1}"#;

        let result = verify_signature(tampered, &header, SECRET);
        assert!(matches!(result, Err(BillingError::WebhookSignatureInvalid)));
    }

    // =========================================================================
    // BILL-W03: Signed with a different endpoint secret - rejected
    // =========================================================================
    #[test]
    fn test_wrong_secret_rejected() {
        let payload = r#"{"id":"evt_1"}"#;
        let header = sign_payload(payload, "whsec_some_other_secret", now());

        let result = verify_signature(payload, &header, SECRET);
        assert!(matches!(result, Err(BillingError::WebhookSignatureInvalid)));
    }

    // =========================================================================
    // BILL-W04: Timestamp older than the tolerance window - rejected
    // =========================================================================
    #[test]
    fn test_stale_timestamp_rejected() {
        let payload = r#"{"id":"evt_1"}"#;
        let header = sign_payload(payload, SECRET, now() - 400);

        let result = verify_signature(payload, &header, SECRET);
        assert!(matches!(result, Err(BillingError::WebhookSignatureInvalid)));
    }

    // =========================================================================
    // BILL-W05: Timestamp too far in the future - rejected
    // =========================================================================
    #[test]
    fn test_future_timestamp_rejected() {
        let payload = r#"{"id":"evt_1"}"#;
        let header = sign_payload(payload, SECRET, now() + 400);

        let result = verify_signature(payload, &header, SECRET);
        assert!(matches!(result, Err(BillingError::WebhookSignatureInvalid)));
    }

    // =========================================================================
    // BILL-W06: Timestamp inside the tolerance window - accepted
    // =========================================================================
    #[test]
    fn test_timestamp_within_tolerance_accepted() {
        let payload = r#"{"id":"evt_1"}"#;
        let header = sign_payload(payload, SECRET, now() - 200);

        assert!(verify_signature(payload, &header, SECRET).is_ok());
    }

    // =========================================================================
    // BILL-W07: Header missing the t= pair - rejected
    // =========================================================================
    #[test]
    fn test_missing_timestamp_rejected() {
        let result = verify_signature(r#"{"id":"evt_1"}"#, "v1=deadbeef", SECRET);
        assert!(matches!(result, Err(BillingError::WebhookSignatureInvalid)));
    }

    // =========================================================================
    // BILL-W08: Header missing the v1= pair - rejected
    // =========================================================================
    #[test]
    fn test_missing_signature_rejected() {
        let header = format!("t={}", now());
        let result = verify_signature(r#"{"id":"evt_1"}"#, &header, SECRET);
        assert!(matches!(result, Err(BillingError::WebhookSignatureInvalid)));
    }

    // =========================================================================
    // BILL-W09: Garbage header - rejected
    // =========================================================================
    #[test]
    fn test_garbage_header_rejected() {
        let result = verify_signature(r#"{"id":"evt_1"}"#, "not-a-signature", SECRET);
        assert!(matches!(result, Err(BillingError::WebhookSignatureInvalid)));
    }

    // =========================================================================
    // BILL-W10: Empty header - rejected
    // =========================================================================
    #[test]
    fn test_empty_header_rejected() {
        let result = verify_signature(r#"{"id":"evt_1"}"#, "", SECRET);
        assert!(matches!(result, Err(BillingError::WebhookSignatureInvalid)));
    }

    // =========================================================================
    // BILL-W11: Secret configured without the whsec_ prefix - still verifies
    // =========================================================================
    #[test]
    fn test_unprefixed_secret_accepted() {
        let secret = "raw_key_material_no_prefix";
        let payload = r#"{"id":"evt_1"}"#;
        let header = sign_payload(payload, secret, now());

        assert!(verify_signature(payload, &header, secret).is_ok());
    }

    // =========================================================================
    // BILL-W12: Header carrying extra scheme pairs (v0=) - extras ignored
    // =========================================================================
    #[test]
    fn test_extra_header_pairs_ignored() {
        let payload = r#"{"id":"evt_1"}"#;
        let header = format!("{},v0=0123456789abcdef", sign_payload(payload, SECRET, now()));

        assert!(verify_signature(payload, &header, SECRET).is_ok());
    }

    // =========================================================================
    // BILL-W13: Multi-byte UTF-8 in the payload - signed and verified intact
    // =========================================================================
    #[test]
    fn test_unicode_payload_accepted() {
        let payload = r#"{"id":"evt_1","description":"café ☕ activation"}"#;
        let header = sign_payload(payload, SECRET, now());

        assert!(verify_signature(payload, &header, SECRET).is_ok());
    }
}

#[cfg(test)]
mod plan_tests {
    use crate::plans::{ActivationPlan, ACTIVATION_FEE_CENTS};

    // =========================================================================
    // BILL-P01: Known plan names parse to their tier
    // =========================================================================
    #[test]
    fn test_known_plan_names() {
        assert_eq!(ActivationPlan::from_name("starter"), ActivationPlan::Starter);
        assert_eq!(ActivationPlan::from_name("growth"), ActivationPlan::Growth);
        assert_eq!(ActivationPlan::from_name("pro"), ActivationPlan::Pro);
    }

    // =========================================================================
    // BILL-P02: Unknown, empty, and wrong-case names fall back to Starter
    // =========================================================================
    #[test]
    fn test_unknown_plan_falls_back_to_starter() {
        assert_eq!(
            ActivationPlan::from_name("enterprise"),
            ActivationPlan::Starter
        );
        assert_eq!(ActivationPlan::from_name(""), ActivationPlan::Starter);
        // Matching is case-sensitive; anything else is treated as unknown
        assert_eq!(ActivationPlan::from_name("Pro"), ActivationPlan::Starter);
    }

    // =========================================================================
    // BILL-P03: Activation fee is flat across every tier
    // =========================================================================
    #[test]
    fn test_flat_activation_fee() {
        assert_eq!(ActivationPlan::Starter.activation_fee_cents(), 20_000);
        assert_eq!(ActivationPlan::Growth.activation_fee_cents(), 20_000);
        assert_eq!(ActivationPlan::Pro.activation_fee_cents(), 20_000);
        assert_eq!(ACTIVATION_FEE_CENTS, 20_000);
    }

    // =========================================================================
    // BILL-P04: Plan names serialize lowercase and round-trip through serde
    // =========================================================================
    #[test]
    fn test_plan_serialization() {
        let json = serde_json::to_value(ActivationPlan::Growth).unwrap();
        assert_eq!(json, serde_json::json!("growth"));

        let parsed: ActivationPlan = serde_json::from_str("\"pro\"").unwrap();
        assert_eq!(parsed, ActivationPlan::Pro);

        assert_eq!(ActivationPlan::Starter.to_string(), "starter");
    }
}

#[cfg(test)]
mod amount_tests {
    use crate::webhooks::amount_major_units;

    // =========================================================================
    // BILL-A01: Activation fee converts from cents to whole dollars
    // =========================================================================
    #[test]
    fn test_activation_fee_conversion() {
        assert_eq!(amount_major_units(Some(20_000)), 200.0);
    }

    // =========================================================================
    // BILL-A02: Missing amount_total records a zero payment
    // =========================================================================
    #[test]
    fn test_missing_amount_is_zero() {
        assert_eq!(amount_major_units(None), 0.0);
    }

    // =========================================================================
    // BILL-A03: Non-whole dollar amounts keep their cents
    // =========================================================================
    #[test]
    fn test_fractional_dollars_preserved() {
        assert_eq!(amount_major_units(Some(20_050)), 200.5);
        assert_eq!(amount_major_units(Some(1)), 0.01);
    }

    // =========================================================================
    // BILL-A04: Zero amount stays zero
    // =========================================================================
    #[test]
    fn test_zero_amount() {
        assert_eq!(amount_major_units(Some(0)), 0.0);
    }
}

#[cfg(test)]
mod activation_details_tests {
    use crate::error::BillingError;
    use crate::webhooks::ActivationDetails;
    use stripe::EventObject;
    use uuid::Uuid;

    const ORG_ID: &str = "1f0e2d3c-4b5a-4978-8796-a5b4c3d2e1f0";
    const PAYMENT_INTENT_ID: &str = "pi_3PqRsT2eZvKYlo2C1a2b3c4d";

    /// A `checkout.session.completed` event shaped the way Stripe delivers
    /// it, with the customer and metadata fields injected per case.
    fn checkout_completed_event(customer_json: &str, metadata_json: &str) -> stripe::Event {
        let payload = format!(
            r#"{{
  "id": "evt_1PqRsT2eZvKYlo2C0XyZabcd",
  "object": "event",
  "api_version": "2023-10-16",
  "created": 1724680000,
  "data": {{
    "object": {{
      "id": "cs_test_a1b2c3d4e5f6",
      "object": "checkout.session",
      "amount_subtotal": 20000,
      "amount_total": 20000,
      "automatic_tax": {{"enabled": false, "status": null}},
      "cancel_url": "http://localhost:3000/pricing",
      "client_reference_id": "{ORG_ID}",
      "created": 1724679900,
      "currency": "usd",
      "custom_fields": [],
      "custom_text": {{}},
      "customer": {customer_json},
      "customer_creation": "always",
      "customer_email": null,
      "expires_at": 1724766300,
      "livemode": false,
      "metadata": {metadata_json},
      "mode": "payment",
      "payment_intent": "{PAYMENT_INTENT_ID}",
      "payment_method_types": ["card"],
      "payment_status": "paid",
      "shipping_options": [],
      "status": "complete",
      "success_url": "http://localhost:3000/dashboard/success",
      "url": null
    }}
  }},
  "livemode": false,
  "pending_webhooks": 1,
  "request": {{"id": null, "idempotency_key": null}},
  "type": "checkout.session.completed"
}}"#
        );
        serde_json::from_str(&payload).unwrap()
    }

    fn metadata_json() -> String {
        format!(
            r#"{{"organization_id":"{ORG_ID}","user_id":"9c8b7a6d-5e4f-4321-9876-0f1e2d3c4b5a","plan":"growth"}}"#
        )
    }

    fn session_from(event: stripe::Event) -> stripe::CheckoutSession {
        match event.data.object {
            EventObject::CheckoutSession(session) => session,
            other => panic!("expected a checkout session, got {other:?}"),
        }
    }

    // =========================================================================
    // BILL-C01: Session without a customer still yields activation details
    //           (one-time payments only carry a customer when checkout asks
    //           for one; the payment must be recorded either way)
    // =========================================================================
    #[test]
    fn test_missing_customer_tolerated() {
        let session = session_from(checkout_completed_event("null", &metadata_json()));

        let details = ActivationDetails::from_session(&session).unwrap().unwrap();

        assert_eq!(details.org_id, Uuid::parse_str(ORG_ID).unwrap());
        assert!(details.customer_id.is_none());
        assert_eq!(details.plan, "growth");
        assert_eq!(details.amount, 200.0);
        assert_eq!(details.currency, "usd");
        assert_eq!(details.payment_intent_id.as_deref(), Some(PAYMENT_INTENT_ID));
    }

    // =========================================================================
    // BILL-C02: Unexpanded customer id carried through as the marker value
    // =========================================================================
    #[test]
    fn test_customer_id_extracted() {
        let session = session_from(checkout_completed_event(
            "\"cus_QhIjKlMnOpQrSt\"",
            &metadata_json(),
        ));

        let details = ActivationDetails::from_session(&session).unwrap().unwrap();

        assert_eq!(details.customer_id.as_deref(), Some("cus_QhIjKlMnOpQrSt"));
        assert_eq!(
            details.user_id.as_deref(),
            Some("9c8b7a6d-5e4f-4321-9876-0f1e2d3c4b5a")
        );
    }

    // =========================================================================
    // BILL-C03: Session without metadata - nothing to activate
    // =========================================================================
    #[test]
    fn test_missing_metadata_yields_nothing() {
        let session = session_from(checkout_completed_event("null", "null"));

        assert!(ActivationDetails::from_session(&session).unwrap().is_none());
    }

    // =========================================================================
    // BILL-C04: Malformed organization_id - rejected as invalid metadata
    // =========================================================================
    #[test]
    fn test_malformed_org_id_rejected() {
        let session = session_from(checkout_completed_event(
            "null",
            r#"{"organization_id":"not-a-uuid","plan":"growth"}"#,
        ));

        let result = ActivationDetails::from_session(&session);
        assert!(matches!(result, Err(BillingError::InvalidMetadata(_))));
    }

    // =========================================================================
    // BILL-C05: Metadata without a plan falls back to starter
    // =========================================================================
    #[test]
    fn test_missing_plan_falls_back_to_starter() {
        let session = session_from(checkout_completed_event(
            "null",
            &format!(r#"{{"organization_id":"{ORG_ID}"}}"#),
        ));

        let details = ActivationDetails::from_session(&session).unwrap().unwrap();
        assert_eq!(details.plan, "starter");
    }
}
