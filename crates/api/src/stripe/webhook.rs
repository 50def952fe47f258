//! Stripe webhook payloads and signature verification.
//!
//! The `Stripe-Signature` header carries `t=<unix-ts>,v1=<hex-hmac>`; the
//! signature is HMAC-SHA256 over `"{timestamp}.{raw_body}"` keyed with the
//! endpoint's signing secret. Comparison is constant-time.

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Event type for a succeeded payment intent.
pub const EVENT_PAYMENT_SUCCEEDED: &str = "payment_intent.succeeded";

/// Event type for a failed payment intent.
pub const EVENT_PAYMENT_FAILED: &str = "payment_intent.payment_failed";

/// A webhook event envelope, reduced to the payment-intent events we handle.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub object: PaymentIntentObject,
}

/// The payment intent embedded in the event.
#[derive(Debug, Deserialize)]
pub struct PaymentIntentObject {
    pub id: String,
    /// Amount in the smallest currency unit (cents).
    pub amount: i64,
    /// Payment method id, present once a method was attached.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Metadata we attached when creating the intent
    /// (`user_id`, `subscription_id`).
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Verify a `Stripe-Signature` header against the raw request body.
pub fn verify_signature(payload: &[u8], signature_header: &str, secret: &str) -> bool {
    let parts: HashMap<&str, &str> = signature_header
        .split(',')
        .filter_map(|part| {
            let mut kv = part.splitn(2, '=');
            Some((kv.next()?.trim(), kv.next()?))
        })
        .collect();

    let (Some(timestamp), Some(signature)) = (parts.get("t"), parts.get("v1")) else {
        return false;
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    let expected = hex::encode(mac.finalize().into_bytes());
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}
