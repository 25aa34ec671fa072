//! Webhook signature verification.
//!
//! The signature header looks like `t=1700000000,v1=<hex>,v1=<hex>`. Each
//! `v1` entry is an HMAC-SHA256 of `"{t}.{payload}"` keyed with the webhook
//! secret; any one matching entry is enough.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::PaymentError;
use crate::config::WEBHOOK_TOLERANCE_SECONDS;

type HmacSha256 = Hmac<Sha256>;

/// Verify `header` against `payload`, rejecting timestamps more than five
/// minutes away from `now` (unix seconds). Nothing verifies without a
/// configured secret.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), PaymentError> {
    if secret.trim().is_empty() {
        return Err(PaymentError::InvalidSignature(
            "Webhook secret is not configured".to_string(),
        ));
    }

    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| PaymentError::InvalidSignature("Missing timestamp".to_string()))?;
    let issued_at: i64 = timestamp
        .parse()
        .map_err(|_| PaymentError::InvalidSignature("Invalid timestamp".to_string()))?;

    if signatures.is_empty() {
        return Err(PaymentError::InvalidSignature(
            "No v1 signature present".to_string(),
        ));
    }

    if (now - issued_at).abs() > WEBHOOK_TOLERANCE_SECONDS {
        return Err(PaymentError::InvalidSignature(
            "Timestamp outside the tolerance zone".to_string(),
        ));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::InvalidSignature(e.to_string()))?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    let matched = signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });

    if !matched {
        return Err(PaymentError::InvalidSignature(
            "Signature mismatch".to_string(),
        ));
    }

    tracing::debug!("Webhook signature verified");
    Ok(())
}

#[cfg(test)]
pub(crate) fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(format!("{timestamp}.").as_bytes());
    mac.update(payload);
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const NOW: i64 = 1_700_000_000;
    const PAYLOAD: &[u8] = br#"{"id":"evt_1","type":"payment_intent.succeeded"}"#;

    #[test]
    fn test_valid_signature_accepted() {
        let header = sign(PAYLOAD, SECRET, NOW);
        assert!(verify_signature(PAYLOAD, &header, SECRET, NOW + 10).is_ok());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let header = sign(PAYLOAD, SECRET, NOW);
        let tampered = br#"{"id":"evt_1","type":"payment_intent.payment_failed"}"#;
        assert!(verify_signature(tampered, &header, SECRET, NOW).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let header = sign(PAYLOAD, "whsec_other", NOW);
        assert!(verify_signature(PAYLOAD, &header, SECRET, NOW).is_err());
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let header = sign(PAYLOAD, SECRET, NOW);
        let result = verify_signature(PAYLOAD, &header, SECRET, NOW + WEBHOOK_TOLERANCE_SECONDS + 1);
        assert!(matches!(result, Err(PaymentError::InvalidSignature(_))));
    }

    #[test]
    fn test_any_matching_v1_accepted() {
        let valid = sign(PAYLOAD, SECRET, NOW);
        let v1 = valid.split("v1=").nth(1).unwrap();
        let header = format!("t={NOW},v1=deadbeef,v0=ignored,v1={v1}");
        assert!(verify_signature(PAYLOAD, &header, SECRET, NOW).is_ok());
    }

    #[test]
    fn test_empty_secret_rejects_everything() {
        let header = sign(PAYLOAD, "", NOW);
        let result = verify_signature(PAYLOAD, &header, "", NOW);
        assert!(matches!(result, Err(PaymentError::InvalidSignature(_))));

        let header = sign(PAYLOAD, SECRET, NOW);
        assert!(verify_signature(PAYLOAD, &header, "  ", NOW).is_err());
    }

    #[test]
    fn test_malformed_headers_rejected() {
        for header in ["", "v1=abc", "t=notanumber,v1=abc", &format!("t={NOW}")] {
            assert!(verify_signature(PAYLOAD, header, SECRET, NOW).is_err(), "{header}");
        }
    }
}
