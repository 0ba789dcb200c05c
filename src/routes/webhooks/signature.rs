//! Verification of the identity provider's webhook signatures.
//!
//! The provider signs `{msg_id}.{timestamp}.{payload}` with HMAC-SHA256 and
//! sends base64 signatures in a space-separated `webhook-signature` header
//! (`v1,<sig>` entries). The shared secret arrives base64-encoded with an
//! optional `whsec_` prefix.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Reject events whose timestamp is further than this from the server
/// clock, in either direction.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("webhook secret is malformed")]
    InvalidSecret,
    #[error("webhook timestamp is malformed")]
    InvalidTimestamp,
    #[error("webhook timestamp is outside the tolerance window")]
    StaleTimestamp,
    #[error("no signature matched the payload")]
    Mismatch,
}

fn decode_secret(secret: &str) -> Result<Vec<u8>, SignatureError> {
    let trimmed = secret.strip_prefix("whsec_").unwrap_or(secret);
    BASE64.decode(trimmed).map_err(|_| SignatureError::InvalidSecret)
}

/// Check `signature_header` against the signed content. Comparison goes
/// through `Mac::verify_slice`, which is constant-time.
pub fn verify(
    secret: &str,
    msg_id: &str,
    timestamp: &str,
    payload: &[u8],
    signature_header: &str,
    now: DateTime<Utc>,
) -> Result<(), SignatureError> {
    let key = decode_secret(secret)?;

    let ts: i64 = timestamp.parse().map_err(|_| SignatureError::InvalidTimestamp)?;
    if (now.timestamp() - ts).abs() > TIMESTAMP_TOLERANCE_SECS {
        return Err(SignatureError::StaleTimestamp);
    }

    let mut mac = HmacSha256::new_from_slice(&key).map_err(|_| SignatureError::InvalidSecret)?;
    mac.update(msg_id.as_bytes());
    mac.update(b".");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    for candidate in signature_header.split_whitespace() {
        let Some((version, sig)) = candidate.split_once(',') else {
            continue;
        };
        if version != "v1" {
            continue;
        }
        let Ok(decoded) = BASE64.decode(sig) else {
            continue;
        };
        if mac.clone().verify_slice(&decoded).is_ok() {
            return Ok(());
        }
    }
    Err(SignatureError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";

    fn sign(msg_id: &str, timestamp: &str, payload: &[u8]) -> String {
        let key = decode_secret(SECRET).unwrap();
        let mut mac = HmacSha256::new_from_slice(&key).unwrap();
        mac.update(format!("{}.{}.", msg_id, timestamp).as_bytes());
        mac.update(payload);
        format!("v1,{}", BASE64.encode(mac.finalize().into_bytes()))
    }

    fn now_at(ts: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(ts, 0).unwrap()
    }

    #[test]
    fn accepts_a_valid_signature() {
        let payload = br#"{"type":"user.created","data":{"id":"ext_1"}}"#;
        let header = sign("msg_1", "1700000000", payload);
        assert_eq!(
            verify(SECRET, "msg_1", "1700000000", payload, &header, now_at(1_700_000_000)),
            Ok(())
        );
    }

    #[test]
    fn accepts_when_any_listed_signature_matches() {
        let payload = b"{}";
        let good = sign("msg_2", "1700000000", payload);
        let header = format!("v1,c2lnLW9uZQ== {}", good);
        assert_eq!(
            verify(SECRET, "msg_2", "1700000000", payload, &header, now_at(1_700_000_000)),
            Ok(())
        );
    }

    #[test]
    fn rejects_a_tampered_payload() {
        let header = sign("msg_3", "1700000000", b"{\"a\":1}");
        assert_eq!(
            verify(SECRET, "msg_3", "1700000000", b"{\"a\":2}", &header, now_at(1_700_000_000)),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_a_stale_timestamp() {
        let payload = b"{}";
        let header = sign("msg_4", "1700000000", payload);
        let later = now_at(1_700_000_000 + TIMESTAMP_TOLERANCE_SECS + 1);
        assert_eq!(
            verify(SECRET, "msg_4", "1700000000", payload, &header, later),
            Err(SignatureError::StaleTimestamp)
        );
    }

    #[test]
    fn rejects_unparseable_timestamp_and_secret() {
        let payload = b"{}";
        let header = sign("msg_5", "1700000000", payload);
        assert_eq!(
            verify(SECRET, "msg_5", "not-a-number", payload, &header, now_at(1_700_000_000)),
            Err(SignatureError::InvalidTimestamp)
        );
        assert_eq!(
            verify("whsec_!!!", "msg_5", "1700000000", payload, &header, now_at(1_700_000_000)),
            Err(SignatureError::InvalidSecret)
        );
    }

    #[test]
    fn ignores_unknown_signature_versions() {
        let payload = b"{}";
        let good = sign("msg_6", "1700000000", payload);
        let v2 = good.replacen("v1,", "v2,", 1);
        assert_eq!(
            verify(SECRET, "msg_6", "1700000000", payload, &v2, now_at(1_700_000_000)),
            Err(SignatureError::Mismatch)
        );
    }
}
