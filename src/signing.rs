//! TC3 request signing for Tencent Cloud endpoints
//!
//! Computes the `Authorization` header value for the hunyuan provider.
//! The signature covers the exact payload bytes that go on the wire, so the
//! body must be fully materialized before signing.

use chrono::{NaiveDate, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Credential scope service name
const SERVICE: &str = "hunyuan";

/// Compute the TC3-HMAC-SHA256 authorization header value.
///
/// The supplied unix timestamp is what the caller puts in `X-TC-Timestamp`;
/// the credential scope date always comes from the current wall clock, not
/// from that timestamp. Upstream accepts this pairing, so both sides of it
/// are kept as-is.
///
/// Never logs or retains `secret_key`.
pub fn sign(secret_id: &str, secret_key: &str, _timestamp: i64, payload: &[u8]) -> String {
    sign_with_date(secret_id, secret_key, Utc::now().date_naive(), payload)
}

/// Deterministic core of [`sign`], parameterized by the scope date.
pub fn sign_with_date(
    secret_id: &str,
    secret_key: &str,
    date: NaiveDate,
    payload: &[u8],
) -> String {
    // Canonical string: method, path, empty query, payload, trailing newline
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(b"POST\n/\n\n");
    mac.update(payload);
    mac.update(b"\n");
    let signature = hex::encode(mac.finalize().into_bytes());

    format!(
        "TC3-HMAC-SHA256 Credential={}/{}/{}/tc3_request, SignedHeaders=content-type;host, Signature={}",
        secret_id,
        date.format("%Y-%m-%d"),
        SERVICE,
        signature
    )
}
