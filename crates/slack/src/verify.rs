//! Request-signature verification for webhook endpoints.
//!
//! Slack signs each request as `v0=HMAC-SHA256("v0:{timestamp}:{body}")`
//! with the app's signing secret. Stale timestamps are rejected to stop
//! replayed requests.

use {
    hmac::{Hmac, Mac},
    sha2::Sha256,
    tracing::warn,
};

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed age for a request timestamp.
const MAX_TIMESTAMP_AGE_SECS: u64 = 300;

/// Verify a webhook request signature.
#[must_use]
pub fn verify_signature(signing_secret: &str, timestamp: &str, body: &str, signature: &str) -> bool {
    if !validate_timestamp(timestamp) {
        return false;
    }

    let Ok(ts) = timestamp.parse::<u64>() else {
        return false;
    };
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    if now.saturating_sub(ts) > MAX_TIMESTAMP_AGE_SECS {
        return false;
    }

    let mut mac = match HmacSha256::new_from_slice(signing_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("failed to create HMAC");
            return false;
        },
    };
    mac.update(format!("v0:{timestamp}:{body}").as_bytes());
    let expected = format!("v0={}", hex::encode(mac.finalize().into_bytes()));

    constant_time_eq(&expected, signature)
}

/// Constant-time string comparison.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Timestamps are plain epoch seconds: digits only, bounded length.
fn validate_timestamp(ts: &str) -> bool {
    !ts.is_empty() && ts.len() <= 32 && ts.chars().all(|c| c.is_ascii_digit())
}
