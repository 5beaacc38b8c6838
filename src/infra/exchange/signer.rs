//! Request signing for the exchange's private REST API.
//!
//! Binance authenticates signed endpoints with an HMAC-SHA256 digest of
//! the URL-encoded parameter string, sent as a `signature` parameter.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Serialize parameters into a query string, keys in insertion order.
///
/// The signature covers exactly these bytes, so the request must be sent
/// with this same string; re-encoding by an HTTP client could diverge.
#[must_use]
pub fn encode_query(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

// RFC 3986 unreserved set; everything else is percent-encoded.
fn encode_component(raw: &str) -> String {
    raw.bytes()
        .map(|b| {
            let c = b as char;
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~') {
                c.to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect()
}

/// Sign an encoded query string, returning the lowercase hex digest.
#[must_use]
pub fn sign_query(secret: &SecretString, query: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(query.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Encode and sign a parameter set in one step.
#[must_use]
pub fn sign(secret: &SecretString, params: &[(&str, &str)]) -> String {
    sign_query(secret, &encode_query(params))
}
