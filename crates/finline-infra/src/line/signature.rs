//! LINE webhook signature verification.
//!
//! LINE signs every webhook delivery with
//! `base64(HMAC-SHA256(channel_secret, request_body))` in the
//! `X-Line-Signature` header. Verification uses the hmac crate's
//! constant-time comparison.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Errors from webhook signature verification.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// The `X-Line-Signature` header was absent.
    #[error("missing signature header")]
    Missing,

    /// The signature did not match the request body.
    #[error("signature verification failed")]
    Invalid,

    /// The channel secret could not be used as an HMAC key.
    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}

/// Verify a webhook body against its `X-Line-Signature` value.
///
/// Returns `Ok(())` only if the base64-decoded signature matches the
/// HMAC-SHA256 of the body under the channel secret.
pub fn verify_signature(
    channel_secret: &[u8],
    body: &[u8],
    signature_b64: &str,
) -> Result<(), SignatureError> {
    let expected = BASE64
        .decode(signature_b64)
        .map_err(|_| SignatureError::Invalid)?;

    let mut mac = HmacSha256::new_from_slice(channel_secret)
        .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
    mac.update(body);

    // Constant-time verification (via the hmac crate's `verify_slice`).
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Invalid)
}

/// Compute the base64 signature for a body.
///
/// Useful for generating test vectors and for clients simulating LINE.
pub fn compute_signature(channel_secret: &[u8], body: &[u8]) -> Result<String, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(channel_secret)
        .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
    mac.update(body);
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
