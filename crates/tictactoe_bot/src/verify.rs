//! Ed25519 verification of inbound interaction requests.
//!
//! Discord signs `timestamp || body` with the application's key and sends
//! the signature and timestamp as headers. Requests failing the check must
//! be answered with 401.

use axum::http::HeaderMap;
use derive_more::Display;
use derive_new::new;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use tracing::{debug, instrument, warn};

/// Header carrying the hex signature.
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";

/// Header carrying the signed timestamp.
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Reason a request failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum VerifyError {
    /// A signature header is absent or not valid UTF-8.
    #[display("Missing header {}", _0)]
    MissingHeader(&'static str),
    /// The signature is not 64 hex-encoded bytes.
    #[display("Malformed signature")]
    MalformedSignature,
    /// The signature does not match the body.
    #[display("Invalid request signature")]
    BadSignature,
}

impl std::error::Error for VerifyError {}

/// Checks inbound requests against the application public key.
#[derive(Debug, Clone, new)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    /// Verifies the signature headers against the raw request body.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError`] if a header is missing, the signature cannot
    /// be decoded, or it does not match.
    #[instrument(skip_all)]
    pub fn verify(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), VerifyError> {
        let signature = header(headers, SIGNATURE_HEADER)?;
        let timestamp = header(headers, TIMESTAMP_HEADER)?;

        let bytes: [u8; 64] = hex::decode(signature)
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| {
                warn!("Signature header is not 64 hex bytes");
                VerifyError::MalformedSignature
            })?;
        let signature = Signature::from_bytes(&bytes);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.key.verify(&message, &signature).map_err(|e| {
            warn!(error = %e, "Signature verification failed");
            VerifyError::BadSignature
        })?;
        debug!("Signature verified");
        Ok(())
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, VerifyError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or(VerifyError::MissingHeader(name))
}
