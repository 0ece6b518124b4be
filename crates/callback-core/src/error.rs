//! Error types for callback signing and verification.

/// Failure to sign or verify a callback query.
///
/// A signature mismatch is not an error: verification reports it as `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HmacError {
    /// The query carries no signature to verify.
    #[error("invalid hmac: {0}")]
    InvalidHmac(&'static str),

    /// The shared secret cannot be used as an HMAC key.
    #[error("cannot import hmac key: {0}")]
    KeyImport(String),
}

impl HmacError {
    /// Configuration faults are fatal to the request and point at a
    /// misconfigured process rather than a bad caller.
    pub fn is_configuration_fault(&self) -> bool {
        matches!(self, HmacError::KeyImport(_))
    }
}

/// Convenience result type for signing and verification.
pub type HmacResult<T> = Result<T, HmacError>;
