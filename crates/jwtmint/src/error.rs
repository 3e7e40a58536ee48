//! Errors for jwtmint

use thiserror::Error;

/// JWTMint Errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Invalid JWT format: expected three non-empty parts separated by '.'")]
    FormatInvalid,

    #[error("Base64URL decoding failed: {0}")]
    FormatInvalidBase64(String),

    #[error("JSON parsing failed: {0}")]
    FormatInvalidJson(String),

    #[error("JSON serialization failed: {0}")]
    SerializationFailed(String),

    // ============================================================================
    // Algorithm Errors
    // ============================================================================
    #[error("Algorithm '{0}' is not registered")]
    AlgorithmUnsupported(String),

    #[error("The requested hash function '{0}' is unavailable")]
    HashUnavailable(String),

    // ============================================================================
    // Key Errors
    // ============================================================================
    #[error("Key is invalid: {0}")]
    KeyInvalid(String),

    #[error("Invalid key: key must be PEM encoded PKCS#1 or PKCS#8")]
    KeyMustBePemEncoded,

    #[error("Key is not a valid RSA private key")]
    KeyNotRsaPrivate,

    #[error("Key is not a valid RSA public key")]
    KeyNotRsaPublic,

    // ============================================================================
    // Signature Errors
    // ============================================================================
    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("Signing requires a private key, but none was configured")]
    SigningKeyMissing,

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    // ============================================================================
    // Token Errors
    // ============================================================================
    #[error("Token expired at {expired_at} (now: {now})")]
    TokenExpired { expired_at: i64, now: i64 },

    #[error("Token not valid until {not_before} (now: {now})")]
    TokenNotYetValid { not_before: i64, now: i64 },

    #[error("Token issuer mismatch: expected '{expected}', found '{found}'")]
    IssuerInvalid { expected: String, found: String },

    #[error("Token audience mismatch: expected '{expected}', found '{found}'")]
    AudienceInvalid { expected: String, found: String },
}

impl Error {
    /// Whether the error is one of the temporal claim failures
    ///
    /// Expiration and not-before violations are reported as separate variants;
    /// this groups them for callers that only care whether the token is usable
    /// right now.
    pub fn is_expired(&self) -> bool {
        matches!(
            self,
            Error::TokenExpired { .. } | Error::TokenNotYetValid { .. }
        )
    }
}

/// Result type alias for JWTMint operations
pub type Result<T> = std::result::Result<T, Error>;
