use crate::error::Result;
use std::sync::Arc;

/// Core algorithm trait that all JWT signature algorithms implement
///
/// Implementations hold their key material and hash choice, and keep any
/// per-call state (MAC accumulator, signature buffer) local to the call, so a
/// single instance can serve unlimited concurrent `sign`/`verify` calls.
pub trait Algorithm: Send + Sync {
    /// Sign data
    ///
    /// # Arguments
    /// * `data` - The signing input (header.payload)
    ///
    /// Returns the Base64URL-encoded signature.
    fn sign(&self, data: &str) -> Result<String>;

    /// Verify a signature
    ///
    /// # Arguments
    /// * `data` - The data that was signed (header.payload)
    /// * `signature` - The Base64URL-encoded signature
    fn verify(&self, data: &str, signature: &str) -> Result<()>;
}

/// Type alias for shared algorithm trait objects
///
/// Several registered names may point at the same instance.
pub type SharedAlgorithm = Arc<dyn Algorithm>;
