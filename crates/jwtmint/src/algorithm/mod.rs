//! Signing algorithms for JWT issuance and verification
//!
//! Every algorithm implements the [`Algorithm`] capability trait: it is bound to
//! one key (a shared secret or an RSA key pair) and one [`Hash`], and exposes
//! nothing but `sign` and `verify`. Key material never leaves the algorithm.

mod traits;

pub mod hmac;
pub mod keys;
pub mod rsa;

pub use traits::{Algorithm, SharedAlgorithm};

use crate::error::{Error, Result};

/// Digest used by an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hash {
    /// SHA-256
    Sha256,

    /// SHA-384
    Sha384,

    /// SHA-512
    Sha512,
}

impl Hash {
    /// Canonical digest name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Hash::Sha256 => "SHA-256",
            Hash::Sha384 => "SHA-384",
            Hash::Sha512 => "SHA-512",
        }
    }

    /// Digest output size in bytes
    pub const fn output_len(&self) -> usize {
        match self {
            Hash::Sha256 => 32,
            Hash::Sha384 => 48,
            Hash::Sha512 => 64,
        }
    }
}

impl std::str::FromStr for Hash {
    type Err = Error;

    /// Parse a digest name such as `SHA256`, `sha-384` or `512`
    ///
    /// Any digest other than the SHA-2 family members above fails with
    /// [`Error::HashUnavailable`].
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();

        match normalized.as_str() {
            "SHA256" | "256" => Ok(Hash::Sha256),
            "SHA384" | "384" => Ok(Hash::Sha384),
            "SHA512" | "512" => Ok(Hash::Sha512),
            _ => Err(Error::HashUnavailable(s.to_string())),
        }
    }
}

impl std::fmt::Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
