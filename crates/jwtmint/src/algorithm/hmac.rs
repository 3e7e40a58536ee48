use crate::algorithm::{Algorithm, Hash};
use crate::error::{Error, Result};
use crate::limits::MAX_DECODED_SIGNATURE_SIZE;
use crate::utils::base64url;

use constant_time_eq::constant_time_eq;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

/// Shared-secret algorithm (HS256, HS384, HS512)
///
/// The same secret signs and verifies. Verification compares the recomputed
/// MAC in constant time.
#[derive(Clone)]
pub struct HmacAlgorithm {
    hash: Hash,
    secret: Vec<u8>,
}

impl HmacAlgorithm {
    /// Create an HMAC algorithm over `hash` keyed with `secret`
    ///
    /// Any secret is accepted, including an empty one; HMAC pads short keys.
    pub fn new(hash: Hash, secret: impl Into<Vec<u8>>) -> Result<Self> {
        Ok(Self {
            hash,
            secret: secret.into(),
        })
    }

    /// The digest this algorithm uses
    pub fn hash(&self) -> Hash {
        self.hash
    }

    fn compute(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self.hash {
            Hash::Sha256 => compute_mac::<Hmac<Sha256>>(&self.secret, data),
            Hash::Sha384 => compute_mac::<Hmac<Sha384>>(&self.secret, data),
            Hash::Sha512 => compute_mac::<Hmac<Sha512>>(&self.secret, data),
        }
    }
}

impl Algorithm for HmacAlgorithm {
    fn sign(&self, data: &str) -> Result<String> {
        let mac = self.compute(data.as_bytes())?;
        Ok(base64url::encode(mac))
    }

    fn verify(&self, data: &str, signature: &str) -> Result<()> {
        let provided_signature = base64url::decode_bytes(signature, MAX_DECODED_SIGNATURE_SIZE)?;
        let expected_signature = self.compute(data.as_bytes())?;

        if provided_signature.len() != expected_signature.len() {
            return Err(Error::SignatureInvalid);
        }

        if constant_time_eq(&provided_signature, &expected_signature) {
            Ok(())
        } else {
            Err(Error::SignatureInvalid)
        }
    }
}

impl std::fmt::Debug for HmacAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacAlgorithm")
            .field("hash", &self.hash)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Compute a MAC with a fresh accumulator
fn compute_mac<M: Mac + KeyInit>(secret: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac =
        <M as KeyInit>::new_from_slice(secret).map_err(|e| Error::KeyInvalid(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
