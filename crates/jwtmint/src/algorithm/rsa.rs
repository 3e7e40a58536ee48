use crate::algorithm::keys::{RsaPrivateKeyInput, RsaPublicKeyInput};
use crate::algorithm::{Algorithm, Hash};
use crate::error::{Error, Result};
use crate::limits::MAX_DECODED_SIGNATURE_SIZE;
use crate::utils::base64url;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, RsaEncoding, RsaKeyPair, UnparsedPublicKey};
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::pkcs8::EncodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256, Sha384, Sha512};
use tracing::warn;

/// Smallest modulus handled by `aws-lc-rs`
const MIN_NATIVE_MODULUS_BITS: usize = 2048;
/// Largest modulus accepted at all
const MAX_MODULUS_BITS: usize = 8192;

/// Public-key algorithm (RS256, RS384, RS512)
///
/// RSASSA-PKCS1-v1_5 over the configured hash. `sign` uses only the private
/// key, `verify` only the public key. Key parsing goes through the `rsa`
/// crate. Moduli of 2048 to 8192 bits are signed and verified by `aws-lc-rs`;
/// smaller well-formed keys fall back to the `rsa` crate's PKCS#1 v1.5
/// implementation and log a warning. Use
/// [`require_modulus_bits`](Self::require_modulus_bits) to refuse them.
pub struct RsaAlgorithm {
    hash: Hash,
    modulus_bits: usize,
    backend: Backend,
}

enum Backend {
    Native {
        /// DER-encoded `RSAPublicKey` (PKCS#1)
        public_key_der: Vec<u8>,
        key_pair: Option<RsaKeyPair>,
    },
    /// Moduli below 2048 bits
    Legacy {
        public_key: RsaPublicKey,
        private_key: Option<RsaPrivateKey>,
    },
}

impl RsaAlgorithm {
    /// Create an algorithm that can both sign and verify
    ///
    /// Each key may be a parsed key or PEM bytes. The public key must belong
    /// to the private key.
    pub fn new(
        hash: Hash,
        public_key: impl Into<RsaPublicKeyInput>,
        private_key: impl Into<RsaPrivateKeyInput>,
    ) -> Result<Self> {
        let public_key = public_key.into().into_key()?;
        let private_key = private_key.into().into_key()?;

        if RsaPublicKey::from(&private_key) != public_key {
            return Err(Error::KeyInvalid(
                "public key does not belong to the private key".into(),
            ));
        }

        Self::from_keys(hash, public_key, Some(private_key))
    }

    /// Create a verify-only algorithm
    ///
    /// Calling `sign` on it fails with [`Error::SigningKeyMissing`].
    pub fn verifier(hash: Hash, public_key: impl Into<RsaPublicKeyInput>) -> Result<Self> {
        let public_key = public_key.into().into_key()?;
        Self::from_keys(hash, public_key, None)
    }

    /// Create an algorithm from a private key alone
    ///
    /// The public half is derived from the private key, so the result can
    /// both sign and verify.
    pub fn signer(hash: Hash, private_key: impl Into<RsaPrivateKeyInput>) -> Result<Self> {
        let private_key = private_key.into().into_key()?;
        let public_key = RsaPublicKey::from(&private_key);
        Self::from_keys(hash, public_key, Some(private_key))
    }

    fn from_keys(
        hash: Hash,
        public_key: RsaPublicKey,
        private_key: Option<RsaPrivateKey>,
    ) -> Result<Self> {
        let modulus_bits = public_key.n().bits();
        if modulus_bits > MAX_MODULUS_BITS {
            return Err(Error::KeyInvalid(format!(
                "RSA modulus of {modulus_bits} bits exceeds {MAX_MODULUS_BITS}"
            )));
        }

        let backend = if modulus_bits >= MIN_NATIVE_MODULUS_BITS {
            Backend::Native {
                public_key_der: encode_public_key(&public_key)?,
                key_pair: private_key.as_ref().map(load_key_pair).transpose()?,
            }
        } else {
            warn!(
                modulus_bits,
                algorithm = hash.as_str(),
                "weak RSA key, signing with the rsa crate backend"
            );
            Backend::Legacy {
                public_key,
                private_key,
            }
        };

        Ok(Self {
            hash,
            modulus_bits,
            backend,
        })
    }

    /// Refuse keys whose modulus is shorter than `min_bits`
    ///
    /// Chain it after construction, e.g. `.require_modulus_bits(2048)?`, to
    /// fail with [`Error::KeyInvalid`] instead of accepting a weak key.
    pub fn require_modulus_bits(self, min_bits: usize) -> Result<Self> {
        if self.modulus_bits < min_bits {
            return Err(Error::KeyInvalid(format!(
                "RSA modulus of {} bits is below the required {min_bits}",
                self.modulus_bits
            )));
        }
        Ok(self)
    }

    /// The digest this algorithm uses
    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// Size of the key's modulus in bits
    pub fn modulus_bits(&self) -> usize {
        self.modulus_bits
    }

    /// Whether this instance holds a private key
    pub fn can_sign(&self) -> bool {
        match &self.backend {
            Backend::Native { key_pair, .. } => key_pair.is_some(),
            Backend::Legacy { private_key, .. } => private_key.is_some(),
        }
    }

    fn signing_encoding(&self) -> &'static dyn RsaEncoding {
        match self.hash {
            Hash::Sha256 => &signature::RSA_PKCS1_SHA256,
            Hash::Sha384 => &signature::RSA_PKCS1_SHA384,
            Hash::Sha512 => &signature::RSA_PKCS1_SHA512,
        }
    }

    fn verification_algorithm(&self) -> &'static dyn signature::VerificationAlgorithm {
        match self.hash {
            Hash::Sha256 => &signature::RSA_PKCS1_2048_8192_SHA256,
            Hash::Sha384 => &signature::RSA_PKCS1_2048_8192_SHA384,
            Hash::Sha512 => &signature::RSA_PKCS1_2048_8192_SHA512,
        }
    }

    /// Padding scheme and message digest for the `rsa` crate path
    fn legacy_digest(&self, data: &[u8]) -> (Pkcs1v15Sign, Vec<u8>) {
        match self.hash {
            Hash::Sha256 => (Pkcs1v15Sign::new::<Sha256>(), Sha256::digest(data).to_vec()),
            Hash::Sha384 => (Pkcs1v15Sign::new::<Sha384>(), Sha384::digest(data).to_vec()),
            Hash::Sha512 => (Pkcs1v15Sign::new::<Sha512>(), Sha512::digest(data).to_vec()),
        }
    }
}

impl Algorithm for RsaAlgorithm {
    fn sign(&self, data: &str) -> Result<String> {
        let signature_bytes = match &self.backend {
            Backend::Native { key_pair, .. } => {
                let key_pair = key_pair.as_ref().ok_or(Error::SigningKeyMissing)?;

                let rng = SystemRandom::new();
                let mut signature_bytes = vec![0u8; key_pair.public_modulus_len()];
                key_pair
                    .sign(
                        self.signing_encoding(),
                        &rng,
                        data.as_bytes(),
                        &mut signature_bytes,
                    )
                    .map_err(|e| Error::SigningFailed(e.to_string()))?;
                signature_bytes
            }
            Backend::Legacy { private_key, .. } => {
                let private_key = private_key.as_ref().ok_or(Error::SigningKeyMissing)?;

                let (padding, digest) = self.legacy_digest(data.as_bytes());
                private_key
                    .sign(padding, &digest)
                    .map_err(|e| Error::SigningFailed(e.to_string()))?
            }
        };

        Ok(base64url::encode(signature_bytes))
    }

    fn verify(&self, data: &str, signature: &str) -> Result<()> {
        let signature_bytes = base64url::decode_bytes(signature, MAX_DECODED_SIGNATURE_SIZE)?;

        match &self.backend {
            Backend::Native { public_key_der, .. } => {
                UnparsedPublicKey::new(self.verification_algorithm(), public_key_der)
                    .verify(data.as_bytes(), &signature_bytes)
                    .map_err(|_| Error::SignatureInvalid)
            }
            Backend::Legacy { public_key, .. } => {
                let (padding, digest) = self.legacy_digest(data.as_bytes());
                public_key
                    .verify(padding, &digest, &signature_bytes)
                    .map_err(|_| Error::SignatureInvalid)
            }
        }
    }
}

impl std::fmt::Debug for RsaAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaAlgorithm")
            .field("hash", &self.hash)
            .field("modulus_bits", &self.modulus_bits)
            .field("can_sign", &self.can_sign())
            .finish()
    }
}

fn encode_public_key(public_key: &RsaPublicKey) -> Result<Vec<u8>> {
    public_key
        .to_pkcs1_der()
        .map(|doc| doc.as_bytes().to_vec())
        .map_err(|e| Error::KeyInvalid(format!("failed to encode RSA public key: {e}")))
}

fn load_key_pair(private_key: &RsaPrivateKey) -> Result<RsaKeyPair> {
    let pkcs8_doc = private_key
        .to_pkcs8_der()
        .map_err(|e| Error::KeyInvalid(format!("failed to encode RSA private key: {e}")))?;

    RsaKeyPair::from_pkcs8(pkcs8_doc.as_bytes()).map_err(|e| Error::KeyInvalid(e.to_string()))
}
