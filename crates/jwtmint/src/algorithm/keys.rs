//! PEM key decoding for RSA algorithms
//!
//! Thin adapter over the RustCrypto `rsa` crate's PKCS#1 / PKCS#8 decoders.
//! Each input may be supplied already parsed or as PEM bytes.

use crate::error::{Error, Result};

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};

/// RSA public key input: parsed key or PEM bytes
#[derive(Debug, Clone)]
pub enum RsaPublicKeyInput {
    /// Already-parsed public key
    Parsed(RsaPublicKey),

    /// PEM-encoded `PUBLIC KEY` (SPKI) or `RSA PUBLIC KEY` (PKCS#1)
    Pem(Vec<u8>),
}

impl RsaPublicKeyInput {
    /// Resolve into a parsed key
    pub fn into_key(self) -> Result<RsaPublicKey> {
        match self {
            RsaPublicKeyInput::Parsed(key) => Ok(key),
            RsaPublicKeyInput::Pem(pem) => parse_rsa_public_key_from_pem(&pem),
        }
    }
}

impl From<RsaPublicKey> for RsaPublicKeyInput {
    fn from(key: RsaPublicKey) -> Self {
        RsaPublicKeyInput::Parsed(key)
    }
}

impl From<&[u8]> for RsaPublicKeyInput {
    fn from(pem: &[u8]) -> Self {
        RsaPublicKeyInput::Pem(pem.to_vec())
    }
}

impl From<Vec<u8>> for RsaPublicKeyInput {
    fn from(pem: Vec<u8>) -> Self {
        RsaPublicKeyInput::Pem(pem)
    }
}

impl From<&str> for RsaPublicKeyInput {
    fn from(pem: &str) -> Self {
        RsaPublicKeyInput::Pem(pem.as_bytes().to_vec())
    }
}

/// RSA private key input: parsed key or PEM bytes
#[derive(Clone)]
pub enum RsaPrivateKeyInput {
    /// Already-parsed private key
    Parsed(RsaPrivateKey),

    /// PEM-encoded `RSA PRIVATE KEY` (PKCS#1) or `PRIVATE KEY` (PKCS#8)
    Pem(Vec<u8>),
}

impl RsaPrivateKeyInput {
    /// Resolve into a parsed key
    pub fn into_key(self) -> Result<RsaPrivateKey> {
        match self {
            RsaPrivateKeyInput::Parsed(key) => Ok(key),
            RsaPrivateKeyInput::Pem(pem) => parse_rsa_private_key_from_pem(&pem),
        }
    }
}

impl std::fmt::Debug for RsaPrivateKeyInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RsaPrivateKeyInput::Parsed(_) => f.write_str("Parsed(<redacted>)"),
            RsaPrivateKeyInput::Pem(_) => f.write_str("Pem(<redacted>)"),
        }
    }
}

impl From<RsaPrivateKey> for RsaPrivateKeyInput {
    fn from(key: RsaPrivateKey) -> Self {
        RsaPrivateKeyInput::Parsed(key)
    }
}

impl From<&[u8]> for RsaPrivateKeyInput {
    fn from(pem: &[u8]) -> Self {
        RsaPrivateKeyInput::Pem(pem.to_vec())
    }
}

impl From<Vec<u8>> for RsaPrivateKeyInput {
    fn from(pem: Vec<u8>) -> Self {
        RsaPrivateKeyInput::Pem(pem)
    }
}

impl From<&str> for RsaPrivateKeyInput {
    fn from(pem: &str) -> Self {
        RsaPrivateKeyInput::Pem(pem.as_bytes().to_vec())
    }
}

/// Parse a PEM encoded PKCS#1 or PKCS#8 RSA private key
pub fn parse_rsa_private_key_from_pem(pem: &[u8]) -> Result<RsaPrivateKey> {
    let pem = pem_text(pem)?;

    RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
        .map_err(|_| Error::KeyNotRsaPrivate)
}

/// Parse a PEM encoded SPKI or PKCS#1 RSA public key
pub fn parse_rsa_public_key_from_pem(pem: &[u8]) -> Result<RsaPublicKey> {
    let pem = pem_text(pem)?;

    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|_| Error::KeyNotRsaPublic)
}

/// Check the input carries a PEM block and return it as text
fn pem_text(pem: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(pem).map_err(|_| Error::KeyMustBePemEncoded)?;
    if !text.contains("-----BEGIN ") {
        return Err(Error::KeyMustBePemEncoded);
    }
    Ok(text.trim())
}
