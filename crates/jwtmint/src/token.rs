//! Token states: unsealed, sealed and verified
//!
//! ```text
//! Manager::new_token()          Manager::new_token_by_raw()
//!     │                                   │
//!     ▼                                   │ split, decode, look up alg,
//! UnsealedToken (header + payload)        │ verify signature
//!     │ .seal()                           │
//!     ▼                                   ▼
//! Token (raw string populated, signature known to match)
//!     │ .validate()
//!     ▼
//! exp / nbf / iss checked
//! ```
//!
//! A `Token` only exists once its signature is computed or verified, so a
//! reconstructed but unverified token is never handed to the caller.

use crate::algorithm::Algorithm;
use crate::claims::{Payload, current_timestamp};
use crate::error::{Error, Result};
use crate::header::Header;
use crate::limits::{
    MAX_ALG_LENGTH, MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE, MAX_TOKEN_LENGTH,
};
use crate::manager::Manager;
use crate::utils::base64url;

use tracing::debug;

/// The three encoded segments of a token and their concatenation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    token: String,
    header: String,
    payload: String,
    signature: String,
}

impl RawToken {
    /// Split a token string into its segments
    ///
    /// Fails with [`Error::TokenTooLarge`] above the size limit and with
    /// [`Error::FormatInvalid`] unless there are exactly three non-empty parts.
    /// Nothing is decoded here.
    pub fn parse(token: &str) -> Result<Self> {
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(Error::TokenTooLarge {
                size: token.len(),
                max: MAX_TOKEN_LENGTH,
            });
        }

        let mut parts = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::FormatInvalid);
        };

        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            return Err(Error::FormatInvalid);
        }

        Ok(Self {
            token: token.to_string(),
            header: header.to_string(),
            payload: payload.to_string(),
            signature: signature.to_string(),
        })
    }

    fn from_segments(header: String, payload: String, signature: String) -> Self {
        Self {
            token: format!("{header}.{payload}.{signature}"),
            header,
            payload,
            signature,
        }
    }

    /// The full token string
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Encoded header segment
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Encoded payload segment
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Encoded signature segment
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Get the signing input (header.payload)
    pub fn signing_input(&self) -> &str {
        let end = self.header.len() + 1 + self.payload.len();
        &self.token[..end]
    }
}

/// A freshly minted token that has not been signed yet
///
/// The payload may still be changed, e.g. to add application claims.
pub struct UnsealedToken<'m> {
    manager: &'m Manager,
    algorithm: &'m dyn Algorithm,
    header: Header,
    payload: Payload,
}

impl<'m> UnsealedToken<'m> {
    /// Mint a token with claims derived from the manager's configuration
    ///
    /// Fails with [`Error::AlgorithmUnsupported`] if no algorithm is
    /// registered under `algorithm_name` (compared case-insensitively).
    pub fn new(
        manager: &'m Manager,
        algorithm_name: &str,
        subject: &str,
        audience: &str,
    ) -> Result<Self> {
        let payload = manager.new_payload(subject, audience);
        Self::with_payload(manager, algorithm_name, payload)
    }

    /// Mint a token carrying the given claims as-is
    pub fn with_payload(
        manager: &'m Manager,
        algorithm_name: &str,
        payload: Payload,
    ) -> Result<Self> {
        let algorithm = manager.resolve_algorithm(algorithm_name)?;

        Ok(Self {
            manager,
            algorithm,
            header: Header::new(algorithm_name),
            payload,
        })
    }

    /// Get the token header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Get the claims
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Get the claims for modification before sealing
    pub fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }

    /// Serialize, encode and sign the token
    ///
    /// On failure the unsealed token is left as it was and may be sealed
    /// again.
    pub fn seal(&self) -> Result<Token<'m>> {
        let header_json = serde_json::to_vec(&self.header)
            .map_err(|e| Error::SerializationFailed(format!("Failed to encode header: {e}")))?;
        let payload_json = serde_json::to_vec(&self.payload)
            .map_err(|e| Error::SerializationFailed(format!("Failed to encode payload: {e}")))?;

        let header_b64 = base64url::encode(header_json);
        let payload_b64 = base64url::encode(payload_json);

        let signature_b64 = self
            .algorithm
            .sign(&format!("{header_b64}.{payload_b64}"))?;

        debug!(alg = %self.header.algorithm, "token sealed");

        Ok(Token {
            manager: self.manager,
            algorithm: self.algorithm,
            header: self.header.clone(),
            payload: self.payload.clone(),
            raw: RawToken::from_segments(header_b64, payload_b64, signature_b64),
        })
    }
}

impl std::fmt::Debug for UnsealedToken<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnsealedToken")
            .field("header", &self.header)
            .field("payload", &self.payload)
            .finish()
    }
}

/// A sealed or verified token
///
/// Immutable. Claim validation is left to the caller through
/// [`Token::validate`] and the individual checks.
#[derive(Clone)]
pub struct Token<'m> {
    manager: &'m Manager,
    algorithm: &'m dyn Algorithm,
    header: Header,
    payload: Payload,
    raw: RawToken,
}

impl<'m> Token<'m> {
    /// Rebuild a token from its string form and verify its signature
    ///
    /// The algorithm is the one registered under the header's `alg`; a token
    /// naming an unregistered algorithm (or `none`) is rejected. No token is
    /// returned unless the signature verifies.
    pub fn from_raw(manager: &'m Manager, token: &str) -> Result<Self> {
        Self::decode_and_verify(manager, token)
            .inspect(|token| debug!(alg = %token.header.algorithm, "token verified"))
            .inspect_err(|e| debug!(error = %e, "token rejected"))
    }

    fn decode_and_verify(manager: &'m Manager, token: &str) -> Result<Self> {
        let raw = RawToken::parse(token)?;

        let header_json = base64url::decode_string(raw.header(), MAX_DECODED_HEADER_SIZE)?;
        let header: Header = serde_json::from_str(&header_json)
            .map_err(|e| Error::FormatInvalidJson(format!("Failed to parse header: {e}")))?;

        if header.algorithm.len() > MAX_ALG_LENGTH {
            return Err(Error::AlgorithmUnsupported(header.algorithm));
        }
        let algorithm = manager.resolve_algorithm(&header.algorithm)?;

        let payload_json = base64url::decode_string(raw.payload(), MAX_DECODED_PAYLOAD_SIZE)?;
        let payload: Payload = serde_json::from_str(&payload_json)
            .map_err(|e| Error::FormatInvalidJson(format!("Failed to parse payload: {e}")))?;

        algorithm.verify(raw.signing_input(), raw.signature())?;

        Ok(Self {
            manager,
            algorithm,
            header,
            payload,
            raw,
        })
    }

    /// Get the token header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Get the claims
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Get the encoded segments
    pub fn raw(&self) -> &RawToken {
        &self.raw
    }

    /// The token string
    pub fn as_str(&self) -> &str {
        self.raw.token()
    }

    /// The algorithm that signed or verified this token
    pub fn algorithm(&self) -> &'m dyn Algorithm {
        self.algorithm
    }

    /// Validate expiration, not-before and issuer against the system clock
    pub fn validate(&self) -> Result<()> {
        self.validate_at(current_timestamp())
    }

    /// Validate expiration, not-before and issuer at `now`
    ///
    /// Checks run in that order and the first failure is returned.
    pub fn validate_at(&self, now: i64) -> Result<()> {
        self.validate_expiration(now)?;
        self.validate_not_before(now)?;
        self.validate_issuer()
            .inspect_err(|e| debug!(error = %e, "token claims rejected"))
    }

    /// Fails with [`Error::TokenExpired`] once `exp <= now`
    pub fn validate_expiration(&self, now: i64) -> Result<()> {
        if self.payload.exp <= now {
            debug!(exp = self.payload.exp, now, "token expired");
            return Err(Error::TokenExpired {
                expired_at: self.payload.exp,
                now,
            });
        }
        Ok(())
    }

    /// Fails with [`Error::TokenNotYetValid`] while `nbf > now`
    ///
    /// A zero `nbf` means the claim is unset and always passes.
    pub fn validate_not_before(&self, now: i64) -> Result<()> {
        let nbf = self.payload.nbf;
        if nbf > 0 && nbf > now {
            debug!(nbf, now, "token not yet valid");
            return Err(Error::TokenNotYetValid {
                not_before: nbf,
                now,
            });
        }
        Ok(())
    }

    /// Compare `iss` with the manager's issuer
    ///
    /// Skipped when the manager has no issuer configured.
    pub fn validate_issuer(&self) -> Result<()> {
        let expected = self.manager.issuer();
        if !expected.is_empty() && self.payload.iss != expected {
            return Err(Error::IssuerInvalid {
                expected: expected.to_string(),
                found: self.payload.iss.clone(),
            });
        }
        Ok(())
    }

    /// Require `aud` to equal `expected`
    ///
    /// Not part of [`Token::validate`].
    pub fn validate_audience(&self, expected: &str) -> Result<()> {
        if self.payload.aud != expected {
            return Err(Error::AudienceInvalid {
                expected: expected.to_string(),
                found: self.payload.aud.clone(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("header", &self.header)
            .field("payload", &self.payload)
            .finish_non_exhaustive()
    }
}
