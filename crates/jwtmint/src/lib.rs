//! # jwtmint - Issue and Verify JSON Web Tokens
//!
//! **jwtmint** mints compact, signed JSON Web Tokens and verifies the ones it
//! receives, for applications that want stateless identity assertions without
//! a session store.
//!
//! ## Overview
//!
//! A [`Manager`] holds everything that belongs to one trust domain: the issuer
//! name, the token lifetime, an optional not-before timestamp, whether to
//! generate a `jti`, and the registry of signing algorithms. Tokens borrow the
//! manager, so the registry is frozen once the first token exists.
//!
//! ## Quick Start
//!
//! ```
//! use jwtmint::{Hash, HmacAlgorithm, Manager};
//!
//! # fn main() -> jwtmint::Result<()> {
//! let mut manager = Manager::new("Example", 300);
//! manager.add_algorithm("HS256", HmacAlgorithm::new(Hash::Sha256, "secret")?);
//!
//! let token = manager.new_token("HS256", "user-42", "api")?.seal()?;
//!
//! let verified = manager.new_token_by_raw(token.as_str())?;
//! verified.validate()?;
//! assert_eq!(verified.payload().sub, "user-42");
//! # Ok(())
//! # }
//! ```
//!
//! ## Token Lifecycle
//!
//! ```text
//! UnsealedToken (header + claims, payload still mutable)
//!     │ .seal()
//!     ▼
//! Token ◄── Token::from_raw() / Manager::new_token_by_raw()
//!     │ .validate()             (signature verified before a Token exists)
//!     ▼
//! exp, nbf and iss checked
//! ```
//!
//! ## Algorithm Support
//!
//! All algorithms implement the [`Algorithm`] trait (`sign` and `verify`):
//!
//! - **HMAC**: HS256, HS384, HS512 via [`HmacAlgorithm`]
//! - **RSA** (PKCS#1 v1.5): RS256, RS384, RS512 via [`RsaAlgorithm`]
//!
//! Algorithms are registered by name, case-insensitively. Several names may
//! share one key through [`Manager::add_shared_algorithm`].
//!
//! ## Wire Format
//!
//! `base64url(header) "." base64url(payload) "." base64url(signature)`, using
//! the URL-safe alphabet without padding. The payload always carries `exp`,
//! `iss`, `sub`, `aud`, `nbf`, `iat`, `jti` and an `extra` object holding
//! application claims.
//!
//! ## Security
//!
//! ### Algorithm Confusion Prevention
//!
//! The header's `alg` selects the verifying algorithm, so only algorithms that
//! were explicitly registered are accepted. There is no wildcard entry.
//!
//! ### "none" Algorithm Rejection
//!
//! The `"none"` algorithm (unsigned tokens) is always rejected per [RFC 8725](https://datatracker.ietf.org/doc/html/rfc8725).
//! It cannot be registered, so a manager neither mints nor accepts it.
//!
//! ### RSA Key Sizes
//!
//! Keys of 2048 to 8192 bits are handled by `aws-lc-rs`. Smaller keys still
//! work through the `rsa` crate and log a warning at construction; call
//! `RsaAlgorithm::require_modulus_bits` to refuse them.
//!
//! ### Timing Attack Protection
//!
//! HMAC signature verification uses constant-time comparison via the [`constant_time_eq`](https://crates.io/crates/constant_time_eq)
//! crate.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515): JSON Web Signature (JWS)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519): JSON Web Token (JWT)

// Core modules
pub mod error;
pub mod utils;

pub(crate) mod limits;

// Algorithm system
pub mod algorithm;

// Token model
pub mod claims;
pub mod header;
pub mod token;

// Issuer context
pub mod manager;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use algorithm::hmac::HmacAlgorithm;
pub use algorithm::keys::{
    RsaPrivateKeyInput, RsaPublicKeyInput, parse_rsa_private_key_from_pem,
    parse_rsa_public_key_from_pem,
};
pub use algorithm::rsa::RsaAlgorithm;
pub use algorithm::{Algorithm, Hash, SharedAlgorithm};
pub use claims::Payload;
pub use error::{Error, Result};
pub use header::Header;
pub use manager::Manager;
pub use token::{RawToken, Token, UnsealedToken};
pub use utils::base64url;
