//! Issuer context and algorithm registry
//!
//! A [`Manager`] is configured once per trust domain: issuer, token lifetime,
//! optional not-before and jti generation, and the algorithms tokens may be
//! signed or verified with. Setup takes `&mut self`; tokens borrow the manager,
//! so registration is finished before any token exists.

use crate::algorithm::{Algorithm, SharedAlgorithm};
use crate::claims::{Payload, current_timestamp, unix_timestamp};
use crate::error::{Error, Result};
use crate::token::{Token, UnsealedToken};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, warn};

/// Token issuer context
pub struct Manager {
    issuer: String,
    ttl: i64,
    not_before: i64,
    auto_create_jti: bool,
    algorithms: HashMap<String, SharedAlgorithm>,
}

impl Manager {
    /// Create a manager for `issuer` issuing tokens valid for `ttl` seconds
    ///
    /// An empty issuer disables issuer validation.
    pub fn new(issuer: impl Into<String>, ttl: i64) -> Self {
        Self {
            issuer: issuer.into(),
            ttl,
            not_before: 0,
            auto_create_jti: false,
            algorithms: HashMap::new(),
        }
    }

    /// Register an algorithm under `name` (case-insensitive)
    ///
    /// A later registration under the same name replaces the earlier one.
    /// The name `none` is refused in any casing; nothing is registered.
    pub fn add_algorithm(&mut self, name: &str, algorithm: impl Algorithm + 'static) {
        self.add_shared_algorithm(name, Arc::new(algorithm));
    }

    /// Register an algorithm that may also be registered under other names
    pub fn add_shared_algorithm(&mut self, name: &str, algorithm: SharedAlgorithm) {
        if is_none_algorithm(name) {
            warn!(alg = %name, "refusing to register the none algorithm");
            return;
        }

        let key = name.to_ascii_uppercase();
        if self.algorithms.insert(key.clone(), algorithm).is_some() {
            warn!(alg = %key, "algorithm registration replaced");
        } else {
            debug!(alg = %key, "algorithm registered");
        }
    }

    /// Set the `nbf` claim for new tokens (seconds since the Unix epoch)
    ///
    /// `0` leaves the claim unset.
    pub fn set_not_before(&mut self, timestamp: i64) {
        self.not_before = timestamp;
    }

    /// Set the `nbf` claim for new tokens from a point in time
    pub fn set_not_before_time(&mut self, time: SystemTime) {
        self.not_before = unix_timestamp(time);
    }

    /// Generate a UUID v4 `jti` for every new token
    pub fn set_auto_create_jti(&mut self, enabled: bool) {
        self.auto_create_jti = enabled;
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    pub fn not_before(&self) -> i64 {
        self.not_before
    }

    pub fn auto_create_jti(&self) -> bool {
        self.auto_create_jti
    }

    /// Look up a registered algorithm (case-insensitive)
    pub fn algorithm(&self, name: &str) -> Option<&SharedAlgorithm> {
        self.algorithms.get(&name.to_ascii_uppercase())
    }

    /// Registered algorithm names, sorted
    pub fn algorithm_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.algorithms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up the algorithm used to sign or verify under `name`
    ///
    /// `none` never resolves, so tokens can neither be minted nor accepted
    /// without a signature.
    pub(crate) fn resolve_algorithm(&self, name: &str) -> Result<&dyn Algorithm> {
        if is_none_algorithm(name) {
            return Err(Error::AlgorithmUnsupported(name.to_string()));
        }

        self.algorithm(name)
            .map(|algorithm| algorithm.as_ref())
            .ok_or_else(|| Error::AlgorithmUnsupported(name.to_string()))
    }

    /// Build claims for a new token issued now
    pub fn new_payload(&self, subject: &str, audience: &str) -> Payload {
        self.new_payload_at(subject, audience, current_timestamp())
    }

    /// Build claims for a new token issued at `now`
    pub fn new_payload_at(&self, subject: &str, audience: &str, now: i64) -> Payload {
        Payload {
            exp: now.saturating_add(self.ttl),
            iss: self.issuer.clone(),
            sub: subject.to_string(),
            aud: audience.to_string(),
            nbf: self.not_before,
            iat: now,
            jti: self.new_jti(),
            ..Payload::new()
        }
    }

    /// A fresh `jti`, or an empty string when generation is disabled
    pub fn new_jti(&self) -> String {
        if self.auto_create_jti {
            uuid::Uuid::new_v4().to_string()
        } else {
            String::new()
        }
    }

    /// Mint an unsealed token with claims from this manager
    pub fn new_token(
        &self,
        algorithm: &str,
        subject: &str,
        audience: &str,
    ) -> Result<UnsealedToken<'_>> {
        UnsealedToken::new(self, algorithm, subject, audience)
    }

    /// Mint an unsealed token carrying `payload`
    pub fn new_token_with_payload(
        &self,
        algorithm: &str,
        payload: Payload,
    ) -> Result<UnsealedToken<'_>> {
        UnsealedToken::with_payload(self, algorithm, payload)
    }

    /// Rebuild and verify a token from its string form
    pub fn new_token_by_raw(&self, token: &str) -> Result<Token<'_>> {
        Token::from_raw(self, token)
    }
}

fn is_none_algorithm(name: &str) -> bool {
    name.eq_ignore_ascii_case("none")
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .field("not_before", &self.not_before)
            .field("auto_create_jti", &self.auto_create_jti)
            .field("algorithms", &self.algorithm_names())
            .finish()
    }
}
