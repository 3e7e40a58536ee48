use serde::{Deserialize, Serialize};

/// Token type written into every header
pub const TOKEN_TYPE: &str = "JWT";

/// JWT header structure
///
/// Serialized as `{"alg":"...","typ":"JWT"}`. A decoded header without `typ`
/// keeps an empty token type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Registered name of the signing algorithm, upper-cased
    #[serde(rename = "alg")]
    pub algorithm: String,

    /// Token type
    #[serde(rename = "typ", default)]
    pub token_type: String,
}

impl Header {
    /// Create a header for the given algorithm name
    pub fn new(algorithm: &str) -> Self {
        Self {
            algorithm: algorithm.to_ascii_uppercase(),
            token_type: TOKEN_TYPE.to_string(),
        }
    }

    /// Get algorithm as string
    pub fn algorithm_str(&self) -> &str {
        &self.algorithm
    }
}
