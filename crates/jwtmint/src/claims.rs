//! Claims carried in the token payload
//!
//! Registered claims are flat fields; application claims live in the nested
//! `extra` object. Time claims are seconds since the Unix epoch.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};

/// Token payload
///
/// Every field is always serialized, in the order `exp`, `iss`, `sub`, `aud`,
/// `nbf`, `iat`, `jti`, `extra`. On decode, a missing field takes its zero
/// value and a missing or `null` `extra` becomes an empty map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payload {
    /// Expiration Time (exp)
    pub exp: i64,

    /// Issuer (iss)
    pub iss: String,

    /// Subject (sub)
    pub sub: String,

    /// Audience (aud)
    pub aud: String,

    /// Not Before (nbf), `0` when unset
    pub nbf: i64,

    /// Issued At (iat)
    pub iat: i64,

    /// JWT ID (jti), empty when not generated
    pub jti: String,

    /// Application-specific claims
    #[serde(deserialize_with = "null_as_empty")]
    pub extra: Map<String, Value>,
}

impl Payload {
    /// Create zeroed claims with an empty `extra` map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an application claim, returning the previous value if any
    pub fn set_extra(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.extra.insert(key.into(), value.into())
    }

    /// Get an application claim
    pub fn extra_value(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Set an application claim from any serializable value
    pub fn set_extra_serialized<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<Option<Value>> {
        let value = serde_json::to_value(value)
            .map_err(|e| crate::Error::SerializationFailed(e.to_string()))?;
        Ok(self.set_extra(key, value))
    }
}

/// Current time in seconds since the Unix epoch
pub(crate) fn current_timestamp() -> i64 {
    unix_timestamp(SystemTime::now())
}

/// Convert a point in time to seconds since the Unix epoch
///
/// Times before the epoch clamp to `0`.
pub(crate) fn unix_timestamp(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0))
        .as_secs() as i64
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Map<String, Value>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_has_empty_extra() {
        let payload = Payload::new();
        assert!(payload.extra.is_empty());
        assert_eq!(payload.exp, 0);
        assert_eq!(payload.jti, "");
    }

    #[test]
    fn test_serialize_all_fields_in_order() {
        let json = serde_json::to_string(&Payload::new()).unwrap();
        assert_eq!(
            json,
            r#"{"exp":0,"iss":"","sub":"","aud":"","nbf":0,"iat":0,"jti":"","extra":{}}"#
        );
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let payload: Payload = serde_json::from_str(r#"{"sub":"user"}"#).unwrap();
        assert_eq!(payload.sub, "user");
        assert_eq!(payload.exp, 0);
        assert!(payload.extra.is_empty());
    }

    #[test]
    fn test_deserialize_null_extra() {
        let payload: Payload = serde_json::from_str(r#"{"exp":10,"extra":null}"#).unwrap();
        assert_eq!(payload.exp, 10);
        assert!(payload.extra.is_empty());
    }

    #[test]
    fn test_flattened_identity_fields_ignored() {
        let payload: Payload =
            serde_json::from_str(r#"{"sub":"1","uid":"42","email":"a@b.c","name":"A"}"#).unwrap();
        assert_eq!(payload.sub, "1");
        assert!(payload.extra.is_empty());
    }

    #[test]
    fn test_wrong_claim_type_rejected() {
        assert!(serde_json::from_str::<Payload>(r#"{"exp":"tomorrow"}"#).is_err());
        assert!(serde_json::from_str::<Payload>(r#"{"extra":[1,2]}"#).is_err());
    }

    #[test]
    fn test_unix_timestamp() {
        let time = UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000);
        assert_eq!(unix_timestamp(time), 1_700_000_000);
        assert_eq!(
            unix_timestamp(UNIX_EPOCH - std::time::Duration::from_secs(5)),
            0
        );
        assert!(current_timestamp() > 1_700_000_000);
    }

    #[test]
    fn test_extra_values() {
        let mut payload = Payload::new();
        assert_eq!(payload.set_extra("uid", 42), None);
        assert_eq!(payload.set_extra("uid", 43), Some(json!(42)));
        payload.set_extra("roles", json!(["admin", "dev"]));
        payload
            .set_extra_serialized("scopes", &vec!["read", "write"])
            .unwrap();

        assert_eq!(payload.extra_value("uid"), Some(&json!(43)));
        assert_eq!(payload.extra_value("roles"), Some(&json!(["admin", "dev"])));
        assert_eq!(payload.extra_value("scopes"), Some(&json!(["read", "write"])));
        assert_eq!(payload.extra_value("missing"), None);

        let decoded: Payload =
            serde_json::from_str(&serde_json::to_string(&payload).unwrap()).unwrap();
        assert_eq!(decoded, payload);
    }
}
