//! Base64URL encoding/decoding per RFC 4648
//!
//! This module provides a thin wrapper around the `base64` crate. Every token
//! segment uses the URL-safe alphabet with padding stripped.

use crate::error::{Error, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encode bytes to a Base64URL string without padding
pub fn encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decode a Base64URL string without padding
pub fn decode(input: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| Error::FormatInvalidBase64(format!("Base64URL decode failed: {e}")))
}

/// Decode Base64URL string to bytes with maximum size limit
pub(crate) fn decode_bytes(input: &str, max_size: usize) -> Result<Vec<u8>> {
    let result = decode(input)?;

    if result.len() > max_size {
        return Err(Error::FormatInvalidBase64(format!(
            "Decoded size exceeds limit: {} bytes (max: {})",
            result.len(),
            max_size
        )));
    }

    Ok(result)
}

/// Decode Base64URL string to UTF-8 string with size limit
pub(crate) fn decode_string(input: &str, max_size: usize) -> Result<String> {
    decode_bytes(input, max_size).and_then(|bytes| {
        String::from_utf8(bytes)
            .map_err(|e| Error::FormatInvalidBase64(format!("Invalid UTF-8: {e}")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_strips_padding() {
        assert_eq!(encode(b"Hello"), "SGVsbG8");
        assert_eq!(encode(b"Hi"), "SGk");
        assert_eq!(encode(b""), "");
    }

    #[test]
    fn test_encode_url_safe_alphabet() {
        // 0xfb 0xff maps to '+' and '/' in the standard alphabet
        assert_eq!(encode([0xfb, 0xff]), "-_8");
    }

    #[test]
    fn test_decode_invalid() {
        assert!(matches!(decode("!!!"), Err(Error::FormatInvalidBase64(_))));
        // Standard base64 with padding must fail for URL_SAFE_NO_PAD
        assert!(decode("SGVsbG8=").is_err());
        // Standard alphabet characters are not part of the URL-safe alphabet
        assert!(decode("+/8").is_err());
    }

    #[test]
    fn test_decode_valid() {
        assert_eq!(decode("SGVsbG8").unwrap(), b"Hello");
        assert_eq!(decode("-_8").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn test_decode_with_limit() {
        assert_eq!(decode_bytes("SGVsbG8", 10).unwrap(), b"Hello");
        assert!(decode_bytes("SGVsbG8", 3).is_err());
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode_bytes("", 1000).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_string() {
        assert_eq!(decode_string("SGVsbG8", 10).unwrap(), "Hello");
        assert!(decode_string("SGVsbG8", 3).is_err());
        // 0xff alone is not valid UTF-8
        assert!(matches!(
            decode_string("_w", 10),
            Err(Error::FormatInvalidBase64(msg)) if msg.contains("UTF-8")
        ));
    }
}
