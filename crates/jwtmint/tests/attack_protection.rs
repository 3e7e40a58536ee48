//! Tampering, algorithm confusion and malformed input
//!
//! Every case here must fail while the token is being rebuilt, before any
//! claims are handed to the caller.

use jwtmint::*;

const RSA_PRIVATE: &[u8] = include_bytes!("keys/rsa_private_pkcs1.pem");
const RSA_PUBLIC: &[u8] = include_bytes!("keys/rsa_public_spki.pem");
const OTHER_PRIVATE: &[u8] = include_bytes!("keys/other_private_pkcs1.pem");

fn hmac_manager() -> Manager {
    let mut manager = Manager::new("Example", 300);
    manager.add_algorithm("HS256", HmacAlgorithm::new(Hash::Sha256, "secret").unwrap());
    manager
}

fn rsa_manager() -> Manager {
    let mut manager = Manager::new("Example", 300);
    manager.add_algorithm(
        "RS256",
        RsaAlgorithm::new(Hash::Sha256, RSA_PUBLIC, RSA_PRIVATE).unwrap(),
    );
    manager
}

fn mint(manager: &Manager, algorithm: &str) -> String {
    manager
        .new_token(algorithm, "user", "api")
        .unwrap()
        .seal()
        .unwrap()
        .to_string()
}

/// Replace the character at `index` with a different base64url character
fn flip_char(token: &str, index: usize) -> String {
    let mut bytes = token.as_bytes().to_vec();
    bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
    String::from_utf8(bytes).unwrap()
}

fn unsigned_token(header: &str, payload: &str) -> String {
    format!(
        "{}.{}.{}",
        base64url::encode(header),
        base64url::encode(payload),
        base64url::encode("sig")
    )
}

// ============================================================================
// Tampering
// ============================================================================

#[test]
fn test_hmac_signature_tampering() {
    let manager = hmac_manager();
    let token = mint(&manager, "HS256");
    let signature_start = token.rfind('.').unwrap() + 1;

    for index in signature_start..token.len() - 1 {
        let tampered = flip_char(&token, index);
        assert!(
            matches!(
                manager.new_token_by_raw(&tampered),
                Err(Error::SignatureInvalid)
            ),
            "index {index}"
        );
    }

    // The final character also carries padding bits, so the decoder may
    // reject it before the signature is checked
    let tampered = flip_char(&token, token.len() - 1);
    assert!(matches!(
        manager.new_token_by_raw(&tampered),
        Err(Error::FormatInvalidBase64(_) | Error::SignatureInvalid)
    ));
}

#[test]
fn test_rsa_signature_tampering() {
    let manager = rsa_manager();
    let token = mint(&manager, "RS256");
    let signature_start = token.rfind('.').unwrap() + 1;

    for index in [signature_start, signature_start + 100, token.len() - 2] {
        let tampered = flip_char(&token, index);
        assert!(matches!(
            manager.new_token_by_raw(&tampered),
            Err(Error::SignatureInvalid)
        ));
    }

    let tampered = flip_char(&token, token.len() - 1);
    assert!(matches!(
        manager.new_token_by_raw(&tampered),
        Err(Error::FormatInvalidBase64(_) | Error::SignatureInvalid)
    ));
}

#[test]
fn test_payload_tampering() {
    let manager = hmac_manager();
    let token = mint(&manager, "HS256");
    let parts: Vec<&str> = token.split('.').collect();

    let mut payload: Payload =
        serde_json::from_slice(&base64url::decode(parts[1]).unwrap()).unwrap();
    payload.sub = "admin".into();
    let forged_payload = base64url::encode(serde_json::to_vec(&payload).unwrap());

    let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
    assert!(matches!(
        manager.new_token_by_raw(&forged),
        Err(Error::SignatureInvalid)
    ));
}

#[test]
fn test_wrong_secret() {
    let mut other = Manager::new("Example", 300);
    other.add_algorithm("HS256", HmacAlgorithm::new(Hash::Sha256, "other").unwrap());

    let token = mint(&other, "HS256");
    assert!(matches!(
        hmac_manager().new_token_by_raw(&token),
        Err(Error::SignatureInvalid)
    ));
}

#[test]
fn test_wrong_rsa_key() {
    let mut other = Manager::new("Example", 300);
    other.add_algorithm(
        "RS256",
        RsaAlgorithm::signer(Hash::Sha256, OTHER_PRIVATE).unwrap(),
    );

    let token = mint(&other, "RS256");
    assert!(matches!(
        rsa_manager().new_token_by_raw(&token),
        Err(Error::SignatureInvalid)
    ));
}

// ============================================================================
// Algorithm confusion
// ============================================================================

#[test]
fn test_unregistered_algorithm() {
    let token = mint(&hmac_manager(), "HS256");
    assert!(matches!(
        rsa_manager().new_token_by_raw(&token),
        Err(Error::AlgorithmUnsupported(name)) if name == "HS256"
    ));
}

#[test]
fn test_public_key_as_hmac_secret() {
    // Attacker signs HS256 with the verifier's public key as the shared secret
    let mut attacker = Manager::new("Example", 300);
    attacker.add_algorithm(
        "HS256",
        HmacAlgorithm::new(Hash::Sha256, RSA_PUBLIC.to_vec()).unwrap(),
    );
    let token = mint(&attacker, "HS256");

    assert!(matches!(
        rsa_manager().new_token_by_raw(&token),
        Err(Error::AlgorithmUnsupported(_))
    ));
}

#[test]
fn test_hash_swap_in_header() {
    // Same key registered as RS256 and RS512; relabelling the header breaks verification
    let mut manager = rsa_manager();
    manager.add_algorithm(
        "RS512",
        RsaAlgorithm::signer(Hash::Sha512, RSA_PRIVATE).unwrap(),
    );

    let token = mint(&manager, "RS256");
    let parts: Vec<&str> = token.split('.').collect();
    let relabelled = format!(
        "{}.{}.{}",
        base64url::encode(r#"{"alg":"RS512","typ":"JWT"}"#),
        parts[1],
        parts[2]
    );

    assert!(matches!(
        manager.new_token_by_raw(&relabelled),
        Err(Error::SignatureInvalid)
    ));
}

#[test]
fn test_none_algorithm_variants() {
    let manager = hmac_manager();
    for alg in ["none", "None", "NONE", "nOnE"] {
        let header = format!(r#"{{"alg":"{alg}","typ":"JWT"}}"#);
        let token = unsigned_token(&header, r#"{"sub":"admin","exp":9999999999}"#);
        assert!(
            matches!(
                manager.new_token_by_raw(&token),
                Err(Error::AlgorithmUnsupported(_))
            ),
            "{alg}"
        );
    }
}

#[test]
fn test_none_algorithm_with_empty_signature() {
    let manager = hmac_manager();
    let token = format!(
        "{}.{}.",
        base64url::encode(r#"{"alg":"none"}"#),
        base64url::encode(r#"{"sub":"admin"}"#)
    );
    assert!(matches!(
        manager.new_token_by_raw(&token),
        Err(Error::FormatInvalid)
    ));
}

#[test]
fn test_none_cannot_be_registered_away() {
    let mut manager = hmac_manager();
    manager.add_algorithm("none", HmacAlgorithm::new(Hash::Sha256, "x").unwrap());
    assert_eq!(manager.algorithm_names(), vec!["HS256"]);

    let token = unsigned_token(r#"{"alg":"none"}"#, r#"{"sub":"admin"}"#);
    assert!(matches!(
        manager.new_token_by_raw(&token),
        Err(Error::AlgorithmUnsupported(_))
    ));

    // Nor can the manager mint a token labelled none
    assert!(matches!(
        manager.new_token("none", "admin", ""),
        Err(Error::AlgorithmUnsupported(_))
    ));
}

#[test]
fn test_missing_algorithm() {
    let token = unsigned_token(r#"{"typ":"JWT"}"#, r#"{}"#);
    assert!(matches!(
        hmac_manager().new_token_by_raw(&token),
        Err(Error::FormatInvalidJson(_))
    ));
}

// ============================================================================
// Malformed input
// ============================================================================

#[test]
fn test_wrong_segment_count() {
    let manager = hmac_manager();
    let valid = mint(&manager, "HS256");

    let inputs = [
        String::new(),
        "onlyone".to_string(),
        valid.rsplit_once('.').unwrap().0.to_string(),
        format!("{valid}.extra"),
        format!("{valid}.extra.more"),
    ];
    for input in inputs {
        assert!(
            matches!(manager.new_token_by_raw(&input), Err(Error::FormatInvalid)),
            "{input:?}"
        );
    }
}

#[test]
fn test_empty_segments() {
    let manager = hmac_manager();
    for input in ["..", "a..b", ".a.b", "a.b."] {
        assert!(matches!(
            manager.new_token_by_raw(input),
            Err(Error::FormatInvalid)
        ));
    }
}

#[test]
fn test_invalid_base64() {
    let manager = hmac_manager();
    let valid = mint(&manager, "HS256");
    let parts: Vec<&str> = valid.split('.').collect();

    let bad_header = format!("{}=.{}.{}", parts[0], parts[1], parts[2]);
    let bad_payload = format!("{}.{}+.{}", parts[0], parts[1], parts[2]);
    let bad_signature = format!("{}.{}.{}/", parts[0], parts[1], parts[2]);

    for input in [bad_header, bad_payload, bad_signature] {
        assert!(matches!(
            manager.new_token_by_raw(&input),
            Err(Error::FormatInvalidBase64(_))
        ));
    }
}

#[test]
fn test_invalid_json() {
    let manager = hmac_manager();
    let token = unsigned_token("[]", "{}");
    assert!(matches!(
        manager.new_token_by_raw(&token),
        Err(Error::FormatInvalidJson(_))
    ));

    let token = unsigned_token(r#"{"alg":"HS256"}"#, r#"{"exp":"soon"}"#);
    assert!(matches!(
        manager.new_token_by_raw(&token),
        Err(Error::FormatInvalidJson(_))
    ));
}

#[test]
fn test_oversized_token() {
    let manager = hmac_manager();
    let huge = format!("a.{}.c", "b".repeat(64 * 1024));
    assert!(matches!(
        manager.new_token_by_raw(&huge),
        Err(Error::TokenTooLarge { .. })
    ));
}

#[test]
fn test_oversized_signature() {
    let manager = hmac_manager();
    let token = format!(
        "{}.{}.{}",
        base64url::encode(r#"{"alg":"HS256"}"#),
        base64url::encode("{}"),
        base64url::encode(vec![0u8; 2048])
    );
    assert!(matches!(
        manager.new_token_by_raw(&token),
        Err(Error::FormatInvalidBase64(_))
    ));
}
