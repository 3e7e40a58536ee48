//! Run with
//!
//! ```not_rust
//! cargo run --example issue_and_verify
//! ```

use jwtmint::{Hash, HmacAlgorithm, Manager, RsaAlgorithm};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const RSA_PRIVATE_KEY: &[u8] = include_bytes!("../tests/keys/rsa_private_pkcs8.pem");
const RSA_PUBLIC_KEY: &[u8] = include_bytes!("../tests/keys/rsa_public_spki.pem");

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("jwtmint=debug,{}=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run() {
        error!(error = %e, "example failed");
        std::process::exit(1);
    }
}

fn run() -> jwtmint::Result<()> {
    let mut issuer = Manager::new("Example", 5);
    issuer.set_auto_create_jti(true);
    issuer.add_algorithm("HS256", HmacAlgorithm::new(Hash::Sha256, "shared-secret")?);
    issuer.add_algorithm(
        "RS256",
        RsaAlgorithm::signer(Hash::Sha256, RSA_PRIVATE_KEY)?,
    );

    // Shared secret: the same manager issues and verifies
    let mut unsealed = issuer.new_token("HS256", "user-42", "api")?;
    unsealed.payload_mut().set_extra("email", "user@example.com");
    let token = unsealed.seal()?;
    info!(
        alg = %token.header().algorithm,
        jti = %token.payload().jti,
        "issued HS256 token"
    );

    let verified = issuer.new_token_by_raw(token.as_str())?;
    verified.validate()?;
    info!(
        sub = %verified.payload().sub,
        jti = %verified.payload().jti,
        email = ?verified.payload().extra_value("email"),
        "verified HS256 token"
    );

    // Public key: a separate service only holds the verifier
    let mut service = Manager::new("Example", 5);
    service.add_algorithm("RS256", RsaAlgorithm::verifier(Hash::Sha256, RSA_PUBLIC_KEY)?);

    let token = issuer.new_token("RS256", "user-42", "api")?.seal()?;
    let verified = service.new_token_by_raw(token.as_str())?;
    verified.validate()?;
    verified.validate_audience("api")?;
    info!(sub = %verified.payload().sub, "verified RS256 token");

    // Six seconds after issuance the five second lifetime is over
    let later = verified.payload().iat + 6;
    match verified.validate_at(later) {
        Err(e) if e.is_expired() => info!(error = %e, "token expired as expected"),
        other => info!(result = ?other, "unexpected validation result"),
    }

    // A token naming an algorithm the service never registered
    let hs_token = issuer.new_token("HS256", "user-42", "api")?.seal()?;
    if let Err(e) = service.new_token_by_raw(hs_token.as_str()) {
        info!(error = %e, "rejected token with unregistered algorithm");
    }

    Ok(())
}
