//! Ed25519 examples of [`rfc8037`] appendix A.
//!
//! [`rfc8037`]: https://datatracker.ietf.org/doc/html/rfc8037

use rjose::jose::{EdDsa, ErrorKind, Headers, JWA, JWS, Jwk, OkpKey, SignatureAlgorithm, Signer};
use tokio_test::assert_err;

const PRIVATE: &str = r#"{"kty":"OKP","crv":"Ed25519","d":"nWGxne_9WmC6hEr0kuwsxERJxWl7MmkZcDusAxyuf2A","x":"11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo"}"#;
const PUBLIC: &str =
    r#"{"kty":"OKP","crv":"Ed25519","x":"11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo"}"#;

const TOKEN: &str = "eyJhbGciOiJFZERTQSJ9.RXhhbXBsZSBvZiBFZDI1NTE5IHNpZ25pbmc.hgyY0il_MGCjP0JzlnLWG1PPOt7-09PGcvMg3AIbQR6dWbhijcNR4ki4iylGjg5BhVsPt9g7sVvpAr_MuM0KAg";

#[test]
fn ed25519_signing_appendix_a4() {
    let jws = JWS::new(EdDsa::new(OkpKey::from_json(PRIVATE).unwrap(), JWA::EdDSA).unwrap());
    let token = jws
        .encode("Example of Ed25519 signing", Some(Headers::new()), false)
        .unwrap();
    assert_eq!(token, TOKEN);
}

#[test]
fn ed25519_validation_appendix_a5() {
    let verifier = JWS::new(Signer::new(Jwk::from_json(PUBLIC).unwrap(), JWA::EdDSA).unwrap());
    let decoded = verifier.decode(TOKEN).unwrap();
    assert_eq!(decoded.payload(), b"Example of Ed25519 signing");

    let forged = TOKEN.replace(".RXhh", ".RXho");
    let err = assert_err!(verifier.decode(&forged));
    assert_eq!(err.kind(), ErrorKind::Verification);

    let err = assert_err!(verifier.algorithm().sign(b"eyJhbGciOiJFZERTQSJ9.e30"));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn ed25519_thumbprint_appendix_a3() {
    let key = Jwk::from_json(PRIVATE).unwrap();
    assert_eq!(
        key.thumbprint_sha256().unwrap(),
        "kPrK_qmxVWaYVA9wwBF6Iuo3vVzz7TxHCTwXBygrS4k"
    );
}
