//! Sign and verify with freshly generated keys for every algorithm.

use rjose::jose::{
    EcDsa, EcKey, ErrorKind, Headers, Hmac, JWA, JWAFamily, JWS, Jwk, JwkCurve, OctKey, OkpKey,
    Rsa, RsaKey, RsaPss, SignatureAlgorithm, Signer, codec::base64url_encode,
};
use quickcheck_macros::quickcheck;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

const RSA_SIZES: [usize; 3] = [2048, 3072, 4096];

/// Generated keys, RSA keys are shared between `RS*` and `PS*`.
struct Keys {
    rsa: Vec<RsaKey>,
}

impl Keys {
    fn generate() -> Self {
        let rsa = RSA_SIZES
            .into_iter()
            .map(|bits| RsaKey::generate(bits).unwrap())
            .collect();
        Self { rsa }
    }

    fn for_algorithm(&self, jwa: JWA) -> Vec<Jwk> {
        match jwa.family() {
            JWAFamily::Hmac => {
                let len = jwa.hash().unwrap().output_len();
                vec![OctKey::new(vec![0x5a; len]).into(), OctKey::generate().unwrap().into()]
            }
            JWAFamily::Rsa | JWAFamily::RsaPss => {
                self.rsa.iter().cloned().map(Jwk::from).collect()
            }
            JWAFamily::Ecdsa => vec![EcKey::generate(jwa.curve().unwrap()).unwrap().into()],
            JWAFamily::EdDsa => vec![OkpKey::generate().unwrap().into()],
        }
    }
}

fn with_metadata(key: Jwk, jwa: JWA) -> Jwk {
    let kid = format!("{jwa}-69420");
    match key {
        Jwk::Rsa(key) => key.with_kid(kid).with_use("sign").into(),
        Jwk::Ec(key) => key.with_kid(kid).with_use("sign").into(),
        Jwk::Oct(key) => key.with_kid(kid).with_use("sign").into(),
        Jwk::Okp(key) => key.with_kid(kid).with_use("sign").into(),
    }
}

/// The verifying side only gets the public JWK, except for `oct` keys.
fn verifier_for(key: &Jwk, jwa: JWA) -> Signer {
    let key = match key {
        Jwk::Oct(_) => key.clone(),
        _ => Jwk::parse(&key.to_public_jwk(None, None)).unwrap(),
    };
    assert!(key.kty() == "oct" || key.private_key().is_none());
    Signer::new(key, jwa).unwrap()
}

fn forge_signature(token: &str) -> String {
    let (signing_input, signature) = token.rsplit_once('.').unwrap();
    let replacement = if signature.starts_with('A') { 'B' } else { 'A' };
    format!("{signing_input}.{replacement}{}", &signature[1..])
}

#[test]
fn every_algorithm_round_trips() {
    let keys = Keys::generate();
    for jwa in JWA::ALL {
        for key in keys.for_algorithm(jwa) {
            let key = with_metadata(key, jwa);
            let verifier = JWS::new(verifier_for(&key, jwa));
            let signer = JWS::new(Signer::new(key, jwa).unwrap());

            let token = signer.encode(json!({"foo": "bar"}), None, false).unwrap();
            let decoded = verifier.decode(&token).unwrap();
            assert_eq!(
                decoded.header_bytes(),
                format!(r#"{{"typ":"JWT","alg":"{jwa}","kid":"{jwa}-69420"}}"#).as_bytes(),
                "{jwa}"
            );
            assert_eq!(decoded.payload(), br#"{"foo":"bar"}"#, "{jwa}");

            let err = assert_err!(verifier.decode(&forge_signature(&token)));
            assert_eq!(err.kind(), ErrorKind::Verification, "{jwa}");
        }
    }
}

#[test]
fn only_the_bound_algorithm_verifies() {
    let key = RsaKey::generate(2048).unwrap();
    let rs256 = JWS::new(Rsa::new(key.clone(), JWA::RS256).unwrap());
    let ps256 = JWS::new(RsaPss::new(key.clone(), JWA::PS256).unwrap());
    let rs512 = JWS::new(Rsa::new(key, JWA::RS512).unwrap());

    let token = rs256.encode("payload", None, false).unwrap();
    assert_ok!(rs256.decode(&token));
    for err in [assert_err!(ps256.decode(&token)), assert_err!(rs512.decode(&token))] {
        assert_eq!(err.kind(), ErrorKind::Verification);
    }
}

#[test]
fn deterministic_algorithms_repeat_their_tokens() {
    let keys = Keys::generate();
    for jwa in JWA::ALL {
        let key = keys.for_algorithm(jwa).remove(0);
        let jws = JWS::new(Signer::new(key, jwa).unwrap());
        let first = jws.encode("payload", None, false).unwrap();
        let second = jws.encode("payload", None, false).unwrap();
        match jwa.family() {
            JWAFamily::Hmac | JWAFamily::Rsa | JWAFamily::EdDsa => {
                assert_eq!(first, second, "{jwa}");
            }
            JWAFamily::RsaPss | JWAFamily::Ecdsa => assert_ne!(first, second, "{jwa}"),
        }
        assert_ok!(jws.decode(&first));
        assert_ok!(jws.decode(&second));
    }
}

#[test]
fn explicit_kid_header_is_kept() {
    let key = OctKey::generate().unwrap().with_kid("from-key");
    let jws = JWS::new(Hmac::new(key, JWA::HS512).unwrap());
    let headers = Headers::new().with_header("kid", "from-header");
    let token = jws.encode("payload", Some(headers), true).unwrap();
    let decoded = jws.decode(&token).unwrap();
    assert_eq!(
        decoded.header_bytes(),
        br#"{"kid":"from-header","alg":"HS512"}"#
    );
    assert_eq!(decoded.payload(), br#""payload""#);
}

fn rsa_public_key_with_leading_octet(octet: u8) -> RsaKey {
    let mut n = vec![0xd3; 256];
    n[0] = octet;
    let json = json!({"kty": "RSA", "n": base64url_encode(&n), "e": "AQAB"}).to_string();
    RsaKey::from_json(&json).unwrap()
}

#[test]
fn rsa_moduli_below_2048_bits_are_rejected() {
    let short = rsa_public_key_with_leading_octet(0x7f);
    let exact = rsa_public_key_with_leading_octet(0x80);
    assert_eq!(short.modulus_bits(), 2047);
    assert_eq!(exact.modulus_bits(), 2048);

    for jwa in [JWA::RS256, JWA::RS384, JWA::RS512] {
        let err = assert_err!(Rsa::new(short.clone(), jwa));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_ok!(Rsa::new(exact.clone(), jwa));
    }
    for jwa in [JWA::PS256, JWA::PS384, JWA::PS512] {
        let err = assert_err!(RsaPss::new(short.clone(), jwa));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_ok!(RsaPss::new(exact.clone(), jwa));
    }

    let err = assert_err!(RsaKey::generate(1024));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn hmac_keys_shorter_than_the_digest_are_rejected() {
    for jwa in [JWA::HS256, JWA::HS384, JWA::HS512] {
        let len = jwa.hash().unwrap().output_len();
        let err = assert_err!(Hmac::new(OctKey::new(vec![1; len - 1]), jwa));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_ok!(Hmac::new(OctKey::new(vec![1; len]), jwa));
    }
}

#[test]
fn ecdsa_keys_must_be_on_the_algorithm_curve() {
    for curve in JwkCurve::ALL {
        let key = EcKey::generate(curve).unwrap();
        for jwa in [JWA::ES256, JWA::ES256K, JWA::ES384, JWA::ES512] {
            let bound = EcDsa::new(key.clone(), jwa);
            if jwa.curve() == Some(curve) {
                assert_ok!(bound);
            } else {
                let err = assert_err!(bound);
                assert_eq!(err.kind(), ErrorKind::Configuration);
            }
        }
    }
}

#[test]
fn key_types_must_match_the_algorithm_family() {
    let okp: Jwk = OkpKey::generate().unwrap().into();
    let oct: Jwk = OctKey::generate().unwrap().into();
    for jwa in JWA::ALL {
        let err = assert_err!(Signer::new(
            if jwa == JWA::EdDSA { oct.clone() } else { okp.clone() },
            jwa
        ));
        assert_eq!(err.kind(), ErrorKind::Configuration, "{jwa}");
    }
}

#[test]
fn signer_reports_its_binding() {
    let key = EcKey::generate(JwkCurve::P384).unwrap().with_kid("p384");
    let signer = Signer::new(key.into(), JWA::ES384).unwrap();
    assert_eq!(signer.jwa(), JWA::ES384);
    assert_eq!(signer.key_id(), Some("p384"));
}

#[quickcheck]
fn arbitrary_payloads_survive_hs256(payload: Vec<u8>) -> bool {
    let jws = JWS::new(Hmac::new(OctKey::new(vec![0x42; 32]), JWA::HS256).unwrap());
    let token = jws.encode(payload.clone(), None, false).unwrap();
    jws.decode(&token).unwrap().payload() == payload.as_slice()
}
