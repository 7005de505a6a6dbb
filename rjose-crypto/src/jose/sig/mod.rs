//! Signature algorithms bound to a key.
//!
//! Binding validates the key against the algorithm once, a bound instance can
//! then sign and verify any number of messages. [`Signer`] is the closed union
//! over all families, built straight from a [`Jwk`].

use crate::jose::{JWA, JWAFamily, JoseError, Jwk};

mod ecdsa;
mod eddsa;
mod hmac;
mod pss;
mod rsa;

pub use ecdsa::EcDsa;
pub use eddsa::EdDsa;
pub use hmac::Hmac;
pub use pss::RsaPss;
pub use rsa::Rsa;

/// A [`JWA`] bound to a validated key.
///
/// `verify` reports a signature that does not match as `Ok(false)`, errors are
/// reserved for key material that cannot be used at all.
pub trait SignatureAlgorithm {
    /// The algorithm this instance implements.
    fn jwa(&self) -> JWA;

    /// `kid` of the bound key, if it has one.
    fn key_id(&self) -> Option<&str>;

    /// Sign `message`, requires private key material.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, JoseError>;

    /// Check `signature` over `message`.
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, JoseError>;
}

impl<A: SignatureAlgorithm> SignatureAlgorithm for &A {
    fn jwa(&self) -> JWA {
        (**self).jwa()
    }

    fn key_id(&self) -> Option<&str> {
        (**self).key_id()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, JoseError> {
        (**self).sign(message)
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, JoseError> {
        (**self).verify(message, signature)
    }
}

/// Minimum key size rule of an algorithm family.
#[derive(Debug, Clone, Copy)]
struct KeyRequirement {
    family: JWAFamily,
    key_bits: u64,
    min_bits: u64,
}

/// Shared binding checks: the algorithm belongs to the family, a key restricted
/// to one `alg` is restricted to this one, and the key is large enough.
fn check_binding(
    jwa: JWA,
    key_alg: Option<&str>,
    requirement: KeyRequirement,
) -> Result<(), JoseError> {
    if jwa.family() != requirement.family {
        return Err(JoseError::configuration(format!(
            "{jwa} is not a {:?} algorithm",
            requirement.family
        )));
    }
    if let Some(key_alg) = key_alg
        && key_alg != jwa.as_str()
    {
        return Err(JoseError::configuration(format!(
            "key is restricted to {key_alg:?}, cannot be used with {jwa}"
        )));
    }
    if requirement.key_bits < requirement.min_bits {
        return Err(JoseError::configuration(format!(
            "{jwa} requires a key of at least {} bits, got {}",
            requirement.min_bits, requirement.key_bits
        )));
    }
    tracing::debug!(
        jwa = %jwa,
        key.bits = requirement.key_bits,
        "bound signature algorithm"
    );
    Ok(())
}

fn missing_private_key(jwa: JWA) -> JoseError {
    JoseError::configuration(format!("{jwa} signing requires a private key"))
}

#[derive(Debug, Clone)]
/// Any supported [`SignatureAlgorithm`], selected by the [`JWA`] family.
pub enum Signer {
    Hmac(Hmac),
    Rsa(Rsa),
    RsaPss(RsaPss),
    EcDsa(EcDsa),
    EdDsa(EdDsa),
}

impl Signer {
    /// Bind `key` to `jwa`.
    ///
    /// A key type the family cannot use is a configuration error, as is every
    /// failure of the family specific checks.
    pub fn new(key: Jwk, jwa: JWA) -> Result<Self, JoseError> {
        match (jwa.family(), key) {
            (JWAFamily::Hmac, Jwk::Oct(key)) => Hmac::new(key, jwa).map(Self::Hmac),
            (JWAFamily::Rsa, Jwk::Rsa(key)) => Rsa::new(key, jwa).map(Self::Rsa),
            (JWAFamily::RsaPss, Jwk::Rsa(key)) => RsaPss::new(key, jwa).map(Self::RsaPss),
            (JWAFamily::Ecdsa, Jwk::Ec(key)) => EcDsa::new(key, jwa).map(Self::EcDsa),
            (JWAFamily::EdDsa, Jwk::Okp(key)) => EdDsa::new(key, jwa).map(Self::EdDsa),
            (_, key) => Err(JoseError::configuration(format!(
                "{jwa} cannot be used with a {} key",
                key.kty()
            ))),
        }
    }

    fn inner(&self) -> &dyn SignatureAlgorithm {
        match self {
            Self::Hmac(alg) => alg,
            Self::Rsa(alg) => alg,
            Self::RsaPss(alg) => alg,
            Self::EcDsa(alg) => alg,
            Self::EdDsa(alg) => alg,
        }
    }
}

impl SignatureAlgorithm for Signer {
    fn jwa(&self) -> JWA {
        self.inner().jwa()
    }

    fn key_id(&self) -> Option<&str> {
        self.inner().key_id()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, JoseError> {
        self.inner().sign(message)
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, JoseError> {
        self.inner().verify(message, signature)
    }
}

impl From<Hmac> for Signer {
    fn from(value: Hmac) -> Self {
        Self::Hmac(value)
    }
}

impl From<Rsa> for Signer {
    fn from(value: Rsa) -> Self {
        Self::Rsa(value)
    }
}

impl From<RsaPss> for Signer {
    fn from(value: RsaPss) -> Self {
        Self::RsaPss(value)
    }
}

impl From<EcDsa> for Signer {
    fn from(value: EcDsa) -> Self {
        Self::EcDsa(value)
    }
}

impl From<EdDsa> for Signer {
    fn from(value: EdDsa) -> Self {
        Self::EdDsa(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jose::{EcKey, ErrorKind, JwkCurve, OctKey};
    use tokio_test::assert_err;
    use tracing_test::traced_test;

    fn oct(len: usize) -> Jwk {
        Jwk::Oct(OctKey::new(vec![7; len]))
    }

    #[test]
    fn key_type_must_match_family() {
        let err = assert_err!(Signer::new(oct(64), JWA::RS256));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        let err = assert_err!(Signer::new(oct(64), JWA::EdDSA));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        let ec = EcKey::generate(JwkCurve::P256).unwrap();
        assert_err!(Signer::new(Jwk::Ec(ec), JWA::HS256));
    }

    #[test]
    fn key_alg_restricts_binding() {
        let key = OctKey::new(vec![7; 64]).with_alg("HS512");
        assert_err!(Signer::new(Jwk::Oct(key.clone()), JWA::HS256));
        let signer = Signer::new(Jwk::Oct(key), JWA::HS512).unwrap();
        assert_eq!(signer.jwa(), JWA::HS512);
    }

    #[test]
    fn signer_delegates() {
        let key = OctKey::new(vec![7; 32]).with_kid("k1");
        let signer = Signer::new(Jwk::Oct(key), JWA::HS256).unwrap();
        assert_eq!(signer.key_id(), Some("k1"));
        let signature = signer.sign(b"message").unwrap();
        assert!(signer.verify(b"message", &signature).unwrap());
        assert!(!(&signer).verify(b"other", &signature).unwrap());
    }

    #[test]
    #[traced_test]
    fn binding_is_logged_without_key_material() {
        Signer::new(oct(48), JWA::HS384).unwrap();
        assert!(logs_contain("bound signature algorithm"));
        assert!(logs_contain("jwa=HS384"));
        assert!(!logs_contain("[7, 7"));
    }
}
