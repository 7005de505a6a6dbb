use aws_lc_rs::{
    rand::SystemRandom,
    signature::{EcdsaKeyPair, EcdsaSigningAlgorithm, EcdsaVerificationAlgorithm, UnparsedPublicKey},
};

use super::{KeyRequirement, SignatureAlgorithm, check_binding, missing_private_key};
use crate::jose::{
    EcKey, ErrorKind, JWA, JWAFamily, JoseError, JwkCurve,
    der::{ecdsa_signature_from_der, ecdsa_signature_to_der},
    error::JoseResultExt as _,
};

#[derive(Debug, Clone)]
/// `ES256`, `ES256K`, `ES384` and `ES512`.
///
/// The key must be on exactly the curve of the algorithm. Signatures are the
/// fixed width `R || S` form, the provider works on DER.
pub struct EcDsa {
    key: EcKey,
    jwa: JWA,
    curve: JwkCurve,
}

impl EcDsa {
    pub fn new(key: EcKey, jwa: JWA) -> Result<Self, JoseError> {
        let curve = JwkCurve::try_from(jwa)?;
        check_binding(
            jwa,
            key.alg(),
            KeyRequirement {
                family: JWAFamily::Ecdsa,
                key_bits: key.curve().bits() as u64,
                min_bits: curve.bits() as u64,
            },
        )?;
        if key.curve() != curve {
            return Err(JoseError::configuration(format!(
                "{jwa} requires a {curve} key, got {}",
                key.curve()
            )));
        }
        Ok(Self { key, jwa, curve })
    }

    #[must_use]
    pub fn key(&self) -> &EcKey {
        &self.key
    }
}

impl SignatureAlgorithm for EcDsa {
    fn jwa(&self) -> JWA {
        self.jwa
    }

    fn key_id(&self) -> Option<&str> {
        self.key.kid()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, JoseError> {
        let der = self
            .key
            .private_key()
            .ok_or_else(|| missing_private_key(self.jwa))?;
        let algorithm: &'static EcdsaSigningAlgorithm = self.jwa.try_into()?;
        let key_pair = EcdsaKeyPair::from_private_key_der(algorithm, der)
            .or_jose(ErrorKind::Provider, "load EC private key")?;
        let signature = key_pair
            .sign(&SystemRandom::new(), message)
            .or_jose(ErrorKind::Provider, "ECDSA signing")?;
        ecdsa_signature_from_der(signature.as_ref(), self.curve.octet_len())
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, JoseError> {
        let Ok(der) = ecdsa_signature_to_der(signature, self.curve.octet_len()) else {
            return Ok(false);
        };
        let algorithm: &'static EcdsaVerificationAlgorithm = self.jwa.try_into()?;
        let public_key = UnparsedPublicKey::new(algorithm, self.key.point());
        Ok(public_key.verify(message, &der).is_ok())
    }
}
