use aws_lc_rs::hmac;

use super::{KeyRequirement, SignatureAlgorithm, check_binding, missing_private_key};
use crate::jose::{JWA, JWAFamily, JoseError, OctKey};

#[derive(Debug, Clone)]
/// `HS256`, `HS384` and `HS512`.
///
/// The key must hold at least as many bits as the digest produces.
pub struct Hmac {
    key: OctKey,
    jwa: JWA,
}

impl Hmac {
    pub fn new(key: OctKey, jwa: JWA) -> Result<Self, JoseError> {
        let digest_bits = jwa.hash().map_or(0, |hash| hash.output_len() * 8);
        // the private and public material of a symmetric key are the same octets
        let key_bits = key.private_key().unwrap_or(key.public_key()).len() * 8;
        check_binding(
            jwa,
            key.alg(),
            KeyRequirement {
                family: JWAFamily::Hmac,
                key_bits: key_bits as u64,
                min_bits: digest_bits as u64,
            },
        )?;
        Ok(Self { key, jwa })
    }

    #[must_use]
    pub fn key(&self) -> &OctKey {
        &self.key
    }

    fn provider_key(&self) -> Result<hmac::Key, JoseError> {
        let hash = self
            .jwa
            .hash()
            .ok_or_else(|| JoseError::configuration(format!("{} has no digest", self.jwa)))?;
        let secret = self
            .key
            .private_key()
            .ok_or_else(|| missing_private_key(self.jwa))?;
        Ok(hmac::Key::new(hash.hmac_algorithm(), secret))
    }
}

impl SignatureAlgorithm for Hmac {
    fn jwa(&self) -> JWA {
        self.jwa
    }

    fn key_id(&self) -> Option<&str> {
        self.key.kid()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, JoseError> {
        let key = self.provider_key()?;
        Ok(hmac::sign(&key, message).as_ref().to_vec())
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, JoseError> {
        let key = self.provider_key()?;
        // constant time comparison of the recomputed tag
        Ok(hmac::verify(&key, message, signature).is_ok())
    }
}
