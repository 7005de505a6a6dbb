use aws_lc_rs::signature::{ED25519, Ed25519KeyPair, UnparsedPublicKey};

use super::{KeyRequirement, SignatureAlgorithm, check_binding, missing_private_key};
use crate::jose::{ErrorKind, JWA, JWAFamily, JoseError, OkpKey, error::JoseResultExt as _};

const ED25519_BITS: u64 = 256;

#[derive(Debug, Clone)]
/// `EdDSA` over Ed25519.
pub struct EdDsa {
    key: OkpKey,
    jwa: JWA,
}

impl EdDsa {
    pub fn new(key: OkpKey, jwa: JWA) -> Result<Self, JoseError> {
        // OkpKey only ever holds Ed25519 material
        check_binding(
            jwa,
            key.alg(),
            KeyRequirement {
                family: JWAFamily::EdDsa,
                key_bits: ED25519_BITS,
                min_bits: ED25519_BITS,
            },
        )?;
        Ok(Self { key, jwa })
    }

    #[must_use]
    pub fn key(&self) -> &OkpKey {
        &self.key
    }
}

impl SignatureAlgorithm for EdDsa {
    fn jwa(&self) -> JWA {
        self.jwa
    }

    fn key_id(&self) -> Option<&str> {
        self.key.kid()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, JoseError> {
        let seed = self.key.seed().ok_or_else(|| missing_private_key(self.jwa))?;
        let key_pair = Ed25519KeyPair::from_seed_and_public_key(seed, self.key.public_key())
            .or_jose(ErrorKind::Configuration, "Ed25519 seed does not match public key")?;
        Ok(key_pair.sign(message).as_ref().to_vec())
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, JoseError> {
        let public_key = UnparsedPublicKey::new(&ED25519, self.key.public_key());
        Ok(public_key.verify(message, signature).is_ok())
    }
}
