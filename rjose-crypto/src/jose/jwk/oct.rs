use std::fmt;

use aws_lc_rs::rand::{SecureRandom as _, SystemRandom};
use serde_json::{Map, Value};
use zeroize::Zeroizing;

use super::{KeyMetadata, check_kty, impl_key_metadata, insert_b64, jwk_object, required_b64_param};
use crate::jose::{ErrorKind, JoseError, error::JoseResultExt as _};

#[derive(Clone, PartialEq, Eq)]
/// Symmetric key, `kty` `oct`.
///
/// `k` serves as both private and public material.
pub struct OctKey {
    k: Zeroizing<Vec<u8>>,
    metadata: KeyMetadata,
}

impl_key_metadata!(OctKey);

impl OctKey {
    pub const KTY: &'static str = "oct";

    /// Octets of key material created by [`OctKey::generate`].
    pub const GENERATED_LEN: usize = 64;

    #[must_use]
    pub fn new(k: impl Into<Vec<u8>>) -> Self {
        Self {
            k: Zeroizing::new(k.into()),
            metadata: KeyMetadata::default(),
        }
    }

    pub fn parse(jwk: &Map<String, Value>) -> Result<Self, JoseError> {
        check_kty(jwk, Self::KTY)?;
        let k = required_b64_param(jwk, "k")?;
        let metadata = KeyMetadata::parse(jwk)?;
        tracing::debug!(jwk.kty = Self::KTY, jwk.bits = k.len() * 8, "parsed JWK");
        Ok(Self {
            k: Zeroizing::new(k),
            metadata,
        })
    }

    /// Fresh random key material from the system RNG.
    pub fn generate() -> Result<Self, JoseError> {
        let mut k = Zeroizing::new(vec![0; Self::GENERATED_LEN]);
        SystemRandom::new()
            .fill(&mut k)
            .or_jose(ErrorKind::Provider, "fill symmetric key")?;
        Ok(Self {
            k,
            metadata: KeyMetadata::default(),
        })
    }

    /// Size of the key in bits.
    #[must_use]
    pub fn bits(&self) -> usize {
        self.k.len() * 8
    }

    #[must_use]
    pub fn private_key(&self) -> Option<&[u8]> {
        Some(&self.k)
    }

    #[must_use]
    pub fn public_key(&self) -> &[u8] {
        &self.k
    }

    #[must_use]
    pub fn to_private_jwk(&self, kid: Option<&str>, key_use: Option<&str>) -> Map<String, Value> {
        let mut jwk = jwk_object(Self::KTY, None);
        self.metadata.write_into(&mut jwk, kid, key_use);
        insert_b64(&mut jwk, "k", &self.k);
        jwk
    }

    /// Same as [`OctKey::to_private_jwk`], a symmetric key has no public half.
    #[must_use]
    pub fn to_public_jwk(&self, kid: Option<&str>, key_use: Option<&str>) -> Map<String, Value> {
        self.to_private_jwk(kid, key_use)
    }
}

impl fmt::Debug for OctKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OctKey")
            .field("bits", &self.bits())
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
