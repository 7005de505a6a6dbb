use std::fmt;

use aws_lc_rs::{
    rand::{SecureRandom as _, SystemRandom},
    signature::{ED25519_PUBLIC_KEY_LEN, Ed25519KeyPair, KeyPair as _},
};
use serde_json::{Map, Value};
use zeroize::Zeroizing;

use super::{
    KeyMetadata, b64_param, check_kty, impl_key_metadata, insert_b64, jwk_object,
    required_b64_param,
};
use crate::jose::{ErrorKind, JoseError, error::JoseResultExt as _};

/// The only supported `OKP` subtype.
const ED25519: &str = "Ed25519";

const SEED_LEN: usize = 32;

#[derive(Clone, PartialEq, Eq)]
/// Octet key pair, `kty` `OKP`, as defined in [`rfc8037`].
///
/// Only the `Ed25519` subtype is supported. The private material is the
/// 64 octet `seed ‖ public key` concatenation signing primitives expect.
///
/// [`rfc8037`]: https://datatracker.ietf.org/doc/html/rfc8037
pub struct OkpKey {
    x: Vec<u8>,
    secret: Option<Zeroizing<Vec<u8>>>,
    metadata: KeyMetadata,
}

impl_key_metadata!(OkpKey);

impl OkpKey {
    pub const KTY: &'static str = "OKP";

    /// Build a key from the public key `x` and optional seed `d`.
    pub fn new(x: &[u8], d: Option<&[u8]>) -> Result<Self, JoseError> {
        if x.len() != ED25519_PUBLIC_KEY_LEN {
            return Err(JoseError::malformed(format!(
                "Ed25519 public key must be {ED25519_PUBLIC_KEY_LEN} octets, got {}",
                x.len()
            )));
        }
        let secret = match d {
            Some(d) if d.len() == SEED_LEN => {
                let mut secret = Zeroizing::new(Vec::with_capacity(SEED_LEN + x.len()));
                secret.extend_from_slice(d);
                secret.extend_from_slice(x);
                Some(secret)
            }
            Some(d) => {
                return Err(JoseError::malformed(format!(
                    "Ed25519 private key must be {SEED_LEN} octets, got {}",
                    d.len()
                )));
            }
            None => None,
        };
        Ok(Self {
            x: x.to_vec(),
            secret,
            metadata: KeyMetadata::default(),
        })
    }

    pub fn parse(jwk: &Map<String, Value>) -> Result<Self, JoseError> {
        check_kty(jwk, Self::KTY)?;
        match jwk.get("crv") {
            Some(Value::String(crv)) if crv == ED25519 => {}
            Some(Value::String(crv)) => {
                return Err(JoseError::configuration(format!(
                    "unsupported OKP subtype {crv:?}"
                )));
            }
            Some(_) => return Err(JoseError::malformed("JWK crv must be a string")),
            None => return Err(JoseError::malformed("JWK is missing required parameter crv")),
        }
        let x = required_b64_param(jwk, "x")?;
        let d = b64_param(jwk, "d")?.map(Zeroizing::new);

        let mut key = Self::new(&x, d.as_deref().map(Vec::as_slice))?;
        key.metadata = KeyMetadata::parse(jwk)?;
        tracing::debug!(
            jwk.kty = Self::KTY,
            jwk.crv = ED25519,
            jwk.private = key.secret.is_some(),
            "parsed JWK"
        );
        Ok(key)
    }

    /// Generate a new Ed25519 key from a random seed.
    pub fn generate() -> Result<Self, JoseError> {
        let mut seed = Zeroizing::new([0u8; SEED_LEN]);
        SystemRandom::new()
            .fill(&mut seed[..])
            .or_jose(ErrorKind::Provider, "fill Ed25519 seed")?;
        let key_pair = Ed25519KeyPair::from_seed_unchecked(&seed[..])
            .or_jose(ErrorKind::Provider, "derive Ed25519 key pair")?;
        Self::new(key_pair.public_key().as_ref(), Some(&seed[..]))
    }

    /// The 32 octet seed `d`.
    pub(crate) fn seed(&self) -> Option<&[u8]> {
        self.secret.as_ref().map(|secret| &secret[..SEED_LEN])
    }

    /// `d ‖ x`, 64 octets.
    #[must_use]
    pub fn private_key(&self) -> Option<&[u8]> {
        self.secret.as_deref().map(Vec::as_slice)
    }

    /// `x`, 32 octets.
    #[must_use]
    pub fn public_key(&self) -> &[u8] {
        &self.x
    }

    pub fn to_private_jwk(
        &self,
        kid: Option<&str>,
        key_use: Option<&str>,
    ) -> Result<Map<String, Value>, JoseError> {
        let seed = self
            .seed()
            .ok_or_else(|| JoseError::configuration("OKP key has no private part"))?;
        let mut jwk = self.to_public_jwk(kid, key_use);
        insert_b64(&mut jwk, "d", seed);
        Ok(jwk)
    }

    #[must_use]
    pub fn to_public_jwk(&self, kid: Option<&str>, key_use: Option<&str>) -> Map<String, Value> {
        let mut jwk = jwk_object(Self::KTY, Some(ED25519));
        self.metadata.write_into(&mut jwk, kid, key_use);
        insert_b64(&mut jwk, "x", &self.x);
        jwk
    }
}

impl fmt::Debug for OkpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OkpKey")
            .field("x", &self.x)
            .field("private", &self.secret.is_some())
            .field("metadata", &self.metadata)
            .finish()
    }
}
