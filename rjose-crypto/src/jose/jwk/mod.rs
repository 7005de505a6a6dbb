//! [`Jwk`] or JSON Web Key as defined in [`rfc7517`] and [`rfc8037`].
//!
//! Every key variant knows its own JSON parameter set and the opaque binary
//! materials the signature algorithms consume:
//!
//! | variant | `kty` | private material | public material |
//! |-|-|-|-|
//! | [`RsaKey`] | `RSA` | PKCS#1 `RSAPrivateKey` DER | PKCS#1 `RSAPublicKey` DER |
//! | [`EcKey`] | `EC` | RFC 5915 `ECPrivateKey` DER | `SubjectPublicKeyInfo` DER |
//! | [`OctKey`] | `oct` | `k` | `k` |
//! | [`OkpKey`] | `OKP` | `d ‖ x` | `x` |
//!
//! [`rfc7517`]: https://datatracker.ietf.org/doc/html/rfc7517
//! [`rfc8037`]: https://datatracker.ietf.org/doc/html/rfc8037

use serde_json::{Map, Value};

use super::{
    HashAlg, JoseError,
    codec::{base64url_decode, base64url_encode, json_decode, json_encode},
};

/// Generates the metadata accessors and `with_*`/`set_*` pairs of a key variant.
macro_rules! impl_key_metadata {
    ($key:ty) => {
        impl $key {
            /// The algorithm this key declares it is intended for, if any.
            #[must_use]
            pub fn alg(&self) -> Option<&str> {
                self.metadata.alg.as_deref()
            }

            /// The key identifier, if any.
            #[must_use]
            pub fn kid(&self) -> Option<&str> {
                self.metadata.kid.as_deref()
            }

            /// The intended use (`sig`, `enc`), if any.
            #[must_use]
            pub fn key_use(&self) -> Option<&str> {
                self.metadata.key_use.as_deref()
            }

            /// Declare the algorithm this key is intended for.
            #[must_use]
            pub fn with_alg(mut self, alg: impl Into<String>) -> Self {
                self.metadata.alg = Some(alg.into());
                self
            }

            /// Declare the algorithm this key is intended for.
            pub fn set_alg(&mut self, alg: impl Into<String>) -> &mut Self {
                self.metadata.alg = Some(alg.into());
                self
            }

            /// Attach a key identifier.
            #[must_use]
            pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
                self.metadata.kid = Some(kid.into());
                self
            }

            /// Attach a key identifier.
            pub fn set_kid(&mut self, kid: impl Into<String>) -> &mut Self {
                self.metadata.kid = Some(kid.into());
                self
            }

            /// Declare the intended use of this key.
            #[must_use]
            pub fn with_use(mut self, key_use: impl Into<String>) -> Self {
                self.metadata.key_use = Some(key_use.into());
                self
            }

            /// Declare the intended use of this key.
            pub fn set_use(&mut self, key_use: impl Into<String>) -> &mut Self {
                self.metadata.key_use = Some(key_use.into());
                self
            }

            /// Parse a key from JWK JSON text.
            pub fn from_json(json: &str) -> Result<Self, $crate::jose::JoseError> {
                Self::parse(&$crate::jose::codec::json_decode(json)?)
            }
        }
    };
}
pub(crate) use impl_key_metadata;

mod document;

mod ec;
pub use ec::{EcKey, JwkCurve};

mod oct;
pub use oct::OctKey;

mod okp;
pub use okp::OkpKey;

mod rsa;
pub use rsa::RsaKey;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Informational JWK members shared by all key variants.
pub(crate) struct KeyMetadata {
    pub(crate) alg: Option<String>,
    pub(crate) kid: Option<String>,
    pub(crate) key_use: Option<String>,
}

impl KeyMetadata {
    pub(crate) fn parse(jwk: &Map<String, Value>) -> Result<Self, JoseError> {
        let kid = match jwk.get("kid") {
            None | Some(Value::Null) => None,
            Some(Value::String(kid)) => Some(kid.clone()),
            Some(Value::Number(kid)) => Some(kid.to_string()),
            Some(_) => return Err(JoseError::malformed("JWK kid must be a string")),
        };
        Ok(Self {
            alg: optional_string(jwk, "alg")?,
            kid,
            key_use: optional_string(jwk, "use")?,
        })
    }

    /// Write `kid`, `use` and `alg` into `jwk`, explicit arguments take precedence.
    pub(crate) fn write_into(
        &self,
        jwk: &mut Map<String, Value>,
        kid: Option<&str>,
        key_use: Option<&str>,
    ) {
        if let Some(kid) = kid.or(self.kid.as_deref()) {
            jwk.insert("kid".to_owned(), Value::String(kid.trim().to_owned()));
        }
        if let Some(key_use) = key_use.or(self.key_use.as_deref()) {
            jwk.insert("use".to_owned(), Value::String(key_use.trim().to_owned()));
        }
        if let Some(alg) = &self.alg {
            jwk.insert("alg".to_owned(), Value::String(alg.clone()));
        }
    }
}

fn optional_string(jwk: &Map<String, Value>, name: &str) -> Result<Option<String>, JoseError> {
    match jwk.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(JoseError::malformed(format!("JWK {name} must be a string"))),
    }
}

/// Fail unless the `kty` member equals `expected`.
pub(crate) fn check_kty(jwk: &Map<String, Value>, expected: &str) -> Result<(), JoseError> {
    match jwk.get("kty") {
        Some(Value::String(kty)) if kty == expected => Ok(()),
        Some(Value::String(kty)) => Err(JoseError::configuration(format!(
            "JWK kty {kty:?} does not match {expected:?}"
        ))),
        Some(_) => Err(JoseError::malformed("JWK kty must be a string")),
        None => Err(JoseError::malformed("JWK without kty")),
    }
}

/// Decode an optional base64url member.
pub(crate) fn b64_param(jwk: &Map<String, Value>, name: &str) -> Result<Option<Vec<u8>>, JoseError> {
    match jwk.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => base64url_decode(value).map(Some),
        Some(_) => Err(JoseError::malformed(format!(
            "JWK parameter {name} must be a base64url string"
        ))),
    }
}

/// Decode a required base64url member.
pub(crate) fn required_b64_param(
    jwk: &Map<String, Value>,
    name: &str,
) -> Result<Vec<u8>, JoseError> {
    b64_param(jwk, name)?
        .ok_or_else(|| JoseError::malformed(format!("JWK is missing required parameter {name}")))
}

/// Start a JWK object with `kty` (and `crv`) in canonical position.
pub(crate) fn jwk_object(kty: &str, crv: Option<&str>) -> Map<String, Value> {
    let mut jwk = Map::new();
    jwk.insert("kty".to_owned(), Value::String(kty.to_owned()));
    if let Some(crv) = crv {
        jwk.insert("crv".to_owned(), Value::String(crv.to_owned()));
    }
    jwk
}

pub(crate) fn insert_b64(jwk: &mut Map<String, Value>, name: &str, value: &[u8]) {
    jwk.insert(name.to_owned(), Value::String(base64url_encode(value)));
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A key of any of the supported key types.
pub enum Jwk {
    Rsa(RsaKey),
    Ec(EcKey),
    Oct(OctKey),
    Okp(OkpKey),
}

impl Jwk {
    /// Parse a JWK object, dispatching on its `kty`.
    pub fn parse(jwk: &Map<String, Value>) -> Result<Self, JoseError> {
        match jwk.get("kty") {
            Some(Value::String(kty)) => match kty.as_str() {
                "RSA" => RsaKey::parse(jwk).map(Self::Rsa),
                "EC" => EcKey::parse(jwk).map(Self::Ec),
                "oct" => OctKey::parse(jwk).map(Self::Oct),
                "OKP" => OkpKey::parse(jwk).map(Self::Okp),
                other => Err(JoseError::configuration(format!(
                    "unsupported JWK kty {other:?}"
                ))),
            },
            Some(_) => Err(JoseError::malformed("JWK kty must be a string")),
            None => Err(JoseError::malformed("JWK without kty")),
        }
    }

    /// Parse a single JWK from JSON text.
    pub fn from_json(json: &str) -> Result<Self, JoseError> {
        Self::parse(&json_decode(json)?)
    }

    /// Parse JSON text holding either a single JWK or a JWK set.
    pub fn parse_any(json: &str) -> Result<ParsedJwk, JoseError> {
        let object = json_decode(json)?;
        if object.contains_key("keys") {
            JwkSet::parse_object(&object).map(ParsedJwk::Set)
        } else {
            Self::parse(&object).map(ParsedJwk::Single)
        }
    }

    /// The `kty` discriminator of this key.
    #[must_use]
    pub fn kty(&self) -> &'static str {
        match self {
            Self::Rsa(_) => RsaKey::KTY,
            Self::Ec(_) => EcKey::KTY,
            Self::Oct(_) => OctKey::KTY,
            Self::Okp(_) => OkpKey::KTY,
        }
    }

    #[must_use]
    pub fn alg(&self) -> Option<&str> {
        match self {
            Self::Rsa(key) => key.alg(),
            Self::Ec(key) => key.alg(),
            Self::Oct(key) => key.alg(),
            Self::Okp(key) => key.alg(),
        }
    }

    #[must_use]
    pub fn kid(&self) -> Option<&str> {
        match self {
            Self::Rsa(key) => key.kid(),
            Self::Ec(key) => key.kid(),
            Self::Oct(key) => key.kid(),
            Self::Okp(key) => key.kid(),
        }
    }

    #[must_use]
    pub fn key_use(&self) -> Option<&str> {
        match self {
            Self::Rsa(key) => key.key_use(),
            Self::Ec(key) => key.key_use(),
            Self::Oct(key) => key.key_use(),
            Self::Okp(key) => key.key_use(),
        }
    }

    /// Private key material, see the module documentation for its encoding.
    #[must_use]
    pub fn private_key(&self) -> Option<&[u8]> {
        match self {
            Self::Rsa(key) => key.private_key(),
            Self::Ec(key) => key.private_key(),
            Self::Oct(key) => key.private_key(),
            Self::Okp(key) => key.private_key(),
        }
    }

    /// Public key material, see the module documentation for its encoding.
    #[must_use]
    pub fn public_key(&self) -> &[u8] {
        match self {
            Self::Rsa(key) => key.public_key(),
            Self::Ec(key) => key.public_key(),
            Self::Oct(key) => key.public_key(),
            Self::Okp(key) => key.public_key(),
        }
    }

    pub fn to_private_jwk(
        &self,
        kid: Option<&str>,
        key_use: Option<&str>,
    ) -> Result<Map<String, Value>, JoseError> {
        match self {
            Self::Rsa(key) => key.to_private_jwk(kid, key_use),
            Self::Ec(key) => key.to_private_jwk(kid, key_use),
            Self::Oct(key) => Ok(key.to_private_jwk(kid, key_use)),
            Self::Okp(key) => key.to_private_jwk(kid, key_use),
        }
    }

    #[must_use]
    pub fn to_public_jwk(&self, kid: Option<&str>, key_use: Option<&str>) -> Map<String, Value> {
        match self {
            Self::Rsa(key) => key.to_public_jwk(kid, key_use),
            Self::Ec(key) => key.to_public_jwk(kid, key_use),
            Self::Oct(key) => key.to_public_jwk(kid, key_use),
            Self::Okp(key) => key.to_public_jwk(kid, key_use),
        }
    }

    /// JWK thumbprint as defined in [`rfc7638`], using SHA-256.
    ///
    /// [`rfc7638`]: https://datatracker.ietf.org/doc/html/rfc7638
    pub fn thumbprint_sha256(&self) -> Result<String, JoseError> {
        // required members only, in lexicographic order
        let public = self.to_public_jwk(None, None);
        let members: &[&str] = match self {
            Self::Rsa(_) => &["e", "kty", "n"],
            Self::Ec(_) => &["crv", "kty", "x", "y"],
            Self::Oct(_) => &["k", "kty"],
            Self::Okp(_) => &["crv", "kty", "x"],
        };
        let mut canonical = Map::new();
        for member in members {
            if let Some(value) = public.get(*member) {
                canonical.insert((*member).to_owned(), value.clone());
            }
        }
        let json = json_encode(&canonical)?;
        Ok(base64url_encode(HashAlg::Sha256.digest(json.as_bytes())))
    }
}

impl From<RsaKey> for Jwk {
    fn from(key: RsaKey) -> Self {
        Self::Rsa(key)
    }
}

impl From<EcKey> for Jwk {
    fn from(key: EcKey) -> Self {
        Self::Ec(key)
    }
}

impl From<OctKey> for Jwk {
    fn from(key: OctKey) -> Self {
        Self::Oct(key)
    }
}

impl From<OkpKey> for Jwk {
    fn from(key: OkpKey) -> Self {
        Self::Okp(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of [`Jwk::parse_any`].
pub enum ParsedJwk {
    Single(Jwk),
    Set(JwkSet),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A JWK set, `{"keys":[...]}`.
pub struct JwkSet {
    keys: Vec<Jwk>,
}

impl JwkSet {
    /// Parse a JWK set, a single member that fails to parse fails the whole set.
    pub fn parse(json: &str) -> Result<Self, JoseError> {
        Self::parse_object(&json_decode(json)?)
    }

    fn parse_object(object: &Map<String, Value>) -> Result<Self, JoseError> {
        let Some(Value::Array(members)) = object.get("keys") else {
            return Err(JoseError::malformed("JWK set must have a keys array"));
        };
        let keys = members
            .iter()
            .enumerate()
            .map(|(index, member)| match member {
                Value::Object(jwk) => Jwk::parse(jwk),
                _ => Err(JoseError::malformed(format!(
                    "JWK set member {index} is not an object"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(jwk.count = keys.len(), "parsed JWK set");
        Ok(Self { keys })
    }

    #[must_use]
    pub fn keys(&self) -> &[Jwk] {
        &self.keys
    }

    /// First key carrying the given `kid`.
    #[must_use]
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|key| key.kid() == Some(kid))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl IntoIterator for JwkSet {
    type Item = Jwk;
    type IntoIter = std::vec::IntoIter<Jwk>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}

impl<'a> IntoIterator for &'a JwkSet {
    type Item = &'a Jwk;
    type IntoIter = std::slice::Iter<'a, Jwk>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
