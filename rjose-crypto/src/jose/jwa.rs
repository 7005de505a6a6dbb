use std::{fmt, ops::Deref, str::FromStr};

use aws_lc_rs::{
    digest::{self, SHA256, SHA384, SHA512, digest},
    hmac,
    signature::{
        ECDSA_P256_SHA256_ASN1_SIGNING, ECDSA_P256K1_SHA256_ASN1_SIGNING,
        ECDSA_P384_SHA384_ASN1_SIGNING, ECDSA_P521_SHA512_ASN1_SIGNING, EcdsaSigningAlgorithm,
        EcdsaVerificationAlgorithm,
    },
};
use serde::{Deserialize, Serialize};

use crate::jose::{
    JoseError, JwkCurve,
    constants::{DIGEST_INFO_SHA256, DIGEST_INFO_SHA384, DIGEST_INFO_SHA512},
};

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
/// [`JWA`] or JSON Web Algorithms as defined in [`rfc7518`]
///
/// Some algorithms are required to be implemented when supporting
/// JWA, while others are recommended or optional. `ES256K` comes from
/// [`rfc8812`] and `EdDSA` from [`rfc8037`].
///
/// [`rfc7518`]: https://datatracker.ietf.org/doc/html/rfc7518
/// [`rfc8812`]: https://datatracker.ietf.org/doc/html/rfc8812
/// [`rfc8037`]: https://datatracker.ietf.org/doc/html/rfc8037
pub enum JWA {
    /// HMAC using SHA-256 (Required)
    HS256,
    /// HMAC using SHA-384 (Optional)
    HS384,
    /// HMAC using SHA-512 (Optional)
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256 (Recommended)
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384 (Optional)
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512 (Optional)
    RS512,
    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256 (Optional)
    PS256,
    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384 (Optional)
    PS384,
    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512 (Optional)
    PS512,
    /// ECDSA using P-256 and SHA-256 (Recommended+)
    ES256,
    /// ECDSA using secp256k1 and SHA-256 (Optional)
    ES256K,
    /// ECDSA using P-384 and SHA-384 (Optional)
    ES384,
    /// ECDSA using P-521 and SHA-512 (Optional)
    ES512,
    /// Edwards-curve signatures, only Ed25519 is supported (Optional)
    #[serde(rename = "EdDSA")]
    EdDSA,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// The algorithm family a [`JWA`] belongs to, which decides the key type it binds to.
pub enum JWAFamily {
    /// `HS*`, symmetric `oct` keys
    Hmac,
    /// `RS*`, `RSA` keys
    Rsa,
    /// `PS*`, `RSA` keys
    RsaPss,
    /// `ES*`, `EC` keys
    Ecdsa,
    /// `EdDSA`, `OKP` keys
    EdDsa,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// Hash functions used by the supported algorithms.
pub enum HashAlg {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlg {
    /// Digest size in octets.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Hash `data`.
    #[must_use]
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        digest(self.digest_algorithm(), data).as_ref().to_vec()
    }

    pub(crate) fn digest_algorithm(self) -> &'static digest::Algorithm {
        match self {
            Self::Sha256 => &SHA256,
            Self::Sha384 => &SHA384,
            Self::Sha512 => &SHA512,
        }
    }

    pub(crate) fn hmac_algorithm(self) -> hmac::Algorithm {
        match self {
            Self::Sha256 => hmac::HMAC_SHA256,
            Self::Sha384 => hmac::HMAC_SHA384,
            Self::Sha512 => hmac::HMAC_SHA512,
        }
    }

    pub(crate) fn digest_info_prefix(self) -> &'static [u8] {
        match self {
            Self::Sha256 => DIGEST_INFO_SHA256,
            Self::Sha384 => DIGEST_INFO_SHA384,
            Self::Sha512 => DIGEST_INFO_SHA512,
        }
    }
}

impl JWA {
    /// All supported algorithms.
    pub const ALL: [Self; 14] = [
        Self::HS256,
        Self::HS384,
        Self::HS512,
        Self::RS256,
        Self::RS384,
        Self::RS512,
        Self::PS256,
        Self::PS384,
        Self::PS512,
        Self::ES256,
        Self::ES256K,
        Self::ES384,
        Self::ES512,
        Self::EdDSA,
    ];

    /// The identifier as used in the `alg` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::PS256 => "PS256",
            Self::PS384 => "PS384",
            Self::PS512 => "PS512",
            Self::ES256 => "ES256",
            Self::ES256K => "ES256K",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
            Self::EdDSA => "EdDSA",
        }
    }

    #[must_use]
    pub const fn family(self) -> JWAFamily {
        match self {
            Self::HS256 | Self::HS384 | Self::HS512 => JWAFamily::Hmac,
            Self::RS256 | Self::RS384 | Self::RS512 => JWAFamily::Rsa,
            Self::PS256 | Self::PS384 | Self::PS512 => JWAFamily::RsaPss,
            Self::ES256 | Self::ES256K | Self::ES384 | Self::ES512 => JWAFamily::Ecdsa,
            Self::EdDSA => JWAFamily::EdDsa,
        }
    }

    /// The hash function of this algorithm, `None` for `EdDSA` which hashes internally.
    #[must_use]
    pub const fn hash(self) -> Option<HashAlg> {
        match self {
            Self::HS256 | Self::RS256 | Self::PS256 | Self::ES256 | Self::ES256K => {
                Some(HashAlg::Sha256)
            }
            Self::HS384 | Self::RS384 | Self::PS384 | Self::ES384 => Some(HashAlg::Sha384),
            Self::HS512 | Self::RS512 | Self::PS512 | Self::ES512 => Some(HashAlg::Sha512),
            Self::EdDSA => None,
        }
    }

    /// The curve an `ES*` algorithm requires.
    #[must_use]
    pub const fn curve(self) -> Option<JwkCurve> {
        match self {
            Self::ES256 => Some(JwkCurve::P256),
            Self::ES256K => Some(JwkCurve::P256K),
            Self::ES384 => Some(JwkCurve::P384),
            Self::ES512 => Some(JwkCurve::P521),
            Self::HS256
            | Self::HS384
            | Self::HS512
            | Self::RS256
            | Self::RS384
            | Self::RS512
            | Self::PS256
            | Self::PS384
            | Self::PS512
            | Self::EdDSA => None,
        }
    }
}

impl fmt::Display for JWA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JWA {
    type Err = JoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| JoseError::configuration(format!("unsupported algorithm: {s:?}")))
    }
}

impl From<JwkCurve> for JWA {
    fn from(value: JwkCurve) -> Self {
        match value {
            JwkCurve::P256 => Self::ES256,
            JwkCurve::P256K => Self::ES256K,
            JwkCurve::P384 => Self::ES384,
            JwkCurve::P521 => Self::ES512,
        }
    }
}

impl TryFrom<JWA> for JwkCurve {
    type Error = JoseError;

    fn try_from(value: JWA) -> Result<Self, Self::Error> {
        value.curve().ok_or_else(|| {
            JoseError::configuration(format!("{value} cannot be converted to elliptic curve"))
        })
    }
}

impl TryFrom<JWA> for &'static EcdsaSigningAlgorithm {
    type Error = JoseError;

    fn try_from(value: JWA) -> Result<Self, Self::Error> {
        match JwkCurve::try_from(value)? {
            JwkCurve::P256 => Ok(&ECDSA_P256_SHA256_ASN1_SIGNING),
            JwkCurve::P256K => Ok(&ECDSA_P256K1_SHA256_ASN1_SIGNING),
            JwkCurve::P384 => Ok(&ECDSA_P384_SHA384_ASN1_SIGNING),
            JwkCurve::P521 => Ok(&ECDSA_P521_SHA512_ASN1_SIGNING),
        }
    }
}

impl TryFrom<JWA> for &'static EcdsaVerificationAlgorithm {
    type Error = JoseError;

    fn try_from(value: JWA) -> Result<Self, Self::Error> {
        let signing_algo: &'static EcdsaSigningAlgorithm = value.try_into()?;
        Ok(signing_algo.deref())
    }
}
