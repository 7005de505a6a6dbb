//! Recognition of the DER key structures a PEM block may carry.

use crate::jose::{
    JoseError,
    constants::{
        BIT_STRING_NO_UNUSED_BITS, DER_TAG_BIT_STRING, DER_TAG_INTEGER,
        DER_TAG_OBJECT_IDENTIFIER, DER_TAG_OCTET_STRING, DER_TAG_SEQUENCE, OID_EC_PUBLIC_KEY,
        OID_RSA_ENCRYPTION,
    },
    der::DerCursor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A DER key structure, borrowed from the input.
pub(crate) enum KeyDocument<'a> {
    /// Complete PKCS#1 `RSAPrivateKey`.
    RsaPrivate(&'a [u8]),
    /// Complete PKCS#1 `RSAPublicKey`.
    RsaPublic(&'a [u8]),
    /// Complete RFC 5915 `ECPrivateKey`, with the curve OID of an enclosing
    /// PKCS#8 `AlgorithmIdentifier` if there was one.
    EcPrivate {
        der: &'a [u8],
        curve_oid: Option<&'a [u8]>,
    },
    /// Uncompressed point of an `id-ecPublicKey` `SubjectPublicKeyInfo`.
    EcPublic {
        curve_oid: &'a [u8],
        point: &'a [u8],
    },
}

impl<'a> KeyDocument<'a> {
    /// Identify the structure of `der`.
    ///
    /// ```text
    /// RSAPrivateKey        SEQUENCE { INTEGER version, INTEGER n, INTEGER e, INTEGER d, ... }
    /// RSAPublicKey         SEQUENCE { INTEGER n, INTEGER e }
    /// ECPrivateKey         SEQUENCE { INTEGER 1, OCTET STRING d, [0] ..., [1] ... }
    /// PrivateKeyInfo       SEQUENCE { INTEGER version, AlgorithmIdentifier, OCTET STRING key, ... }
    /// SubjectPublicKeyInfo SEQUENCE { AlgorithmIdentifier, BIT STRING key }
    /// ```
    pub(crate) fn identify(der: &'a [u8]) -> Result<Self, JoseError> {
        let (content, rest) = DerCursor::new(der).read(DER_TAG_SEQUENCE)?;
        rest.finish()?;
        let body = DerCursor::new(content);

        match body.peek_tag() {
            Some(DER_TAG_SEQUENCE) => Self::subject_public_key_info(body),
            Some(DER_TAG_INTEGER) => {
                let (_, after_first) = body.read_integer()?;
                match after_first.peek_tag() {
                    Some(DER_TAG_SEQUENCE) => Self::private_key_info(after_first),
                    Some(DER_TAG_OCTET_STRING) => Ok(Self::EcPrivate {
                        der,
                        curve_oid: None,
                    }),
                    Some(DER_TAG_INTEGER) => {
                        let (_, after_second) = after_first.read_integer()?;
                        if after_second.is_empty() {
                            Ok(Self::RsaPublic(der))
                        } else {
                            Ok(Self::RsaPrivate(der))
                        }
                    }
                    _ => Err(JoseError::malformed("unrecognized DER key structure")),
                }
            }
            _ => Err(JoseError::malformed("unrecognized DER key structure")),
        }
    }

    /// `true` for the private structures.
    pub(crate) fn is_private(self) -> bool {
        matches!(self, Self::RsaPrivate(_) | Self::EcPrivate { .. })
    }

    fn subject_public_key_info(body: DerCursor<'a>) -> Result<Self, JoseError> {
        let (algorithm, body) = body.read(DER_TAG_SEQUENCE)?;
        let (key, body) = body.read(DER_TAG_BIT_STRING)?;
        body.finish()?;

        let key = match key.split_first() {
            Some((&BIT_STRING_NO_UNUSED_BITS, key)) => key,
            _ => return Err(JoseError::malformed("public key BIT STRING has unused bits")),
        };

        let (oid, params) = read_algorithm_identifier(algorithm)?;
        if oid == OID_RSA_ENCRYPTION {
            Ok(Self::RsaPublic(key))
        } else if oid == OID_EC_PUBLIC_KEY {
            let curve_oid = params.ok_or_else(|| {
                JoseError::malformed("id-ecPublicKey without named curve parameter")
            })?;
            Ok(Self::EcPublic {
                curve_oid,
                point: key,
            })
        } else {
            Err(JoseError::configuration("unsupported public key algorithm"))
        }
    }

    fn private_key_info(body: DerCursor<'a>) -> Result<Self, JoseError> {
        let (algorithm, body) = body.read(DER_TAG_SEQUENCE)?;
        let (key, _attributes_and_public_key) = body.read(DER_TAG_OCTET_STRING)?;

        let (oid, params) = read_algorithm_identifier(algorithm)?;
        let document = if oid == OID_RSA_ENCRYPTION {
            Self::RsaPrivate(key)
        } else if oid == OID_EC_PUBLIC_KEY {
            Self::EcPrivate {
                der: key,
                curve_oid: params,
            }
        } else {
            return Err(JoseError::configuration("unsupported private key algorithm"));
        };
        tracing::trace!(der.len = key.len(), "unwrapped PKCS#8 private key");
        Ok(document)
    }
}

/// `AlgorithmIdentifier ::= SEQUENCE { OID, parameters }`, returns the OID and
/// the parameter OID if the parameters are one.
fn read_algorithm_identifier(content: &[u8]) -> Result<(&[u8], Option<&[u8]>), JoseError> {
    let (oid, rest) = DerCursor::new(content).read(DER_TAG_OBJECT_IDENTIFIER)?;
    let (params, _) = rest.read_optional(DER_TAG_OBJECT_IDENTIFIER)?;
    Ok((oid, params))
}
