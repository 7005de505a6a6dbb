pub(crate) use der_encoding_tags::*;
pub(crate) use ec_key_templates::*;
pub(crate) use object_identifiers::*;
pub(crate) use pkcs1_digest_info::*;

mod der_encoding_tags {
    /// Identifier tag for a DER encoded integer.
    /// Defined in [ITU X.680](https://www.itu.int/ITU-T/studygroups/com17/languages/X.680-0207.pdf).
    pub(crate) const DER_TAG_INTEGER: u8 = 0x02;
    /// Identifier tag for a DER encoded bit string.
    /// Defined in [ITU X.680](https://www.itu.int/ITU-T/studygroups/com17/languages/X.680-0207.pdf).
    pub(crate) const DER_TAG_BIT_STRING: u8 = 0x03;
    /// Identifier tag for a DER encoded octet string.
    pub(crate) const DER_TAG_OCTET_STRING: u8 = 0x04;
    /// Identifier tag for a DER encoded object identifier.
    pub(crate) const DER_TAG_OBJECT_IDENTIFIER: u8 = 0x06;
    /// Identifier tag for a DER encoded sequence, constructed bit set.
    /// Defined in [ITU X.680](https://www.itu.int/ITU-T/studygroups/com17/languages/X.680-0207.pdf).
    pub(crate) const DER_TAG_SEQUENCE: u8 = 0x30;
    /// Context specific, constructed tag `[0]`.
    pub(crate) const DER_TAG_CONTEXT_0: u8 = 0xa0;
    /// Context specific, constructed tag `[1]`.
    pub(crate) const DER_TAG_CONTEXT_1: u8 = 0xa1;
    /// Maximum length of a DER encoded length in short form.
    /// Defined in [ITU X.690](https://www.itu.int/ITU-T/studygroups/com17/languages/X.690-0207.pdf).
    pub(crate) const DER_LENGTH_SHORT_FORM_MAX: usize = 127;
    /// Marker bit of the long form length encoding, the low bits hold the octet count.
    pub(crate) const DER_LENGTH_LONG_FORM: u8 = 0x80;
    /// Maximum number of length octets accepted by the reader.
    pub(crate) const DER_LENGTH_MAX_OCTETS: usize = 4;
    /// Octet that indicates that no unused bits are present in a bit string.
    /// Defined in section 8.6 of [ITU X.690](https://www.itu.int/ITU-T/studygroups/com17/languages/X.690-0207.pdf).
    pub(crate) const BIT_STRING_NO_UNUSED_BITS: u8 = 0x00;
    /// High bit of the first content octet of an INTEGER, set means negative.
    pub(crate) const INTEGER_SIGN_BIT_MASK: u8 = 0x80;
}

/// Object identifier content octets (without tag and length).
mod object_identifiers {
    /// `1.2.840.113549.1.1.1`, rsaEncryption, appendix C of [RFC 8017](https://datatracker.ietf.org/doc/rfc8017/)
    pub(crate) const OID_RSA_ENCRYPTION: &[u8] =
        &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01];
    /// `1.2.840.10045.2.1`, id-ecPublicKey, [RFC 5480](https://datatracker.ietf.org/doc/rfc5480/)
    pub(crate) const OID_EC_PUBLIC_KEY: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01];
    /// `1.2.840.10045.3.1.7`, prime256v1
    pub(crate) const OID_CURVE_P256: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07];
    /// `1.3.132.0.10`, secp256k1
    pub(crate) const OID_CURVE_P256K: &[u8] = &[0x2b, 0x81, 0x04, 0x00, 0x0a];
    /// `1.3.132.0.34`, secp384r1
    pub(crate) const OID_CURVE_P384: &[u8] = &[0x2b, 0x81, 0x04, 0x00, 0x22];
    /// `1.3.132.0.35`, secp521r1
    pub(crate) const OID_CURVE_P521: &[u8] = &[0x2b, 0x81, 0x04, 0x00, 0x23];
}

/// Byte templates for the elliptic curve key structures of the four supported curves.
///
/// A public key is `SPKI_* || point` where point is the uncompressed
/// `0x04 || x || y` encoding, which fills the trailing BIT STRING (RFC 5480).
///
/// A private key is `PRIVATE_*_PREFIX || d || PRIVATE_*_SUFFIX || point`, the
/// `ECPrivateKey` structure of [RFC 5915](https://datatracker.ietf.org/doc/rfc5915/):
///
/// ```text
/// ECPrivateKey ::= SEQUENCE {
///     version        INTEGER { ecPrivkeyVer1(1) },
///     privateKey     OCTET STRING,
///     parameters [0] ECParameters {{ NamedCurve }},
///     publicKey  [1] BIT STRING
/// }
/// ```
///
/// All lengths inside the templates are fixed because `d`, `x` and `y`
/// are always padded to the curve's octet size.
mod ec_key_templates {
    pub(crate) const SPKI_P256: &[u8] = &[
        0x30, 0x59, // SEQUENCE, 89
        0x30, 0x13, // SEQUENCE, 19
        0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, // id-ecPublicKey
        0x06, 0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, // prime256v1
        0x03, 0x42, 0x00, // BIT STRING, 66
    ];

    pub(crate) const SPKI_P256K: &[u8] = &[
        0x30, 0x56, // SEQUENCE, 86
        0x30, 0x10, // SEQUENCE, 16
        0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, // id-ecPublicKey
        0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x0a, // secp256k1
        0x03, 0x42, 0x00, // BIT STRING, 66
    ];

    pub(crate) const SPKI_P384: &[u8] = &[
        0x30, 0x76, // SEQUENCE, 118
        0x30, 0x10, // SEQUENCE, 16
        0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, // id-ecPublicKey
        0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x22, // secp384r1
        0x03, 0x62, 0x00, // BIT STRING, 98
    ];

    pub(crate) const SPKI_P521: &[u8] = &[
        0x30, 0x81, 0x9b, // SEQUENCE, 155
        0x30, 0x10, // SEQUENCE, 16
        0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, // id-ecPublicKey
        0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x23, // secp521r1
        0x03, 0x81, 0x86, 0x00, // BIT STRING, 134
    ];

    pub(crate) const PRIVATE_P256_PREFIX: &[u8] = &[
        0x30, 0x77, // SEQUENCE, 119
        0x02, 0x01, 0x01, // version 1
        0x04, 0x20, // OCTET STRING, 32
    ];

    pub(crate) const PRIVATE_P256_SUFFIX: &[u8] = &[
        0xa0, 0x0a, // [0], 10
        0x06, 0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, // prime256v1
        0xa1, 0x44, // [1], 68
        0x03, 0x42, 0x00, // BIT STRING, 66
    ];

    pub(crate) const PRIVATE_P256K_PREFIX: &[u8] = &[
        0x30, 0x74, // SEQUENCE, 116
        0x02, 0x01, 0x01, // version 1
        0x04, 0x20, // OCTET STRING, 32
    ];

    pub(crate) const PRIVATE_P256K_SUFFIX: &[u8] = &[
        0xa0, 0x07, // [0], 7
        0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x0a, // secp256k1
        0xa1, 0x44, // [1], 68
        0x03, 0x42, 0x00, // BIT STRING, 66
    ];

    pub(crate) const PRIVATE_P384_PREFIX: &[u8] = &[
        0x30, 0x81, 0xa4, // SEQUENCE, 164
        0x02, 0x01, 0x01, // version 1
        0x04, 0x30, // OCTET STRING, 48
    ];

    pub(crate) const PRIVATE_P384_SUFFIX: &[u8] = &[
        0xa0, 0x07, // [0], 7
        0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x22, // secp384r1
        0xa1, 0x64, // [1], 100
        0x03, 0x62, 0x00, // BIT STRING, 98
    ];

    pub(crate) const PRIVATE_P521_PREFIX: &[u8] = &[
        0x30, 0x81, 0xdc, // SEQUENCE, 220
        0x02, 0x01, 0x01, // version 1
        0x04, 0x42, // OCTET STRING, 66
    ];

    pub(crate) const PRIVATE_P521_SUFFIX: &[u8] = &[
        0xa0, 0x07, // [0], 7
        0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x23, // secp521r1
        0xa1, 0x81, 0x89, // [1], 137
        0x03, 0x81, 0x86, 0x00, // BIT STRING, 134
    ];

    /// Leading octet of an uncompressed elliptic curve point (SEC 1, section 2.3.3).
    pub(crate) const EC_POINT_UNCOMPRESSED: u8 = 0x04;
}

/// DER encoded `DigestInfo` prefixes for EMSA-PKCS1-v1_5, section 9.2 of
/// [RFC 8017](https://datatracker.ietf.org/doc/rfc8017/), note 1.
mod pkcs1_digest_info {
    pub(crate) const DIGEST_INFO_SHA256: &[u8] = &[
        0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01,
        0x05, 0x00, 0x04, 0x20,
    ];
    pub(crate) const DIGEST_INFO_SHA384: &[u8] = &[
        0x30, 0x41, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x02,
        0x05, 0x00, 0x04, 0x30,
    ];
    pub(crate) const DIGEST_INFO_SHA512: &[u8] = &[
        0x30, 0x51, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x03,
        0x05, 0x00, 0x04, 0x40,
    ];
}

/// Trailer field of an EMSA-PSS encoded message.
pub(crate) const PSS_TRAILER: u8 = 0xbc;

/// Minimum RSA modulus size in bits for both PKCS#1 v1.5 and PSS.
pub(crate) const RSA_MIN_MODULUS_BITS: u64 = 2048;
