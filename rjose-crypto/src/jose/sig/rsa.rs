use aws_lc_rs::{
    rand::SystemRandom,
    signature::{
        RSA_PKCS1_2048_8192_SHA256, RSA_PKCS1_2048_8192_SHA384,
        RSA_PKCS1_2048_8192_SHA512, RSA_PKCS1_SHA256, RSA_PKCS1_SHA384, RSA_PKCS1_SHA512,
        RsaEncoding, RsaKeyPair, RsaParameters, UnparsedPublicKey,
    },
};
use num_bigint::BigUint;
use zeroize::Zeroizing;

use super::{KeyRequirement, SignatureAlgorithm, check_binding, missing_private_key};
use crate::jose::{
    ErrorKind, HashAlg, JWA, JWAFamily, JoseError, RsaKey,
    codec::zero_pad,
    constants::RSA_MIN_MODULUS_BITS,
    error::JoseResultExt as _,
};

#[derive(Debug, Clone)]
/// `RS256`, `RS384` and `RS512`: RSASSA-PKCS1-v1_5.
///
/// A key with the full CRT set signs through the provider, a key with only
/// the private exponent signs through plain exponentiation of the
/// EMSA-PKCS1-v1_5 encoded message. Both produce the same signature.
pub struct Rsa {
    key: RsaKey,
    jwa: JWA,
    hash: HashAlg,
}

impl Rsa {
    pub fn new(key: RsaKey, jwa: JWA) -> Result<Self, JoseError> {
        let hash = bind_rsa_key(&key, jwa, JWAFamily::Rsa)?;
        Ok(Self { key, jwa, hash })
    }

    #[must_use]
    pub fn key(&self) -> &RsaKey {
        &self.key
    }

    fn provider_encoding(&self) -> &'static dyn RsaEncoding {
        match self.hash {
            HashAlg::Sha256 => &RSA_PKCS1_SHA256,
            HashAlg::Sha384 => &RSA_PKCS1_SHA384,
            HashAlg::Sha512 => &RSA_PKCS1_SHA512,
        }
    }

    fn provider_verification(&self) -> &'static RsaParameters {
        match self.hash {
            HashAlg::Sha256 => &RSA_PKCS1_2048_8192_SHA256,
            HashAlg::Sha384 => &RSA_PKCS1_2048_8192_SHA384,
            HashAlg::Sha512 => &RSA_PKCS1_2048_8192_SHA512,
        }
    }
}

impl SignatureAlgorithm for Rsa {
    fn jwa(&self) -> JWA {
        self.jwa
    }

    fn key_id(&self) -> Option<&str> {
        self.key.kid()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, JoseError> {
        if let Some(der) = self.key.private_key() {
            let key_pair =
                RsaKeyPair::from_der(der).or_jose(ErrorKind::Provider, "load RSA private key")?;
            let mut signature = vec![0; key_pair.public_modulus_len()];
            key_pair
                .sign(
                    self.provider_encoding(),
                    &SystemRandom::new(),
                    message,
                    &mut signature,
                )
                .or_jose(ErrorKind::Provider, "RSA PKCS#1 v1.5 signing")?;
            return Ok(signature);
        }

        let encoded = emsa_pkcs1_v1_5_encode(message, self.hash, self.key.modulus_len())?;
        rsa_private_operation(&self.key, self.jwa, &encoded)
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, JoseError> {
        let public_key = UnparsedPublicKey::new(self.provider_verification(), self.key.public_key());
        Ok(public_key.verify(message, signature).is_ok())
    }
}

/// Binding checks shared by `RS*` and `PS*`, returns the digest to use.
pub(super) fn bind_rsa_key(key: &RsaKey, jwa: JWA, family: JWAFamily) -> Result<HashAlg, JoseError> {
    check_binding(
        jwa,
        key.alg(),
        KeyRequirement {
            family,
            key_bits: key.modulus_bits(),
            min_bits: RSA_MIN_MODULUS_BITS,
        },
    )?;
    jwa.hash()
        .ok_or_else(|| JoseError::configuration(format!("{jwa} has no digest")))
}

/// `EM = 0x00 || 0x01 || PS || 0x00 || DigestInfo(H(M))` with `PS` all `0xff`.
fn emsa_pkcs1_v1_5_encode(message: &[u8], hash: HashAlg, em_len: usize) -> Result<Vec<u8>, JoseError> {
    let prefix = hash.digest_info_prefix();
    let t_len = prefix.len() + hash.output_len();
    if em_len < t_len + 11 {
        return Err(JoseError::configuration(
            "intended encoded message length too short",
        ));
    }
    let mut em = Vec::with_capacity(em_len);
    em.extend_from_slice(&[0x00, 0x01]);
    em.resize(em_len - t_len - 1, 0xff);
    em.push(0x00);
    em.extend_from_slice(prefix);
    em.extend(hash.digest(message));
    Ok(em)
}

/// RSASP1: `s = m^d mod n`, through the CRT parameters when the key has them.
///
/// ```text
/// m1 = c^dp mod p
/// m2 = c^dq mod q
/// h  = qi * (m1 - m2) mod p
/// m  = m2 + h * q
/// ```
///
/// The output is left padded to the modulus length.
pub(super) fn rsa_private_operation(
    key: &RsaKey,
    jwa: JWA,
    encoded: &[u8],
) -> Result<Vec<u8>, JoseError> {
    let n = BigUint::from_bytes_be(key.modulus());
    let m = BigUint::from_bytes_be(encoded);
    if m >= n {
        return Err(JoseError::malformed("message representative out of range"));
    }

    let s = match key.crt() {
        Some(crt) => {
            let p = BigUint::from_bytes_be(&crt.p);
            let q = BigUint::from_bytes_be(&crt.q);
            let m1 = m.modpow(&BigUint::from_bytes_be(&crt.dp), &p);
            let m2 = m.modpow(&BigUint::from_bytes_be(&crt.dq), &q);
            let qi = BigUint::from_bytes_be(&crt.qi);
            // m1 + p - (m2 mod p) stays positive for any m2
            let h = (qi * (m1 + &p - (&m2 % &p))) % &p;
            m2 + h * q
        }
        None => {
            let d = key.private_exponent().ok_or_else(|| missing_private_key(jwa))?;
            m.modpow(&BigUint::from_bytes_be(d), &n)
        }
    };

    let signature = Zeroizing::new(s.to_bytes_be());
    zero_pad(&signature, key.modulus_len())
}

/// RSAVP1: `m = s^e mod n`, `None` when the signature has the wrong length or
/// is not smaller than the modulus.
pub(super) fn rsa_public_operation(key: &RsaKey, signature: &[u8]) -> Option<BigUint> {
    if signature.len() != key.modulus_len() {
        return None;
    }
    let n = BigUint::from_bytes_be(key.modulus());
    let s = BigUint::from_bytes_be(signature);
    if s >= n {
        return None;
    }
    Some(s.modpow(&BigUint::from_bytes_be(key.public_exponent()), &n))
}
