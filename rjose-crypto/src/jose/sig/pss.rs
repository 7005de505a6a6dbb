use aws_lc_rs::rand::{SecureRandom as _, SystemRandom};
use subtle::ConstantTimeEq as _;

use super::{
    SignatureAlgorithm,
    rsa::{bind_rsa_key, rsa_private_operation, rsa_public_operation},
};
use crate::jose::{
    ErrorKind, HashAlg, JWA, JWAFamily, JoseError, RsaKey,
    codec::zero_pad,
    constants::PSS_TRAILER,
    error::JoseResultExt as _,
};

#[derive(Debug, Clone)]
/// `PS256`, `PS384` and `PS512`: RSASSA-PSS with MGF1 over the same digest
/// and a salt as long as the digest output.
///
/// The EMSA-PSS encoding is done here, the key only contributes the raw
/// RSA exponentiation.
pub struct RsaPss {
    key: RsaKey,
    jwa: JWA,
    hash: HashAlg,
}

impl RsaPss {
    pub fn new(key: RsaKey, jwa: JWA) -> Result<Self, JoseError> {
        let hash = bind_rsa_key(&key, jwa, JWAFamily::RsaPss)?;
        Ok(Self { key, jwa, hash })
    }

    #[must_use]
    pub fn key(&self) -> &RsaKey {
        &self.key
    }

    fn em_bits(&self) -> usize {
        usize::try_from(self.key.modulus_bits()).map_or(0, |bits| bits.saturating_sub(1))
    }
}

impl SignatureAlgorithm for RsaPss {
    fn jwa(&self) -> JWA {
        self.jwa
    }

    fn key_id(&self) -> Option<&str> {
        self.key.kid()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, JoseError> {
        let encoded = emsa_pss_encode(message, self.em_bits(), self.hash)?;
        rsa_private_operation(&self.key, self.jwa, &encoded)
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, JoseError> {
        let em_bits = self.em_bits();
        let Some(representative) = rsa_public_operation(&self.key, signature) else {
            return Ok(false);
        };
        let Ok(encoded) = zero_pad(&representative.to_bytes_be(), em_bits.div_ceil(8)) else {
            return Ok(false);
        };
        Ok(emsa_pss_verify(message, &encoded, em_bits, self.hash))
    }
}

/// `T = Hash(seed || C0) || Hash(seed || C1) || ...` truncated to `mask_len`,
/// where `Ci` is the 32 bit big-endian counter.
fn mgf1(seed: &[u8], mask_len: usize, hash: HashAlg) -> Vec<u8> {
    let mut mask = Vec::with_capacity(mask_len + hash.output_len());
    let mut counter: u32 = 0;
    let mut input = Vec::with_capacity(seed.len() + 4);
    while mask.len() < mask_len {
        input.clear();
        input.extend_from_slice(seed);
        input.extend_from_slice(&counter.to_be_bytes());
        mask.extend(hash.digest(&input));
        counter = counter.wrapping_add(1);
    }
    mask.truncate(mask_len);
    mask
}

/// Mask clearing the leftmost `8 * em_len - em_bits` bits of the first octet.
fn leading_octet_mask(em_len: usize, em_bits: usize) -> u8 {
    0xff >> (8 * em_len - em_bits)
}

/// `M' = 0x00 * 8 || mHash || salt`
fn salted_hash(m_hash: &[u8], salt: &[u8], hash: HashAlg) -> Vec<u8> {
    let mut m_prime = Vec::with_capacity(8 + m_hash.len() + salt.len());
    m_prime.extend_from_slice(&[0; 8]);
    m_prime.extend_from_slice(m_hash);
    m_prime.extend_from_slice(salt);
    hash.digest(&m_prime)
}

/// EMSA-PSS-ENCODE, `EM = maskedDB || H || 0xbc`.
fn emsa_pss_encode(message: &[u8], em_bits: usize, hash: HashAlg) -> Result<Vec<u8>, JoseError> {
    let h_len = hash.output_len();
    let s_len = h_len;
    let em_len = em_bits.div_ceil(8);
    if em_len < h_len + s_len + 2 {
        return Err(JoseError::configuration("modulus too small for RSASSA-PSS"));
    }

    let mut salt = vec![0; s_len];
    SystemRandom::new()
        .fill(&mut salt)
        .or_jose(ErrorKind::Provider, "fill RSASSA-PSS salt")?;

    let m_hash = hash.digest(message);
    let h = salted_hash(&m_hash, &salt, hash);

    // DB = PS || 0x01 || salt
    let db_len = em_len - h_len - 1;
    let mut db = vec![0; db_len - s_len - 1];
    db.push(0x01);
    db.extend_from_slice(&salt);

    let mask = mgf1(&h, db_len, hash);
    for (octet, mask) in db.iter_mut().zip(mask) {
        *octet ^= mask;
    }
    db[0] &= leading_octet_mask(em_len, em_bits);

    let mut em = db;
    em.extend_from_slice(&h);
    em.push(PSS_TRAILER);
    Ok(em)
}

/// EMSA-PSS-VERIFY, every inconsistency is reported as `false`.
fn emsa_pss_verify(message: &[u8], em: &[u8], em_bits: usize, hash: HashAlg) -> bool {
    let h_len = hash.output_len();
    let s_len = h_len;
    let em_len = em_bits.div_ceil(8);
    if em.len() != em_len || em_len < h_len + s_len + 2 {
        return false;
    }

    let Some((&trailer, rest)) = em.split_last() else {
        return false;
    };
    if trailer != PSS_TRAILER {
        return false;
    }
    let (masked_db, h) = rest.split_at(em_len - h_len - 1);

    let leading_mask = leading_octet_mask(em_len, em_bits);
    if masked_db[0] & !leading_mask != 0 {
        return false;
    }

    let mut db = mgf1(h, masked_db.len(), hash);
    for (octet, masked) in db.iter_mut().zip(masked_db) {
        *octet ^= masked;
    }
    db[0] &= leading_mask;

    let padding_len = em_len - h_len - s_len - 2;
    if db[..padding_len].iter().any(|octet| *octet != 0) || db[padding_len] != 0x01 {
        return false;
    }
    let salt = &db[db.len() - s_len..];

    let m_hash = hash.digest(message);
    let expected = salted_hash(&m_hash, salt, hash);
    expected.ct_eq(h).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use tokio_test::assert_err;

    #[test]
    fn mgf1_sha256_vector() {
        // MGF1-SHA256("foo", 3)
        let mask = mgf1(b"foo", 3, HashAlg::Sha256);
        assert_eq!(mask, HashAlg::Sha256.digest(b"foo\0\0\0\0")[..3]);
        let long = mgf1(b"seed", 70, HashAlg::Sha256);
        assert_eq!(long.len(), 70);
        assert_eq!(long[32..64], HashAlg::Sha256.digest(b"seed\0\0\0\x01")[..]);
    }

    #[test]
    fn encoding_layout() {
        let em = emsa_pss_encode(b"hello", 2047, HashAlg::Sha256).unwrap();
        assert_eq!(em.len(), 256);
        assert_eq!(em[255], PSS_TRAILER);
        assert_eq!(em[0] & 0x80, 0);
        assert!(emsa_pss_verify(b"hello", &em, 2047, HashAlg::Sha256));
        assert!(!emsa_pss_verify(b"hello!", &em, 2047, HashAlg::Sha256));
        assert!(!emsa_pss_verify(b"hello", &em, 2047, HashAlg::Sha384));
    }

    #[test]
    fn salt_is_random() {
        let a = emsa_pss_encode(b"m", 2047, HashAlg::Sha512).unwrap();
        let b = emsa_pss_encode(b"m", 2047, HashAlg::Sha512).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn em_length_multiple_of_eight_bits() {
        // a 2049 bit modulus gives em_bits 2048 and no cleared bits
        let em = emsa_pss_encode(b"m", 2048, HashAlg::Sha384).unwrap();
        assert_eq!(em.len(), 256);
        assert!(emsa_pss_verify(b"m", &em, 2048, HashAlg::Sha384));
    }

    #[test]
    fn rejects_too_small_encoding_space() {
        assert_err!(emsa_pss_encode(b"m", 8 * 129, HashAlg::Sha512));
    }

    #[quickcheck]
    fn tampered_encoding_never_verifies(index: usize, bit: u8) -> bool {
        let em = match emsa_pss_encode(b"payload", 2047, HashAlg::Sha256) {
            Ok(em) => em,
            Err(_) => return false,
        };
        let mut tampered = em.clone();
        tampered[index % em.len()] ^= 1 << (bit % 8);
        emsa_pss_verify(b"payload", &em, 2047, HashAlg::Sha256)
            && !emsa_pss_verify(b"payload", &tampered, 2047, HashAlg::Sha256)
    }

    #[test]
    fn undersized_key_is_rejected() {
        let toy = RsaKey::from_json(r#"{"kty":"RSA","n":"DKE","e":"EQ","d":"CsE"}"#).unwrap();
        let err = assert_err!(RsaPss::new(toy, JWA::PS256));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn sign_and_verify_with_and_without_crt() {
        let key = RsaKey::generate(2048).unwrap();
        let mut jwk = key.to_private_jwk(None, None).unwrap();
        for member in ["p", "q", "dp", "dq", "qi"] {
            jwk.remove(member);
        }
        let exponent_only = RsaKey::parse(&jwk).unwrap();
        let public = RsaKey::parse(&key.to_public_jwk(None, None)).unwrap();

        let verifier = RsaPss::new(public, JWA::PS512).unwrap();
        for key in [key, exponent_only] {
            let signer = RsaPss::new(key, JWA::PS512).unwrap();
            let a = signer.sign(b"").unwrap();
            let b = signer.sign(b"").unwrap();
            assert_ne!(a, b);
            assert!(verifier.verify(b"", &a).unwrap());
            assert!(verifier.verify(b"", &b).unwrap());
            assert!(!verifier.verify(b"x", &a).unwrap());
            assert!(!verifier.verify(b"", &a[..255]).unwrap());
        }
        assert_err!(verifier.sign(b""));
    }
}
