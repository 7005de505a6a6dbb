//! Minimal ASN.1 DER engine.
//!
//! Only the subset needed for RSA and elliptic curve keys and for ECDSA
//! signatures is supported: definite lengths, single octet tags and
//! non-negative INTEGERs. All encoding rules follow
//! [ITU X.690](https://www.itu.int/ITU-T/studygroups/com17/languages/X.690-0207.pdf).

use super::{
    JoseError,
    codec::{trim_leading_zeros, zero_pad},
    constants::{
        DER_LENGTH_LONG_FORM, DER_LENGTH_MAX_OCTETS, DER_LENGTH_SHORT_FORM_MAX, DER_TAG_INTEGER,
        DER_TAG_SEQUENCE, INTEGER_SIGN_BIT_MASK,
    },
};

/// This function is an implementation of length encoding as defined in section 8.1.3
/// [ITU X.690](https://www.itu.int/ITU-T/studygroups/com17/languages/X.690-0207.pdf) specification.
///
/// Lengths up to 127 use the short form, longer ones the minimal long form.
#[must_use]
pub fn encode_length(len: usize) -> Vec<u8> {
    if len <= DER_LENGTH_SHORT_FORM_MAX {
        return vec![len as u8];
    }
    let len_bytes = len.to_be_bytes();
    let len_bytes = trim_leading_zeros(&len_bytes);
    let mut result = Vec::with_capacity(1 + len_bytes.len());
    result.push(DER_LENGTH_LONG_FORM | len_bytes.len() as u8);
    result.extend_from_slice(len_bytes);
    result
}

/// Encode an unsigned big-endian integer as a DER INTEGER, section 8.3 of X.690.
///
/// Extraneous leading zeros are removed, an empty (zero) value is encoded as a
/// single `0x00` octet and a value with the high bit set gets a `0x00` prepended
/// so it is not read as negative.
#[must_use]
pub fn encode_integer(value: &[u8]) -> Vec<u8> {
    let value = trim_leading_zeros(value);
    let needs_leading_zero = value.first().is_none_or(|b| b & INTEGER_SIGN_BIT_MASK != 0);
    let content_len = value.len() + usize::from(needs_leading_zero);

    let len_bytes = encode_length(content_len);
    let mut result = Vec::with_capacity(1 + len_bytes.len() + content_len);
    result.push(DER_TAG_INTEGER);
    result.extend_from_slice(&len_bytes);
    if needs_leading_zero {
        result.push(0);
    }
    result.extend_from_slice(value);
    result
}

/// Encode a tag-length-value triple.
#[must_use]
pub fn encode_tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let len_bytes = encode_length(content.len());
    let mut result = Vec::with_capacity(1 + len_bytes.len() + content.len());
    result.push(tag);
    result.extend_from_slice(&len_bytes);
    result.extend_from_slice(content);
    result
}

/// Encode a SEQUENCE from already encoded children.
#[must_use]
pub fn encode_sequence<I>(children: I) -> Vec<u8>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut content = Vec::new();
    for child in children {
        content.extend_from_slice(child.as_ref());
    }
    encode_tlv(DER_TAG_SEQUENCE, &content)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Read cursor over an immutable DER buffer.
///
/// Every read returns the parsed value together with a new cursor positioned
/// after it; the cursor itself is never mutated.
pub struct DerCursor<'a> {
    input: &'a [u8],
}

impl<'a> DerCursor<'a> {
    /// Create a cursor positioned at the start of `input`.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self { input }
    }

    /// `true` when nothing is left to read.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.input.is_empty()
    }

    /// The bytes not yet consumed.
    #[must_use]
    pub fn remaining(self) -> &'a [u8] {
        self.input
    }

    /// The tag of the next element, if any.
    #[must_use]
    pub fn peek_tag(self) -> Option<u8> {
        self.input.first().copied()
    }

    /// Read the next element, whatever its tag.
    pub fn read_any(self) -> Result<(u8, &'a [u8], Self), JoseError> {
        let (&tag, rest) = self
            .input
            .split_first()
            .ok_or_else(|| JoseError::malformed("DER input truncated: missing tag"))?;
        let (&first, mut rest) = rest
            .split_first()
            .ok_or_else(|| JoseError::malformed("DER input truncated: missing length"))?;

        let len = if first & DER_LENGTH_LONG_FORM == 0 {
            usize::from(first)
        } else {
            let octets = usize::from(first & !DER_LENGTH_LONG_FORM);
            if octets == 0 {
                return Err(JoseError::malformed("DER indefinite length is not allowed"));
            }
            if octets > DER_LENGTH_MAX_OCTETS {
                return Err(JoseError::malformed("DER length too large"));
            }
            if rest.len() < octets {
                return Err(JoseError::malformed("DER input truncated: length octets"));
            }
            let (len_bytes, after) = rest.split_at(octets);
            rest = after;
            len_bytes
                .iter()
                .fold(0usize, |acc, b| (acc << 8) | usize::from(*b))
        };

        if rest.len() < len {
            return Err(JoseError::malformed(format!(
                "DER input truncated: need {len} content octets, have {}",
                rest.len()
            )));
        }
        let (content, rest) = rest.split_at(len);
        Ok((tag, content, Self::new(rest)))
    }

    /// Read the next element, which must carry `tag`.
    pub fn read(self, tag: u8) -> Result<(&'a [u8], Self), JoseError> {
        let (found, content, next) = self.read_any()?;
        if found != tag {
            return Err(JoseError::malformed(format!(
                "unexpected DER tag 0x{found:02x}, expected 0x{tag:02x}"
            )));
        }
        Ok((content, next))
    }

    /// Read the next element if it carries `tag`, otherwise leave the cursor as is.
    pub fn read_optional(self, tag: u8) -> Result<(Option<&'a [u8]>, Self), JoseError> {
        if self.peek_tag() == Some(tag) {
            let (content, next) = self.read(tag)?;
            Ok((Some(content), next))
        } else {
            Ok((None, self))
        }
    }

    /// Read a non-negative INTEGER and return its value without sign padding.
    ///
    /// Zero is returned as the empty slice.
    pub fn read_integer(self) -> Result<(&'a [u8], Self), JoseError> {
        let (content, next) = self.read(DER_TAG_INTEGER)?;
        match content.first() {
            None => Err(JoseError::malformed("DER INTEGER without content")),
            Some(b) if b & INTEGER_SIGN_BIT_MASK != 0 => {
                Err(JoseError::malformed("negative DER INTEGER"))
            }
            Some(_) => Ok((trim_leading_zeros(content), next)),
        }
    }

    /// Succeed only when the cursor has been fully consumed.
    pub fn finish(self) -> Result<(), JoseError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(JoseError::malformed(format!(
                "{} trailing DER octets",
                self.input.len()
            )))
        }
    }
}

/// Transcode a fixed width `R || S` ECDSA signature into `SEQUENCE { INTEGER r, INTEGER s }`.
///
/// `half` is the octet size of one coordinate of the curve (32, 48 or 66).
pub fn ecdsa_signature_to_der(signature: &[u8], half: usize) -> Result<Vec<u8>, JoseError> {
    if signature.len() != 2 * half {
        return Err(JoseError::malformed(format!(
            "ECDSA signature must be {} octets, got {}",
            2 * half,
            signature.len()
        )));
    }
    let (r, s) = signature.split_at(half);
    Ok(encode_sequence([encode_integer(r), encode_integer(s)]))
}

/// Transcode a DER `SEQUENCE { INTEGER r, INTEGER s }` ECDSA signature into fixed width `R || S`.
pub fn ecdsa_signature_from_der(der: &[u8], half: usize) -> Result<Vec<u8>, JoseError> {
    let cursor = DerCursor::new(der);
    if cursor.peek_tag() != Some(DER_TAG_SEQUENCE) {
        return Err(JoseError::malformed(
            "invalid ECDSA signature: should start with a sequence",
        ));
    }
    let (content, rest) = cursor.read(DER_TAG_SEQUENCE)?;
    rest.finish()?;

    let inner = DerCursor::new(content);
    let (r, inner) = inner.read_integer()?;
    let (s, inner) = inner.read_integer()?;
    inner.finish()?;

    let mut fixed = zero_pad(r, half)?;
    fixed.extend(zero_pad(s, half)?);
    Ok(fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jose::ErrorKind;
    use quickcheck_macros::quickcheck;
    use tokio_test::assert_err;

    #[test]
    fn length_short_and_long_form() {
        assert_eq!(encode_length(0), vec![0x00]);
        assert_eq!(encode_length(127), vec![0x7f]);
        assert_eq!(encode_length(128), vec![0x81, 0x80]);
        assert_eq!(encode_length(255), vec![0x81, 0xff]);
        assert_eq!(encode_length(256), vec![0x82, 0x01, 0x00]);
        assert_eq!(encode_length(0x01_0000), vec![0x83, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn integer_sign_and_zero_rules() {
        assert_eq!(encode_integer(&[]), vec![0x02, 0x01, 0x00]);
        assert_eq!(encode_integer(&[0, 0]), vec![0x02, 0x01, 0x00]);
        assert_eq!(encode_integer(&[0, 0, 5]), vec![0x02, 0x01, 0x05]);
        assert_eq!(encode_integer(&[0x80]), vec![0x02, 0x02, 0x00, 0x80]);
        assert_eq!(encode_integer(&[0x00, 0xff, 0x01]), vec![0x02, 0x03, 0x00, 0xff, 0x01]);
        assert_eq!(encode_integer(&[0x01, 0x00, 0x01]), vec![0x02, 0x03, 0x01, 0x00, 0x01]);
    }

    #[test]
    fn sequence_wraps_children() {
        let seq = encode_sequence([encode_integer(&[1]), encode_integer(&[0x81])]);
        assert_eq!(seq, hex::decode("300702010102020081").unwrap());
    }

    #[test]
    fn cursor_reads_nested_structures() {
        let der = hex::decode("300702010102020081").unwrap();
        let (content, rest) = DerCursor::new(&der).read(DER_TAG_SEQUENCE).unwrap();
        assert!(rest.is_empty());

        let inner = DerCursor::new(content);
        assert_eq!(inner.peek_tag(), Some(DER_TAG_INTEGER));
        let (a, inner) = inner.read_integer().unwrap();
        let (b, inner) = inner.read_integer().unwrap();
        assert_eq!(a, &[1]);
        assert_eq!(b, &[0x81]);
        inner.finish().unwrap();
    }

    #[test]
    fn cursor_is_not_advanced_by_reads() {
        let der = hex::decode("0201010201020500").unwrap();
        let cursor = DerCursor::new(&der);
        let (first, _) = cursor.read_integer().unwrap();
        let (again, next) = cursor.read_integer().unwrap();
        assert_eq!(first, again);
        let (absent, next) = next.read_optional(0xa0).unwrap();
        assert!(absent.is_none());
        let (_, next) = next.read_integer().unwrap();
        assert_eq!(next.remaining(), &[0x05, 0x00]);
    }

    #[test]
    fn cursor_reads_long_form() {
        let mut der = vec![0x04, 0x81, 0x80];
        der.extend([7; 128]);
        let (tag, content, rest) = DerCursor::new(&der).read_any().unwrap();
        assert_eq!(tag, 0x04);
        assert_eq!(content.len(), 128);
        assert!(rest.is_empty());
    }

    #[test]
    fn cursor_rejects_malformed_input() {
        for input in [
            "",           // no tag
            "02",         // no length
            "0203",       // truncated content
            "0280",       // indefinite length
            "028501",     // too many length octets
            "0282",       // truncated length octets
            "0200",       // empty integer
            "020180",     // negative integer
            "0401ff",     // wrong tag
        ] {
            let der = hex::decode(input).unwrap();
            let err = assert_err!(DerCursor::new(&der).read_integer(), "input {input}");
            assert_eq!(err.kind(), ErrorKind::MalformedInput);
        }
        assert_err!(DerCursor::new(&[0x05, 0x00, 0x00]).read(0x05).and_then(|(_, c)| c.finish()));
    }

    #[test]
    fn ecdsa_p256_transcoding_adds_sign_padding() {
        let mut fixed = vec![0x80; 32];
        fixed.extend([0x01; 32]);
        let der = ecdsa_signature_to_der(&fixed, 32).unwrap();
        assert_eq!(&der[..5], &[0x30, 0x45, 0x02, 0x21, 0x00]);
        assert_eq!(ecdsa_signature_from_der(&der, 32).unwrap(), fixed);
    }

    #[test]
    fn ecdsa_p521_transcoding_uses_long_form() {
        let fixed = vec![0x01; 132];
        let der = ecdsa_signature_to_der(&fixed, 66).unwrap();
        assert_eq!(&der[..3], &[0x30, 0x81, 136]);
        assert_eq!(ecdsa_signature_from_der(&der, 66).unwrap(), fixed);
    }

    #[test]
    fn ecdsa_transcoding_restores_leading_zeros() {
        let mut fixed = vec![0x00; 48];
        fixed[47] = 0x2a;
        fixed.extend([0x00; 48]);
        let der = ecdsa_signature_to_der(&fixed, 48).unwrap();
        assert_eq!(der, hex::decode("300602012a020100").unwrap());
        assert_eq!(ecdsa_signature_from_der(&der, 48).unwrap(), fixed);
    }

    #[test]
    fn ecdsa_from_der_rejects_bad_structure() {
        // not a sequence
        assert_err!(ecdsa_signature_from_der(&hex::decode("3106020101020101").unwrap(), 32));
        // first inner element is not an integer
        assert_err!(ecdsa_signature_from_der(&hex::decode("3006040101020101").unwrap(), 32));
        // integer wider than the curve
        let mut der = vec![0x30, 0x26, 0x02, 0x21, 0x01];
        der.extend([0x01; 32]);
        der.extend([0x02, 0x01, 0x01]);
        assert_err!(ecdsa_signature_from_der(&der, 32));
        // wrong fixed width
        assert_err!(ecdsa_signature_to_der(&[1; 63], 32));
    }

    #[quickcheck]
    fn ecdsa_transcoding_is_inverse(seed: Vec<u8>, curve: u8) -> bool {
        let half = [32, 48, 66][usize::from(curve % 3)];
        let fixed: Vec<u8> = if seed.is_empty() {
            vec![0; 2 * half]
        } else {
            seed.iter().copied().cycle().take(2 * half).collect()
        };
        let der = ecdsa_signature_to_der(&fixed, half).unwrap();
        ecdsa_signature_from_der(&der, half).unwrap() == fixed
    }
}
