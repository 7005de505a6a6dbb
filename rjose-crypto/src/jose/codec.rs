//! Text and octet codecs shared by the key and token layers.
//!
//! - base64url without padding as used by every JOSE structure ([`rfc7515` section 2]);
//! - compact JSON with insertion order kept and `/` and non-ASCII left unescaped;
//! - PEM framing ([`rfc7468`]) with 64 column standard base64;
//! - helpers for unsigned big-endian integers stored as octet strings.
//!
//! [`rfc7515` section 2]: https://datatracker.ietf.org/doc/html/rfc7515#section-2
//! [`rfc7468`]: https://datatracker.ietf.org/doc/html/rfc7468

use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    prelude::BASE64_STANDARD,
};
use serde::Serialize;
use serde_json::{Map, Value};

use super::{ErrorKind, JoseError, error::JoseResultExt as _};

/// URL-safe alphabet, no padding when encoding, padding tolerated when decoding.
const BASE64_URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const PEM_LINE_WIDTH: usize = 64;

/// Encode bytes as base64url without padding.
pub fn base64url_encode(bytes: impl AsRef<[u8]>) -> String {
    BASE64_URL_SAFE_LENIENT.encode(bytes)
}

/// Decode base64url, with or without trailing `=` padding.
pub fn base64url_decode(input: impl AsRef<[u8]>) -> Result<Vec<u8>, JoseError> {
    BASE64_URL_SAFE_LENIENT
        .decode(input)
        .or_jose(ErrorKind::MalformedInput, "decode base64url")
}

/// Serialize a value to compact JSON.
pub fn json_encode(value: &impl Serialize) -> Result<String, JoseError> {
    serde_json::to_string(value).or_jose(ErrorKind::MalformedInput, "encode json")
}

/// Parse a JSON document that must be an object.
pub fn json_decode(input: impl AsRef<[u8]>) -> Result<Map<String, Value>, JoseError> {
    match serde_json::from_slice::<Value>(input.as_ref())
        .or_jose(ErrorKind::MalformedInput, "decode json")?
    {
        Value::Object(map) => Ok(map),
        _ => Err(JoseError::malformed("json document is not an object")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A decoded PEM block.
pub struct Pem {
    /// The label between `BEGIN` and `KEY`, e.g. `EC PRIVATE`.
    pub label: String,
    /// The DER bytes carried by the block.
    pub der: Vec<u8>,
}

/// Frame DER bytes as a `-----BEGIN {label} KEY-----` PEM block.
///
/// Every line, the last one included, ends in `\n`.
pub fn format_pem(der: &[u8], label: &str) -> String {
    let label = label.trim().to_uppercase();
    let encoded = BASE64_STANDARD.encode(der);

    let mut pem = String::with_capacity(encoded.len() + encoded.len() / PEM_LINE_WIDTH + 64);
    pem.push_str("-----BEGIN ");
    pem.push_str(&label);
    pem.push_str(" KEY-----\n");
    // base64 output is ASCII, so byte chunks are valid str boundaries
    for line in encoded.as_bytes().chunks(PEM_LINE_WIDTH) {
        pem.extend(line.iter().map(|b| char::from(*b)));
        pem.push('\n');
    }
    pem.push_str("-----END ");
    pem.push_str(&label);
    pem.push_str(" KEY-----\n");
    pem
}

/// Parse a single `-----BEGIN … KEY-----` PEM block.
pub fn parse_pem(text: &str) -> Result<Pem, JoseError> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());

    let begin = lines
        .next()
        .ok_or_else(|| JoseError::malformed("empty PEM"))?;
    let label = begin
        .strip_prefix("-----BEGIN ")
        .and_then(|rest| rest.strip_suffix(" KEY-----"))
        .ok_or_else(|| JoseError::malformed("missing PEM BEGIN line"))?;

    let mut body = String::new();
    let mut end = None;
    for line in lines.by_ref() {
        if line.starts_with("-----END ") {
            end = Some(line);
            break;
        }
        body.push_str(line);
    }

    let end = end.ok_or_else(|| JoseError::malformed("missing PEM END line"))?;
    let end_label = end
        .strip_prefix("-----END ")
        .and_then(|rest| rest.strip_suffix(" KEY-----"));
    if end_label != Some(label) {
        return Err(JoseError::malformed("PEM BEGIN and END labels differ"));
    }

    let der = BASE64_STANDARD
        .decode(body)
        .or_jose(ErrorKind::MalformedInput, "decode PEM body")?;

    tracing::trace!(pem.label = label, pem.der_len = der.len(), "parsed PEM block");

    Ok(Pem {
        label: label.to_owned(),
        der,
    })
}

/// Strip leading zero octets, the empty slice stays empty.
pub fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Left pad an unsigned big-endian integer with zero octets to exactly `len` octets.
///
/// Extraneous leading zeros are dropped first, a value that is still longer than
/// `len` is rejected.
pub fn zero_pad(bytes: &[u8], len: usize) -> Result<Vec<u8>, JoseError> {
    let value = trim_leading_zeros(bytes);
    if value.len() > len {
        return Err(JoseError::malformed(format!(
            "integer of {} octets does not fit in {len} octets",
            value.len()
        )));
    }
    let mut padded = vec![0; len - value.len()];
    padded.extend_from_slice(value);
    Ok(padded)
}
