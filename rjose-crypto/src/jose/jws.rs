use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::jose::{
    ErrorKind, JoseError, SignatureAlgorithm,
    codec::{base64url_decode, base64url_encode, json_encode},
    error::JoseResultExt as _,
};

const SEGMENT_SEPARATOR: char = '.';

#[derive(Default, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
/// [`Headers`] is the protected header of a compact [`JWS`], kept in
/// insertion order so the encoded header is predictable.
pub struct Headers(Map<String, Value>);

impl Headers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    /// Set a header, replacing an existing header with the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set a header, replacing an existing header with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Merge all members of `headers`, which must serialize to a JSON object.
    ///
    /// Existing headers with the same name are replaced.
    pub fn try_with_headers(mut self, headers: impl Serialize) -> Result<Self, JoseError> {
        self.try_set_headers(headers)?;
        Ok(self)
    }

    /// Merge all members of `headers`, which must serialize to a JSON object.
    ///
    /// Existing headers with the same name are replaced.
    pub fn try_set_headers(&mut self, headers: impl Serialize) -> Result<&mut Self, JoseError> {
        let headers = serde_json::to_value(headers)
            .or_jose(ErrorKind::Configuration, "convert headers to serde json value")?;
        let Value::Object(mut headers) = headers else {
            return Err(JoseError::configuration(
                "can only set multiple headers if input is key value object",
            ));
        };
        self.0.append(&mut headers);
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Try decode headers to the provided `T`.
    pub fn decode<'de, 'a: 'de, T>(&'a self) -> Result<T, JoseError>
    where
        T: Deserialize<'de>,
    {
        T::deserialize(&self.0).or_jose(ErrorKind::MalformedInput, "deserialize headers into T")
    }
}

impl From<Map<String, Value>> for Headers {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Payload of a token to encode.
///
/// [`Payload::Json`] is always JSON encoded, [`Payload::Bytes`] never is.
/// [`Payload::Text`] is used as is, unless JSON string encoding is requested
/// in [`JWS::encode`].
pub enum Payload {
    Json(Value),
    Text(String),
    Bytes(Vec<u8>),
}

impl Payload {
    fn into_bytes(self, json_encode_string: bool) -> Result<Vec<u8>, JoseError> {
        match self {
            Self::Json(value) => Ok(json_encode(&value)?.into_bytes()),
            Self::Text(text) if json_encode_string => Ok(json_encode(&text)?.into_bytes()),
            Self::Text(text) => Ok(text.into_bytes()),
            Self::Bytes(bytes) => Ok(bytes),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(value: Map<String, Value>) -> Self {
        Self::Json(Value::Object(value))
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for Payload {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A verified compact token.
///
/// The payload is handed back as it was signed, decoding it further is up
/// to the caller.
pub struct DecodedJws {
    header: Map<String, Value>,
    header_bytes: Vec<u8>,
    payload: Vec<u8>,
}

impl DecodedJws {
    /// The header JSON exactly as it was signed.
    #[must_use]
    pub fn header_bytes(&self) -> &[u8] {
        &self.header_bytes
    }

    #[must_use]
    pub fn header(&self) -> &Map<String, Value> {
        &self.header
    }

    /// Get reference to the payload.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Trying decoding the header to the provided `T`
    pub fn decode_header<'de, 'a: 'de, T: Deserialize<'de>>(&'a self) -> Result<T, JoseError> {
        T::deserialize(&self.header).or_jose(ErrorKind::MalformedInput, "deserialize header into T")
    }

    /// Trying decoding the payload as JSON to the provided `T`
    pub fn decode_payload<T: DeserializeOwned>(&self) -> Result<T, JoseError> {
        serde_json::from_slice(&self.payload)
            .or_jose(ErrorKind::MalformedInput, "deserialize payload into T")
    }

    /// Header bytes and payload.
    #[must_use]
    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>) {
        (self.header_bytes, self.payload)
    }
}

#[derive(Clone, Debug)]
/// Compact serialization of JSON Web Signatures, as defined in [`rfc7515`].
///
/// The algorithm is fixed when the [`JWS`] is created. The `alg` header of
/// a token is only compared against it, never used to pick one.
///
/// [`rfc7515`]: https://datatracker.ietf.org/doc/html/rfc7515
pub struct JWS<A> {
    algorithm: A,
}

impl<A: SignatureAlgorithm> JWS<A> {
    pub fn new(algorithm: A) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// Create a compact `header.payload.signature` token.
    ///
    /// Without `headers` the header is `{"typ":"JWT"}`. `alg` is always set to
    /// the bound algorithm, `kid` is added from the key unless already present.
    pub fn encode(
        &self,
        payload: impl Into<Payload>,
        headers: Option<Headers>,
        json_encode_string: bool,
    ) -> Result<String, JoseError> {
        let jwa = self.algorithm.jwa();
        let mut headers = headers.unwrap_or_else(|| Headers::new().with_header("typ", "JWT"));
        headers.set_header("alg", jwa.as_str());
        if headers.get("kid").is_none()
            && let Some(kid) = self.algorithm.key_id()
        {
            headers.set_header("kid", kid);
        }

        let payload = payload.into().into_bytes(json_encode_string)?;
        let mut token = base64url_encode(json_encode(&headers)?);
        token.push(SEGMENT_SEPARATOR);
        token.push_str(&base64url_encode(&payload));

        let signature = self.algorithm.sign(token.as_bytes())?;
        token.push(SEGMENT_SEPARATOR);
        token.push_str(&base64url_encode(&signature));
        tracing::trace!(jwa = %jwa, token.len = token.len(), "encoded compact JWS");
        Ok(token)
    }

    /// Verify a compact token and return its header and payload.
    pub fn decode(&self, token: &str) -> Result<DecodedJws, JoseError> {
        let jwa = self.algorithm.jwa();
        let mut segments = token.split(SEGMENT_SEPARATOR);
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(JoseError::malformed("compact JWS must have exactly three segments"));
        };

        let header_bytes = base64url_decode(header)?;
        let payload_bytes = base64url_decode(payload)?;
        let signature = base64url_decode(signature)?;

        let signing_input = &token[..header.len() + 1 + payload.len()];
        if !self.algorithm.verify(signing_input.as_bytes(), &signature)? {
            tracing::debug!(jwa = %jwa, "JWS signature verification failed");
            return Err(JoseError::verification("signature does not match"));
        }

        let header = match serde_json::from_slice(&header_bytes)
            .or_jose(ErrorKind::MalformedInput, "parse JWS header")?
        {
            Value::Object(header) => header,
            _ => return Err(JoseError::malformed("JWS header is not a JSON object")),
        };
        match header.get("alg") {
            None => {}
            Some(Value::String(alg)) if alg == jwa.as_str() => {}
            Some(alg) => {
                tracing::debug!(jwa = %jwa, header.alg = %alg, "JWS alg header mismatch");
                return Err(JoseError::verification(format!(
                    "token alg {alg} does not match {jwa}"
                )));
            }
        }

        tracing::debug!(jwa = %jwa, "verified compact JWS");
        Ok(DecodedJws {
            header,
            header_bytes,
            payload: payload_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jose::{Hmac, JWA, OctKey};
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn hs256() -> JWS<Hmac> {
        let key = OctKey::new(b"01234567890123456789012345678901".to_vec());
        JWS::new(Hmac::new(key, JWA::HS256).unwrap())
    }

    #[test]
    fn headers_builders() {
        let headers = Headers::new()
            .with_header("typ", "JWT")
            .try_with_headers(json!({"cty": "text", "typ": "JOSE"}))
            .unwrap();
        assert_eq!(json_encode(&headers).unwrap(), r#"{"typ":"JOSE","cty":"text"}"#);
        assert_err!(Headers::new().try_with_headers("not an object"));

        #[derive(Deserialize)]
        struct Typ {
            typ: String,
        }
        assert_eq!(headers.decode::<Typ>().unwrap().typ, "JOSE");
    }

    #[test]
    fn default_header_and_json_payload() {
        let jws = hs256();
        let token = jws.encode(json!({"foo": "bar"}), None, false).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert!(token.starts_with("eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9."));

        let decoded = jws.decode(&token).unwrap();
        assert_eq!(decoded.header_bytes(), br#"{"typ":"JWT","alg":"HS256"}"#);
        assert_eq!(decoded.payload(), br#"{"foo":"bar"}"#);
        assert_eq!(decoded.decode_payload::<Value>().unwrap(), json!({"foo": "bar"}));
    }

    #[test]
    fn alg_is_overwritten_and_kid_injected() {
        let key = OctKey::new(vec![1; 32]).with_kid("key-1");
        let jws = JWS::new(Hmac::new(key, JWA::HS256).unwrap());

        let headers = Headers::new().with_header("alg", "none");
        let token = jws.encode("text", Some(headers), false).unwrap();
        let decoded = jws.decode(&token).unwrap();
        assert_eq!(decoded.header_bytes(), br#"{"alg":"HS256","kid":"key-1"}"#);
        assert_eq!(decoded.payload(), b"text");

        let headers = Headers::new().with_header("kid", "given");
        let token = jws.encode("text", Some(headers), true).unwrap();
        let (header, payload) = jws.decode(&token).unwrap().into_parts();
        assert_eq!(header, br#"{"kid":"given","alg":"HS256"}"#);
        assert_eq!(payload, br#""text""#);
    }

    #[test]
    fn binary_payload_passes_through() {
        let jws = hs256();
        let token = jws.encode(vec![0, 159, 146, 150], None, true).unwrap();
        assert_eq!(jws.decode(&token).unwrap().payload(), &[0, 159, 146, 150]);
    }

    #[test]
    fn segment_count_is_checked() {
        let jws = hs256();
        let token = jws.encode(json!({}), None, false).unwrap();
        for bad in ["", "a.b", "a.b.c.d", &format!("{token}.x")] {
            let err = assert_err!(jws.decode(bad));
            assert_eq!(err.kind(), ErrorKind::MalformedInput);
        }
    }

    #[test]
    fn wrong_key_fails_verification() {
        let token = hs256().encode(json!({}), None, false).unwrap();
        let other = JWS::new(Hmac::new(OctKey::new(vec![2; 32]), JWA::HS256).unwrap());
        let err = assert_err!(other.decode(&token));
        assert_eq!(err.kind(), ErrorKind::Verification);
    }

    #[test]
    fn alg_header_must_match() {
        let jws = hs256();
        for alg in [json!("HS512"), json!(1)] {
            let headers = Headers::new().with_header("alg", alg);
            let header = base64url_encode(json_encode(&headers).unwrap());
            let signing_input = format!("{header}.e30");
            let signature = jws.algorithm().sign(signing_input.as_bytes()).unwrap();
            let token = format!("{signing_input}.{}", base64url_encode(signature));
            let err = assert_err!(jws.decode(&token));
            assert_eq!(err.kind(), ErrorKind::Verification);
        }

        // no alg at all is accepted
        let signing_input = format!("{}.e30", base64url_encode(b"{}"));
        let signature = jws.algorithm().sign(signing_input.as_bytes()).unwrap();
        assert_ok!(jws.decode(&format!("{signing_input}.{}", base64url_encode(signature))));
    }

    #[test]
    fn header_must_be_an_object() {
        let jws = hs256();
        let signing_input = format!("{}.e30", base64url_encode(b"[1]"));
        let signature = jws.algorithm().sign(signing_input.as_bytes()).unwrap();
        let err = assert_err!(jws.decode(&format!("{signing_input}.{}", base64url_encode(signature))));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn every_bit_flip_is_detected() {
        let jws = hs256();
        let token = jws.encode(json!({"sub": "x"}), None, false).unwrap();
        let raw: Vec<_> = token.split('.').map(|s| base64url_decode(s).unwrap()).collect();
        for segment in 0..3 {
            for index in 0..raw[segment].len() {
                for bit in 0..8 {
                    let mut parts = raw.clone();
                    parts[segment][index] ^= 1 << bit;
                    let tampered = parts
                        .iter()
                        .map(base64url_encode)
                        .collect::<Vec<_>>()
                        .join(".");
                    assert_err!(jws.decode(&tampered), "segment {segment} octet {index} bit {bit}");
                }
            }
        }
    }
}
