//! # JOSE: JSON Object Signing and Encryption
//!
//! JOSE is an IETF standard for securely transferring data between parties using JSON.
//! This module implements the signing half of it:
//!
//! * JWS (JSON Web Signature): a compact `header.payload.signature` token where every
//!   segment is base64url encoded and the signature covers the first two segments.
//!   See [`rfc7515`] for more details.
//!
//! * JWK (JSON Web Key): a JSON format for representing cryptographic keys. Keys can be
//!   converted to and from the classic PEM/DER binary encodings (PKCS#1, RFC 5915, SPKI).
//!   See [`rfc7517`] for more details.
//!
//! * JWA (JSON Web Algorithm): the identifiers of the algorithms used for signing.
//!   The `alg` parameter in the JOSE header names the algorithm that was used, but
//!   it is never used to pick the verification algorithm. See [`rfc7518`] and
//!   [`rfc8037`] for more details.
//!
//! JWE (JSON Web Encryption, [`rfc7516`]) is not implemented, only the
//! [`EncryptionAlgorithm`] contract exists.
//!
//! # Example
//!
//! ```
//! use rjose_crypto::jose::{Headers, JWA, JWS, Jwk, OctKey, Payload, Signer};
//! use serde_json::json;
//!
//! let key = OctKey::from_json(r#"{"kty":"oct","k":"MDEyMzQ1Njc4OTAxMjM0NTY3ODkwMTIzNDU2Nzg5MDE"}"#)?;
//! let jws = JWS::new(Signer::new(Jwk::Oct(key), JWA::HS256)?);
//!
//! let token = jws.encode(Payload::from(json!({"foo": "bar"})), None, false)?;
//! let decoded = jws.decode(&token)?;
//!
//! assert_eq!(decoded.payload(), br#"{"foo":"bar"}"#);
//! assert_eq!(decoded.header_bytes(), br#"{"typ":"JWT","alg":"HS256"}"#);
//! # Ok::<_, rjose_crypto::jose::JoseError>(())
//! ```
//!
//! [`rfc7515`]: https://datatracker.ietf.org/doc/html/rfc7515
//! [`rfc7516`]: https://datatracker.ietf.org/doc/html/rfc7516
//! [`rfc7517`]: https://datatracker.ietf.org/doc/html/rfc7517
//! [`rfc7518`]: https://datatracker.ietf.org/doc/html/rfc7518
//! [`rfc8037`]: https://datatracker.ietf.org/doc/html/rfc8037

mod error;
pub use error::{ErrorKind, JoseError};

pub mod codec;

mod constants;

pub mod der;

mod jwa;
pub use jwa::{HashAlg, JWA, JWAFamily};

mod jwk;
pub use jwk::{EcKey, Jwk, JwkCurve, JwkSet, OctKey, OkpKey, ParsedJwk, RsaKey};

mod sig;
pub use sig::{EcDsa, EdDsa, Hmac, Rsa, RsaPss, SignatureAlgorithm, Signer};

mod jws;
pub use jws::{DecodedJws, Headers, JWS, Payload};

pub mod jwe;
pub use jwe::EncryptionAlgorithm;
