//! 🔏 rjose signs and verifies compact JSON Web Signatures and converts
//! JSON Web Keys to and from the binary key formats around them.
//!
//! | category | support list |
//! |-|-|
//! | ✅ [JWS](crate::jose::JWS) | ✅ compact serialization ⸱ ✅ `alg` pinning ⸱ ✅ `kid` injection |
//! | ✅ [JWA](crate::jose::JWA) | ✅ `HS256/384/512` ⸱ ✅ `RS256/384/512` ⸱ ✅ `PS256/384/512` ⸱ ✅ `ES256/256K/384/512` ⸱ ✅ `EdDSA` (Ed25519) |
//! | ✅ [JWK](crate::jose::Jwk) | ✅ `RSA` ⸱ ✅ `EC` ⸱ ✅ `oct` ⸱ ✅ `OKP` ⸱ ✅ [sets](crate::jose::JwkSet) ⸱ ✅ RFC 7638 thumbprints |
//! | ✅ binary keys | ✅ PKCS#1 ⸱ ✅ RFC 5915 ⸱ ✅ SPKI ⸱ ✅ PKCS#8 (read) ⸱ ✅ PEM |
//! | ✅ key generation | ✅ RSA ⸱ ✅ EC ⸱ ✅ symmetric ⸱ ✅ Ed25519 |
//! | ❌ JWE | ❌ [placeholder only](crate::jose::jwe) |
//!
//! The cryptographic primitives are provided by [`aws-lc-rs`], this crate
//! adds the JOSE formats, the DER codecs and the RSASSA-PSS padding on top.
//!
//! # Example
//!
//! ```
//! use rjose::jose::{EcKey, JWA, JWS, JwkCurve, Payload, Signer};
//!
//! let key = EcKey::generate(JwkCurve::P256)?.with_kid("my-key");
//! let jws = JWS::new(Signer::new(key.into(), JWA::ES256)?);
//!
//! let token = jws.encode(Payload::from("hello"), None, false)?;
//! let decoded = jws.decode(&token)?;
//! assert_eq!(decoded.payload(), b"hello");
//! assert_eq!(decoded.header_bytes(), br#"{"typ":"JWT","alg":"ES256","kid":"my-key"}"#);
//! # Ok::<_, rjose::jose::JoseError>(())
//! ```
//!
//! [`aws-lc-rs`]: https://docs.rs/aws-lc-rs

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(test), warn(clippy::print_stdout, clippy::dbg_macro))]

#[doc(inline)]
pub use ::rjose_error as error;

#[doc(inline)]
pub use ::rjose_crypto::{dep, jose};
