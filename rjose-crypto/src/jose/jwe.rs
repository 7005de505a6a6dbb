//! JSON Web Encryption, [`rfc7516`].
//!
//! Not implemented. [`EncryptionAlgorithm`] only reserves the seam key
//! management and content encryption algorithms ([`rfc7518`] sections 4
//! and 5) will plug into.
//!
//! [`rfc7516`]: https://datatracker.ietf.org/doc/html/rfc7516
//! [`rfc7518`]: https://datatracker.ietf.org/doc/html/rfc7518

/// An `alg` or `enc` algorithm of JSON Web Encryption.
pub trait EncryptionAlgorithm {
    /// The identifier as used in the JOSE header, e.g. `RSA-OAEP` or `A256GCM`.
    fn identifier(&self) -> &str;
}
