//! Crypto primitives and formats used by rjose.
//!
//! This includes but is not limited to:
//! - Javascript object signing (JOSE): JWS, JWK, JWA
//! - Hand built ASN.1 DER codecs for RSA and elliptic curve keys
//! - Transcoding of ECDSA signatures between fixed width and DER form
//! - RSASSA-PSS padding on top of arbitrary precision integers
//!
//! All primitive operations (hashing, HMAC, RSA, ECDSA, Ed25519, randomness)
//! are delegated to [`aws-lc-rs`].
//!
//! [`aws-lc-rs`]: https://docs.rs/aws-lc-rs

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(test), warn(clippy::print_stdout, clippy::dbg_macro))]

pub mod jose;

pub mod dep {
    //! Dependencies for rjose crypto modules.
    //!
    //! Exported for your convenience

    pub mod aws_lc_rs {
        //! Re-export of the [`aws-lc-rs`] crate.
        //!
        //! [`aws-lc-rs`]: https://docs.rs/aws-lc-rs

        #[doc(inline)]
        pub use aws_lc_rs::*;
    }

    pub mod serde_json {
        //! Re-export of the [`serde_json`] crate.
        //!
        //! [`serde_json`]: https://docs.rs/serde_json

        #[doc(inline)]
        pub use serde_json::*;
    }
}
