//! Error utilities for rjose.
//!
//! The [`BoxError`] type is a type-erased error type that can be used to represent any error that
//! implements the `std::error::Error` trait and is used for cases where it is usually not
//! that important what specific error type is returned, but rather that an error occurred.
//!
//! [`OpaqueError`] wraps such a boxed error in a concrete type, and the [`ErrorContext`] and
//! [`ErrorExt`] extension traits allow adding human readable context while keeping the
//! original error reachable through [`std::error::Error::source`].
//!
//! # Example
//!
//! ```
//! use rjose_error::{ErrorContext, ErrorExt};
//!
//! let error = "x".parse::<u8>().context("parse key size").unwrap_err();
//! assert_eq!("parse key size: invalid digit found in string", error.to_string());
//! assert!(error.root_cause().is::<std::num::ParseIntError>());
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(test), warn(clippy::print_stdout, clippy::dbg_macro))]

/// Alias for a type-erased error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

mod ext;
pub use ext::{ErrorContext, ErrorExt, OpaqueError};
