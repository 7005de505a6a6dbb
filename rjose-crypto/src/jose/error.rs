use std::fmt;

use rjose_error::{BoxError, ErrorContext as _};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Classification of a [`JoseError`].
///
/// Callers must treat [`ErrorKind::MalformedInput`] and [`ErrorKind::Verification`]
/// alike as "do not trust this token", the split only exists for diagnostics.
pub enum ErrorKind {
    /// Unsupported algorithm, key/algorithm mismatch, unsupported curve or key type,
    /// undersized key, multi-prime RSA.
    Configuration,
    /// Token, base64url, PEM or DER input that cannot be parsed.
    MalformedInput,
    /// Signature mismatch or an `alg` header that disagrees with the bound algorithm.
    Verification,
    /// The cryptographic provider refused an operation.
    Provider,
}

impl ErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration error",
            Self::MalformedInput => "malformed input",
            Self::Verification => "verification failed",
            Self::Provider => "provider error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by all fallible JOSE operations.
pub struct JoseError {
    kind: ErrorKind,
    inner: BoxError,
}

impl JoseError {
    /// Create a new [`JoseError`] of the given kind.
    pub fn new(kind: ErrorKind, error: impl Into<BoxError>) -> Self {
        Self {
            kind,
            inner: error.into(),
        }
    }

    /// Create a [`ErrorKind::Configuration`] error.
    pub fn configuration(error: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::Configuration, error)
    }

    /// Create a [`ErrorKind::MalformedInput`] error.
    pub fn malformed(error: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::MalformedInput, error)
    }

    /// Create a [`ErrorKind::Verification`] error.
    pub fn verification(error: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::Verification, error)
    }

    /// Create a [`ErrorKind::Provider`] error.
    pub fn provider(error: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::Provider, error)
    }

    /// The [`ErrorKind`] of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Consume the error and return the wrapped cause.
    #[must_use]
    pub fn into_inner(self) -> BoxError {
        self.inner
    }
}

impl fmt::Debug for JoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoseError")
            .field("kind", &self.kind)
            .field("inner", &self.inner)
            .finish()
    }
}

impl fmt::Display for JoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.inner)
    }
}

impl std::error::Error for JoseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.inner)
    }
}

/// Attach context to a foreign error and classify it as a [`JoseError`].
pub(crate) trait JoseResultExt<T> {
    fn or_jose(self, kind: ErrorKind, context: &'static str) -> Result<T, JoseError>;
}

impl<T, E> JoseResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn or_jose(self, kind: ErrorKind, context: &'static str) -> Result<T, JoseError> {
        self.context(context)
            .map_err(|err| JoseError::new(kind, err))
    }
}
