//! Server error types with context and recovery suggestions.

use std::io;

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Error type for server operations with context and recovery suggestions.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the configured address.
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Runtime server error.
    #[error("Runtime error: {0}")]
    Runtime(#[source] io::Error),
}

impl ServerError {
    /// Creates a bind error with address context.
    pub fn bind_error(address: &str, source: io::Error) -> Self {
        Self::Bind {
            address: address.to_owned(),
            source,
        }
    }

    /// Returns a unique error code for this error type.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Bind { .. } => "E001",
            Self::Runtime(_) => "E002",
        }
    }

    /// Returns the underlying IO error.
    pub fn io_error(&self) -> &io::Error {
        match self {
            Self::Bind { source, .. } => source,
            Self::Runtime(err) => err,
        }
    }

    /// Determines if this error is potentially recoverable.
    ///
    /// Recoverable errors are those that might succeed if retried or
    /// if the environment changes (e.g., different port, wait for resource).
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Bind { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::PermissionDenied
                    | io::ErrorKind::AddrInUse
                    | io::ErrorKind::AddrNotAvailable
            ),
            Self::Runtime(err) => matches!(
                err.kind(),
                io::ErrorKind::Interrupted
                    | io::ErrorKind::TimedOut
                    | io::ErrorKind::ConnectionRefused
            ),
        }
    }

    /// Provides a human-readable suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Bind { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => {
                    Some("Try using a port above 1024 or run with appropriate privileges")
                }
                io::ErrorKind::AddrInUse => Some(
                    "The port is already in use. Change API_PORT or stop the conflicting service",
                ),
                io::ErrorKind::AddrNotAvailable => {
                    Some("The address is not available. Check API_HOST and network interfaces")
                }
                _ => Some("Check API_HOST, API_PORT and firewall settings"),
            },
            Self::Runtime(err) => match err.kind() {
                io::ErrorKind::PermissionDenied => Some("Check file and network permissions"),
                io::ErrorKind::Interrupted => Some("The operation was interrupted, you may retry"),
                io::ErrorKind::TimedOut => {
                    Some("The operation timed out, consider increasing timeout values")
                }
                _ => None,
            },
        }
    }

    /// Returns contextual information about this error as key-value pairs.
    ///
    /// This is useful for structured logging and debugging.
    pub fn context(&self) -> Vec<(&'static str, String)> {
        let mut context = vec![("error_code", self.error_code().to_owned())];

        if let Some(suggestion) = self.suggestion() {
            context.push(("suggestion", suggestion.to_owned()));
        }

        context.push(("recoverable", self.is_recoverable().to_string()));
        context.push(("io_error_kind", format!("{:?}", self.io_error().kind())));

        if let Self::Bind { address, .. } = self {
            context.push(("address", address.clone()));
        }

        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_unique() {
        let bind_err = ServerError::bind_error("0.0.0.0:8000", io::Error::other("test"));
        let runtime_err = ServerError::Runtime(io::Error::other("test"));

        assert_ne!(bind_err.error_code(), runtime_err.error_code());
    }

    #[test]
    fn address_in_use_is_recoverable() {
        let bind_err = ServerError::bind_error(
            "0.0.0.0:8000",
            io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        );

        assert!(bind_err.is_recoverable());
        assert!(bind_err.suggestion().is_some_and(|s| s.contains("API_PORT")));
        assert!(bind_err.to_string().contains("0.0.0.0:8000"));
    }

    #[test]
    fn runtime_errors_without_suggestion() {
        let runtime_err = ServerError::Runtime(io::Error::other("test"));

        assert!(!runtime_err.is_recoverable());
        assert!(runtime_err.suggestion().is_none());
    }

    #[test]
    fn context_includes_all_relevant_fields() {
        let bind_err = ServerError::bind_error(
            "127.0.0.1:80",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );

        let context = bind_err.context();
        let context_keys: Vec<&str> = context.iter().map(|(k, _)| *k).collect();

        assert!(context_keys.contains(&"error_code"));
        assert!(context_keys.contains(&"suggestion"));
        assert!(context_keys.contains(&"recoverable"));
        assert!(context_keys.contains(&"address"));
        assert!(context_keys.contains(&"io_error_kind"));
    }
}
