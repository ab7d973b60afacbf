//! Custom error types for repo2prompt

use thiserror::Error;

/// Main error type for repo2prompt operations
///
/// Every variant is terminal for the request: nothing is retried and the
/// process exits with status 1.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PromptError {
    /// Validation Error - malformed or non-GitHub repository URL
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Clone Error - the git client exited with a failure
    #[error("Clone error: {message}")]
    Clone { message: String },

    /// Not Found Error - requested subdirectory is absent from the clone
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Invocation Error - the prompt generator failed or printed unusable output
    #[error("Invocation error: {message}")]
    Invocation { message: String },

    /// Configuration Error - unreadable or invalid configuration file
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Installation Error - a required external tool is not available
    #[error("Installation error: {message}")]
    Installation { message: String },
}

impl PromptError {
    /// Process exit code for this error
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        1
    }

    /// Create a validation error
    #[inline]
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a clone error
    #[inline]
    pub fn clone_failed<S: Into<String>>(message: S) -> Self {
        Self::Clone {
            message: message.into(),
        }
    }

    /// Create a not-found error
    #[inline]
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an invocation error
    #[inline]
    pub fn invocation<S: Into<String>>(message: S) -> Self {
        Self::Invocation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an installation error
    #[inline]
    pub fn installation<S: Into<String>>(message: S) -> Self {
        Self::Installation {
            message: message.into(),
        }
    }
}
