//! Result and error types for selectkit-probe.

use selectkit::error::DropdownError;
use thiserror::Error;

/// Result type for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving or asserting on a page
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A CSS selector could not be parsed
    #[error("Invalid selector {selector:?}: {reason}")]
    InvalidSelector {
        /// The selector as written
        selector: String,
        /// What is wrong with it
        reason: String,
    },

    /// A locator resolved to nothing
    #[error("Element not found: {locator}")]
    ElementNotFound {
        /// Locator description
        locator: String,
    },

    /// A strict locator resolved to more than one element
    #[error("Strict mode violation: {locator} resolved to {count} elements")]
    StrictModeViolation {
        /// Locator description
        locator: String,
        /// Number of matches
        count: usize,
    },

    /// Operation timed out
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// What was waited for
        waited_for: String,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Harness configuration could not be parsed
    #[error("Invalid harness configuration: {0}")]
    Config(#[from] serde_yaml_ng::Error),

    /// Notes could not be (de)serialized
    #[error("Note serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The widget or document rejected an operation
    #[error(transparent)]
    Widget(#[from] DropdownError),
}

impl ProbeError {
    /// Shorthand for [`ProbeError::AssertionFailed`]
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }
}
