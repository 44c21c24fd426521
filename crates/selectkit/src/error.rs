//! Result and error types for selectkit.
//!
//! The interaction controller is total and never fails. These errors only
//! surface at the edges: configuration loading/validation and document
//! operations addressed at nodes that no longer exist.

use thiserror::Error;

/// Result type for selectkit operations
pub type DropdownResult<T> = Result<T, DropdownError>;

/// Errors that can occur while configuring or mounting a dropdown
#[derive(Debug, Error)]
pub enum DropdownError {
    /// Two configured options share the same value
    #[error("Duplicate option value {value:?} (labels {first_label:?} and {second_label:?})")]
    DuplicateOptionValue {
        /// The shared value
        value: String,
        /// Label of the first option carrying the value
        first_label: String,
        /// Label of the second option carrying the value
        second_label: String,
    },

    /// Configuration could not be parsed
    #[error("Invalid dropdown configuration: {0}")]
    Config(#[from] serde_yaml_ng::Error),

    /// A node id did not resolve to a live element
    #[error("Unknown node: {id}")]
    UnknownNode {
        /// Raw key of the node
        id: u64,
    },
}
