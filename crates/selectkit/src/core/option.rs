//! Selectable options

use serde::{Deserialize, Serialize};
use std::fmt;

/// One selectable choice: a machine value and a human label.
///
/// `value` is the identity of an option within one option set; two options
/// with the same value are the same option as far as selection is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DropdownOption {
    /// Unique key within one option set
    pub value: String,
    /// Display text
    pub label: String,
}

impl DropdownOption {
    /// Creates an option from a value and a label
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Creates an option whose value is the lowercased label
    #[must_use]
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            value: label.to_lowercase(),
            label,
        }
    }

    /// Returns true if both options share the same value
    #[must_use]
    pub fn same_value(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Display for DropdownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Builds an option list from labels, deriving each value from its label
#[must_use]
pub fn options_from_labels<I, S>(labels: I) -> Vec<DropdownOption>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    labels.into_iter().map(DropdownOption::from_label).collect()
}
