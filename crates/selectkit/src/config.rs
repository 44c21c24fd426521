//! Dropdown configuration
//!
//! Plain data: placeholder, candidate options and the multi-select flag.
//! The change callback is not configuration and lives on
//! [`Dropdown`](crate::widget::Dropdown).

use crate::core::{DropdownOption, SelectionMode};
use crate::error::{DropdownError, DropdownResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placeholder shown when nothing is selected
pub const DEFAULT_PLACEHOLDER: &str = "Select option";

/// Configuration of one dropdown instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropdownConfig {
    /// Text shown while the selection is empty
    pub placeholder: String,
    /// Full candidate set, values expected to be unique
    pub options: Vec<DropdownOption>,
    /// Render removal controls and append on select
    pub allow_multiple: bool,
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            options: Vec::new(),
            allow_multiple: false,
        }
    }
}

impl DropdownConfig {
    /// Creates a configuration over the given options
    #[must_use]
    pub fn new(options: Vec<DropdownOption>) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Sets the placeholder text
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Replaces the candidate options
    #[must_use]
    pub fn with_options(mut self, options: Vec<DropdownOption>) -> Self {
        self.options = options;
        self
    }

    /// Enables or disables multi-select
    #[must_use]
    pub const fn with_allow_multiple(mut self, allow_multiple: bool) -> Self {
        self.allow_multiple = allow_multiple;
        self
    }

    /// Selection mode derived from `allow_multiple`
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        SelectionMode::from_allow_multiple(self.allow_multiple)
    }

    /// Looks up a configured option by value
    #[must_use]
    pub fn option_by_value(&self, value: &str) -> Option<&DropdownOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// Checks that option values are unique.
    ///
    /// The widget never calls this itself; duplicate values give undefined
    /// selection behavior.
    pub fn validate(&self) -> DropdownResult<()> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for option in &self.options {
            if let Some(first_label) = seen.insert(option.value.as_str(), option.label.as_str()) {
                return Err(DropdownError::DuplicateOptionValue {
                    value: option.value.clone(),
                    first_label: first_label.to_string(),
                    second_label: option.label.clone(),
                });
            }
        }
        Ok(())
    }

    /// Parses a configuration from YAML. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> DropdownResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Serializes the configuration to YAML
    pub fn to_yaml_string(&self) -> DropdownResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}
