//! Ordered selection state
//!
//! Insertion order is selection order. Values are unique. Every operation
//! that changes the selection returns a new `Selection`, leaving the receiver
//! untouched, so the sequence handed to change listeners is never mutated
//! behind their back.

use super::option::DropdownOption;
use serde::{Deserialize, Serialize};

/// The options currently chosen, in the order they were chosen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    options: Vec<DropdownOption>,
}

impl Selection {
    /// Creates an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a selection from options, keeping the first of any duplicate values
    #[must_use]
    pub fn from_options(options: impl IntoIterator<Item = DropdownOption>) -> Self {
        let mut selection = Self::new();
        for option in options {
            if !selection.contains(&option) {
                selection.options.push(option);
            }
        }
        selection
    }

    /// Returns true if nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Returns the number of selected options
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns true if an option with the same value is selected
    #[must_use]
    pub fn contains(&self, option: &DropdownOption) -> bool {
        self.contains_value(&option.value)
    }

    /// Returns true if an option with this value is selected
    #[must_use]
    pub fn contains_value(&self, value: &str) -> bool {
        self.options.iter().any(|current| current.value == value)
    }

    /// Position of the option with this value, if selected
    #[must_use]
    pub fn position(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|current| current.value == value)
    }

    /// Returns a copy with `option` appended last, or an identical copy if
    /// its value is already present
    #[must_use]
    pub fn with(&self, option: &DropdownOption) -> Self {
        let mut options = self.options.clone();
        if !self.contains(option) {
            options.push(option.clone());
        }
        Self { options }
    }

    /// Returns a copy without the option sharing `option`'s value
    #[must_use]
    pub fn without(&self, option: &DropdownOption) -> Self {
        Self {
            options: self
                .options
                .iter()
                .filter(|current| !current.same_value(option))
                .cloned()
                .collect(),
        }
    }

    /// Returns a selection holding only `option`
    #[must_use]
    pub fn only(option: &DropdownOption) -> Self {
        Self {
            options: vec![option.clone()],
        }
    }

    /// Selected options as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[DropdownOption] {
        &self.options
    }

    /// Iterates over the selected options in selection order
    pub fn iter(&self) -> std::slice::Iter<'_, DropdownOption> {
        self.options.iter()
    }

    /// Labels in selection order
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }

    /// Values in selection order
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.value.as_str()).collect()
    }

    /// Consumes the selection, returning the options
    #[must_use]
    pub fn into_vec(self) -> Vec<DropdownOption> {
        self.options
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a DropdownOption;
    type IntoIter = std::slice::Iter<'a, DropdownOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

impl From<Vec<DropdownOption>> for Selection {
    fn from(options: Vec<DropdownOption>) -> Self {
        Self::from_options(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(label: &str) -> DropdownOption {
        DropdownOption::from_label(label)
    }

    #[test]
    fn test_selection_new_is_empty() {
        let selection = Selection::new();
        assert!(selection.is_empty());
        assert_eq!(selection.len(), 0);
    }

    #[test]
    fn test_from_options_drops_duplicates() {
        let selection = Selection::from_options(vec![opt("A"), opt("B"), opt("A")]);
        assert_eq!(selection.labels(), vec!["A", "B"]);
    }

    #[test]
    fn test_with_appends_last() {
        let selection = Selection::from_options(vec![opt("First")]).with(&opt("Third"));
        assert_eq!(selection.labels(), vec!["First", "Third"]);
    }

    #[test]
    fn test_with_existing_is_unchanged() {
        let selection = Selection::from_options(vec![opt("First")]);
        assert_eq!(selection.with(&opt("First")), selection);
    }

    #[test]
    fn test_with_leaves_original_untouched() {
        let original = Selection::from_options(vec![opt("First")]);
        let _extended = original.with(&opt("Second"));
        assert_eq!(original.len(), 1);
    }

    #[test]
    fn test_without_matches_by_value() {
        let selection = Selection::from_options(vec![opt("First"), opt("Second")]);
        let relabelled = DropdownOption::new("first", "whatever");
        assert_eq!(selection.without(&relabelled).labels(), vec!["Second"]);
    }

    #[test]
    fn test_without_missing_is_noop() {
        let selection = Selection::from_options(vec![opt("First")]);
        assert_eq!(selection.without(&opt("Other")), selection);
    }

    #[test]
    fn test_position_and_contains_value() {
        let selection = Selection::from_options(vec![opt("First"), opt("Third")]);
        assert_eq!(selection.position("third"), Some(1));
        assert!(selection.contains_value("first"));
        assert!(!selection.contains_value("second"));
    }

    #[test]
    fn test_only() {
        let selection = Selection::only(&opt("Second"));
        assert_eq!(selection.values(), vec!["second"]);
    }

    #[test]
    fn test_serializes_as_array() {
        let selection = Selection::from_options(vec![opt("First")]);
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"[{"value":"first","label":"First"}]"#);
    }

    #[test]
    fn test_iteration_order() {
        let selection = Selection::from_options(vec![opt("C"), opt("A"), opt("B")]);
        let labels: Vec<&str> = (&selection).into_iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["C", "A", "B"]);
    }
}
