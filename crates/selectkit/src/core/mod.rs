//! Dropdown model and interaction rules
//!
//! - [`option`]: the immutable value/label pair
//! - [`selection`]: ordered, duplicate-free selection state
//! - [`controller`]: pure event → state transitions

pub mod controller;
pub mod option;
pub mod selection;

pub use controller::{DropdownEvent, Transition};
pub use option::DropdownOption;
pub use selection::Selection;

use serde::{Deserialize, Serialize};

/// Whether the options panel is shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Options panel hidden
    #[default]
    Collapsed,
    /// Options panel shown
    Expanded,
}

impl Visibility {
    /// Returns true when the panel is shown
    #[must_use]
    pub const fn is_expanded(self) -> bool {
        matches!(self, Self::Expanded)
    }

    /// The opposite visibility
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }
}

/// How selecting a not-yet-selected option combines with the current selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// The new option replaces the selection
    #[default]
    Single,
    /// The new option is appended to the selection
    Multiple,
}

impl SelectionMode {
    /// Maps the `allow_multiple` configuration flag to a mode
    #[must_use]
    pub const fn from_allow_multiple(allow_multiple: bool) -> Self {
        if allow_multiple {
            Self::Multiple
        } else {
            Self::Single
        }
    }

    /// Whether per-item removal controls are rendered
    #[must_use]
    pub const fn allows_multiple(self) -> bool {
        matches!(self, Self::Multiple)
    }
}

/// Everything a widget instance remembers between events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownState {
    /// Selected options in selection order
    pub selection: Selection,
    /// Whether the options panel is shown
    pub visibility: Visibility,
}

impl DropdownState {
    /// Initial state: nothing selected, panel collapsed
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
