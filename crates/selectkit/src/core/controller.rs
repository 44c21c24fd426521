//! Interaction controller
//!
//! Pure transitions over [`DropdownState`]. Each operation takes the current
//! state and returns the next state plus, for selection changes, the
//! selection to hand to the change listener. Nothing here touches the
//! document.
//!
//! ```text
//! collapsed --toggle--> expanded --toggle--> collapsed
//! expanded --select--> collapsed
//! any --outside-click--> collapsed
//! ```

use super::option::DropdownOption;
use super::selection::Selection;
use super::{DropdownState, SelectionMode, Visibility};
use tracing::debug;

/// An input the controller reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownEvent {
    /// Click on the control surface
    TogglePanel,
    /// Click anywhere outside the widget
    OutsideClick,
    /// Click on an available option
    Select(DropdownOption),
    /// Click on a selected option's removal control
    Deselect(DropdownOption),
}

impl DropdownEvent {
    /// Short name used in logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TogglePanel => "toggle-panel",
            Self::OutsideClick => "outside-click",
            Self::Select(_) => "select-option",
            Self::Deselect(_) => "deselect-option",
        }
    }
}

/// Next state and optional change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the event
    pub state: DropdownState,
    /// Full new selection to pass to the change listener, if any
    pub notification: Option<Selection>,
}

impl Transition {
    fn silent(state: DropdownState) -> Self {
        Self {
            state,
            notification: None,
        }
    }

    fn notifying(state: DropdownState) -> Self {
        let notification = Some(state.selection.clone());
        Self {
            state,
            notification,
        }
    }
}

/// Flips visibility. Selection is untouched and nobody is notified.
#[must_use]
pub fn toggle_panel(state: &DropdownState) -> Transition {
    Transition::silent(DropdownState {
        selection: state.selection.clone(),
        visibility: state.visibility.toggled(),
    })
}

/// Collapses the panel whatever its current visibility
#[must_use]
pub fn outside_click(state: &DropdownState) -> Transition {
    Transition::silent(DropdownState {
        selection: state.selection.clone(),
        visibility: Visibility::Collapsed,
    })
}

/// Selects `option`, or deselects it when it is already selected.
///
/// In [`SelectionMode::Multiple`] a newly selected option is appended after
/// the existing ones. In [`SelectionMode::Single`] it replaces them. The
/// panel always collapses.
#[must_use]
pub fn select_option(
    state: &DropdownState,
    option: &DropdownOption,
    mode: SelectionMode,
) -> Transition {
    let selection = if state.selection.contains(option) {
        state.selection.without(option)
    } else {
        match mode {
            SelectionMode::Multiple => state.selection.with(option),
            SelectionMode::Single => Selection::only(option),
        }
    };

    Transition::notifying(DropdownState {
        selection,
        visibility: Visibility::Collapsed,
    })
}

/// Removes the option sharing `option`'s value.
///
/// Deselecting an option that is not selected leaves the selection as it
/// was but still notifies.
#[must_use]
pub fn deselect_option(state: &DropdownState, option: &DropdownOption) -> Transition {
    Transition::notifying(DropdownState {
        selection: state.selection.without(option),
        visibility: state.visibility,
    })
}

/// Routes an event to its transition
#[must_use]
pub fn reduce(state: &DropdownState, event: &DropdownEvent, mode: SelectionMode) -> Transition {
    let transition = match event {
        DropdownEvent::TogglePanel => toggle_panel(state),
        DropdownEvent::OutsideClick => outside_click(state),
        DropdownEvent::Select(option) => select_option(state, option, mode),
        DropdownEvent::Deselect(option) => deselect_option(state, option),
    };

    debug!(
        event = event.kind(),
        from = ?state.visibility,
        to = ?transition.state.visibility,
        selected = transition.state.selection.len(),
        "dropdown transition"
    );

    transition
}
