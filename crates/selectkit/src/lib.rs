//! selectkit - Single/Multi-Select Dropdown Widget
//!
//! A dropdown that shows a placeholder until something is selected, opens
//! an options panel on click, closes it on selection or on a click anywhere
//! outside the widget, and reports every selection change through a
//! callback.
//!
//! The widget renders into a headless [`Document`](dom::Document), so every
//! interaction can be driven and asserted deterministically without a
//! browser.
//!
//! # Example
//!
//! ```rust
//! use selectkit::prelude::*;
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let widget = Dropdown::builder()
//!     .option("first", "First")
//!     .option("second", "Second")
//!     .allow_multiple(true)
//!     .build()
//!     .mount(&mut doc, body)
//!     .unwrap();
//!
//! let input = doc.find_by_class(class::INPUT)[0];
//! doc.click(input).unwrap();
//! assert!(widget.visibility().is_expanded());
//!
//! let second = doc.find_by_class(class::AVAILABLE_OPTION)[1];
//! doc.click(second).unwrap();
//! assert_eq!(widget.selection().labels(), vec!["Second"]);
//! assert!(!widget.visibility().is_expanded());
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod core;
pub mod dom;
pub mod error;
pub mod render;
pub mod widget;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{DropdownConfig, DEFAULT_PLACEHOLDER};
    pub use crate::core::controller::reduce;
    pub use crate::core::option::options_from_labels;
    pub use crate::core::{
        DropdownEvent, DropdownOption, DropdownState, Selection, SelectionMode, Transition,
        Visibility,
    };
    pub use crate::dom::{ClickEvent, DispatchOutcome, Document, Element, ListenerGuard, NodeId};
    pub use crate::error::{DropdownError, DropdownResult};
    pub use crate::render::{class, render, VNode};
    pub use crate::widget::{ChangeCallback, Dropdown, DropdownBuilder, MountedDropdown};
}
