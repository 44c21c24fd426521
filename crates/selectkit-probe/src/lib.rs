//! selectkit-probe: component testing for selectkit dropdowns
//!
//! Drives mounted widgets through a headless [`Page`](page::Page):
//!
//! - [`locator`]: strict, scoped CSS-subset locators
//! - [`wait`]: polling waits with timeouts
//! - [`actor`] and [`task`]: actors performing described tasks
//! - [`ensure`]: immediate and eventual assertions
//! - [`dropdown`]: the [`DropdownComponent`](dropdown::DropdownComponent) page object
//! - [`config`]: harness settings loaded from YAML
//!
//! # Example
//!
//! ```rust
//! use selectkit::prelude::*;
//! use selectkit_probe::prelude::*;
//!
//! let mut actor = Actor::new();
//! let root = actor
//!     .page_mut()
//!     .mount(
//!         Dropdown::builder()
//!             .options(options_from_labels(["First", "Second", "Third"]))
//!             .allow_multiple(true)
//!             .build(),
//!     )
//!     .unwrap();
//! let dropdown = DropdownComponent::from(root);
//!
//! actor
//!     .attempts_to(&[dropdown.select(&["First", "Third"])])
//!     .unwrap();
//! assert_eq!(
//!     dropdown.selected_option_labels(actor.page()).unwrap(),
//!     vec!["First", "Third"]
//! );
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod actor;
pub mod config;
pub mod dropdown;
pub mod ensure;
pub mod locator;
pub mod logging;
pub mod page;
pub mod page_object;
pub mod result;
pub mod task;
pub mod wait;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actor::{Actor, Notes, DEFAULT_ACTOR_NAME};
    pub use crate::config::HarnessConfig;
    pub use crate::dropdown::DropdownComponent;
    pub use crate::ensure::Ensure;
    pub use crate::locator::{CssSelector, Locator, Selector};
    pub use crate::logging::init_test_logging;
    pub use crate::page::Page;
    pub use crate::page_object::PageObject;
    pub use crate::result::{ProbeError, ProbeResult};
    pub use crate::task::{click_on, click_outside, wait_until_visible, Task};
    pub use crate::wait::{wait_until, WaitOptions, WaitResult, Waiter};
}
