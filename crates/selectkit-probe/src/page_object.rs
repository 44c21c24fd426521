//! Page Object Model support
//!
//! Page objects wrap the locators and tasks of one component so tests talk
//! about "the dropdown's selected options" instead of CSS classes.

use crate::page::Page;

/// Trait for page objects representing a component in the UI.
///
/// # Example
///
/// ```rust
/// use selectkit_probe::prelude::*;
///
/// struct Banner {
///     root: Locator,
/// }
///
/// impl PageObject for Banner {
///     fn component_name(&self) -> &str {
///         "banner"
///     }
///
///     fn is_loaded(&self, page: &Page) -> bool {
///         page.is_visible(&self.root).unwrap_or(false)
///     }
/// }
///
/// let banner = Banner { root: Locator::new(".banner") };
/// assert!(!banner.is_loaded(&Page::new()));
/// ```
pub trait PageObject {
    /// Name used in task descriptions and logs
    fn component_name(&self) -> &str;

    /// Check if the component is rendered and ready for interaction
    fn is_loaded(&self, page: &Page) -> bool {
        let _ = page;
        true
    }
}
