//! A headless page hosting mounted dropdowns
//!
//! [`Page`] owns the [`Document`] and every widget mounted into it, and
//! answers locator-based queries the way a browser page would.

use crate::locator::Locator;
use crate::result::ProbeResult;
use selectkit::dom::{DispatchOutcome, Document, Element};
use selectkit::widget::{Dropdown, MountedDropdown};
use tracing::debug;

/// A document plus the widgets living in it
#[derive(Debug, Default)]
pub struct Page {
    document: Document,
    widgets: Vec<MountedDropdown>,
}

impl Page {
    /// Creates an empty page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying document
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the underlying document
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Widgets mounted so far, in mount order
    #[must_use]
    pub fn widgets(&self) -> &[MountedDropdown] {
        &self.widgets
    }

    /// Mounts a dropdown at the end of the body and returns a locator for its root
    pub fn mount(&mut self, dropdown: Dropdown) -> ProbeResult<Locator> {
        let body = self.document.body();
        let widget = dropdown.mount(&mut self.document, body)?;
        let root = Locator::node(widget.root()).described_as("dropdown");
        self.widgets.push(widget);
        Ok(root)
    }

    /// Adds a plain element to the body, e.g. something to click outside on
    pub fn append(&mut self, element: Element) -> ProbeResult<Locator> {
        let body = self.document.body();
        let id = self.document.append_child(body, element)?;
        Ok(Locator::node(id))
    }

    /// Unmounts every widget
    pub fn unmount_all(&mut self) -> ProbeResult<()> {
        for widget in self.widgets.drain(..) {
            widget.unmount(&mut self.document)?;
        }
        Ok(())
    }

    /// Clicks the element the locator strictly resolves to
    pub fn click(&mut self, locator: &Locator) -> ProbeResult<DispatchOutcome> {
        let target = locator.resolve(&self.document)?;
        debug!(locator = %locator, target = %target, "click");
        Ok(self.document.click(target)?)
    }

    /// Clicks the body, outside every widget
    pub fn click_outside(&mut self) -> ProbeResult<DispatchOutcome> {
        let body = self.document.body();
        debug!("click outside");
        Ok(self.document.click(body)?)
    }

    /// Text content of the single match
    pub fn text(&self, locator: &Locator) -> ProbeResult<String> {
        let id = locator.resolve(&self.document)?;
        Ok(self.document.text_content(id))
    }

    /// Text content of every match, in document order; empty when nothing matches
    pub fn texts(&self, locator: &Locator) -> ProbeResult<Vec<String>> {
        Ok(locator
            .resolve_all(&self.document)?
            .into_iter()
            .map(|id| self.document.text_content(id))
            .collect())
    }

    /// CSS classes of the single match
    pub fn classes(&self, locator: &Locator) -> ProbeResult<Vec<String>> {
        let id = locator.resolve(&self.document)?;
        Ok(self
            .document
            .element(id)
            .map(|e| e.classes.clone())
            .unwrap_or_default())
    }

    /// Whether at least one match is present in the document
    pub fn is_visible(&self, locator: &Locator) -> ProbeResult<bool> {
        Ok(locator
            .resolve_all(&self.document)?
            .into_iter()
            .any(|id| self.document.is_attached(id)))
    }

    /// Number of matches
    pub fn count(&self, locator: &Locator) -> ProbeResult<usize> {
        Ok(locator.resolve_all(&self.document)?.len())
    }
}
