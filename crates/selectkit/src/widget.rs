//! The dropdown component
//!
//! [`Dropdown`] is the unmounted component: configuration plus change
//! callback. [`Dropdown::mount`] writes it into a [`Document`] and returns a
//! [`MountedDropdown`] that owns the widget state and the outside-click
//! window listener for as long as the widget stays mounted.

use crate::config::DropdownConfig;
use crate::core::controller::{self, DropdownEvent};
use crate::core::{DropdownOption, DropdownState, Selection, Visibility};
use crate::dom::{ClickEvent, Document, Element, ElementListener, ListenerGuard, NodeId, Propagation};
use crate::error::DropdownResult;
use crate::render::{self, ClickHandler};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

/// Receives the full selection after every select or deselect
pub type ChangeCallback = Box<dyn FnMut(&[DropdownOption])>;

/// An unmounted dropdown
pub struct Dropdown {
    config: DropdownConfig,
    on_change: ChangeCallback,
}

impl fmt::Debug for Dropdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dropdown")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Dropdown {
    /// Creates a dropdown with a no-op change callback
    #[must_use]
    pub fn new(config: DropdownConfig) -> Self {
        Self {
            config,
            on_change: Box::new(|_| {}),
        }
    }

    /// Starts a builder with default configuration
    #[must_use]
    pub fn builder() -> DropdownBuilder {
        DropdownBuilder::default()
    }

    /// Replaces the change callback
    #[must_use]
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&[DropdownOption]) + 'static,
    {
        self.on_change = Box::new(callback);
        self
    }

    /// The configuration
    #[must_use]
    pub const fn config(&self) -> &DropdownConfig {
        &self.config
    }

    /// Renders the widget under `parent` and starts listening for outside clicks
    pub fn mount(self, doc: &mut Document, parent: NodeId) -> DropdownResult<MountedDropdown> {
        let root = doc.append_child(parent, Element::new("div"))?;
        let shared = Rc::new(Shared {
            config: self.config,
            state: RefCell::new(DropdownState::new()),
            on_change: RefCell::new(self.on_change),
            root,
        });
        shared.rerender(doc)?;

        let weak = Rc::downgrade(&shared);
        let guard = doc.add_window_listener(move |doc, event| {
            if let Some(shared) = weak.upgrade() {
                shared.handle_window_click(doc, event);
            }
        });

        debug!(root = %root, options = shared.config.options.len(), "dropdown mounted");
        Ok(MountedDropdown {
            shared,
            _outside_click: guard,
        })
    }
}

/// Builder for [`Dropdown`]
#[derive(Default)]
pub struct DropdownBuilder {
    config: DropdownConfig,
    on_change: Option<ChangeCallback>,
}

impl fmt::Debug for DropdownBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropdownBuilder")
            .field("config", &self.config)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl DropdownBuilder {
    /// Sets the placeholder text
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.placeholder = placeholder.into();
        self
    }

    /// Sets the candidate options
    #[must_use]
    pub fn options(mut self, options: Vec<DropdownOption>) -> Self {
        self.config.options = options;
        self
    }

    /// Appends one candidate option
    #[must_use]
    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.config.options.push(DropdownOption::new(value, label));
        self
    }

    /// Enables multi-select
    #[must_use]
    pub const fn allow_multiple(mut self, allow_multiple: bool) -> Self {
        self.config.allow_multiple = allow_multiple;
        self
    }

    /// Sets the change callback
    #[must_use]
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&[DropdownOption]) + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Builds the dropdown
    #[must_use]
    pub fn build(self) -> Dropdown {
        let dropdown = Dropdown::new(self.config);
        match self.on_change {
            Some(on_change) => Dropdown {
                on_change,
                ..dropdown
            },
            None => dropdown,
        }
    }
}

struct Shared {
    config: DropdownConfig,
    state: RefCell<DropdownState>,
    on_change: RefCell<ChangeCallback>,
    root: NodeId,
}

impl Shared {
    fn rerender(self: &Rc<Self>, doc: &mut Document) -> DropdownResult<()> {
        let tree = render::render(&self.config, &self.state.borrow());
        let weak = Rc::downgrade(self);
        let bind = move |handler: &ClickHandler| bind_handler(&weak, handler);
        doc.patch(self.root, &tree, &bind)
    }

    /// Replaces a selected option with its configured counterpart; `None`
    /// for a value the widget was not configured with
    fn configured(&self, event: &DropdownEvent) -> Option<DropdownEvent> {
        match event {
            DropdownEvent::Select(option) => match self.config.option_by_value(&option.value) {
                Some(configured) => Some(DropdownEvent::Select(configured.clone())),
                None => {
                    debug!(root = %self.root, value = %option.value, "ignoring select of unconfigured option");
                    None
                }
            },
            other => Some(other.clone()),
        }
    }

    fn apply(self: &Rc<Self>, doc: &mut Document, event: &DropdownEvent) {
        let Some(event) = self.configured(event) else {
            return;
        };
        let transition = controller::reduce(&self.state.borrow(), &event, self.config.mode());
        let changed = *self.state.borrow() != transition.state;
        self.state.replace(transition.state);

        if changed {
            if let Err(err) = self.rerender(doc) {
                warn!(root = %self.root, error = %err, "dropdown re-render failed");
            }
        }

        if let Some(selection) = transition.notification {
            let mut on_change = self.on_change.borrow_mut();
            (*on_change)(selection.as_slice());
        }
    }

    fn handle_window_click(self: &Rc<Self>, doc: &mut Document, event: &ClickEvent) {
        if !event.passes_through(self.root) {
            self.apply(doc, &DropdownEvent::OutsideClick);
        }
    }
}

fn bind_handler(widget: &Weak<Shared>, handler: &ClickHandler) -> ElementListener {
    let widget = Weak::clone(widget);
    let event = handler.event.clone();
    let propagation = if handler.stop_propagation {
        Propagation::Stop
    } else {
        Propagation::Continue
    };
    Rc::new(move |doc: &mut Document, _: &ClickEvent| {
        if let Some(shared) = widget.upgrade() {
            shared.apply(doc, &event);
        }
        propagation
    })
}

/// A dropdown living in a document.
///
/// Dropping the handle unregisters the outside-click listener; call
/// [`unmount`](Self::unmount) to also remove the rendered nodes.
pub struct MountedDropdown {
    shared: Rc<Shared>,
    _outside_click: ListenerGuard,
}

impl fmt::Debug for MountedDropdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedDropdown")
            .field("root", &self.shared.root)
            .field("state", &*self.shared.state.borrow())
            .finish_non_exhaustive()
    }
}

impl MountedDropdown {
    /// Root node of the rendered widget; stable for the whole mount
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.shared.root
    }

    /// The configuration the widget was mounted with
    #[must_use]
    pub fn config(&self) -> &DropdownConfig {
        &self.shared.config
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> DropdownState {
        self.shared.state.borrow().clone()
    }

    /// Current selection
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.shared.state.borrow().selection.clone()
    }

    /// Current visibility
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.shared.state.borrow().visibility
    }

    /// Feeds an event to the widget as if the user had raised it
    pub fn dispatch(&self, doc: &mut Document, event: &DropdownEvent) {
        self.shared.apply(doc, event);
    }

    /// Removes the rendered nodes and releases the outside-click listener
    pub fn unmount(self, doc: &mut Document) -> DropdownResult<()> {
        let root = self.shared.root;
        let removed = doc.remove_subtree(root);
        drop(self);
        debug!(root = %root, "dropdown unmounted");
        removed
    }
}
