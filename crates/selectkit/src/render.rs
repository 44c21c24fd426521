//! Presentation layer
//!
//! [`render`] maps configuration and state to a [`VNode`] tree. It has no
//! side effects: click behavior is described as data ([`ClickHandler`]) and
//! bound to the live widget only when the tree is written into a
//! [`Document`](crate::dom::Document).

use crate::config::DropdownConfig;
use crate::core::{DropdownEvent, DropdownOption, DropdownState, Selection};
use std::collections::BTreeMap;

/// CSS class names forming the widget's DOM contract
pub mod class {
    /// Widget root
    pub const WIDGET: &str = "dropdown-widget";
    /// Added to the root while the options panel is shown
    pub const EXPANDED: &str = "dropdown-expanded";
    /// Control surface; clicking it toggles the panel
    pub const INPUT: &str = "dropdown-input";
    /// Placeholder text, present only while nothing is selected
    pub const PLACEHOLDER: &str = "dropdown-placeholder";
    /// List of selected options inside the control surface
    pub const SELECTED_OPTIONS: &str = "dropdown-selected-options";
    /// One selected option
    pub const SELECTED_OPTION: &str = "dropdown-selected-option";
    /// Removal control of a selected option (multi-select only)
    pub const DESELECT_OPTION: &str = "dropdown-deselect-option";
    /// Chevron next to the selection
    pub const EXPAND_ICON: &str = "dropdown-expand-icon";
    /// Options panel
    pub const AVAILABLE_OPTIONS: &str = "dropdown-available-options";
    /// One candidate option in the panel
    pub const AVAILABLE_OPTION: &str = "dropdown-available-option";
    /// Marks a candidate option that is currently selected
    pub const SELECTED: &str = "selected";
}

/// Attribute carrying an option's value on rendered option items
pub const VALUE_ATTR: &str = "data-value";

/// Attribute identifying the widget root
pub const COMPONENT_ATTR: &str = "data-component";

/// What a click on a node raises
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickHandler {
    /// Event forwarded to the controller
    pub event: DropdownEvent,
    /// Keep the click from reaching ancestors and document listeners
    pub stop_propagation: bool,
}

impl ClickHandler {
    /// A handler that lets the click bubble on
    #[must_use]
    pub const fn bubbling(event: DropdownEvent) -> Self {
        Self {
            event,
            stop_propagation: false,
        }
    }

    /// A handler that consumes the click
    #[must_use]
    pub const fn consuming(event: DropdownEvent) -> Self {
        Self {
            event,
            stop_propagation: true,
        }
    }
}

/// A virtual element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VNode {
    /// Tag name
    pub tag: String,
    /// CSS classes in declaration order
    pub classes: Vec<String>,
    /// Attributes
    pub attributes: BTreeMap<String, String>,
    /// Own text (not including children)
    pub text: Option<String>,
    /// Child nodes
    pub children: Vec<VNode>,
    /// Click behavior, if any
    pub on_click: Option<ClickHandler>,
}

impl VNode {
    /// Creates an empty element
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    /// Adds a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Adds a class when `condition` holds
    #[must_use]
    pub fn with_class_if(self, class: &str, condition: bool) -> Self {
        if condition {
            self.with_class(class)
        } else {
            self
        }
    }

    /// Sets an attribute
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Sets the text
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Appends a child
    #[must_use]
    pub fn with_child(mut self, child: VNode) -> Self {
        self.children.push(child);
        self
    }

    /// Appends children
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = VNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Sets the click handler
    #[must_use]
    pub fn on_click(mut self, handler: ClickHandler) -> Self {
        self.on_click = Some(handler);
        self
    }

    /// Checks for a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Own text followed by descendant text, depth first
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Descendants (and self) carrying `class`, in document order
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Vec<&VNode> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a VNode>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_by_class(class, found);
        }
    }
}

fn expand_icon() -> VNode {
    VNode::new("div").with_class(class::EXPAND_ICON).with_child(
        VNode::new("svg")
            .with_attr("height", "20")
            .with_attr("width", "20")
            .with_attr("viewBox", "0 0 20 20"),
    )
}

fn remove_icon() -> VNode {
    VNode::new("svg")
        .with_attr("height", "20")
        .with_attr("width", "20")
        .with_attr("viewBox", "0 0 20 20")
}

fn render_selected_or_placeholder(config: &DropdownConfig, selection: &Selection) -> VNode {
    if selection.is_empty() {
        return VNode::new("span")
            .with_class(class::PLACEHOLDER)
            .with_text(&config.placeholder);
    }

    VNode::new("ul")
        .with_class(class::SELECTED_OPTIONS)
        .with_children(selection.iter().map(|option| render_selected(config, option)))
}

fn render_selected(config: &DropdownConfig, option: &DropdownOption) -> VNode {
    let item = VNode::new("li")
        .with_class(class::SELECTED_OPTION)
        .with_attr(VALUE_ATTR, &option.value)
        .with_child(VNode::new("span").with_text(&option.label));

    if !config.allow_multiple {
        return item;
    }

    item.with_child(
        VNode::new("span")
            .with_class(class::DESELECT_OPTION)
            .on_click(ClickHandler::consuming(DropdownEvent::Deselect(
                option.clone(),
            )))
            .with_child(remove_icon()),
    )
}

fn render_available(option: &DropdownOption, selection: &Selection) -> VNode {
    VNode::new("li")
        .with_class(class::AVAILABLE_OPTION)
        .with_class_if(class::SELECTED, selection.contains(option))
        .with_attr(VALUE_ATTR, &option.value)
        .with_text(&option.label)
        .on_click(ClickHandler::bubbling(DropdownEvent::Select(option.clone())))
}

/// Renders the whole widget
#[must_use]
pub fn render(config: &DropdownConfig, state: &DropdownState) -> VNode {
    let expanded = state.visibility.is_expanded();

    let input = VNode::new("div")
        .with_class(class::INPUT)
        .on_click(ClickHandler::bubbling(DropdownEvent::TogglePanel))
        .with_child(render_selected_or_placeholder(config, &state.selection))
        .with_child(expand_icon());

    let root = VNode::new("div")
        .with_class(class::WIDGET)
        .with_class_if(class::EXPANDED, expanded)
        .with_attr(COMPONENT_ATTR, "dropdown")
        .with_child(input);

    if !expanded {
        return root;
    }

    root.with_child(
        VNode::new("ul").with_class(class::AVAILABLE_OPTIONS).with_children(
            config
                .options
                .iter()
                .map(|option| render_available(option, &state.selection)),
        ),
    )
}
