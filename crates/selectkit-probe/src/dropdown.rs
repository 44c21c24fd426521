//! Page object for the dropdown widget
//!
//! Locators, questions and tasks expressed in terms of the widget's DOM
//! contract. Built from a locator for the widget root, typically the one
//! [`Page::mount`] returns.

use crate::actor::Actor;
use crate::ensure::Ensure;
use crate::locator::Locator;
use crate::page::Page;
use crate::page_object::PageObject;
use crate::result::ProbeResult;
use crate::task::{click_on, wait_until_visible, Task};
use selectkit::render::class;

fn by_class(name: &str) -> Locator {
    Locator::new(format!(".{name}"))
}

/// A dropdown on the page
#[derive(Debug, Clone)]
pub struct DropdownComponent {
    root: Locator,
}

impl DropdownComponent {
    /// Wraps the widget found by `root`
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn from(root: Locator) -> Self {
        Self { root }
    }

    /// The widget root
    #[must_use]
    pub const fn root(&self) -> &Locator {
        &self.root
    }

    // ===== locators =====

    /// Control surface toggling the panel
    #[must_use]
    pub fn input(&self) -> Locator {
        by_class(class::INPUT)
            .of(&self.root)
            .described_as(format!("{} input", self.root))
    }

    /// Placeholder text, present only while nothing is selected
    #[must_use]
    pub fn placeholder(&self) -> Locator {
        by_class(class::PLACEHOLDER)
            .of(&self.input())
            .described_as(format!("{} placeholder", self.root))
    }

    /// The options panel
    #[must_use]
    pub fn available_options_dropdown(&self) -> Locator {
        by_class(class::AVAILABLE_OPTIONS)
            .of(&self.root)
            .described_as("available options dropdown")
    }

    /// Every candidate option in the panel
    #[must_use]
    pub fn available_options(&self) -> Locator {
        by_class(class::AVAILABLE_OPTION)
            .of(&self.available_options_dropdown())
            .described_as("available options")
    }

    /// First candidate option whose text includes `label`
    #[must_use]
    pub fn available_option_called(&self, label: &str) -> Locator {
        self.available_options()
            .where_text_includes(label)
            .first()
            .described_as(format!("available option {label:?}"))
    }

    /// Every selected option inside the control surface
    #[must_use]
    pub fn selected_options(&self) -> Locator {
        by_class(class::SELECTED_OPTION)
            .of(&self.input())
            .described_as("selected options")
    }

    /// First selected option whose text includes `label`
    #[must_use]
    pub fn selected_option_called(&self, label: &str) -> Locator {
        self.selected_options()
            .where_text_includes(label)
            .first()
            .described_as(format!("selected option {label:?}"))
    }

    /// Removal control of the selected option whose text includes `label`
    #[must_use]
    pub fn deselect_button(&self, label: &str) -> Locator {
        by_class(class::DESELECT_OPTION)
            .of(&self.selected_option_called(label))
            .described_as(format!("deselect button of {label:?}"))
    }

    // ===== questions =====

    /// Text of the placeholder
    pub fn placeholder_text(&self, page: &Page) -> ProbeResult<String> {
        page.text(&self.placeholder())
    }

    /// Labels of the candidate options, empty while collapsed
    pub fn available_option_labels(&self, page: &Page) -> ProbeResult<Vec<String>> {
        page.texts(&self.available_options())
    }

    /// Labels of the selected options, in selection order
    pub fn selected_option_labels(&self, page: &Page) -> ProbeResult<Vec<String>> {
        page.texts(&self.selected_options())
    }

    /// Whether the root carries the expanded marker
    pub fn is_expanded(&self, page: &Page) -> ProbeResult<bool> {
        Ok(page
            .classes(&self.root)?
            .iter()
            .any(|c| c == class::EXPANDED))
    }

    // ===== tasks =====

    /// Opens the panel unless it is already open
    #[must_use]
    pub fn open(&self) -> Task {
        let component = self.clone();
        Task::where_(format!("#actor opens the {}", self.root), move |actor| {
            if component.is_expanded(actor.page())? {
                return Ok(());
            }
            actor.attempts_to(&[
                click_on(&component.input()),
                wait_until_visible(&component.available_options_dropdown()),
            ])
        })
    }

    /// Closes the panel if it is open
    #[must_use]
    pub fn close(&self) -> Task {
        let component = self.clone();
        Task::where_(format!("#actor closes the {}", self.root), move |actor| {
            if component.is_expanded(actor.page())? {
                actor.attempts_to(&[click_on(&component.input())])
            } else {
                Ok(())
            }
        })
    }

    /// Selects each label in turn, checking it shows up as selected
    #[must_use]
    pub fn select(&self, labels: &[&str]) -> Task {
        Task::sequence(
            format!("#actor selects {labels:?} from {}", self.root),
            labels.iter().map(|label| self.select_one(label)).collect(),
        )
    }

    /// Deselects each label in turn, checking it is gone from the selection
    #[must_use]
    pub fn deselect(&self, labels: &[&str]) -> Task {
        Task::sequence(
            format!("#actor deselects {labels:?} from {}", self.root),
            labels.iter().map(|label| self.deselect_one(label)).collect(),
        )
    }

    fn select_one(&self, label: &str) -> Task {
        let component = self.clone();
        let label = label.to_string();
        Task::sequence(
            format!("#actor selects {label:?} from {}", self.root),
            vec![
                self.open(),
                click_on(&self.available_option_called(&label)),
                Task::where_("#actor checks the selection", move |actor: &mut Actor| {
                    let selected = component.selected_option_labels(actor.page())?;
                    Ensure::contains("selected options", &selected, &label)
                }),
            ],
        )
    }

    fn deselect_one(&self, label: &str) -> Task {
        let component = self.clone();
        let label = label.to_string();
        Task::sequence(
            format!("#actor deselects {label:?} from {}", self.root),
            vec![
                click_on(&self.deselect_button(&label)),
                Task::where_("#actor checks the selection", move |actor: &mut Actor| {
                    let selected = component.selected_option_labels(actor.page())?;
                    Ensure::excludes("selected options", &selected, &label)
                }),
            ],
        )
    }
}

impl PageObject for DropdownComponent {
    fn component_name(&self) -> &str {
        "dropdown"
    }

    fn is_loaded(&self, page: &Page) -> bool {
        page.is_visible(&self.input()).unwrap_or(false)
    }
}
