//! Tasks: named, composable activities an [`Actor`] performs
//!
//! A task description may contain `#actor`, replaced by the performing
//! actor's name when the task is logged.

use crate::actor::Actor;
use crate::locator::Locator;
use crate::result::ProbeResult;
use std::fmt;
use std::rc::Rc;

type Activity = Rc<dyn Fn(&mut Actor) -> ProbeResult<()>>;

/// A described activity
#[derive(Clone)]
pub struct Task {
    description: String,
    activity: Activity,
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl Task {
    /// A task performing `activity`
    pub fn where_<F>(description: impl Into<String>, activity: F) -> Self
    where
        F: Fn(&mut Actor) -> ProbeResult<()> + 'static,
    {
        Self {
            description: description.into(),
            activity: Rc::new(activity),
        }
    }

    /// A task performing `steps` in order, stopping at the first failure
    pub fn sequence(description: impl Into<String>, steps: Vec<Task>) -> Self {
        Self::where_(description, move |actor| actor.attempts_to(&steps))
    }

    /// The description as written, placeholder included
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The description with `#actor` replaced by `actor_name`
    #[must_use]
    pub fn description_for(&self, actor_name: &str) -> String {
        self.description.replace("#actor", actor_name)
    }

    pub(crate) fn perform(&self, actor: &mut Actor) -> ProbeResult<()> {
        (self.activity)(actor)
    }
}

/// Clicks the element `locator` resolves to
pub fn click_on(locator: &Locator) -> Task {
    let target = locator.clone();
    Task::where_(format!("#actor clicks on {locator}"), move |actor| {
        actor.page_mut().click(&target).map(|_| ())
    })
}

/// Waits until `locator` matches something in the document
pub fn wait_until_visible(locator: &Locator) -> Task {
    let target = locator.clone();
    Task::where_(format!("#actor waits until {locator} is visible"), move |actor| {
        actor.wait_until_visible(&target)
    })
}

/// Clicks the page body, outside every widget
pub fn click_outside() -> Task {
    Task::where_("#actor clicks outside", |actor| {
        actor.page_mut().click_outside().map(|_| ())
    })
}
