//! Actors and their notes
//!
//! An [`Actor`] owns the [`Page`] under test and performs [`Task`]s on it.
//! [`Notes`] is a shared scratchpad; clones see the same entries, so a
//! widget's change callback can record values the test later asserts on.

use crate::config::HarnessConfig;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::ProbeResult;
use crate::task::Task;
use crate::wait::{WaitOptions, Waiter};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{info, warn};

/// Default actor name
pub const DEFAULT_ACTOR_NAME: &str = "Tess";

/// Shared key/value notes
#[derive(Debug, Clone, Default)]
pub struct Notes(Rc<RefCell<HashMap<String, Value>>>);

impl Notes {
    /// Creates an empty notepad
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` under `key`, replacing any previous entry
    pub fn set<T: Serialize + ?Sized>(&self, key: impl Into<String>, value: &T) -> ProbeResult<()> {
        let value = serde_json::to_value(value)?;
        self.0.borrow_mut().insert(key.into(), value);
        Ok(())
    }

    /// The raw entry under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    /// The entry under `key` decoded as `T`; `None` when absent
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> ProbeResult<Option<T>> {
        self.get(key)
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    /// Whether an entry exists
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether the notepad is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// Someone interacting with a page
#[derive(Debug)]
pub struct Actor {
    name: String,
    page: Page,
    notes: Notes,
    wait: WaitOptions,
}

impl Default for Actor {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor {
    /// An actor called "Tess" with an empty page
    #[must_use]
    pub fn new() -> Self {
        Self::named(DEFAULT_ACTOR_NAME)
    }

    /// An actor with the given name and an empty page
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            page: Page::new(),
            notes: Notes::new(),
            wait: WaitOptions::default(),
        }
    }

    /// An actor named and timed after the harness configuration
    #[must_use]
    pub fn with_config(config: &HarnessConfig) -> Self {
        Self::named(config.default_actor_name.clone()).with_wait_options(config.wait_options())
    }

    /// Replaces the wait options
    #[must_use]
    pub fn with_wait_options(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The page under test
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Mutable access to the page under test
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    /// A handle on the actor's notes
    #[must_use]
    pub fn notes(&self) -> Notes {
        self.notes.clone()
    }

    /// Options used for every wait the actor performs
    #[must_use]
    pub const fn wait_options(&self) -> &WaitOptions {
        &self.wait
    }

    /// A waiter using the actor's wait options
    #[must_use]
    pub fn waiter(&self) -> Waiter {
        Waiter::with_options(self.wait.clone())
    }

    /// Performs `tasks` in order, stopping at the first failure
    pub fn attempts_to(&mut self, tasks: &[Task]) -> ProbeResult<()> {
        for task in tasks {
            let description = task.description_for(&self.name);
            info!(actor = %self.name, "{description}");
            if let Err(err) = task.perform(self) {
                warn!(actor = %self.name, error = %err, "failed: {description}");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Waits until `locator` matches something on the page
    pub fn wait_until_visible(&self, locator: &Locator) -> ProbeResult<()> {
        let page = &self.page;
        let mut failure = None;
        let result = self
            .waiter()
            .wait_for_function(format!("{locator} to be visible"), || {
                match page.is_visible(locator) {
                    Ok(visible) => visible,
                    Err(err) => {
                        failure = Some(err);
                        true
                    }
                }
            });
        match failure {
            Some(err) => Err(err),
            None => result.map(|_| ()),
        }
    }
}
