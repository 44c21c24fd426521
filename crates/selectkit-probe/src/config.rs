//! Harness configuration
//!
//! Timeouts, retry policy and the default actor for component tests,
//! loadable from YAML. Missing fields take their defaults; the CI rule
//! (retries) can be applied explicitly or from the `CI` environment
//! variable.

use crate::actor::{Actor, DEFAULT_ACTOR_NAME};
use crate::locator::Locator;
use crate::result::ProbeResult;
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Retries applied on CI
pub const CI_RETRIES: u32 = 2;

/// Harness settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Maximum time one wait may take, in milliseconds
    pub timeout_ms: u64,
    /// Delay between polls, in milliseconds
    pub poll_interval_ms: u64,
    /// How many times [`HarnessConfig::run_scenario`] retries a failing scenario
    pub retries: u32,
    /// Name of the actor performing tasks
    pub default_actor_name: String,
    /// Whether locators reject multiple matches
    pub strict_locators: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            retries: 0,
            default_actor_name: DEFAULT_ACTOR_NAME.to_string(),
            strict_locators: true,
        }
    }
}

impl HarnessConfig {
    /// Parses YAML
    pub fn from_yaml_str(yaml: &str) -> ProbeResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Reads and parses a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&yaml)?;
        debug!(path = %path.display(), "harness config loaded");
        Ok(config)
    }

    /// Defaults with the CI rule taken from the `CI` environment variable
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_ci(is_ci())
    }

    /// Applies the CI rule: [`CI_RETRIES`] retries on CI, none elsewhere
    #[must_use]
    pub const fn with_ci(mut self, ci: bool) -> Self {
        self.retries = if ci { CI_RETRIES } else { 0 };
        self
    }

    /// Sets the retry count
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the wait timeout
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Sets the actor name
    #[must_use]
    pub fn with_actor_name(mut self, name: impl Into<String>) -> Self {
        self.default_actor_name = name.into();
        self
    }

    /// Wait options derived from the timeout and poll interval
    #[must_use]
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::new()
            .with_timeout(self.timeout_ms)
            .with_poll_interval(self.poll_interval_ms)
    }

    /// A CSS locator using the configured strictness
    #[must_use]
    pub fn locator(&self, css: impl Into<String>) -> Locator {
        Locator::new(css).with_strict(self.strict_locators)
    }

    /// Runs `scenario` with a fresh actor, retrying up to `retries` times.
    ///
    /// Every attempt starts from [`Actor::with_config`], so nothing mounted by
    /// a failed attempt leaks into the next one. Returns the last error once
    /// the retries are used up.
    pub fn run_scenario<F>(&self, name: &str, mut scenario: F) -> ProbeResult<()>
    where
        F: FnMut(&mut Actor) -> ProbeResult<()>,
    {
        let mut attempt = 0;
        loop {
            let mut actor = Actor::with_config(self);
            match scenario(&mut actor) {
                Ok(()) => return Ok(()),
                Err(err) if attempt < self.retries => {
                    attempt += 1;
                    warn!(scenario = name, attempt, error = %err, "retrying scenario");
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Whether the `CI` environment variable is set to something non-empty
#[must_use]
pub fn is_ci() -> bool {
    std::env::var_os("CI").is_some_and(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ProbeError;
    use selectkit::dom::Element;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.poll_interval_ms, 50);
        assert_eq!(config.retries, 0);
        assert_eq!(config.default_actor_name, "Tess");
        assert!(config.strict_locators);
    }

    #[test]
    fn test_ci_rule() {
        let ci = HarnessConfig::default().with_ci(true);
        assert_eq!(ci.retries, 2);
        assert_eq!(ci.with_ci(false).retries, 0);
    }

    // ===== scenarios =====

    #[test]
    fn test_run_scenario_retries_with_fresh_actor() {
        let config = HarnessConfig::default().with_retries(2);
        let mut attempts = 0;
        config
            .run_scenario("flaky", |actor| {
                attempts += 1;
                assert_eq!(actor.page().count(&Locator::new(".leftover"))?, 0);
                actor.page_mut().append(Element::new("div").with_class("leftover"))?;
                if attempts < 3 {
                    Err(ProbeError::assertion("not yet"))
                } else {
                    Ok(())
                }
            })
            .unwrap();
        assert_eq!(attempts, 3);
    }

    #[test]
    fn test_run_scenario_returns_last_error() {
        let config = HarnessConfig::default().with_retries(1);
        let mut attempts = 0;
        let err = config
            .run_scenario("broken", |_| {
                attempts += 1;
                Err(ProbeError::assertion(format!("attempt {attempts}")))
            })
            .unwrap_err();
        assert_eq!(attempts, 2);
        assert_eq!(err.to_string(), "Assertion failed: attempt 2");
    }

    #[test]
    fn test_run_scenario_without_retries_runs_once() {
        let mut attempts = 0;
        let result = HarnessConfig::default().run_scenario("once", |_| {
            attempts += 1;
            Err(ProbeError::assertion("no"))
        });
        assert!(result.is_err());
        assert_eq!(attempts, 1);
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = HarnessConfig::from_yaml_str("timeout_ms: 500\ndefault_actor_name: Ana\n").unwrap();
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.default_actor_name, "Ana");
        assert_eq!(config.poll_interval_ms, 50);
    }

    #[test]
    fn test_from_yaml_invalid() {
        assert!(matches!(
            HarnessConfig::from_yaml_str("timeout_ms: soon"),
            Err(ProbeError::Config(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "retries: 1\nstrict_locators: false").unwrap();
        let config = HarnessConfig::from_path(file.path()).unwrap();
        assert_eq!(config.retries, 1);
        assert!(!config.strict_locators);
    }

    #[test]
    fn test_from_missing_path() {
        assert!(matches!(
            HarnessConfig::from_path("/definitely/not/here.yaml"),
            Err(ProbeError::Io(_))
        ));
    }

    #[test]
    fn test_wait_options() {
        let options = HarnessConfig::default().with_timeout_ms(250).wait_options();
        assert_eq!(options.timeout_ms, 250);
        assert_eq!(options.poll_interval_ms, 50);
    }

    #[test]
    fn test_locator_strictness() {
        assert!(HarnessConfig::default().locator(".x").is_strict());
        let relaxed = HarnessConfig {
            strict_locators: false,
            ..HarnessConfig::default()
        };
        assert!(!relaxed.locator(".x").is_strict());
    }
}
