//! Assertions
//!
//! [`Ensure`] checks a value immediately or, with [`Ensure::eventually`],
//! keeps asking a question until the answer matches or the actor's wait
//! timeout elapses. Failures are [`ProbeError::AssertionFailed`].

use crate::actor::Actor;
use crate::result::{ProbeError, ProbeResult};
use crate::task::Task;
use std::fmt::Debug;

/// Assertion entry points
#[derive(Debug, Clone, Copy)]
pub struct Ensure;

impl Ensure {
    /// Fails unless `actual == expected`
    pub fn that_eq<T>(subject: &str, actual: &T, expected: &T) -> ProbeResult<()>
    where
        T: PartialEq + Debug + ?Sized,
    {
        if actual == expected {
            Ok(())
        } else {
            Err(ProbeError::assertion(format!(
                "expected {subject} to equal {expected:?} but got {actual:?}"
            )))
        }
    }

    /// Fails unless `items` contains `item`
    pub fn contains<T>(subject: &str, items: &[T], item: &T) -> ProbeResult<()>
    where
        T: PartialEq + Debug,
    {
        if items.contains(item) {
            Ok(())
        } else {
            Err(ProbeError::assertion(format!(
                "expected {subject} {items:?} to contain {item:?}"
            )))
        }
    }

    /// Fails if `items` contains `item`
    pub fn excludes<T>(subject: &str, items: &[T], item: &T) -> ProbeResult<()>
    where
        T: PartialEq + Debug,
    {
        if items.contains(item) {
            Err(ProbeError::assertion(format!(
                "expected {subject} {items:?} not to contain {item:?}"
            )))
        } else {
            Ok(())
        }
    }

    /// A task asking `question` once and comparing the answer to `expected`
    pub fn that<T, Q>(subject: impl Into<String>, question: Q, expected: T) -> Task
    where
        T: PartialEq + Debug + 'static,
        Q: Fn(&Actor) -> ProbeResult<T> + 'static,
    {
        let subject = subject.into();
        Task::where_(
            format!("#actor ensures that {subject} equals {expected:?}"),
            move |actor| Self::that_eq(&subject, &question(actor)?, &expected),
        )
    }

    /// A task asking `question` until the answer equals `expected`.
    ///
    /// Polls with the actor's wait options. Errors from the question end the
    /// wait immediately.
    ///
    /// Nothing touches the page while the wait runs, so a question about the
    /// document gets the same answer on every poll and a mismatch costs the
    /// full timeout. Polling only pays off when the answer comes from state
    /// updated elsewhere, such as [`Notes`](crate::actor::Notes) shared with
    /// another owner.
    pub fn eventually<T, Q>(subject: impl Into<String>, question: Q, expected: T) -> Task
    where
        T: PartialEq + Debug + 'static,
        Q: Fn(&Actor) -> ProbeResult<T> + 'static,
    {
        let subject = subject.into();
        Task::where_(
            format!("#actor ensures that {subject} eventually equals {expected:?}"),
            move |actor| {
                let mut last: ProbeResult<Option<T>> = Ok(None);
                let waited = actor.waiter().wait_for_function(subject.clone(), || match question(actor) {
                    Ok(answer) => {
                        let matched = answer == expected;
                        last = Ok(Some(answer));
                        matched
                    }
                    Err(err) => {
                        last = Err(err);
                        true
                    }
                });
                match (waited, last?) {
                    (Ok(_), _) => Ok(()),
                    (Err(ProbeError::Timeout { ms, .. }), Some(answer)) => {
                        Err(ProbeError::assertion(format!(
                            "expected {subject} to eventually equal {expected:?} but got {answer:?} after {ms}ms"
                        )))
                    }
                    (Err(err), _) => Err(err),
                }
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wait::WaitOptions;
    use std::cell::Cell;
    use std::rc::Rc;

    fn quick_actor() -> Actor {
        Actor::new().with_wait_options(WaitOptions::new().with_timeout(5).with_poll_interval(1))
    }

    #[test]
    fn test_that_eq() {
        assert!(Ensure::that_eq("answer", &42, &42).is_ok());
        let err = Ensure::that_eq("answer", &41, &42).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Assertion failed: expected answer to equal 42 but got 41"
        );
    }

    #[test]
    fn test_that_eq_unsized() {
        assert!(Ensure::that_eq("labels", ["a", "b"].as_slice(), &["a", "b"][..]).is_ok());
    }

    #[test]
    fn test_contains_and_excludes() {
        let labels = vec!["First".to_string(), "Third".to_string()];
        assert!(Ensure::contains("selected", &labels, &"First".to_string()).is_ok());
        assert!(Ensure::contains("selected", &labels, &"Second".to_string()).is_err());
        assert!(Ensure::excludes("selected", &labels, &"Second".to_string()).is_ok());
        assert!(Ensure::excludes("selected", &labels, &"Third".to_string()).is_err());
    }

    #[test]
    fn test_that_task() {
        let mut actor = quick_actor();
        let ok = Ensure::that("the name", |a: &Actor| Ok(a.name().to_string()), "Tess".to_string());
        assert!(actor.attempts_to(&[ok]).is_ok());

        let bad = Ensure::that("the name", |a: &Actor| Ok(a.name().to_string()), "Bob".to_string());
        assert!(matches!(
            actor.attempts_to(&[bad]),
            Err(ProbeError::AssertionFailed { .. })
        ));
    }

    #[test]
    fn test_eventually_waits_for_answer() {
        let mut actor = Actor::new().with_wait_options(WaitOptions::new().with_poll_interval(1));
        let asked = Rc::new(Cell::new(0));
        let counter = Rc::clone(&asked);
        let task = Ensure::eventually(
            "the counter",
            move |_: &Actor| {
                counter.set(counter.get() + 1);
                Ok(counter.get())
            },
            3,
        );
        assert!(actor.attempts_to(&[task]).is_ok());
        assert_eq!(asked.get(), 3);
    }

    #[test]
    fn test_eventually_times_out_as_assertion() {
        let mut actor = quick_actor();
        let task = Ensure::eventually("the answer", |_: &Actor| Ok(1), 2);
        let err = actor.attempts_to(&[task]).unwrap_err();
        assert!(err.to_string().contains("but got 1"), "{err}");
    }

    #[test]
    fn test_eventually_propagates_question_errors() {
        let mut actor = quick_actor();
        let task = Ensure::eventually(
            "a broken question",
            |_: &Actor| -> ProbeResult<u8> { Err(ProbeError::assertion("broken")) },
            0,
        );
        assert!(matches!(
            actor.attempts_to(&[task]),
            Err(ProbeError::AssertionFailed { message }) if message == "broken"
        ));
    }
}
