// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Trailing-edge debouncing
//!
//! Time is supplied by the caller as a [`Duration`] since some fixed epoch
//! (the event loop's clock). This keeps the debouncer deterministic: the
//! host schedules a wake-up at [`Debouncer::deadline`] and then calls
//! [`Debouncer::poll`].

use std::time::Duration;

/// Default wait before a debounced action fires
pub const DEFAULT_WAIT: Duration = Duration::from_millis(200);

/// Collapse repeated triggers into a single trailing invocation
///
/// At most one invocation is pending at any time. Each call to
/// [`Debouncer::trigger`] supersedes the pending one, replacing its arguments
/// and pushing its deadline back to `now + wait`.
#[derive(Clone, Debug)]
pub struct Debouncer<A> {
    wait: Duration,
    pending: Option<(Duration, A)>,
}

impl<A> Default for Debouncer<A> {
    fn default() -> Self {
        Debouncer::new(DEFAULT_WAIT)
    }
}

impl<A> Debouncer<A> {
    /// Construct with the given wait
    pub fn new(wait: Duration) -> Self {
        Debouncer {
            wait,
            pending: None,
        }
    }

    /// The configured wait
    #[inline]
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Trigger at time `now` with `args`
    ///
    /// Returns the new deadline.
    pub fn trigger(&mut self, now: Duration, args: A) -> Duration {
        let deadline = now + self.wait;
        self.pending = Some((deadline, args));
        deadline
    }

    /// Deadline of the pending invocation, if any
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// True if an invocation is pending
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending arguments if the deadline has passed
    pub fn poll(&mut self, now: Duration) -> Option<A> {
        match self.pending {
            Some((deadline, _)) if deadline <= now => self.pending.take().map(|(_, args)| args),
            _ => None,
        }
    }
}

/// A debounced action
///
/// Constructed by [`debounce`].
pub struct Debounced<A, F: FnMut(A)> {
    inner: Debouncer<A>,
    action: F,
}

/// Wrap `action` such that it runs once, `wait` after the last trigger
///
/// The action receives the arguments of the last call to
/// [`Debounced::trigger`] only.
pub fn debounce<A, F: FnMut(A)>(action: F, wait: Duration) -> Debounced<A, F> {
    Debounced {
        inner: Debouncer::new(wait),
        action,
    }
}

impl<A, F: FnMut(A)> Debounced<A, F> {
    /// Trigger at time `now`
    ///
    /// Returns the deadline at which [`Self::fire_due`] should next be called.
    pub fn trigger(&mut self, now: Duration, args: A) -> Duration {
        self.inner.trigger(now, args)
    }

    /// Deadline of the pending invocation, if any
    pub fn deadline(&self) -> Option<Duration> {
        self.inner.deadline()
    }

    /// Run the action if due
    ///
    /// Returns true if the action ran.
    pub fn fire_due(&mut self, now: Duration) -> bool {
        if let Some(args) = self.inner.poll(now) {
            (self.action)(args);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn trailing_call_wins() {
        let mut calls = Vec::new();
        {
            let mut d = debounce(|x: u32| calls.push(x), DEFAULT_WAIT);
            d.trigger(ms(0), 1);
            d.trigger(ms(50), 2);
            let deadline = d.trigger(ms(100), 3);
            assert_eq!(deadline, ms(300));

            for t in (0..300).step_by(10) {
                assert!(!d.fire_due(ms(t)), "fired early at {t}ms");
            }
            assert!(d.fire_due(ms(300)));
            assert!(!d.fire_due(ms(400)));
        }
        assert_eq!(calls, vec![3]);
    }

    #[test]
    fn separate_bursts() {
        let mut d = Debouncer::new(ms(200));
        d.trigger(ms(0), "a");
        assert_eq!(d.poll(ms(200)), Some("a"));
        assert!(!d.is_pending());
        d.trigger(ms(500), "b");
        assert_eq!(d.deadline(), Some(ms(700)));
        assert_eq!(d.poll(ms(699)), None);
        assert_eq!(d.poll(ms(700)), Some("b"));
    }
}
