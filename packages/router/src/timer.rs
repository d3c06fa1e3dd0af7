//! Fixed, non-cancellable delays.

use std::{cell::RefCell, time::Duration};

/// A deferred piece of work.
pub type TimerCallback = Box<dyn FnOnce()>;

/// Runs a callback once after a delay. There is no way to cancel a scheduled callback.
pub trait SettleTimer {
    /// Run `callback` after `delay`.
    fn schedule(&self, delay: Duration, callback: TimerCallback);
}

/// A [`SettleTimer`] that only runs callbacks when told to.
///
/// Meant for headless hosts and tests, where time is driven by hand.
///
/// ```rust
/// # use hashbang_router::prelude::*;
/// # use std::{cell::Cell, rc::Rc, time::Duration};
/// let timer = ManualTimer::default();
/// let fired = Rc::new(Cell::new(false));
///
/// let f = fired.clone();
/// timer.schedule(Duration::from_millis(100), Box::new(move || f.set(true)));
/// assert_eq!(timer.pending(), 1);
///
/// timer.fire_all();
/// assert!(fired.get());
/// ```
#[derive(Default)]
pub struct ManualTimer {
    queue: RefCell<Vec<(Duration, TimerCallback)>>,
}

impl ManualTimer {
    /// The number of callbacks waiting to run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run every pending callback in scheduling order. Returns how many ran.
    ///
    /// Callbacks scheduled while firing are kept for the next call.
    pub fn fire_all(&self) -> usize {
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback();
        }
        count
    }

    /// The delays of the pending callbacks, in scheduling order.
    #[must_use]
    pub fn pending_delays(&self) -> Vec<Duration> {
        self.queue.borrow().iter().map(|(delay, _)| *delay).collect()
    }
}

impl SettleTimer for ManualTimer {
    fn schedule(&self, delay: Duration, callback: TimerCallback) {
        self.queue.borrow_mut().push((delay, callback));
    }
}

/// A [`SettleTimer`] backed by the browser's `setTimeout`.
#[cfg(feature = "web")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeoutTimer;

#[cfg(feature = "web")]
impl SettleTimer for TimeoutTimer {
    fn schedule(&self, delay: Duration, callback: TimerCallback) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        gloo::timers::callback::Timeout::new(millis, callback).forget();
    }
}
