//! The two-slot route state shared between the router and the page controllers.

use std::{cell::RefCell, fmt::Debug, rc::Rc};

use crate::evaluation::RouteEvaluation;

/// One of the two slots kept by [`RouteState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteSlot {
    /// The route that was active before the current one.
    Origin,
    /// The route that is active (or being activated).
    Current,
}

#[derive(Default)]
struct Slots {
    origin: Option<RouteEvaluation>,
    current: Option<RouteEvaluation>,
}

impl Slots {
    fn slot(&mut self, slot: RouteSlot) -> &mut Option<RouteEvaluation> {
        match slot {
            RouteSlot::Origin => &mut self.origin,
            RouteSlot::Current => &mut self.current,
        }
    }
}

/// The two most recent route evaluations.
///
/// This is a cheap handle: clones share the same slots. The router owns one and hands clones to the
/// page controllers. Writes are last-write-wins per slot, there is no validation.
///
/// ```rust
/// # use hashbang_router::prelude::*;
/// let state = RouteState::default();
/// let home = RouteDefinition::new("Home", "/");
///
/// state.set(RouteSlot::Current, RouteEvaluation::fallback(&home));
/// assert_eq!(state.current().map(|c| c.resolved_path), Some(String::from("/")));
/// assert!(state.origin().is_none());
/// ```
#[derive(Clone, Default)]
pub struct RouteState {
    inner: Rc<RefCell<Slots>>,
}

impl RouteState {
    /// Overwrite `slot`.
    pub fn set(&self, slot: RouteSlot, evaluation: RouteEvaluation) {
        *self.inner.borrow_mut().slot(slot) = Some(evaluation);
    }

    /// Read `slot`. [`None`] until the first route was committed.
    #[must_use]
    pub fn get(&self, slot: RouteSlot) -> Option<RouteEvaluation> {
        let slots = self.inner.borrow();
        match slot {
            RouteSlot::Origin => slots.origin.clone(),
            RouteSlot::Current => slots.current.clone(),
        }
    }

    /// Shorthand for `get(RouteSlot::Current)`.
    #[must_use]
    pub fn current(&self) -> Option<RouteEvaluation> {
        self.get(RouteSlot::Current)
    }

    /// Shorthand for `get(RouteSlot::Origin)`.
    #[must_use]
    pub fn origin(&self) -> Option<RouteEvaluation> {
        self.get(RouteSlot::Origin)
    }

    /// Update the current evaluation.
    ///
    /// Returns `false` without calling `f` if no route was committed yet. `f` works on a copy, so
    /// it may read this state; the copy is written back once `f` returns.
    pub fn update_current(&self, f: impl FnOnce(&mut RouteEvaluation)) -> bool {
        let Some(mut current) = self.current() else {
            return false;
        };
        f(&mut current);
        self.set(RouteSlot::Current, current);
        true
    }
}

impl Debug for RouteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.inner.borrow();
        f.debug_struct("RouteState")
            .field("origin", &slots.origin)
            .field("current", &slots.current)
            .finish()
    }
}
