//! The loading gate: a blocking overlay that hides the page while routes change.
//!
//! The router asks the gate to show before tearing down the current page and to hide once the new
//! view is in the document. The gate answers each request exactly once through the
//! [`GateSignal`] it was handed.

use futures_channel::mpsc::UnboundedSender;

use crate::service::RouterMessage;

/// Which confirmation a [`GateSignal`] carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateEvent {
    /// The gate is fully shown, the page underneath may change.
    Shown,
    /// The gate is fully hidden.
    Hidden,
}

/// A one-shot confirmation for a gate request. Consumed by [`confirm`](GateSignal::confirm).
#[must_use = "the router waits until the signal is confirmed"]
pub struct GateSignal {
    event: GateEvent,
    tx: UnboundedSender<RouterMessage>,
}

impl GateSignal {
    pub(crate) fn new(event: GateEvent, tx: UnboundedSender<RouterMessage>) -> Self {
        Self { event, tx }
    }

    /// The confirmation this signal will deliver.
    pub fn event(&self) -> GateEvent {
        self.event
    }

    /// Tell the router the animation is over.
    pub fn confirm(self) {
        let message = match self.event {
            GateEvent::Shown => RouterMessage::GateShown,
            GateEvent::Hidden => RouterMessage::GateHidden,
        };
        self.tx.unbounded_send(message).ok();
    }
}

/// The overlay shown during route transitions.
pub trait LoadingGate {
    /// A transition is starting. Show the overlay and confirm `done` once it fully covers the page.
    fn show(&self, done: GateSignal);

    /// The new view has rendered. Hide the overlay and confirm `done` once it is gone.
    ///
    /// Also requested after the initial route, even though the router never asked to show the gate
    /// for it.
    fn hide(&self, done: GateSignal);
}

/// A [`LoadingGate`] without any animation. Confirms every request on the spot.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstantGate;

impl LoadingGate for InstantGate {
    fn show(&self, done: GateSignal) {
        done.confirm();
    }

    fn hide(&self, done: GateSignal) {
        done.confirm();
    }
}
