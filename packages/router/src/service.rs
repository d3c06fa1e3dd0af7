//! The transition coordinator.

use std::{cell::Cell, fmt::Debug, rc::Rc};

use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures_util::{FutureExt, StreamExt};
use hashbang_history::HashHistory;
use tracing::{debug, error, info, warn};

use crate::{
    contexts::RouterContext,
    controller::{ControllerContext, ControllerRegistry, PageController},
    evaluation::RouteEvaluation,
    gate::{GateEvent, GateSignal, LoadingGate},
    helpers::strip_hash_prefix,
    route_definition::RouteTable,
    router_cfg::RouterConfig,
    state::{RouteSlot, RouteState},
    timer::SettleTimer,
};

/// A set of messages that the [`RouterService`] can handle.
pub enum RouterMessage {
    /// The displayed URL changed while the router was listening.
    UrlChanged,

    /// The controller implementations are available.
    ControllersLoaded(ControllerRegistry),

    /// The loading gate fully covers the page.
    GateShown,

    /// The view of the controller mounted for the given transition is in the document.
    ViewRendered(u64),

    /// The controller mounted for the given transition could not compose its view.
    PrerenderFailed(u64, String),

    /// The loading gate is fully hidden.
    GateHidden,

    /// The settle delay is over, start listening to URL changes again.
    Rearm,
}

impl RouterMessage {
    fn name(&self) -> &'static str {
        match self {
            RouterMessage::UrlChanged => "url-changed",
            RouterMessage::ControllersLoaded(_) => "controllers-loaded",
            RouterMessage::GateShown => "gate-shown",
            RouterMessage::ViewRendered(_) => "view-rendered",
            RouterMessage::PrerenderFailed(..) => "prerender-failed",
            RouterMessage::GateHidden => "gate-hidden",
            RouterMessage::Rearm => "rearm",
        }
    }
}

// [`ControllerRegistry`] holds factories, which don't implement [`Debug`]
impl Debug for RouterMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterMessage::ViewRendered(transition) => {
                f.debug_tuple("ViewRendered").field(transition).finish()
            }
            RouterMessage::PrerenderFailed(transition, reason) => f
                .debug_tuple("PrerenderFailed")
                .field(transition)
                .field(reason)
                .finish(),
            other => f.write_str(other.name()),
        }
    }
}

/// Where the [`RouterService`] stands in a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouterPhase {
    /// Not started yet.
    Initial,
    /// The first route is committed but the controllers are not loaded yet.
    AwaitingControllers,
    /// A route change was accepted, the loading gate is being shown.
    AwaitingGateShown,
    /// The new controller is mounted and composing its view.
    Rendering,
    /// The view rendered, the loading gate is being hidden.
    AwaitingGateHidden,
    /// Waiting for the settle delay before listening again.
    Settling,
    /// Listening for URL changes.
    Idle,
}

/// The armed state of the URL-change listener, shared with the history callback.
#[derive(Clone, Default)]
struct UrlListener {
    armed: Rc<Cell<bool>>,
}

impl UrlListener {
    fn arm(&self) {
        self.armed.set(true);
    }

    /// Returns whether the listener was armed.
    fn disarm(&self) -> bool {
        self.armed.replace(false)
    }

    fn is_armed(&self) -> bool {
        self.armed.get()
    }
}

/// The core of the router.
///
/// This combines the [route table](RouteTable), a [`HashHistory`], a [`LoadingGate`] and the page
/// controllers. It resolves the displayed URL, swaps controllers and keeps the URL in line with the
/// route that is actually shown.
///
/// Exactly one transition is in flight at any time. As soon as a URL change is picked up the
/// listener is disarmed, and it is only re-armed a settle delay after the loading gate is hidden
/// again. URL changes in between are not reacted to. Once started, a transition always runs to
/// completion.
///
/// The service is driven by [`RouterMessage`]s. Controllers, the gate and the timer send them
/// through a channel; [`run`](Self::run) processes them as they arrive and
/// [`flush`](Self::flush) processes whatever is queued.
pub struct RouterService {
    config: RouterConfig,
    routes: RouteTable,
    history: Rc<dyn HashHistory>,
    gate: Rc<dyn LoadingGate>,
    timer: Rc<dyn SettleTimer>,
    state: RouteState,
    registry: Option<ControllerRegistry>,
    controller: Option<Box<dyn PageController>>,
    pending: Option<RouteEvaluation>,
    listener: UrlListener,
    transition: Rc<Cell<u64>>,
    phase: RouterPhase,
    busy: bool,
    initialized: bool,
    tx: UnboundedSender<RouterMessage>,
    rx: UnboundedReceiver<RouterMessage>,
}

impl RouterService {
    /// Create a new [`RouterService`].
    ///
    /// The returned [`RouterService`] and [`RouterContext`] are linked with each other.
    #[must_use]
    pub fn new(
        routes: RouteTable,
        config: RouterConfig,
        history: Rc<dyn HashHistory>,
        gate: Rc<dyn LoadingGate>,
        timer: Rc<dyn SettleTimer>,
    ) -> (Self, RouterContext) {
        let (tx, rx) = unbounded();
        let state = RouteState::default();

        let context = RouterContext {
            tx: tx.clone(),
            state: state.clone(),
            history: history.clone(),
            hash_syntax: config.hash_syntax,
        };

        (
            Self {
                config,
                routes,
                history,
                gate,
                timer,
                state,
                registry: None,
                controller: None,
                pending: None,
                listener: UrlListener::default(),
                transition: Rc::default(),
                phase: RouterPhase::Initial,
                busy: false,
                initialized: false,
                tx,
                rx,
            },
            context,
        )
    }

    /// Load the route of the displayed URL.
    ///
    /// The first route is committed without showing the loading gate. Its controller is mounted
    /// as soon as the controllers are provided.
    pub fn start(&mut self) {
        if self.phase != RouterPhase::Initial {
            warn!("router already started");
            return;
        }

        let tx = self.tx.clone();
        let listener = self.listener.clone();
        self.history.updater(Rc::new(move || {
            // detach on the first notification, the rest is dropped until the router re-arms
            if listener.disarm() {
                tx.unbounded_send(RouterMessage::UrlChanged).ok();
            }
        }));

        self.busy = true;
        let evaluation = self.evaluate_displayed_url();
        info!(
            path = %evaluation.resolved_path,
            controller = %evaluation.matched_route.controller_id,
            "loading initial route"
        );
        self.commit_transition(evaluation);
    }

    /// The routers event loop.
    pub async fn run(&mut self) {
        self.start();

        while let Some(message) = self.rx.next().await {
            self.handle(message);
        }
    }

    /// Handle every queued message, including those queued while handling. Returns how many were
    /// handled.
    pub fn flush(&mut self) -> usize {
        let mut handled = 0;
        while let Some(Some(message)) = self.rx.next().now_or_never() {
            self.handle(message);
            handled += 1;
        }
        handled
    }

    /// Handle a single message.
    ///
    /// Messages that don't belong to the current phase are dropped, and so are render signals from a
    /// controller other than the one currently mounted. This makes every signal count at most once,
    /// and only for its own transition.
    pub fn handle(&mut self, message: RouterMessage) {
        match (message, self.phase) {
            (RouterMessage::UrlChanged, RouterPhase::Idle) if !self.busy => self.on_url_changed(),
            (RouterMessage::ControllersLoaded(registry), _) => self.on_controllers_loaded(registry),
            (RouterMessage::GateShown, RouterPhase::AwaitingGateShown) => self.on_gate_shown(),
            (RouterMessage::ViewRendered(id), RouterPhase::Rendering)
                if id == self.transition.get() =>
            {
                self.finish_transition(true)
            }
            (RouterMessage::PrerenderFailed(id, reason), RouterPhase::Rendering)
                if id == self.transition.get() =>
            {
                error!(%reason, "controller failed to render its view");
                self.finish_transition(false);
            }
            (RouterMessage::GateHidden, RouterPhase::AwaitingGateHidden) => self.on_gate_hidden(),
            (RouterMessage::Rearm, RouterPhase::Settling) => {
                self.listener.arm();
                self.set_phase(RouterPhase::Idle);
            }
            (message, phase) => {
                debug!(message = message.name(), ?phase, "dropping stale or out of phase message")
            }
        }
    }

    /// The current phase.
    #[must_use]
    pub fn phase(&self) -> RouterPhase {
        self.phase
    }

    /// Whether a transition is in progress, from accepting a URL change until its view rendered.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether URL changes are currently picked up.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listener.is_armed()
    }

    /// The route state shared with the controllers.
    #[must_use]
    pub fn route_state(&self) -> &RouteState {
        &self.state
    }

    /// A new handle to this service.
    #[must_use]
    pub fn context(&self) -> RouterContext {
        RouterContext {
            tx: self.tx.clone(),
            state: self.state.clone(),
            history: self.history.clone(),
            hash_syntax: self.config.hash_syntax,
        }
    }

    fn on_url_changed(&mut self) {
        self.busy = true;
        let evaluation = self.evaluate_displayed_url();

        if !evaluation.route_exists {
            // nothing to load, just snap back to what is shown
            let target = match self.state.current() {
                Some(current) => current.resolved_path,
                None => self.routes.main_route().pattern.clone(),
            };
            debug!(%target, "unknown route, restoring the displayed URL");
            self.history.replace(self.config.hash_syntax.fragment(&target));
            self.busy = false;
            self.settle();
            return;
        }

        debug!(
            path = %evaluation.resolved_path,
            controller = %evaluation.matched_route.controller_id,
            "route change accepted"
        );
        self.pending = Some(evaluation);
        self.set_phase(RouterPhase::AwaitingGateShown);
        self.gate
            .show(GateSignal::new(GateEvent::Shown, self.tx.clone()));
    }

    fn on_gate_shown(&mut self) {
        match self.pending.take() {
            Some(evaluation) => self.commit_transition(evaluation),
            None => error!("gate shown without a pending route"),
        }
    }

    fn on_controllers_loaded(&mut self, registry: ControllerRegistry) {
        let missing = registry.missing_for(&self.routes);
        if !missing.is_empty() {
            warn!(?missing, "routes without a registered controller");
        }
        if self.registry.replace(registry).is_some() {
            debug!("controllers replaced");
        }

        if self.phase == RouterPhase::AwaitingControllers {
            if let Some(current) = self.state.current() {
                self.mount(&current);
            }
        }
    }

    fn commit_transition(&mut self, evaluation: RouteEvaluation) {
        if let Some(controller) = self.controller.as_mut() {
            controller.before_leave();
        }

        if self.initialized {
            if let Some(previous) = self.state.current() {
                self.state.set(RouteSlot::Origin, previous);
            }
        }
        self.state.set(RouteSlot::Current, evaluation.clone());

        if evaluation.should_replace_url {
            self.history
                .replace(self.config.hash_syntax.fragment(&evaluation.resolved_path));
        }

        if self.registry.is_some() {
            self.mount(&evaluation);
        } else {
            debug!("waiting for controllers");
            self.set_phase(RouterPhase::AwaitingControllers);
        }
    }

    fn mount(&mut self, evaluation: &RouteEvaluation) {
        // tear down the old controller before its successor exists
        self.controller = None;
        // contexts handed out earlier go stale here
        self.transition.set(self.transition.get() + 1);
        self.set_phase(RouterPhase::Rendering);

        let id = &evaluation.matched_route.controller_id;
        let Some(mut controller) = self.registry.as_ref().and_then(|r| r.create(id)) else {
            error!(controller = %id, "no controller registered");
            self.finish_transition(false);
            return;
        };

        controller.set_globals(
            evaluation.route_parameters.clone(),
            evaluation.query_string.clone(),
        );
        controller.prerender(ControllerContext::new(
            self.transition.get(),
            self.transition.clone(),
            self.tx.clone(),
            self.state.clone(),
            self.history.clone(),
            self.config.hash_syntax,
        ));
        self.controller = Some(controller);
    }

    /// Close the rendering step. `rendered` is `false` if the controller failed.
    fn finish_transition(&mut self, rendered: bool) {
        if !self.initialized {
            self.reconcile_url(true);
            self.initialized = true;
            if let (true, Some(callback)) = (rendered, &self.config.on_initial_render) {
                callback(&self.state);
            }
        }

        if rendered {
            if let Some(current) = self.state.current() {
                info!(path = %current.resolved_path, "route changed");
            }
            if let Some(callback) = &self.config.on_update {
                callback(&self.state);
            }
        }

        self.busy = false;

        if rendered {
            if let Some(controller) = self.controller.as_mut() {
                controller.postrender();
            }
        }

        self.set_phase(RouterPhase::AwaitingGateHidden);
        self.gate
            .hide(GateSignal::new(GateEvent::Hidden, self.tx.clone()));
    }

    fn on_gate_hidden(&mut self) {
        self.reconcile_url(false);
        self.settle();
    }

    /// Make the displayed URL match the committed route.
    ///
    /// Controller redirects replace the URL. Otherwise the URL only drifted because it changed
    /// while the router was not listening; that is undone with a push, except for the initial
    /// route which keeps whatever the browser shows.
    fn reconcile_url(&self, initial: bool) {
        let Some(current) = self.state.current() else {
            return;
        };

        let expected = self.config.hash_syntax.fragment(&current.resolved_path);
        if self.history.current_hash() == expected {
            return;
        }

        if current.controller_requested_redirect {
            debug!(%expected, "applying controller redirect");
            self.history.replace(expected);
        } else if !initial {
            debug!(%expected, "restoring the URL of the displayed route");
            self.history.push(expected);
        }
    }

    fn settle(&mut self) {
        self.set_phase(RouterPhase::Settling);
        let tx = self.tx.clone();
        self.timer.schedule(
            self.config.settle_delay,
            Box::new(move || {
                tx.unbounded_send(RouterMessage::Rearm).ok();
            }),
        );
    }

    fn evaluate_displayed_url(&self) -> RouteEvaluation {
        let hash = self.history.current_hash();
        let path = strip_hash_prefix(&hash, self.config.hash_syntax.as_str());
        self.routes.evaluate(path)
    }

    fn set_phase(&mut self, phase: RouterPhase) {
        debug!(from = ?self.phase, to = ?phase, "router phase");
        self.phase = phase;
    }
}
