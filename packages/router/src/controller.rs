//! Page controllers and what they can do while they are mounted.

use std::{cell::Cell, collections::BTreeMap, fmt::Display, rc::Rc};

use futures_channel::mpsc::UnboundedSender;
use hashbang_history::HashHistory;
use tracing::{debug, warn};

use crate::{
    evaluation::RouteParameters, route_definition::RouteTable, router_cfg::HashSyntax,
    service::RouterMessage, state::RouteState,
};

/// The lifecycle every page controller implements.
///
/// The router creates a fresh controller for every transition, then calls, in order:
/// 1. [`set_globals`](Self::set_globals)
/// 2. [`prerender`](Self::prerender), which must eventually call
///    [`ControllerContext::view_rendered`] (or [`ControllerContext::prerender_failed`])
/// 3. [`postrender`](Self::postrender), once the view is in the document
/// 4. [`before_leave`](Self::before_leave), right before the next controller replaces this one
pub trait PageController {
    /// Receive the parameters and query of the route being loaded.
    fn set_globals(&mut self, parameters: RouteParameters, query: Option<String>);

    /// Fetch data and compose the view.
    fn prerender(&mut self, cx: ControllerContext);

    /// The view is in the document. Bind interactions here.
    fn postrender(&mut self) {}

    /// The controller is about to be replaced. Unbind whatever `postrender` bound.
    fn before_leave(&mut self) {}
}

/// Builds a new controller instance.
pub type ControllerFactory = Box<dyn Fn() -> Box<dyn PageController>>;

/// Maps controller ids from the route table to controller factories.
///
/// ```rust
/// # use hashbang_router::prelude::*;
/// #[derive(Default)]
/// struct Home;
///
/// impl PageController for Home {
///     fn set_globals(&mut self, _: RouteParameters, _: Option<String>) {}
///     fn prerender(&mut self, cx: ControllerContext) {
///         cx.view_rendered();
///     }
/// }
///
/// let registry = ControllerRegistry::new().register_default::<Home>("Home");
/// assert!(registry.contains("Home"));
/// assert!(registry.create("Users").is_none());
/// ```
#[derive(Default)]
pub struct ControllerRegistry {
    factories: BTreeMap<String, ControllerFactory>,
}

impl ControllerRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `id`. A later registration for the same id wins.
    pub fn register(
        mut self,
        id: impl Into<String>,
        factory: impl Fn() -> Box<dyn PageController> + 'static,
    ) -> Self {
        let id = id.into();
        if self.factories.insert(id.clone(), Box::new(factory)).is_some() {
            warn!(controller = %id, "controller registered twice, later prevails");
        }
        self
    }

    /// Register a controller type that can be built with [`Default`].
    pub fn register_default<C>(self, id: impl Into<String>) -> Self
    where
        C: PageController + Default + 'static,
    {
        self.register(id, || Box::new(C::default()))
    }

    /// Whether a factory exists for `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Build a new controller for `id`.
    #[must_use]
    pub fn create(&self, id: &str) -> Option<Box<dyn PageController>> {
        self.factories.get(id).map(|factory| factory())
    }

    /// The controller ids used by `routes` that have no factory, in table order, without
    /// duplicates.
    #[must_use]
    pub fn missing_for(&self, routes: &RouteTable) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for route in routes {
            let id = &route.controller_id;
            if !self.contains(id) && !missing.contains(id) {
                missing.push(id.clone());
            }
        }
        missing
    }
}

/// What a mounted controller can ask of the router.
///
/// Every context belongs to one transition. Once the next controller is mounted it goes stale:
/// its render signals and redirects are ignored.
#[derive(Clone)]
pub struct ControllerContext {
    transition: u64,
    active: Rc<Cell<u64>>,
    tx: UnboundedSender<RouterMessage>,
    state: RouteState,
    history: Rc<dyn HashHistory>,
    hash_syntax: HashSyntax,
}

impl ControllerContext {
    pub(crate) fn new(
        transition: u64,
        active: Rc<Cell<u64>>,
        tx: UnboundedSender<RouterMessage>,
        state: RouteState,
        history: Rc<dyn HashHistory>,
        hash_syntax: HashSyntax,
    ) -> Self {
        Self {
            transition,
            active,
            tx,
            state,
            history,
            hash_syntax,
        }
    }

    /// The route state shared with the router.
    pub fn route_state(&self) -> &RouteState {
        &self.state
    }

    /// Whether the controller holding this context is still the mounted one.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get() == self.transition
    }

    /// The view is composed and in the document.
    pub fn view_rendered(&self) {
        self.tx
            .unbounded_send(RouterMessage::ViewRendered(self.transition))
            .ok();
    }

    /// The view could not be composed, e.g. because a request failed.
    pub fn prerender_failed(&self, reason: impl Display) {
        self.tx
            .unbounded_send(RouterMessage::PrerenderFailed(
                self.transition,
                reason.to_string(),
            ))
            .ok();
    }

    /// Correct the displayed URL without a new transition.
    ///
    /// Only valid during `prerender`, before [`view_rendered`](Self::view_rendered): the router
    /// reads the corrected path back once the view has rendered and replaces the URL with it.
    pub fn redirect(&self, path: impl Into<String>) {
        let path = path.into();
        if !self.is_active() {
            warn!(%path, "redirect from a controller that is no longer mounted");
            return;
        }
        let updated = self.state.update_current(|current| {
            current.resolved_path = path.clone();
            current.controller_requested_redirect = true;
        });
        if updated {
            debug!(%path, "controller redirect");
        } else {
            warn!(%path, "redirect requested before any route was committed");
        }
    }

    /// Navigate to another route, like following a link.
    ///
    /// Meant for use after the view rendered. The router picks the change up as a regular URL
    /// change, so it is ignored while a transition is in progress.
    pub fn navigate(&self, path: &str) {
        self.history.push(self.hash_syntax.fragment(path));
    }
}
