use std::rc::Rc;

use futures_channel::mpsc::UnboundedSender;
use hashbang_history::HashHistory;

use crate::{
    controller::ControllerRegistry, router_cfg::HashSyntax, service::RouterMessage,
    state::RouteState,
};

/// A handle to a running [`RouterService`](crate::service::RouterService), for the application
/// around it.
///
/// Cheap to clone. All requests are queued and handled by the service in order.
#[derive(Clone)]
pub struct RouterContext {
    pub(crate) tx: UnboundedSender<RouterMessage>,
    pub(crate) state: RouteState,
    pub(crate) history: Rc<dyn HashHistory>,
    pub(crate) hash_syntax: HashSyntax,
}

impl RouterContext {
    /// Hand the controller implementations to the router.
    ///
    /// The very first route waits for this before mounting its controller.
    pub fn provide_controllers(&self, registry: ControllerRegistry) {
        self.tx
            .unbounded_send(RouterMessage::ControllersLoaded(registry))
            .ok();
    }

    /// The route state of the router.
    pub fn route_state(&self) -> &RouteState {
        &self.state
    }

    /// Navigate to `path`, like following a link.
    pub fn navigate(&self, path: &str) {
        self.history.push(self.hash_syntax.fragment(path));
    }

    /// The hash syntax the router was configured with.
    pub fn hash_syntax(&self) -> HashSyntax {
        self.hash_syntax
    }
}
