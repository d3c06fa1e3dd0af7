//! Assembling and launching the shell.

use std::rc::Rc;

use hashbang_history::HashHistory;
use hashbang_router::{
    controller::ControllerRegistry, gate::LoadingGate, route_definition::RouteTable,
    service::RouterService, timer::SettleTimer, RouterConfig, RouterContext, RouterError,
};
use tracing::info;

use crate::{config::ShellConfig, Error};

/// A builder for a shell application.
#[must_use]
pub struct App {
    name: String,
    routes: RouteTable,
    config: RouterConfig,
    controllers: Option<ControllerRegistry>,
}

impl App {
    /// Create an application serving `routes` with the default [`RouterConfig`].
    pub fn new(routes: RouteTable) -> Self {
        Self {
            name: String::from("hashbang"),
            routes,
            config: RouterConfig::default(),
            controllers: None,
        }
    }

    /// Create an application from a parsed [`ShellConfig`].
    pub fn from_config(config: &ShellConfig) -> Result<Self, Error> {
        Ok(Self {
            name: config.app_name.clone(),
            routes: config.route_table()?,
            config: config.router_config(),
            controllers: None,
        })
    }

    /// Replace the router configuration.
    pub fn with_config(self, config: RouterConfig) -> Self {
        Self { config, ..self }
    }

    /// Provide the controllers up front.
    ///
    /// [`build`](Self::build) then checks that every route has a controller.
    pub fn controllers(self, controllers: ControllerRegistry) -> Self {
        Self {
            controllers: Some(controllers),
            ..self
        }
    }

    #[cfg(any(test, feature = "web"))]
    fn without_controllers(self) -> Self {
        if self.controllers.is_some() {
            tracing::warn!(
                app = %self.name,
                "controllers provided up front are replaced by the deferred ones"
            );
        }
        Self {
            controllers: None,
            ..self
        }
    }

    /// Create the router on top of the given platform pieces.
    ///
    /// If controllers were provided they are queued for the router, otherwise they have to be
    /// handed over later through [`RouterContext::provide_controllers`].
    pub fn build(
        self,
        history: Rc<dyn HashHistory>,
        gate: Rc<dyn LoadingGate>,
        timer: Rc<dyn SettleTimer>,
    ) -> Result<(RouterService, RouterContext), Error> {
        if let Some(controllers) = &self.controllers {
            let missing = controllers.missing_for(&self.routes);
            if !missing.is_empty() {
                return Err(RouterError::UnknownControllers(missing).into());
            }
        }

        info!(app = %self.name, routes = self.routes.routes().len(), "building router");
        let (service, cx) = RouterService::new(self.routes, self.config, history, gate, timer);
        if let Some(controllers) = self.controllers {
            cx.provide_controllers(controllers);
        }

        Ok((service, cx))
    }

    /// Launch the shell in the browser, on the current page's URL fragment.
    #[cfg(feature = "web")]
    pub fn launch(self, gate: impl LoadingGate + 'static) -> Result<RouterContext, Error> {
        use hashbang_history::WebHashHistory;
        use hashbang_router::timer::TimeoutTimer;

        let (mut service, cx) = self.build(
            Rc::new(WebHashHistory::new()),
            Rc::new(gate),
            Rc::new(TimeoutTimer),
        )?;
        wasm_bindgen_futures::spawn_local(async move { service.run().await });
        Ok(cx)
    }

    /// Like [`launch`](Self::launch), but load the controllers asynchronously.
    ///
    /// The first route is resolved right away and mounted once `controllers` completes. A registry
    /// passed to [`controllers`](Self::controllers) before is replaced by the loaded one.
    #[cfg(feature = "web")]
    pub fn launch_deferred(
        self,
        gate: impl LoadingGate + 'static,
        controllers: impl std::future::Future<Output = ControllerRegistry> + 'static,
    ) -> Result<RouterContext, Error> {
        let cx = self.without_controllers().launch(gate)?;

        let loader = cx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            loader.provide_controllers(controllers.await);
        });
        Ok(cx)
    }
}
