#![deny(missing_docs)]
//! A hash-based router for single page applications.
//!
//! The router maps URL fragments such as `#!/generateusers/42` to page controllers, swaps
//! controllers behind a loading gate and keeps the displayed URL in line with the route that is
//! actually shown.
//!
//! ```rust
//! use std::rc::Rc;
//! use hashbang_router::prelude::*;
//!
//! #[derive(Default)]
//! struct Home;
//!
//! impl PageController for Home {
//!     fn set_globals(&mut self, _: RouteParameters, _: Option<String>) {}
//!     fn prerender(&mut self, cx: ControllerContext) {
//!         cx.view_rendered();
//!     }
//! }
//!
//! let routes = RouteTable::new(vec![RouteDefinition::new("Home", "/")]).unwrap();
//! let history = Rc::new(MemoryHistory::with_initial_hash("#!/"));
//! let timer = Rc::new(ManualTimer::default());
//!
//! let (mut router, cx) = RouterService::new(
//!     routes,
//!     RouterConfig::default(),
//!     history,
//!     Rc::new(InstantGate),
//!     timer.clone(),
//! );
//!
//! router.start();
//! cx.provide_controllers(ControllerRegistry::new().register_default::<Home>("Home"));
//! router.flush();
//!
//! timer.fire_all();
//! router.flush();
//! assert_eq!(router.phase(), RouterPhase::Idle);
//! ```

pub mod controller;
pub mod evaluation;
pub mod gate;
pub mod matcher;
pub mod route_definition;
pub mod service;
pub mod state;
pub mod timer;

mod contexts {
    pub(crate) mod router;
    pub use router::*;
}

mod error;
mod helpers;
mod router_cfg;

pub use contexts::RouterContext;
pub use error::RouterError;
pub use router_cfg::{HashSyntax, RouterConfig, RoutingCallback};

/// A collection of useful items most applications might need.
pub mod prelude {
    pub use crate::contexts::*;
    pub use crate::controller::*;
    pub use crate::error::RouterError;
    pub use crate::evaluation::*;
    pub use crate::gate::*;
    pub use crate::matcher::evaluate;
    pub use crate::route_definition::*;
    pub use crate::router_cfg::{HashSyntax, RouterConfig, RoutingCallback};
    pub use crate::service::{RouterMessage, RouterPhase, RouterService};
    pub use crate::state::*;
    pub use crate::timer::*;
    pub use hashbang_history::{HashHistory, MemoryHistory};

    #[cfg(feature = "web")]
    pub use hashbang_history::WebHashHistory;
}
