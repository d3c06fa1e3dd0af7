#![deny(missing_docs)]
//! A single page application shell with hash-based routing.
//!
//! Describe the routes in a TOML file, register a [`PageController`](prelude::PageController) per
//! route and hand everything to an [`App`]:
//!
//! ```rust
//! use std::rc::Rc;
//! use hashbang::prelude::*;
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
//! let config: ShellConfig = r#"
//!     app_name = "demo"
//!
//!     [[routes]]
//!     controller_id = "Home"
//!     pattern = "/"
//! "#
//! .parse()
//! .unwrap();
//!
//! let (mut router, _cx) = App::from_config(&config)
//!     .unwrap()
//!     .controllers(ControllerRegistry::new().register_default::<Home>("Home"))
//!     .build(
//!         Rc::new(MemoryHistory::with_initial_hash("#!/")),
//!         Rc::new(InstantGate),
//!         Rc::new(ManualTimer::default()),
//!     )
//!     .unwrap();
//!
//! router.start();
//! router.flush();
//! assert_eq!(router.phase(), RouterPhase::Settling);
//! ```

mod config;
mod launch;

pub use config::ShellConfig;
pub use launch::App;

pub use hashbang_history as history;
#[cfg(feature = "logger")]
pub use hashbang_logger as logger;
pub use hashbang_router as router;

/// Errors that can occur while setting up the shell.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The shell configuration could not be parsed.
    #[error("invalid shell configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The routes or controllers don't fit together.
    #[error(transparent)]
    Router(#[from] hashbang_router::RouterError),
}

/// A collection of useful items most applications might need.
pub mod prelude {
    pub use crate::{App, Error, ShellConfig};
    pub use hashbang_router::prelude::*;
}
