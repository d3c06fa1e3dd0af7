use std::{str::FromStr, time::Duration};

use hashbang_router::{
    route_definition::{RouteDefinition, RouteTable},
    HashSyntax, RouterConfig, RouterError,
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The static configuration of a shell, usually loaded from a `hashbang.toml`.
///
/// ```toml
/// app_name = "user-generator"
/// hash_syntax = "#!"
/// settle_delay_ms = 100
///
/// [[routes]]
/// controller_id = "Home"
/// pattern = "/"
/// source_path = "pages/home"
///
/// [[routes]]
/// controller_id = "Users"
/// pattern = "/generateusers"
/// parameter_names = ["nbOfUsers"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// A name used in log output.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// The token between `#` and the route path.
    #[serde(default)]
    pub hash_syntax: HashSyntax,

    /// How long the router waits before listening again after a transition.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// The route table. The first route is the main route.
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
}

fn default_app_name() -> String {
    String::from("hashbang")
}

fn default_settle_delay_ms() -> u64 {
    100
}

impl ShellConfig {
    /// Parse a configuration from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, Error> {
        Ok(toml::from_str(source)?)
    }

    /// The configured routes as a [`RouteTable`].
    pub fn route_table(&self) -> Result<RouteTable, RouterError> {
        RouteTable::new(self.routes.clone())
    }

    /// A [`RouterConfig`] carrying the configured hash syntax and settle delay.
    pub fn router_config(&self) -> RouterConfig {
        RouterConfig::default()
            .hash_syntax(self.hash_syntax)
            .settle_delay(Duration::from_millis(self.settle_delay_ms))
    }
}

impl FromStr for ShellConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_toml_str(s)
    }
}
