//! Static route configuration.
//!
//! A route maps a URL pattern to the controller that renders it. Routes are loaded once, before the
//! router starts, and never change afterwards.

use crate::{error::RouterError, evaluation::RouteEvaluation, matcher};

/// A single entry of the route table.
///
/// ```rust
/// # use hashbang_router::prelude::*;
/// let users = RouteDefinition::new("Users", "/generateusers")
///     .source_path("pages/users")
///     .parameters(["nbOfUsers"]);
///
/// assert_eq!(users.parameter_count(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RouteDefinition {
    /// The key of the controller in the [`ControllerRegistry`](crate::controller::ControllerRegistry).
    pub controller_id: String,

    /// The path this route answers to, e.g. `/generateusers`.
    pub pattern: String,

    /// Where the controller lives, relative to the application root.
    #[cfg_attr(feature = "serde", serde(default))]
    pub source_path: String,

    /// Names of the trailing segments captured after `pattern`, in order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameter_names: Option<Vec<String>>,
}

impl RouteDefinition {
    /// Create a route without parameters.
    pub fn new(controller_id: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            controller_id: controller_id.into(),
            pattern: pattern.into(),
            source_path: String::new(),
            parameter_names: None,
        }
    }

    /// Set where the controller lives.
    pub fn source_path(self, source_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            ..self
        }
    }

    /// Declare the names of the trailing segments this route captures.
    pub fn parameters<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parameter_names: Some(names.into_iter().map(Into::into).collect()),
            ..self
        }
    }

    /// How many trailing segments this route can capture.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameter_names.as_ref().map_or(0, Vec::len)
    }
}

/// The ordered list of routes. The first entry is the main route, used as fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<RouteDefinition>", into = "Vec<RouteDefinition>"))]
pub struct RouteTable {
    routes: Vec<RouteDefinition>,
}

impl RouteTable {
    /// Create a table. Fails if `routes` is empty.
    pub fn new(routes: Vec<RouteDefinition>) -> Result<Self, RouterError> {
        if routes.is_empty() {
            return Err(RouterError::EmptyRouteTable);
        }
        Ok(Self { routes })
    }

    /// The main route, which doubles as the fallback for unknown URLs.
    #[must_use]
    pub fn main_route(&self) -> &RouteDefinition {
        &self.routes[0]
    }

    /// All routes in table order.
    #[must_use]
    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    /// Iterate over the routes in table order.
    pub fn iter(&self) -> std::slice::Iter<'_, RouteDefinition> {
        self.routes.iter()
    }

    /// Resolve `path` (a fragment with the hash syntax already removed) against this table.
    ///
    /// ```rust
    /// # use hashbang_router::prelude::*;
    /// let table = RouteTable::new(vec![
    ///     RouteDefinition::new("Home", "/"),
    ///     RouteDefinition::new("Users", "/generateusers").parameters(["nbOfUsers"]),
    /// ])
    /// .unwrap();
    ///
    /// let evaluation = table.evaluate("/generateusers/42");
    /// assert_eq!(evaluation.matched_route.controller_id, "Users");
    /// assert_eq!(evaluation.parameter("nbOfUsers"), Some("42"));
    /// ```
    #[must_use]
    pub fn evaluate(&self, path: &str) -> RouteEvaluation {
        matcher::evaluate(path, &self.routes, self.main_route())
    }
}

impl TryFrom<Vec<RouteDefinition>> for RouteTable {
    type Error = RouterError;

    fn try_from(routes: Vec<RouteDefinition>) -> Result<Self, Self::Error> {
        Self::new(routes)
    }
}

impl From<RouteTable> for Vec<RouteDefinition> {
    fn from(table: RouteTable) -> Self {
        table.routes
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a RouteDefinition;
    type IntoIter = std::slice::Iter<'a, RouteDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}
