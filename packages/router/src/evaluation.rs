//! The result of resolving a URL against the route table.

use std::collections::BTreeMap;

use crate::route_definition::RouteDefinition;

/// Route parameters keyed by their declared name. Declared parameters without a matching segment
/// are present with a [`None`] value.
pub type RouteParameters = BTreeMap<String, Option<String>>;

/// The outcome of resolving one URL against the route table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteEvaluation {
    /// The route that will be rendered. The main route if `route_exists` is `false`.
    pub matched_route: RouteDefinition,

    /// The parameters captured from the trailing segments.
    pub route_parameters: RouteParameters,

    /// Everything after the first `?`, if kept.
    pub query_string: Option<String>,

    /// The canonical path for this evaluation, without the hash syntax.
    pub resolved_path: String,

    /// Whether the displayed URL must be replaced by `resolved_path`.
    pub should_replace_url: bool,

    /// Whether the URL resolved to a route. `false` means the main route was substituted.
    pub route_exists: bool,

    /// Set by a controller that changed `resolved_path` before its view rendered.
    pub controller_requested_redirect: bool,
}

impl RouteEvaluation {
    /// The evaluation used whenever a URL cannot be resolved.
    #[must_use]
    pub fn fallback(main: &RouteDefinition) -> Self {
        Self {
            matched_route: main.clone(),
            route_parameters: RouteParameters::new(),
            query_string: None,
            resolved_path: main.pattern.clone(),
            should_replace_url: true,
            route_exists: false,
            controller_requested_redirect: false,
        }
    }

    /// Get the value of a captured parameter.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.route_parameters.get(name)?.as_deref()
    }
}
