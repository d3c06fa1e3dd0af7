use thiserror::Error;

/// Errors raised while assembling a router.
///
/// Routing itself never fails: unknown URLs are corrected silently by replacing the displayed
/// fragment. These errors only come up when the configuration is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The route table has no entries, so there is no main route to fall back to.
    #[error("the route table is empty, at least a main route is required")]
    EmptyRouteTable,

    /// Some routes point at controllers that were never registered.
    #[error("no controller registered for: {}", .0.join(", "))]
    UnknownControllers(Vec<String>),
}
