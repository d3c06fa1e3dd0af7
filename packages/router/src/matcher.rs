//! Resolution of URL fragments to routes.
//!
//! Matching is depth based. A path is cut into prefixes of decreasing depth and each prefix is
//! compared to every route pattern in table order. The deepest prefix that equals a pattern wins;
//! the segments after it become route parameters.

use tracing::trace;

use crate::{
    evaluation::{RouteEvaluation, RouteParameters},
    helpers::zip_parameters,
    route_definition::RouteDefinition,
};

/// Resolve `path` against `routes`, substituting `main` when nothing matches.
///
/// `path` is a fragment without the hash syntax and may carry a query (`/users/3?sort=asc`). This
/// function is pure: the same input always produces the same evaluation.
///
/// ```rust
/// # use hashbang_router::prelude::*;
/// let home = RouteDefinition::new("Home", "/");
/// let routes = vec![home.clone(), RouteDefinition::new("Users", "/generateusers")];
///
/// let evaluation = evaluate("/nonexistent", &routes, &home);
/// assert!(!evaluation.route_exists);
/// assert!(evaluation.should_replace_url);
/// assert_eq!(evaluation.resolved_path, "/");
/// ```
#[must_use]
pub fn evaluate(path: &str, routes: &[RouteDefinition], main: &RouteDefinition) -> RouteEvaluation {
    if path.is_empty() {
        return RouteEvaluation::fallback(main);
    }

    let (clean, query) = match path.split_once('?') {
        Some((clean, query)) => (clean, Some(query)),
        None => (path, None),
    };

    let evaluation = match clean.matches('/').count() {
        // without a separator there is no depth to match on, even `about` never resolves
        0 => None,
        1 => match_exact(path, clean, query, routes),
        separators => match_deepest(path, clean, query, separators, routes, main),
    };

    evaluation.unwrap_or_else(|| {
        trace!(path, "no route matched, falling back to main route");
        RouteEvaluation::fallback(main)
    })
}

/// Top level paths must equal a pattern exactly.
fn match_exact(
    path: &str,
    clean: &str,
    query: Option<&str>,
    routes: &[RouteDefinition],
) -> Option<RouteEvaluation> {
    let route = routes.iter().find(|route| route.pattern == clean)?;
    trace!(path, pattern = %route.pattern, "exact match");

    Some(RouteEvaluation {
        matched_route: route.clone(),
        route_parameters: RouteParameters::new(),
        query_string: query.map(str::to_string),
        resolved_path: path.to_string(),
        should_replace_url: false,
        route_exists: true,
        controller_requested_redirect: false,
    })
}

fn match_deepest(
    path: &str,
    clean: &str,
    query: Option<&str>,
    mut separators: usize,
    routes: &[RouteDefinition],
    main: &RouteDefinition,
) -> Option<RouteEvaluation> {
    // a trailing separator carries no segment, drop it and ask for the canonical URL
    let trailing_separator = clean.ends_with('/');
    let clean = if trailing_separator {
        separators -= 1;
        &clean[..clean.len() - 1]
    } else {
        clean
    };

    // the query survives only when the URL is kept as typed
    let (kept_query, kept_path) = match trailing_separator {
        true => (None, clean.to_string()),
        false => (query.map(str::to_string), path.to_string()),
    };

    for depth in (1..=separators).rev() {
        let prefix = prefix_at_depth(clean, depth);
        let Some(route) = routes.iter().find(|route| route.pattern == prefix) else {
            continue;
        };

        let extra_segments = separators - depth;
        trace!(path, pattern = %route.pattern, depth, extra_segments, "prefix match");

        let evaluation = if extra_segments == 0 {
            RouteEvaluation {
                matched_route: route.clone(),
                route_parameters: RouteParameters::new(),
                query_string: kept_query,
                resolved_path: kept_path,
                should_replace_url: trailing_separator,
                route_exists: true,
                controller_requested_redirect: false,
            }
        } else if route.parameter_count() == 0 {
            // the route takes no parameters, redirect to its canonical form
            RouteEvaluation {
                matched_route: route.clone(),
                route_parameters: RouteParameters::new(),
                query_string: None,
                resolved_path: route.pattern.clone(),
                should_replace_url: true,
                route_exists: true,
                controller_requested_redirect: false,
            }
        } else if route.parameter_count() >= extra_segments {
            let names = route.parameter_names.as_deref().unwrap_or_default();
            RouteEvaluation {
                matched_route: route.clone(),
                route_parameters: zip_parameters(&clean[prefix.len() + 1..], names),
                query_string: kept_query,
                resolved_path: kept_path,
                should_replace_url: trailing_separator,
                route_exists: true,
                controller_requested_redirect: false,
            }
        } else {
            trace!(path, "more segments than parameter slots");
            RouteEvaluation::fallback(main)
        };

        return Some(evaluation);
    }

    None
}

/// The part of `path` up to the segment following its `depth`-th separator.
///
/// `prefix_at_depth("/a/b/c", 2) == "/a/b"`
fn prefix_at_depth(path: &str, depth: usize) -> &str {
    let Some((separator, _)) = path.match_indices('/').nth(depth.saturating_sub(1)) else {
        return path;
    };

    match path[separator + 1..].find('/') {
        Some(next) => &path[..separator + 1 + next],
        None => path,
    }
}
