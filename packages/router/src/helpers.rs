use crate::evaluation::RouteParameters;

/// Remove the hash syntax from a raw fragment, e.g. `#!/about` becomes `/about`.
///
/// Returns the text between the first and the second occurrence of `token`, or an empty string if
/// `token` does not occur at all.
#[must_use]
pub(crate) fn strip_hash_prefix<'a>(hash: &'a str, token: &str) -> &'a str {
    hash.split(token).nth(1).unwrap_or_default()
}

/// Pair the segments of `remainder` with the declared parameter `names`, by position.
///
/// Names without a segment (or with an empty one) get [`None`]. Segments without a name are
/// dropped.
#[must_use]
pub(crate) fn zip_parameters(remainder: &str, names: &[String]) -> RouteParameters {
    let mut segments = remainder.split('/');
    names
        .iter()
        .map(|name| {
            let value = segments
                .next()
                .filter(|segment| !segment.is_empty())
                .map(str::to_string);
            (name.clone(), value)
        })
        .collect()
}
