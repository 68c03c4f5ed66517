//! npm version specification normalizer
//!
//! package.json ranges carry a leading marker (`^1.2.3`, `~1.2.3`,
//! `>=1.2.3`). For comparisons only the bare version matters, so the marker
//! is stripped and the rest is passed through untouched.

/// Range markers in matching order. Two-character markers must precede
/// their one-character prefixes.
const RANGE_MARKERS: [&str; 7] = ["^", "~", ">=", "<=", ">", "<", "="];

/// Source locators that cannot be compared against registry versions
const NON_REGISTRY_PREFIXES: [&str; 4] = ["git+", "file:", "http:", "https:"];

/// Strip the first matching range marker from the start of a spec
pub fn normalize(spec: &str) -> &str {
    RANGE_MARKERS
        .iter()
        .find_map(|marker| spec.strip_prefix(marker))
        .unwrap_or(spec)
}

/// Returns true if the spec points outside the registry
pub fn is_non_registry(spec: &str) -> bool {
    NON_REGISTRY_PREFIXES
        .iter()
        .any(|prefix| spec.starts_with(prefix))
}
