use crate::models::{Match, Profile};
use std::collections::HashSet;

/// Canonical identity for an unordered user pair.
///
/// Both the candidate-exclusion filter and the duplicate-proposal check key
/// matches this way, so the "one match per pair" invariant has a single
/// definition.
pub fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Remove the user themselves and everyone they already have a match with,
/// regardless of that match's status.
///
/// Preserves the input order of `all_users` so the result is stable for a
/// given input.
pub fn candidates(user_id: &str, all_users: Vec<Profile>, existing: &[Match]) -> Vec<Profile> {
    let excluded: HashSet<&str> = existing
        .iter()
        .filter_map(|m| m.counterpart(user_id))
        .chain(std::iter::once(user_id))
        .collect();

    all_users
        .into_iter()
        .filter(|p| !excluded.contains(p.user_id.as_str()))
        .collect()
}
