//! Utility functions shared across modules.

/// Find a key in a collection that matches the target case-insensitively.
///
/// Used to match user-typed site names against the names the platform
/// declares, where case may differ.
pub fn find_key_ignore_case<'a>(
    keys: impl Iterator<Item = &'a String>,
    target: &str,
) -> Option<&'a String> {
    keys.into_iter().find(|k| k.eq_ignore_ascii_case(target))
}
