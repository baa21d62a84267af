//! Shared utility helpers.

/// Ordinal, ASCII case-insensitive string equality.
///
/// Identifier comparison in the catalog is culture-independent: only ASCII
/// letters fold, everything else must match byte for byte.
#[inline]
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.len() == right.len() && left.as_bytes().eq_ignore_ascii_case(right.as_bytes())
}

/// Schema-qualified name match: both schema and object name compared with
/// [`eq_ignore_case`].
#[inline]
pub fn is_same_db_name(
    left_schema: &str,
    left_name: &str,
    right_schema: &str,
    right_name: &str,
) -> bool {
    eq_ignore_case(left_schema, right_schema) && eq_ignore_case(left_name, right_name)
}

/// Case-insensitive starts_with check without allocating.
#[inline]
pub fn starts_with_ci(haystack: &str, needle: &str) -> bool {
    haystack.len() >= needle.len()
        && haystack.as_bytes()[..needle.len()].eq_ignore_ascii_case(needle.as_bytes())
}
