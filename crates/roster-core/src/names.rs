//! # Name Validation
//!
//! Pure predicates deciding whether a candidate string is an acceptable
//! group or host identifier. Consumed by the entity constructors; no state,
//! no side effects.

use crate::primitives::MAX_HOST_NAME_LEN;

/// A group name is any non-empty string.
#[must_use]
pub fn is_valid_group_name(name: &str) -> bool {
    !name.is_empty()
}

/// A host name must be non-empty, shorter than [`MAX_HOST_NAME_LEN`], and
/// consist of ASCII alphanumerics plus `_`, `-` and `.` — with at least one
/// alphanumeric among them (a name of separators alone is rejected).
#[must_use]
pub fn is_valid_host_name(name: &str) -> bool {
    if name.is_empty() || name.len() >= MAX_HOST_NAME_LEN {
        return false;
    }
    let mut has_alnum = false;
    for c in name.chars() {
        match c {
            '_' | '-' | '.' => {}
            c if c.is_ascii_alphanumeric() => has_alnum = true,
            _ => return false,
        }
    }
    has_alnum
}

// =============================================================================
// TESTS
// =============================================================================
