//! # Innate Primitives
//!
//! Hardcoded constants for the Roster inventory engine.
//!
//! These values are compiled into the binary and are immutable at runtime.

/// Name of the root group that every inventory carries.
///
/// Exists from construction; every group and host is meant to be reachable
/// from it once an inventory is serialized.
pub const ALL_GROUP: &str = "all";

/// Name of the catch-all group for hosts without an explicit membership.
///
/// Exists from construction and is always a child of [`ALL_GROUP`].
/// Serialization keeps it accurate: only hosts with no other group live here.
pub const UNGROUPED_GROUP: &str = "ungrouped";

/// Number of always-present special groups ([`ALL_GROUP`], [`UNGROUPED_GROUP`]).
///
/// Group counts exclude these by convention.
pub const SPECIAL_GROUP_COUNT: usize = 2;

/// Exclusive upper bound on host name length, matching the DNS limit on a
/// full domain name.
pub const MAX_HOST_NAME_LEN: usize = 253;

/// Reserved merge priority meaning "treat this side as the empty mapping".
///
/// Exposed through `Priority::DROP`; used to explicitly drop one operand of
/// a variable merge from consideration.
pub const DROP_PRIORITY: i64 = -999;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_group_names() {
        assert_eq!(ALL_GROUP, "all");
        assert_eq!(UNGROUPED_GROUP, "ungrouped");
        assert_eq!(SPECIAL_GROUP_COUNT, 2);
    }

    #[test]
    fn drop_priority_is_negative_sentinel() {
        assert!(DROP_PRIORITY < 0);
    }
}
