//! # Core Type Definitions
//!
//! This module contains all core types for the Roster inventory graph:
//! - Entity handles (`GroupId`, `HostId`) and merge priority (`Priority`)
//! - Entity records (`Group`, `Host`) and the shared `VarOwner` capability
//! - Variable mapping alias (`VarMap`)
//! - Error types (`RosterError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//!
//! ## Handle Discipline
//!
//! `GroupId` and `HostId` are distinct types on purpose: passing a host where
//! a group is expected is a compile error, never a runtime check. Edge lists
//! store handles only; the arena (`Graph`) is the sole owner of entity
//! lifetime.

use crate::merge::merge_vars;
use crate::names;
use crate::primitives::DROP_PRIORITY;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Variable mapping carried by groups and hosts.
///
/// Keys are variable names, values arbitrary JSON. The map preserves
/// insertion order (serde_json `preserve_order`), which keeps wire documents
/// structurally stable across a round trip.
pub type VarMap = serde_json::Map<String, serde_json::Value>;

// =============================================================================
// ENTITY HANDLES
// =============================================================================

/// Handle of a group in the inventory arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub u64);

/// Handle of a host in the inventory arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostId(pub u64);

/// Merge priority of a group or host.
///
/// When two variable sets collide during a merge, the side with the strictly
/// higher priority wins; on a tie the first operand wins. `Priority::DROP`
/// is a reserved sentinel meaning "treat this side as the empty mapping".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Priority(pub i64);

impl Priority {
    /// Sentinel priority that drops its whole side from a merge.
    pub const DROP: Self = Self(DROP_PRIORITY);

    /// Create a new priority with the given value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw priority value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

// =============================================================================
// VAROWNER CAPABILITY
// =============================================================================

/// Shared capability of named entities that carry a variable mapping and a
/// merge priority. Implemented by [`Group`] and [`Host`].
pub trait VarOwner {
    /// The stored variable mapping.
    fn vars(&self) -> &VarMap;

    /// Mutable access to the stored variable mapping.
    fn vars_mut(&mut self) -> &mut VarMap;

    /// The entity's merge priority.
    fn priority(&self) -> Priority;

    /// Set the entity's merge priority.
    fn set_priority(&mut self, priority: Priority);

    /// Set a single variable, replacing any previous value.
    fn set_var(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.vars_mut().insert(name.into(), value);
    }

    /// Merge an incoming variable batch into the stored vars.
    ///
    /// The stored vars participate with the entity's own priority, the batch
    /// with `priority`; ties favor the stored side.
    fn apply_vars(&mut self, incoming: &VarMap, priority: Priority) {
        let merged = merge_vars(self.vars(), incoming, (self.priority(), priority));
        *self.vars_mut() = merged;
    }
}

// =============================================================================
// GROUP
// =============================================================================

/// A named collection node: contains hosts and other groups, with
/// inheritable variables.
///
/// Edge lists are ordered and user-reorderable; order feeds the tie-break
/// sequence of a future variable flattening. Membership is symmetric by
/// construction: every entry in `children` has this group in its `parents`,
/// and every entry in `hosts` has this group in its `groups`. The symmetric
/// invariant is maintained by [`crate::graph::Graph`], never by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Handle of this group in the arena.
    pub id: GroupId,
    /// Unique name within the group namespace. Immutable except through
    /// [`crate::graph::Graph::rename_group`].
    pub name: String,
    /// Group variables.
    pub vars: VarMap,
    /// Merge priority for variable conflicts.
    pub priority: Priority,
    /// Child groups, in inclusion order.
    pub children: Vec<GroupId>,
    /// Parent groups, in inclusion order. Inverse view of `children`.
    pub parents: Vec<GroupId>,
    /// Member hosts, in inclusion order.
    pub hosts: Vec<HostId>,
}

impl Group {
    /// Create a new group with a validated name.
    pub fn new(id: GroupId, name: impl Into<String>) -> Result<Self, RosterError> {
        let name = name.into();
        if !names::is_valid_group_name(&name) {
            return Err(RosterError::InvalidGroupName(name));
        }
        Ok(Self {
            id,
            name,
            vars: VarMap::new(),
            priority: Priority::default(),
            children: Vec::new(),
            parents: Vec::new(),
            hosts: Vec::new(),
        })
    }
}

impl VarOwner for Group {
    fn vars(&self) -> &VarMap {
        &self.vars
    }

    fn vars_mut(&mut self) -> &mut VarMap {
        &mut self.vars
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }
}

// =============================================================================
// HOST
// =============================================================================

/// A named leaf entity representing a managed machine, with its own
/// variables and group memberships.
#[derive(Debug, Clone, PartialEq)]
pub struct Host {
    /// Handle of this host in the arena.
    pub id: HostId,
    /// Unique name within the host namespace.
    pub name: String,
    /// Host variables.
    pub vars: VarMap,
    /// Merge priority for variable conflicts.
    pub priority: Priority,
    /// Groups this host belongs to, in inclusion order. Inverse view of
    /// each group's `hosts`.
    pub groups: Vec<GroupId>,
}

impl Host {
    /// Create a new host with a validated name.
    pub fn new(id: HostId, name: impl Into<String>) -> Result<Self, RosterError> {
        let name = name.into();
        if !names::is_valid_host_name(&name) {
            return Err(RosterError::InvalidHostName(name));
        }
        Ok(Self {
            id,
            name,
            vars: VarMap::new(),
            priority: Priority::default(),
            groups: Vec::new(),
        })
    }
}

impl VarOwner for Host {
    fn vars(&self) -> &VarMap {
        &self.vars
    }

    fn vars_mut(&mut self) -> &mut VarMap {
        &mut self.vars
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Roster inventory engine.
///
/// - No silent failures except where an operation is documented idempotent
/// - Use `Result<T, RosterError>` for fallible operations
/// - The engine never panics; all errors are surfaced to the caller, who
///   owns recovery policy
#[derive(Debug, Error)]
pub enum RosterError {
    /// The candidate group name was rejected by validation.
    #[error("invalid group name: {0:?}")]
    InvalidGroupName(String),

    /// The candidate host name was rejected by validation.
    #[error("invalid host name: {0:?}")]
    InvalidHostName(String),

    /// A group was passed as its own parent or child.
    #[error("group {0:?} cannot be linked to itself")]
    SelfReference(String),

    /// No group is registered under the given name.
    #[error("group not found: {0}")]
    GroupNotFound(String),

    /// No host is registered under the given name.
    #[error("host not found: {0}")]
    HostNotFound(String),

    /// A stale group handle was used after the group was deleted.
    #[error("no group for handle {0:?}")]
    UnknownGroupId(GroupId),

    /// A stale host handle was used after the host was deleted.
    #[error("no host for handle {0:?}")]
    UnknownHostId(HostId),

    /// The target name of a creation or rename is already in use.
    #[error("name already in use: {0}")]
    NameTaken(String),

    /// The group exists and the caller did not allow updates.
    #[error("group {0} exists and updates are not allowed")]
    UpdateNotAllowed(String),

    /// A reorder index fell outside the edge list.
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Length of the list at the time of the call.
        len: usize,
    },

    /// A wire document could not be parsed or produced.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred in the application layer.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================
