//! # Inventory
//!
//! The aggregate root: owns the graph, exposes the name-based CRUD API, and
//! enforces the special-group invariant.
//!
//! The special groups `all` and `ungrouped` exist from construction, with
//! `ungrouped` a child of `all`. Group counts exclude them by convention.
//!
//! An `Inventory` assumes exclusive single-caller access (no locking);
//! deletion and reparenting are not transactional — a failure partway
//! through a multi-edge update leaves earlier edge changes in place.

use crate::graph::{DeleteOptions, Graph};
use crate::primitives::{ALL_GROUP, SPECIAL_GROUP_COUNT, UNGROUPED_GROUP};
use crate::types::{Group, GroupId, Host, HostId, Priority, RosterError, VarMap, VarOwner};
use serde::Deserialize;

// =============================================================================
// GROUP INFO
// =============================================================================

/// Payload of a group create-or-update, as found in a wire document group
/// entry.
///
/// `parents`, `group_vars` and `priority` are load-only fields: consumed
/// here, never emitted by serialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GroupInfo {
    /// Child group names; missing groups are created empty, then linked.
    pub children: Vec<String>,
    /// Parent group names; missing groups are created empty, then linked.
    pub parents: Vec<String>,
    /// Member host names; every referenced host must already exist.
    pub hosts: Vec<String>,
    /// Variable batch, merged at `(group priority, info priority)`.
    pub vars: VarMap,
    /// Second variable batch, merged after `vars` with the same priorities.
    pub group_vars: VarMap,
    /// Merge priority; applied to the group only when it is newly created.
    pub priority: Option<Priority>,
}

impl GroupInfo {
    /// Whether the info carries nothing to apply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
            && self.parents.is_empty()
            && self.hosts.is_empty()
            && self.vars.is_empty()
            && self.group_vars.is_empty()
            && self.priority.is_none()
    }
}

// =============================================================================
// INVENTORY
// =============================================================================

/// A host/group inventory.
///
/// Created with the two special groups in place; populated by
/// [`crate::wire::from_document`] or the individual CRUD calls below.
/// Entities die only through the explicit delete operations, which also
/// erase every edge referencing them.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    graph: Graph,
}

impl Inventory {
    /// Create an inventory holding only the special groups.
    #[must_use]
    pub fn new() -> Self {
        let mut inventory = Self {
            graph: Graph::new(),
        };
        // The constant names always pass validation, so this cannot fail.
        let _ = inventory.ensure_special_groups();
        inventory
    }

    /// Read access to the underlying graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable access to the underlying graph, for handle-level edge
    /// operations. The special-group invariant is re-established by
    /// [`Inventory::normalize_ungrouped`] at serialization time.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Re-create the special groups and their link if anything removed them.
    pub fn ensure_special_groups(&mut self) -> Result<(), RosterError> {
        let all = self.graph.add_group(ALL_GROUP)?;
        let ungrouped = self.graph.add_group(UNGROUPED_GROUP)?;
        self.graph.add_child(all, ungrouped)
    }

    /// Keep `ungrouped` accurate as "hosts with no explicit group": a host
    /// with no membership besides `ungrouped` is attached to it, every other
    /// host is detached from it.
    pub fn normalize_ungrouped(&mut self) -> Result<(), RosterError> {
        self.ensure_special_groups()?;
        let ungrouped = self
            .graph
            .group_id(UNGROUPED_GROUP)
            .ok_or_else(|| RosterError::GroupNotFound(UNGROUPED_GROUP.to_string()))?;

        let host_ids: Vec<HostId> = self.graph.hosts().map(|host| host.id).collect();
        for host in host_ids {
            let explicit = self
                .graph
                .host(host)?
                .groups
                .iter()
                .any(|&group| group != ungrouped);
            if explicit {
                self.graph.detach_host(ungrouped, host)?;
            } else {
                self.graph.attach_host(ungrouped, host)?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // GROUPS
    // =========================================================================

    /// Create or update a group.
    ///
    /// A new group is created and `info` applied to it, including its
    /// priority. For an existing group, `info` is applied but the stored
    /// priority is kept (only [`Inventory::set_group_priority`] changes it);
    /// with `allow_update == false`, a non-empty `info` fails with
    /// `UpdateNotAllowed` while an empty one degrades to a read.
    pub fn add_group(
        &mut self,
        name: &str,
        info: Option<&GroupInfo>,
        allow_update: bool,
    ) -> Result<GroupId, RosterError> {
        let existing = self.graph.group_id(name);
        if let Some(id) = existing
            && !allow_update
        {
            if info.is_some_and(|info| !info.is_empty()) {
                return Err(RosterError::UpdateNotAllowed(name.to_string()));
            }
            return Ok(id);
        }

        let is_new = existing.is_none();
        let id = self.graph.add_group(name)?;
        let Some(info) = info else {
            return Ok(id);
        };

        let batch_priority = info.priority.unwrap_or_default();
        if is_new {
            self.graph.group_mut(id)?.set_priority(batch_priority);
        }

        for child in &info.children {
            let child_id = self.graph.add_group(child)?;
            self.graph.add_child(id, child_id)?;
        }
        for parent in &info.parents {
            let parent_id = self.graph.add_group(parent)?;
            self.graph.add_parent(id, parent_id)?;
        }

        // vars first, then group_vars, both at the same priority pair.
        for batch in [&info.vars, &info.group_vars] {
            if !batch.is_empty() {
                self.graph.group_mut(id)?.apply_vars(batch, batch_priority);
            }
        }

        for host in &info.hosts {
            let host_id = self
                .graph
                .host_id(host)
                .ok_or_else(|| RosterError::HostNotFound(host.clone()))?;
            self.graph.attach_host(id, host_id)?;
        }
        Ok(id)
    }

    /// Set a group's merge priority. Silently does nothing for an unknown
    /// group.
    pub fn set_group_priority(&mut self, name: &str, priority: Priority) {
        if let Some(id) = self.graph.group_id(name)
            && let Ok(group) = self.graph.group_mut(id)
        {
            group.set_priority(priority);
        }
    }

    /// Delete a group, reparenting per `opts`. No-op for an unknown group.
    pub fn del_group(&mut self, name: &str, opts: DeleteOptions) -> Result<(), RosterError> {
        match self.graph.group_id(name) {
            Some(id) => self.graph.delete_group(id, opts),
            None => Ok(()),
        }
    }

    /// Rename a group. Fails when `old` is unknown or `new` is taken.
    pub fn rename_group(&mut self, old: &str, new: &str) -> Result<(), RosterError> {
        let id = self
            .graph
            .group_id(old)
            .ok_or_else(|| RosterError::GroupNotFound(old.to_string()))?;
        self.graph.rename_group(id, new)
    }

    // =========================================================================
    // HOSTS
    // =========================================================================

    /// Create a host. Fails with `NameTaken` when the name exists; initial
    /// vars are applied at priority 0.
    pub fn create_host(&mut self, name: &str, vars: Option<&VarMap>) -> Result<HostId, RosterError> {
        if self.graph.host_id(name).is_some() {
            return Err(RosterError::NameTaken(name.to_string()));
        }
        let id = self.graph.add_host(name)?;
        if let Some(vars) = vars
            && !vars.is_empty()
        {
            self.graph
                .host_mut(id)?
                .apply_vars(vars, Priority::default());
        }
        Ok(id)
    }

    /// Create-or-update dispatcher: creates the host when absent, otherwise
    /// forwards to [`Inventory::update_host`].
    pub fn add_host(
        &mut self,
        name: &str,
        vars: Option<&VarMap>,
        priority: Priority,
    ) -> Result<HostId, RosterError> {
        if self.graph.host_id(name).is_none() {
            self.create_host(name, vars)
        } else {
            self.update_host(name, vars, priority)
        }
    }

    /// Update an existing host: set its priority, then merge `vars` at that
    /// priority. Fails with `HostNotFound` when absent.
    pub fn update_host(
        &mut self,
        name: &str,
        vars: Option<&VarMap>,
        priority: Priority,
    ) -> Result<HostId, RosterError> {
        let id = self
            .graph
            .host_id(name)
            .ok_or_else(|| RosterError::HostNotFound(name.to_string()))?;
        let host = self.graph.host_mut(id)?;
        host.set_priority(priority);
        if let Some(vars) = vars
            && !vars.is_empty()
        {
            host.apply_vars(vars, priority);
        }
        Ok(id)
    }

    /// Delete a host, detaching it from every group. No-op for an unknown
    /// host.
    pub fn del_host(&mut self, name: &str) -> Result<(), RosterError> {
        match self.graph.host_id(name) {
            Some(id) => self.graph.delete_host(id),
            None => Ok(()),
        }
    }

    /// Rename a host. Fails when `old` is unknown or `new` is taken.
    pub fn rename_host(&mut self, old: &str, new: &str) -> Result<(), RosterError> {
        let id = self
            .graph
            .host_id(old)
            .ok_or_else(|| RosterError::HostNotFound(old.to_string()))?;
        self.graph.rename_host(id, new)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Number of hosts.
    #[must_use]
    pub fn count_hosts(&self) -> usize {
        self.graph.host_count()
    }

    /// Number of groups, excluding the two special groups.
    #[must_use]
    pub fn count_groups(&self) -> usize {
        self.graph.group_count().saturating_sub(SPECIAL_GROUP_COUNT)
    }

    /// Lookup a group by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.graph.group_by_name(name)
    }

    /// Lookup a host by name.
    #[must_use]
    pub fn host(&self, name: &str) -> Option<&Host> {
        self.graph.host_by_name(name)
    }

    /// All groups in name order, special groups included.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.graph.groups()
    }

    /// All hosts in name order.
    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.graph.hosts()
    }
}

// =============================================================================
// TESTS
// =============================================================================
