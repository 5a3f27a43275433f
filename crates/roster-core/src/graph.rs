//! # Inventory Graph
//!
//! The deterministic arena for groups and hosts.
//!
//! All data structures use `BTreeMap` for deterministic ordering. Entities
//! are owned by the arena and addressed through integer handles; edge lists
//! hold handles only, so there are no ownership cycles and no dangling
//! references once an entity is deleted.
//!
//! Every edge mutation maintains the symmetric invariant:
//! `c ∈ g.children ⇔ g ∈ c.parents` and `h ∈ g.hosts ⇔ g ∈ h.groups`.

use crate::merge::reorder;
use crate::types::{Group, GroupId, Host, HostId, RosterError, VarOwner};
use std::collections::BTreeMap;

/// Reparenting flags for [`Graph::delete_group`].
///
/// Each flag relinks one aspect of the dying group to its former parents so
/// the information is not lost with the group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Attach every child to every former parent before detaching it.
    pub reparent_groups: bool,
    /// Attach every member host to every former parent before detaching it.
    pub reparent_hosts: bool,
    /// Merge the group's vars into every parent, keyed by
    /// `(parent priority, deleted group priority)`.
    pub reparent_vars: bool,
}

// =============================================================================
// GRAPH
// =============================================================================

/// The group/host arena with its name indexes.
///
/// Group and host namespaces are independent; a name may exist in both.
/// The graph assumes exclusive single-caller access; it holds no locks.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Group storage: GroupId -> Group
    groups: BTreeMap<GroupId, Group>,

    /// Host storage: HostId -> Host
    hosts: BTreeMap<HostId, Host>,

    /// Reverse lookup: group name -> GroupId
    group_names: BTreeMap<String, GroupId>,

    /// Reverse lookup: host name -> HostId
    host_names: BTreeMap<String, HostId>,

    /// Next available GroupId
    next_group_id: u64,

    /// Next available HostId
    next_host_id: u64,
}

impl Graph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // CREATION & LOOKUP
    // =========================================================================

    /// Get or create a group by name. Returns the existing handle when the
    /// name is already registered.
    pub fn add_group(&mut self, name: &str) -> Result<GroupId, RosterError> {
        if let Some(&id) = self.group_names.get(name) {
            return Ok(id);
        }
        let id = GroupId(self.next_group_id);
        let group = Group::new(id, name)?;
        self.next_group_id = self.next_group_id.saturating_add(1);
        self.group_names.insert(group.name.clone(), id);
        self.groups.insert(id, group);
        Ok(id)
    }

    /// Get or create a host by name. Returns the existing handle when the
    /// name is already registered.
    pub fn add_host(&mut self, name: &str) -> Result<HostId, RosterError> {
        if let Some(&id) = self.host_names.get(name) {
            return Ok(id);
        }
        let id = HostId(self.next_host_id);
        let host = Host::new(id, name)?;
        self.next_host_id = self.next_host_id.saturating_add(1);
        self.host_names.insert(host.name.clone(), id);
        self.hosts.insert(id, host);
        Ok(id)
    }

    /// Lookup a group handle by name.
    #[must_use]
    pub fn group_id(&self, name: &str) -> Option<GroupId> {
        self.group_names.get(name).copied()
    }

    /// Lookup a host handle by name.
    #[must_use]
    pub fn host_id(&self, name: &str) -> Option<HostId> {
        self.host_names.get(name).copied()
    }

    /// Resolve a group handle.
    pub fn group(&self, id: GroupId) -> Result<&Group, RosterError> {
        self.groups.get(&id).ok_or(RosterError::UnknownGroupId(id))
    }

    /// Resolve a group handle mutably.
    pub fn group_mut(&mut self, id: GroupId) -> Result<&mut Group, RosterError> {
        self.groups
            .get_mut(&id)
            .ok_or(RosterError::UnknownGroupId(id))
    }

    /// Resolve a host handle.
    pub fn host(&self, id: HostId) -> Result<&Host, RosterError> {
        self.hosts.get(&id).ok_or(RosterError::UnknownHostId(id))
    }

    /// Resolve a host handle mutably.
    pub fn host_mut(&mut self, id: HostId) -> Result<&mut Host, RosterError> {
        self.hosts
            .get_mut(&id)
            .ok_or(RosterError::UnknownHostId(id))
    }

    /// Lookup a group by name.
    #[must_use]
    pub fn group_by_name(&self, name: &str) -> Option<&Group> {
        self.group_id(name).and_then(|id| self.groups.get(&id))
    }

    /// Lookup a host by name.
    #[must_use]
    pub fn host_by_name(&self, name: &str) -> Option<&Host> {
        self.host_id(name).and_then(|id| self.hosts.get(&id))
    }

    /// All groups in name order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.group_names.values().filter_map(|id| self.groups.get(id))
    }

    /// All hosts in name order.
    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.host_names.values().filter_map(|id| self.hosts.get(id))
    }

    /// Total number of groups, special groups included.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of hosts.
    #[must_use]
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    // =========================================================================
    // GROUP <-> GROUP EDGES
    // =========================================================================

    /// Register `parent` as a parent of `group`, updating both sides.
    ///
    /// Fails with `SelfReference` when `group == parent`; re-adding an
    /// existing edge is a no-op.
    pub fn add_parent(&mut self, group: GroupId, parent: GroupId) -> Result<(), RosterError> {
        self.link_groups(parent, group)
    }

    /// Register `child` as a child of `group`, updating both sides.
    ///
    /// Fails with `SelfReference` when `group == child`; re-adding an
    /// existing edge is a no-op.
    pub fn add_child(&mut self, group: GroupId, child: GroupId) -> Result<(), RosterError> {
        self.link_groups(group, child)
    }

    /// Remove `parent` from `group`'s parents. No-op when the edge is absent.
    pub fn del_parent(&mut self, group: GroupId, parent: GroupId) -> Result<(), RosterError> {
        self.unlink_groups(parent, group)
    }

    /// Remove `child` from `group`'s children. No-op when the edge is absent.
    pub fn del_child(&mut self, group: GroupId, child: GroupId) -> Result<(), RosterError> {
        self.unlink_groups(group, child)
    }

    /// Replace one parent of `group` with another.
    ///
    /// Composed as del-then-add and NOT transactional: when the add fails
    /// (e.g. `new_parent == group`), the old edge is already gone.
    pub fn replace_parent(
        &mut self,
        group: GroupId,
        old_parent: GroupId,
        new_parent: GroupId,
    ) -> Result<(), RosterError> {
        self.del_parent(group, old_parent)?;
        self.add_parent(group, new_parent)
    }

    /// Replace one child of `group` with another.
    ///
    /// Composed as del-then-add and NOT transactional, like
    /// [`Graph::replace_parent`].
    pub fn replace_child(
        &mut self,
        group: GroupId,
        old_child: GroupId,
        new_child: GroupId,
    ) -> Result<(), RosterError> {
        self.del_child(group, old_child)?;
        self.add_child(group, new_child)
    }

    fn link_groups(&mut self, parent: GroupId, child: GroupId) -> Result<(), RosterError> {
        if parent == child {
            let name = self.group(parent)?.name.clone();
            return Err(RosterError::SelfReference(name));
        }
        self.group(parent)?;
        let child_entry = self.group_mut(child)?;
        if !child_entry.parents.contains(&parent) {
            child_entry.parents.push(parent);
        }
        let parent_entry = self.group_mut(parent)?;
        if !parent_entry.children.contains(&child) {
            parent_entry.children.push(child);
        }
        Ok(())
    }

    fn unlink_groups(&mut self, parent: GroupId, child: GroupId) -> Result<(), RosterError> {
        self.group(parent)?;
        let child_entry = self.group_mut(child)?;
        child_entry.parents.retain(|&p| p != parent);
        let parent_entry = self.group_mut(parent)?;
        parent_entry.children.retain(|&c| c != child);
        Ok(())
    }

    // =========================================================================
    // GROUP <-> HOST EDGES
    // =========================================================================

    /// Register `host` as a member of `group`, updating both sides.
    /// Re-adding an existing membership is a no-op.
    pub fn attach_host(&mut self, group: GroupId, host: HostId) -> Result<(), RosterError> {
        self.group(group)?;
        let host_entry = self.host_mut(host)?;
        if !host_entry.groups.contains(&group) {
            host_entry.groups.push(group);
        }
        let group_entry = self.group_mut(group)?;
        if !group_entry.hosts.contains(&host) {
            group_entry.hosts.push(host);
        }
        Ok(())
    }

    /// Remove `host` from `group`. No-op when the membership is absent.
    pub fn detach_host(&mut self, group: GroupId, host: HostId) -> Result<(), RosterError> {
        self.group(group)?;
        let host_entry = self.host_mut(host)?;
        host_entry.groups.retain(|&g| g != group);
        let group_entry = self.group_mut(group)?;
        group_entry.hosts.retain(|&h| h != host);
        Ok(())
    }

    // =========================================================================
    // ORDERING
    // =========================================================================

    /// Move a child from `old_index` to `new_index` in `group`'s child list.
    pub fn reorder_children(
        &mut self,
        group: GroupId,
        old_index: usize,
        new_index: usize,
    ) -> Result<(), RosterError> {
        reorder(&mut self.group_mut(group)?.children, old_index, new_index)
    }

    /// Move a parent from `old_index` to `new_index` in `group`'s parent list.
    pub fn reorder_parents(
        &mut self,
        group: GroupId,
        old_index: usize,
        new_index: usize,
    ) -> Result<(), RosterError> {
        reorder(&mut self.group_mut(group)?.parents, old_index, new_index)
    }

    /// Move a group from `old_index` to `new_index` in `host`'s group list.
    pub fn reorder_host_groups(
        &mut self,
        host: HostId,
        old_index: usize,
        new_index: usize,
    ) -> Result<(), RosterError> {
        reorder(&mut self.host_mut(host)?.groups, old_index, new_index)
    }

    // =========================================================================
    // DELETION
    // =========================================================================

    /// Tear a group out of the graph.
    ///
    /// In order:
    /// 1. member hosts are reparented (when asked) and detached;
    /// 2. vars are merged into every parent (when asked), keyed by
    ///    `(parent priority, group priority)`;
    /// 3. children are reparented (when asked) to every former parent —
    ///    flat re-linking, multi-parent fan-out intended — and detached;
    /// 4. remaining parent edges are dropped;
    /// 5. the group leaves the arena and the name index.
    ///
    /// Not transactional: a failure partway through leaves earlier edge
    /// changes in place.
    pub fn delete_group(&mut self, id: GroupId, opts: DeleteOptions) -> Result<(), RosterError> {
        let (parents, children, members, vars, priority) = {
            let group = self.group(id)?;
            (
                group.parents.clone(),
                group.children.clone(),
                group.hosts.clone(),
                group.vars.clone(),
                group.priority,
            )
        };

        for host in members {
            if opts.reparent_hosts {
                for &parent in &parents {
                    self.attach_host(parent, host)?;
                }
            }
            self.detach_host(id, host)?;
        }

        if opts.reparent_vars {
            for &parent in &parents {
                self.group_mut(parent)?.apply_vars(&vars, priority);
            }
        }

        for child in children {
            if opts.reparent_groups {
                for &parent in &parents {
                    self.add_parent(child, parent)?;
                }
            }
            self.del_parent(child, id)?;
        }

        for &parent in &parents {
            self.del_child(parent, id)?;
        }

        if let Some(group) = self.groups.remove(&id) {
            self.group_names.remove(&group.name);
        }
        Ok(())
    }

    /// Remove a host from the graph, detaching it from every group first.
    pub fn delete_host(&mut self, id: HostId) -> Result<(), RosterError> {
        let memberships = self.host(id)?.groups.clone();
        for group in memberships {
            self.detach_host(group, id)?;
        }
        if let Some(host) = self.hosts.remove(&id) {
            self.host_names.remove(&host.name);
        }
        Ok(())
    }

    // =========================================================================
    // RENAME
    // =========================================================================

    /// Rename a group. Fails with `NameTaken` when the target name exists;
    /// the inventory is left untouched in that case.
    pub fn rename_group(&mut self, id: GroupId, new_name: &str) -> Result<(), RosterError> {
        if !crate::names::is_valid_group_name(new_name) {
            return Err(RosterError::InvalidGroupName(new_name.to_string()));
        }
        if self.group_names.contains_key(new_name) {
            return Err(RosterError::NameTaken(new_name.to_string()));
        }
        let group = self.group_mut(id)?;
        let old_name = std::mem::replace(&mut group.name, new_name.to_string());
        self.group_names.remove(&old_name);
        self.group_names.insert(new_name.to_string(), id);
        Ok(())
    }

    /// Rename a host. Fails with `NameTaken` when the target name exists.
    pub fn rename_host(&mut self, id: HostId, new_name: &str) -> Result<(), RosterError> {
        if !crate::names::is_valid_host_name(new_name) {
            return Err(RosterError::InvalidHostName(new_name.to_string()));
        }
        if self.host_names.contains_key(new_name) {
            return Err(RosterError::NameTaken(new_name.to_string()));
        }
        let host = self.host_mut(id)?;
        let old_name = std::mem::replace(&mut host.name, new_name.to_string());
        self.host_names.remove(&old_name);
        self.host_names.insert(new_name.to_string(), id);
        Ok(())
    }

    // =========================================================================
    // MEMBERSHIP PREDICATES
    // =========================================================================

    /// Whether the group has a member host with the given name.
    #[must_use]
    pub fn group_has_host(&self, id: GroupId, name: &str) -> bool {
        self.groups.get(&id).is_some_and(|group| {
            group
                .hosts
                .iter()
                .filter_map(|h| self.hosts.get(h))
                .any(|host| host.name == name)
        })
    }

    /// Whether the group is directly adjacent (child or parent) to a group
    /// with the given name. Adjacency only, never transitive.
    #[must_use]
    pub fn group_adjacent_to(&self, id: GroupId, name: &str) -> bool {
        self.groups.get(&id).is_some_and(|group| {
            group
                .children
                .iter()
                .chain(group.parents.iter())
                .filter_map(|g| self.groups.get(g))
                .any(|other| other.name == name)
        })
    }

    /// Whether the host belongs to a group with the given name.
    #[must_use]
    pub fn host_in_group(&self, id: HostId, name: &str) -> bool {
        self.hosts.get(&id).is_some_and(|host| {
            host.groups
                .iter()
                .filter_map(|g| self.groups.get(g))
                .any(|group| group.name == name)
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
