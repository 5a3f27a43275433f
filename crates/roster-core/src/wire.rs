//! # Wire Format
//!
//! The dynamic-inventory JSON document: a single object with `_meta.hostvars`
//! holding per-host variables and every other top-level key describing a
//! group.
//!
//! ```text
//! {
//!   "_meta": { "hostvars": { "web-01": { "ansible_connection": "local" } } },
//!   "all": { "children": ["ungrouped", "web"] },
//!   "web": { "hosts": ["web-01"], "vars": { "http_port": 80 } },
//!   "ungrouped": {}
//! }
//! ```
//!
//! `children`, `hosts` and `vars` are emitted per group, each omitted when
//! empty; `parents`, `group_vars` and `priority` are accepted on load only.
//!
//! Round-trip contract: `to_document(from_document(doc)) == doc` for a
//! document already in canonical form — special groups present, no redundant
//! `ungrouped` memberships — compared structurally, key order aside.
//!
//! File I/O stays in the app layer; this module only maps documents.

use crate::inventory::{GroupInfo, Inventory};
use crate::types::{Priority, RosterError};
use serde_json::Value;

/// A wire document: the top-level JSON object.
pub type Document = serde_json::Map<String, Value>;

/// Top-level key holding inventory metadata.
pub const META_KEY: &str = "_meta";

/// Key under [`META_KEY`] holding per-host variables.
pub const HOSTVARS_KEY: &str = "hostvars";

// =============================================================================
// LOAD
// =============================================================================

/// Build an inventory from a wire document.
///
/// `_meta.hostvars` is consumed first so hosts exist before group entries
/// reference them; a document without `_meta` loads as an empty host set.
/// Every remaining top-level key is treated as a group definition.
pub fn from_document(doc: &Document) -> Result<Inventory, RosterError> {
    let mut inventory = Inventory::new();

    if let Some(meta) = doc.get(META_KEY) {
        let meta = meta.as_object().ok_or_else(|| {
            RosterError::Serialization(format!("{META_KEY} must be an object"))
        })?;
        if let Some(hostvars) = meta.get(HOSTVARS_KEY) {
            let hostvars = hostvars.as_object().ok_or_else(|| {
                RosterError::Serialization(format!("{HOSTVARS_KEY} must be an object"))
            })?;
            for (name, vars) in hostvars {
                let vars = vars.as_object().ok_or_else(|| {
                    RosterError::Serialization(format!("hostvars for {name} must be an object"))
                })?;
                inventory.add_host(name, Some(vars), Priority::default())?;
            }
        }
    }

    for (name, entry) in doc {
        if name == META_KEY {
            continue;
        }
        let info: GroupInfo = serde_json::from_value(entry.clone())
            .map_err(|e| RosterError::Serialization(format!("group {name}: {e}")))?;
        inventory.add_group(name, Some(&info), true)?;
    }

    Ok(inventory)
}

/// Parse a JSON string into an inventory.
pub fn from_json_str(content: &str) -> Result<Inventory, RosterError> {
    let doc: Document = serde_json::from_str(content)
        .map_err(|e| RosterError::Serialization(e.to_string()))?;
    from_document(&doc)
}

// =============================================================================
// SERIALIZE
// =============================================================================

/// Walk the inventory back into a wire document.
///
/// Takes `&mut` because emission first re-establishes the special groups and
/// the `ungrouped` membership invariant.
pub fn to_document(inventory: &mut Inventory) -> Result<Document, RosterError> {
    inventory.normalize_ungrouped()?;

    let mut doc = Document::new();

    let mut hostvars = serde_json::Map::new();
    for host in inventory.hosts() {
        hostvars.insert(host.name.clone(), Value::Object(host.vars.clone()));
    }
    let mut meta = serde_json::Map::new();
    meta.insert(HOSTVARS_KEY.to_string(), Value::Object(hostvars));
    doc.insert(META_KEY.to_string(), Value::Object(meta));

    let graph = inventory.graph();
    for group in inventory.groups() {
        let mut entry = serde_json::Map::new();

        let children: Vec<Value> = group
            .children
            .iter()
            .filter_map(|&id| graph.group(id).ok())
            .map(|child| Value::String(child.name.clone()))
            .collect();
        if !children.is_empty() {
            entry.insert("children".to_string(), Value::Array(children));
        }

        let hosts: Vec<Value> = group
            .hosts
            .iter()
            .filter_map(|&id| graph.host(id).ok())
            .map(|host| Value::String(host.name.clone()))
            .collect();
        if !hosts.is_empty() {
            entry.insert("hosts".to_string(), Value::Array(hosts));
        }

        if !group.vars.is_empty() {
            entry.insert("vars".to_string(), Value::Object(group.vars.clone()));
        }

        doc.insert(group.name.clone(), Value::Object(entry));
    }

    Ok(doc)
}

/// Serialize the inventory into a JSON string.
pub fn to_json_string(inventory: &mut Inventory, pretty: bool) -> Result<String, RosterError> {
    let doc = Value::Object(to_document(inventory)?);
    let rendered = if pretty {
        serde_json::to_string_pretty(&doc)
    } else {
        serde_json::to_string(&doc)
    };
    rendered.map_err(|e| RosterError::Serialization(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::GroupInfo;
    use crate::primitives::{ALL_GROUP, UNGROUPED_GROUP};
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        match value {
            Value::Object(m) => m,
            other => unreachable!("test fixture must be an object, got {other}"),
        }
    }

    fn canonical_fixture() -> Document {
        doc(json!({
            "_meta": {
                "hostvars": {
                    "localhost": {"ansible_connection": "local"},
                    "localhost2": {"ansible_connection": "local"}
                }
            },
            "all": {"children": ["ungrouped", "glance_all"]},
            "glance_all": {
                "children": ["glance_api", "glance_registry"],
                "vars": {"management_bridge": "br-mgmt"}
            },
            "glance_api": {"hosts": ["localhost"], "vars": {"glance_api_version": "2"}},
            "glance_registry": {"hosts": ["localhost2"]},
            "ungrouped": {}
        }))
    }

    #[test]
    fn load_counts_groups_and_hosts() {
        let inventory = from_document(&canonical_fixture()).expect("load");
        assert_eq!(inventory.count_groups(), 3);
        assert_eq!(inventory.count_hosts(), 2);
    }

    #[test]
    fn load_minimal_document() {
        let inventory = from_document(&doc(json!({
            "_meta": {"hostvars": {"h1": {}}},
            "g1": {"hosts": ["h1"]}
        })))
        .expect("load");

        assert_eq!(inventory.count_hosts(), 1);
        assert_eq!(inventory.count_groups(), 1);
        let g1 = inventory.group("g1").expect("g1");
        assert!(inventory.graph().group_has_host(g1.id, "h1"));
    }

    #[test]
    fn load_wires_hierarchy_and_vars() {
        let inventory = from_document(&canonical_fixture()).expect("load");

        let glance_all = inventory.group("glance_all").expect("group");
        assert!(inventory.graph().group_adjacent_to(glance_all.id, "glance_api"));
        assert!(inventory
            .graph()
            .group_adjacent_to(glance_all.id, "glance_registry"));
        assert_eq!(glance_all.vars["management_bridge"], json!("br-mgmt"));

        let host = inventory.host("localhost").expect("host");
        assert_eq!(host.vars["ansible_connection"], json!("local"));
        assert!(inventory.graph().host_in_group(host.id, "glance_api"));
    }

    #[test]
    fn load_without_meta_yields_no_hosts() {
        let inventory = from_document(&doc(json!({"g1": {}}))).expect("load");
        assert_eq!(inventory.count_hosts(), 0);
        assert_eq!(inventory.count_groups(), 1);
    }

    #[test]
    fn load_rejects_group_referencing_unknown_host() {
        let result = from_document(&doc(json!({"g1": {"hosts": ["ghost"]}})));
        assert!(matches!(result, Err(RosterError::HostNotFound(_))));
    }

    #[test]
    fn load_rejects_malformed_meta() {
        assert!(from_document(&doc(json!({"_meta": 42}))).is_err());
        assert!(from_document(&doc(json!({"_meta": {"hostvars": []}}))).is_err());
        assert!(
            from_document(&doc(json!({"_meta": {"hostvars": {"h1": "nope"}}}))).is_err()
        );
    }

    #[test]
    fn load_rejects_malformed_group_entry() {
        let result = from_document(&doc(json!({"g1": {"children": 42}})));
        assert!(matches!(result, Err(RosterError::Serialization(_))));
    }

    #[test]
    fn roundtrip_preserves_canonical_document() {
        let original = canonical_fixture();
        let mut inventory = from_document(&original).expect("load");
        let output = to_document(&mut inventory).expect("serialize");
        assert_eq!(Value::Object(output), Value::Object(original));
    }

    #[test]
    fn output_carries_hostvars() {
        let mut inventory = Inventory::new();
        inventory
            .add_host(
                "superhost",
                Some(&doc(json!({"ansible_connection": "local"}))),
                Priority::default(),
            )
            .expect("add host");

        let output = to_document(&mut inventory).expect("serialize");
        assert_eq!(
            output[META_KEY][HOSTVARS_KEY]["superhost"]["ansible_connection"],
            json!("local")
        );
    }

    #[test]
    fn output_always_has_special_groups() {
        let mut inventory = Inventory::new();
        inventory
            .add_host("superhost", None, Priority::default())
            .expect("add host");

        let output = to_document(&mut inventory).expect("serialize");
        assert!(output.contains_key(ALL_GROUP));
        assert!(output.contains_key(UNGROUPED_GROUP));
        let children = output[ALL_GROUP]["children"]
            .as_array()
            .expect("children array");
        assert!(children.contains(&json!(UNGROUPED_GROUP)));
    }

    #[test]
    fn output_restores_special_groups_after_deletion() {
        let mut inventory = Inventory::new();
        inventory
            .del_group(UNGROUPED_GROUP, crate::graph::DeleteOptions::default())
            .expect("delete");

        let output = to_document(&mut inventory).expect("serialize");
        assert!(output.contains_key(UNGROUPED_GROUP));
    }

    #[test]
    fn every_host_lands_in_a_group() {
        let mut inventory = Inventory::new();
        inventory
            .add_host("superhost", None, Priority::default())
            .expect("add host");

        let output = to_document(&mut inventory).expect("serialize");
        assert_eq!(output[UNGROUPED_GROUP]["hosts"], json!(["superhost"]));

        inventory.add_group("awesome", None, true).expect("add group");
        let info = GroupInfo {
            hosts: vec!["superhost".to_string()],
            ..GroupInfo::default()
        };
        inventory.add_group("awesome", Some(&info), true).expect("link");

        let output = to_document(&mut inventory).expect("serialize");
        assert_eq!(output["awesome"]["hosts"], json!(["superhost"]));
        assert!(output[UNGROUPED_GROUP].get("hosts").is_none());
    }

    #[test]
    fn output_matches_expected_shape() {
        let mut inventory = Inventory::new();
        for host in ["superhost", "superhost2"] {
            inventory
                .add_host(
                    host,
                    Some(&doc(json!({"ansible_connection": "local"}))),
                    Priority::default(),
                )
                .expect("add host");
        }
        inventory.add_group("awesome", None, true).expect("add");
        inventory.add_group("awesome2", None, true).expect("add");
        let info = GroupInfo {
            hosts: vec!["superhost".to_string(), "superhost2".to_string()],
            ..GroupInfo::default()
        };
        inventory.add_group("awesome", Some(&info), true).expect("link");

        let mut output = to_document(&mut inventory).expect("serialize");
        let meta = output.remove(META_KEY).expect("meta");
        assert_eq!(
            meta[HOSTVARS_KEY].as_object().expect("hostvars").len(),
            2
        );
        // awesome, awesome2, all, ungrouped
        assert_eq!(output.len(), 4);
    }

    #[test]
    fn duplicate_adds_emit_nothing_twice() {
        let mut inventory = Inventory::new();
        for _ in 0..2 {
            inventory
                .add_host(
                    "superhost",
                    Some(&doc(json!({"ansible_connection": "local"}))),
                    Priority::default(),
                )
                .expect("add host");
            inventory.add_group("awesome", None, true).expect("add group");
            let info = GroupInfo {
                hosts: vec!["superhost".to_string()],
                ..GroupInfo::default()
            };
            inventory
                .add_group("awesome", Some(&info), true)
                .expect("link");
        }

        let mut output = to_document(&mut inventory).expect("serialize");
        assert_eq!(
            output[META_KEY][HOSTVARS_KEY]
                .as_object()
                .expect("hostvars")
                .len(),
            1
        );
        assert_eq!(
            output["awesome"]["hosts"].as_array().expect("hosts").len(),
            1
        );
        output.remove(META_KEY);
        // awesome, all, ungrouped
        assert_eq!(output.len(), 3);
    }

    #[test]
    fn json_string_helpers_roundtrip() {
        let original = canonical_fixture();
        let content =
            serde_json::to_string(&Value::Object(original.clone())).expect("render fixture");

        let mut inventory = from_json_str(&content).expect("parse");
        let rendered = to_json_string(&mut inventory, false).expect("render");
        let reparsed: Value = serde_json::from_str(&rendered).expect("reparse");
        assert_eq!(reparsed, Value::Object(original));

        assert!(from_json_str("not json").is_err());
    }
}
