//! End-to-end inventory scenarios: load a wire document, mutate the graph,
//! serialize it back.
//!
//! The fixture mirrors a small OpenStack-style layout: a `glance_all` parent
//! with two service groups and two hosts.

#![allow(clippy::unwrap_used, clippy::panic)]

use roster_core::{
    DeleteOptions, Document, GroupInfo, Inventory, Priority, RosterError, from_document,
    to_document,
};
use serde_json::{Value, json};

fn doc(value: Value) -> Document {
    match value {
        Value::Object(m) => m,
        other => panic!("fixture must be an object, got {other}"),
    }
}

fn glance_fixture() -> Document {
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

fn loaded() -> Inventory {
    from_document(&glance_fixture()).expect("fixture loads")
}

// =============================================================================
// LOAD
// =============================================================================

#[test]
fn fixture_loads_with_expected_counts() {
    let inventory = loaded();
    assert_eq!(inventory.count_groups(), 3);
    assert_eq!(inventory.count_hosts(), 2);
}

#[test]
fn simple_document_loads_single_host() {
    let inventory = from_document(&doc(json!({
        "_meta": {"hostvars": {"localhost": {"ansible_connection": "local"}}}
    })))
    .expect("load");
    assert_eq!(inventory.count_groups(), 0);
    assert_eq!(inventory.count_hosts(), 1);
}

// =============================================================================
// GROUP DELETION AGAINST A LOADED DOCUMENT
// =============================================================================

#[test]
fn delete_group_updates_graph_and_counts() {
    let mut inventory = loaded();
    let groups_before = inventory.count_groups();
    let hosts_before = inventory.count_hosts();

    inventory
        .del_group("glance_api", DeleteOptions::default())
        .expect("delete");

    assert!(inventory.group("glance_api").is_none());
    let glance_all = inventory.group("glance_all").expect("glance_all");
    assert!(!inventory
        .graph()
        .group_adjacent_to(glance_all.id, "glance_api"));
    let localhost = inventory.host("localhost").expect("localhost");
    assert!(!inventory.graph().host_in_group(localhost.id, "glance_api"));
    assert_eq!(inventory.count_groups(), groups_before - 1);
    assert_eq!(inventory.count_hosts(), hosts_before);
}

#[test]
fn delete_group_reparent_hosts_moves_members_up() {
    let mut inventory = loaded();
    inventory
        .del_group(
            "glance_api",
            DeleteOptions {
                reparent_hosts: true,
                ..DeleteOptions::default()
            },
        )
        .expect("delete");

    let glance_all = inventory.group("glance_all").expect("glance_all");
    assert!(inventory.graph().group_has_host(glance_all.id, "localhost"));
    let localhost = inventory.host("localhost").expect("localhost");
    assert!(inventory.graph().host_in_group(localhost.id, "glance_all"));
}

#[test]
fn delete_group_reparent_groups_relinks_children() {
    let mut inventory = loaded();
    inventory
        .del_group(
            "glance_all",
            DeleteOptions {
                reparent_groups: true,
                ..DeleteOptions::default()
            },
        )
        .expect("delete");

    let glance_api = inventory.group("glance_api").expect("glance_api");
    assert!(inventory.graph().group_adjacent_to(glance_api.id, "all"));
    let all = inventory.group("all").expect("all");
    assert!(inventory.graph().group_adjacent_to(all.id, "glance_api"));
}

#[test]
fn delete_group_reparent_vars_propagates_to_parent() {
    let mut inventory = loaded();
    inventory
        .del_group(
            "glance_api",
            DeleteOptions {
                reparent_vars: true,
                ..DeleteOptions::default()
            },
        )
        .expect("delete");

    let glance_all = inventory.group("glance_all").expect("glance_all");
    assert!(glance_all.vars.contains_key("glance_api_version"));
    // The parent's own vars survive the merge.
    assert_eq!(glance_all.vars["management_bridge"], json!("br-mgmt"));
}

// =============================================================================
// UPDATES AGAINST A LOADED DOCUMENT
// =============================================================================

#[test]
fn update_respects_stored_priority() {
    let mut inventory = loaded();

    // Tie keeps the loaded value.
    let update = GroupInfo {
        vars: doc(json!({"management_bridge": "br_woot"})),
        ..GroupInfo::default()
    };
    inventory
        .add_group("glance_all", Some(&update), true)
        .expect("update");
    assert_eq!(
        inventory.group("glance_all").expect("group").vars["management_bridge"],
        json!("br-mgmt")
    );

    // A lowered stored priority lets the update through.
    inventory.set_group_priority("glance_all", Priority::new(-1));
    inventory
        .add_group("glance_all", Some(&update), true)
        .expect("update");
    assert_eq!(
        inventory.group("glance_all").expect("group").vars["management_bridge"],
        json!("br_woot")
    );
}

#[test]
fn unauthorized_update_is_rejected() {
    let mut inventory = loaded();
    let update = GroupInfo {
        vars: doc(json!({"glance_api_version": "3"})),
        ..GroupInfo::default()
    };
    let result = inventory.add_group("glance_api", Some(&update), false);
    assert!(matches!(result, Err(RosterError::UpdateNotAllowed(_))));
    assert_eq!(
        inventory.group("glance_api").expect("group").vars["glance_api_version"],
        json!("2")
    );
}

#[test]
fn rename_host_is_visible_in_serialized_output() {
    let mut inventory = loaded();
    inventory
        .rename_host("localhost", "localhost3")
        .expect("rename");

    let output = to_document(&mut inventory).expect("serialize");
    let hostvars = output["_meta"]["hostvars"].as_object().expect("hostvars");
    assert!(hostvars.contains_key("localhost3"));
    assert!(!hostvars.contains_key("localhost"));
    assert_eq!(output["glance_api"]["hosts"], json!(["localhost3"]));
}

// =============================================================================
// ROUND TRIP
// =============================================================================

#[test]
fn canonical_document_roundtrips_unchanged() {
    let original = glance_fixture();
    let mut inventory = from_document(&original).expect("load");
    let output = to_document(&mut inventory).expect("serialize");
    assert_eq!(Value::Object(output), Value::Object(original));
}

#[test]
fn roundtrip_is_a_fixpoint_for_noncanonical_input() {
    // A document without special groups is normalized once, then stable.
    let original = doc(json!({
        "_meta": {"hostvars": {"h1": {}, "h2": {"port": 22}}},
        "g1": {"hosts": ["h1"]}
    }));
    let mut inventory = from_document(&original).expect("load");
    let first = to_document(&mut inventory).expect("serialize");

    let mut reloaded = from_document(&first).expect("reload");
    let second = to_document(&mut reloaded).expect("serialize");
    assert_eq!(Value::Object(first), Value::Object(second));
}
