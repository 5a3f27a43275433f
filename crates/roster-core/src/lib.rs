//! # roster-core
//!
//! The deterministic inventory graph engine for Roster - THE ENGINE.
//!
//! This crate models a host/group inventory as an in-memory bidirectional
//! graph: groups contain hosts and other groups, membership edges are
//! symmetric and ordered, and variables merge by integer priority.
//!
//! ## Architectural Constraints
//!
//! - The engine is the ONLY place where inventory state exists
//! - No async, no network, no file I/O (pure Rust; the app layer owns files)
//! - Deterministic: `BTreeMap` only, no floats, no randomness
//! - Single-threaded: an `Inventory` assumes exclusive single-caller access;
//!   concurrent mutation is undefined and out of scope
//! - Fallible operations return `Result<T, RosterError>`; the engine never
//!   panics

// =============================================================================
// MODULES
// =============================================================================

pub mod graph;
pub mod inventory;
pub mod merge;
pub mod names;
pub mod primitives;
pub mod types;
pub mod wire;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Group, GroupId, Host, HostId, Priority, RosterError, VarMap, VarOwner};

// =============================================================================
// RE-EXPORTS: Graph Engine
// =============================================================================

pub use graph::{DeleteOptions, Graph};
pub use inventory::{GroupInfo, Inventory};
pub use merge::{merge_vars, reorder};

// =============================================================================
// RE-EXPORTS: Wire Format (from wire module)
// =============================================================================

pub use wire::{Document, from_document, from_json_str, to_document, to_json_string};
