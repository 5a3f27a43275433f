//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Every mutating command follows the same shape: load the inventory
//! document, apply one engine operation, write the document back in
//! canonical form.

use roster_core::{
    DeleteOptions, GroupInfo, Inventory, Priority, RosterError, VarMap, from_json_str,
    to_json_string,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum inventory document size (50 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_INVENTORY_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), RosterError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| RosterError::Io(format!("cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(RosterError::Io(format!(
            "file size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input file path.
///
/// Canonicalizes the path (resolving symlinks and "..") and ensures it is a
/// regular file, so a path like "../../../etc/shadow" cannot slip through a
/// config value unnoticed.
fn validate_file_path(path: &Path) -> Result<PathBuf, RosterError> {
    let canonical = path
        .canonicalize()
        .map_err(|e| RosterError::Io(format!("invalid file path '{}': {}", path.display(), e)))?;

    if !canonical.is_file() {
        return Err(RosterError::Io(format!(
            "path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate an output path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, RosterError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        RosterError::Io(format!(
            "invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    let filename = path
        .file_name()
        .ok_or_else(|| RosterError::Io("output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// CONTEXT & DOCUMENT I/O
// =============================================================================

/// Resolved settings shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Inventory document path.
    pub inventory: PathBuf,
    /// Pretty-print JSON on write.
    pub pretty: bool,
    /// Emit machine-readable output where a command reports data.
    pub json_mode: bool,
}

/// Load the inventory document. Fails when the file is missing.
pub fn read_inventory(ctx: &CommandContext) -> Result<Inventory, RosterError> {
    let path = validate_file_path(&ctx.inventory)?;
    validate_file_size(&path, MAX_INVENTORY_FILE_SIZE)?;
    let content = std::fs::read_to_string(&path)
        .map_err(|e| RosterError::Io(format!("{}: {}", path.display(), e)))?;
    from_json_str(&content)
}

/// Load the inventory document, starting fresh when the file does not exist
/// yet. Mutating commands use this so the first `add-host` bootstraps the
/// file.
pub fn read_or_create_inventory(ctx: &CommandContext) -> Result<Inventory, RosterError> {
    if ctx.inventory.exists() {
        read_inventory(ctx)
    } else {
        tracing::info!(
            "inventory {} does not exist yet, starting empty",
            ctx.inventory.display()
        );
        Ok(Inventory::new())
    }
}

/// Serialize the inventory back to its document file.
pub fn write_inventory(ctx: &CommandContext, inventory: &mut Inventory) -> Result<(), RosterError> {
    let path = validate_output_path(&ctx.inventory)?;
    let mut content = to_json_string(inventory, ctx.pretty)?;
    content.push('\n');
    std::fs::write(&path, content)
        .map_err(|e| RosterError::Io(format!("{}: {}", path.display(), e)))
}

/// Parse `key=json` variable assignments. A value that is not valid JSON is
/// taken as a bare string, so `--var region=eu` and `--var port=22` both do
/// what they look like.
pub fn parse_var_assignments(pairs: &[String]) -> Result<VarMap, RosterError> {
    let mut vars = VarMap::new();
    for pair in pairs {
        let (key, raw) = pair.split_once('=').ok_or_else(|| {
            RosterError::Serialization(format!("variable {pair:?} is not a key=value pair"))
        })?;
        let value = serde_json::from_str(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
        vars.insert(key.to_string(), value);
    }
    Ok(vars)
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show inventory counts and group layout.
pub fn cmd_status(ctx: &CommandContext) -> Result<(), RosterError> {
    let inventory = read_inventory(ctx)?;

    if ctx.json_mode {
        let output = serde_json::json!({
            "inventory": ctx.inventory.to_string_lossy(),
            "group_count": inventory.count_groups(),
            "host_count": inventory.count_hosts(),
            "groups": inventory.groups().map(|g| g.name.clone()).collect::<Vec<_>>(),
            "hosts": inventory.hosts().map(|h| h.name.clone()).collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Roster Inventory Status");
    println!("=======================");
    println!("Document: {}", ctx.inventory.display());
    println!();
    println!("Groups: {}", inventory.count_groups());
    println!("Hosts:  {}", inventory.count_hosts());
    println!();
    for group in inventory.groups() {
        println!(
            "  {} ({} children, {} hosts, priority {})",
            group.name,
            group.children.len(),
            group.hosts.len(),
            group.priority.value()
        );
    }

    Ok(())
}

// =============================================================================
// FMT COMMAND
// =============================================================================

/// Load, normalize and rewrite the inventory document.
///
/// Normalization re-establishes the special groups and accurate `ungrouped`
/// membership; a canonical document is a fixpoint of this command.
pub fn cmd_fmt(ctx: &CommandContext) -> Result<(), RosterError> {
    let mut inventory = read_inventory(ctx)?;
    write_inventory(ctx, &mut inventory)?;
    tracing::info!("normalized {}", ctx.inventory.display());
    Ok(())
}

// =============================================================================
// GROUP COMMANDS
// =============================================================================

/// Create or update a group.
pub fn cmd_add_group(
    ctx: &CommandContext,
    name: &str,
    children: Vec<String>,
    parents: Vec<String>,
    hosts: Vec<String>,
    vars: &[String],
    priority: Option<i64>,
    no_update: bool,
) -> Result<(), RosterError> {
    let mut inventory = read_or_create_inventory(ctx)?;
    let info = GroupInfo {
        children,
        parents,
        hosts,
        vars: parse_var_assignments(vars)?,
        group_vars: VarMap::new(),
        priority: priority.map(Priority::new),
    };
    inventory.add_group(name, Some(&info), !no_update)?;
    write_inventory(ctx, &mut inventory)?;
    println!("group '{}' written to {}", name, ctx.inventory.display());
    Ok(())
}

/// Delete a group, optionally reparenting its children, hosts and vars.
pub fn cmd_del_group(
    ctx: &CommandContext,
    name: &str,
    reparent_groups: bool,
    reparent_hosts: bool,
    reparent_vars: bool,
) -> Result<(), RosterError> {
    let mut inventory = read_inventory(ctx)?;
    inventory.del_group(
        name,
        DeleteOptions {
            reparent_groups,
            reparent_hosts,
            reparent_vars,
        },
    )?;
    write_inventory(ctx, &mut inventory)?;
    println!("group '{}' removed from {}", name, ctx.inventory.display());
    Ok(())
}

/// Rename a group.
pub fn cmd_rename_group(ctx: &CommandContext, old: &str, new: &str) -> Result<(), RosterError> {
    let mut inventory = read_inventory(ctx)?;
    inventory.rename_group(old, new)?;
    write_inventory(ctx, &mut inventory)?;
    println!("group '{}' renamed to '{}'", old, new);
    Ok(())
}

/// Set a group's merge priority.
pub fn cmd_set_priority(ctx: &CommandContext, name: &str, priority: i64) -> Result<(), RosterError> {
    let mut inventory = read_inventory(ctx)?;
    if inventory.group(name).is_none() {
        return Err(RosterError::GroupNotFound(name.to_string()));
    }
    inventory.set_group_priority(name, Priority::new(priority));
    write_inventory(ctx, &mut inventory)?;
    println!("group '{}' priority set to {}", name, priority);
    Ok(())
}

// =============================================================================
// HOST COMMANDS
// =============================================================================

/// Create or update a host.
pub fn cmd_add_host(
    ctx: &CommandContext,
    name: &str,
    vars: &[String],
    priority: i64,
) -> Result<(), RosterError> {
    let mut inventory = read_or_create_inventory(ctx)?;
    let vars = parse_var_assignments(vars)?;
    inventory.add_host(name, Some(&vars), Priority::new(priority))?;
    write_inventory(ctx, &mut inventory)?;
    println!("host '{}' written to {}", name, ctx.inventory.display());
    Ok(())
}

/// Delete a host.
pub fn cmd_del_host(ctx: &CommandContext, name: &str) -> Result<(), RosterError> {
    let mut inventory = read_inventory(ctx)?;
    inventory.del_host(name)?;
    write_inventory(ctx, &mut inventory)?;
    println!("host '{}' removed from {}", name, ctx.inventory.display());
    Ok(())
}

/// Rename a host.
pub fn cmd_rename_host(ctx: &CommandContext, old: &str, new: &str) -> Result<(), RosterError> {
    let mut inventory = read_inventory(ctx)?;
    inventory.rename_host(old, new)?;
    write_inventory(ctx, &mut inventory)?;
    println!("host '{}' renamed to '{}'", old, new);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
