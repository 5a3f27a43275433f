//! # Roster CLI Module
//!
//! This module implements the CLI interface for Roster.
//!
//! ## Available Commands
//!
//! - `status` - Show inventory counts and group layout
//! - `fmt` - Normalize an inventory document in place
//! - `add-group` - Create or update a group
//! - `del-group` - Delete a group, optionally reparenting
//! - `rename-group` - Rename a group
//! - `set-priority` - Set a group's merge priority
//! - `add-host` - Create or update a host
//! - `del-host` - Delete a host
//! - `rename-host` - Rename a host

pub mod commands;

use clap::{Parser, Subcommand};
use roster_core::RosterError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Roster - inventory document editor
///
/// Loads a host/group inventory from a JSON document, applies one mutation,
/// and writes the document back in canonical form.
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the inventory document (defaults to roster.toml settings)
    #[arg(short, long, global = true)]
    pub inventory: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show inventory counts and group layout
    Status,

    /// Load, normalize and rewrite the inventory document
    Fmt,

    /// Create or update a group
    AddGroup {
        /// Group name
        name: String,

        /// Child group names (created empty when missing)
        #[arg(short, long = "child")]
        children: Vec<String>,

        /// Parent group names (created empty when missing)
        #[arg(short, long = "parent")]
        parents: Vec<String>,

        /// Member host names (must already exist)
        #[arg(short = 'H', long = "host")]
        hosts: Vec<String>,

        /// Group variables as key=json pairs (bare values read as strings)
        #[arg(short, long = "var")]
        vars: Vec<String>,

        /// Merge priority, applied only when the group is newly created
        #[arg(short = 'P', long)]
        priority: Option<i64>,

        /// Fail instead of updating when the group already exists
        #[arg(long)]
        no_update: bool,
    },

    /// Delete a group
    DelGroup {
        /// Group name
        name: String,

        /// Attach the group's children to its former parents
        #[arg(long)]
        reparent_groups: bool,

        /// Attach the group's hosts to its former parents
        #[arg(long)]
        reparent_hosts: bool,

        /// Merge the group's vars into its former parents
        #[arg(long)]
        reparent_vars: bool,
    },

    /// Rename a group
    RenameGroup {
        /// Current name
        old: String,
        /// New name (must be free)
        new: String,
    },

    /// Set a group's merge priority
    SetPriority {
        /// Group name
        name: String,
        /// Priority value (higher wins variable conflicts)
        priority: i64,
    },

    /// Create or update a host
    AddHost {
        /// Host name
        name: String,

        /// Host variables as key=json pairs (bare values read as strings)
        #[arg(short, long = "var")]
        vars: Vec<String>,

        /// Merge priority for the update path
        #[arg(short = 'P', long, default_value = "0")]
        priority: i64,
    },

    /// Delete a host
    DelHost {
        /// Host name
        name: String,
    },

    /// Rename a host
    RenameHost {
        /// Current name
        old: String,
        /// New name (must be free)
        new: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), RosterError> {
    let config = crate::config::RosterConfig::load(std::path::Path::new("."))?;
    let inventory = config.resolve_inventory(cli.inventory);
    let ctx = CommandContext {
        inventory,
        pretty: config.pretty,
        json_mode: cli.json_mode,
    };

    match cli.command {
        Some(Commands::Fmt) => cmd_fmt(&ctx),
        Some(Commands::AddGroup {
            name,
            children,
            parents,
            hosts,
            vars,
            priority,
            no_update,
        }) => cmd_add_group(
            &ctx, &name, children, parents, hosts, &vars, priority, no_update,
        ),
        Some(Commands::DelGroup {
            name,
            reparent_groups,
            reparent_hosts,
            reparent_vars,
        }) => cmd_del_group(&ctx, &name, reparent_groups, reparent_hosts, reparent_vars),
        Some(Commands::RenameGroup { old, new }) => cmd_rename_group(&ctx, &old, &new),
        Some(Commands::SetPriority { name, priority }) => cmd_set_priority(&ctx, &name, priority),
        Some(Commands::AddHost {
            name,
            vars,
            priority,
        }) => cmd_add_host(&ctx, &name, &vars, priority),
        Some(Commands::DelHost { name }) => cmd_del_host(&ctx, &name),
        Some(Commands::RenameHost { old, new }) => cmd_rename_host(&ctx, &old, &new),
        // No subcommand - show status by default
        Some(Commands::Status) | None => cmd_status(&ctx),
    }
}
