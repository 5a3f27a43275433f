//! # Roster - Inventory CLI
//!
//! The main binary for the Roster inventory engine.
//!
//! This application provides:
//! - CLI interface for inventory mutations (clap)
//! - JSON document I/O with canonical normalization
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              apps/roster (THE BINARY)        │
//! │                                              │
//! │  ┌─────────────┐        ┌────────────────┐   │
//! │  │   CLI       │        │  Document I/O  │   │
//! │  │  (clap)     │        │  (serde_json)  │   │
//! │  └──────┬──────┘        └───────┬────────┘   │
//! │         │                       │            │
//! │         └───────────┬───────────┘            │
//! │                     ▼                        │
//! │             ┌───────────────┐                │
//! │             │  roster-core  │                │
//! │             │ (THE ENGINE)  │                │
//! │             └───────────────┘                │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! roster --inventory hosts.json status
//! roster add-host web-01 --var ansible_connection=\"local\"
//! roster add-group web --host web-01 --var http_port=80
//! roster del-group web --reparent-hosts
//! roster fmt
//! ```

use clap::Parser;
use roster::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Initialize tracing — ROSTER_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("ROSTER_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "roster=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments and execute
    let cli = cli::Cli::parse();

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
