//! Studioledger CLI - asset inventory and studio readiness from the terminal

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use studioledger::Operator;
use studioledger::config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "studioledger")]
#[command(version)]
#[command(about = "Asset inventory and studio readiness ledger for live-streaming studios")]
#[command(long_about = r#"
Studioledger keeps track of branch locations, streaming rooms, the equipment
in them, operator readiness checklists, and a full audit trail.

Example usage:
  studioledger init
  studioledger location add "Jakarta" --address "Jl. Sudirman 1"
  studioledger room add "Studio A" --location <LOCATION_ID>
  studioledger asset add "Sony A7" --location <LOCATION_ID> --category Kamera --quantity 2
  studioledger assign --asset <ASSET_ID> --room <ROOM_ID>
  studioledger move <ASSET_ID> --to warehouse
  studioledger checklist submit checklist.json --operator "Budi" --role operator
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Name of the acting operator (recorded in the audit trail)
    #[arg(long, global = true)]
    operator: Option<String>,

    /// Role of the acting operator: admin, operator, super-admin
    #[arg(long, global = true)]
    role: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file and create the database
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Manage branch locations
    Location {
        #[command(subcommand)]
        action: LocationCommand,
    },

    /// Manage rooms
    Room {
        #[command(subcommand)]
        action: RoomCommand,
    },

    /// Manage the master asset catalog
    Asset {
        #[command(subcommand)]
        action: AssetCommand,
    },

    /// Put an asset in a room (replaces any earlier assignment)
    Assign {
        #[arg(long)]
        asset: String,

        #[arg(long)]
        room: String,
    },

    /// Move an assigned asset to another room, or back to the warehouse
    Move {
        /// Asset id
        asset: String,

        /// Destination room id, or "warehouse"
        #[arg(long)]
        to: String,
    },

    /// Remove a room assignment by its id
    Unassign {
        /// Room assignment id
        id: String,
    },

    /// Submit and review readiness checklists
    Checklist {
        #[command(subcommand)]
        action: ChecklistCommand,
    },

    /// Manage asset categories
    Category {
        #[command(subcommand)]
        action: CategoryCommand,
    },

    /// Show the audit trail
    Logs {
        /// Only entries for this asset
        #[arg(long)]
        asset: Option<String>,

        /// Only entries of this type (status, movement, system, auth)
        #[arg(long)]
        kind: Option<String>,

        /// Maximum number of entries
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Record a login for the acting operator
    Login,

    /// Record a logout for the acting operator
    Logout,

    /// Show statistics about the ledger
    Stats,
}

#[derive(Subcommand)]
pub enum LocationCommand {
    /// Add a location
    Add {
        name: String,

        #[arg(long, default_value = "")]
        address: String,
    },
    /// List locations
    List,
    /// Change a location's name or address
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,
    },
    /// Delete a location that has no rooms
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum RoomCommand {
    /// Add a room to a location
    Add {
        name: String,

        #[arg(long)]
        location: String,

        #[arg(long, default_value = "")]
        description: String,
    },
    /// List rooms
    List {
        /// Only rooms in this location
        #[arg(long)]
        location: Option<String>,
    },
    /// Change a room
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Move the room (and its assets) to another location
        #[arg(long)]
        location: Option<String>,
    },
    /// Delete a room; its assets return to the warehouse
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum AssetCommand {
    /// Register one or more units of an asset
    Add {
        name: String,

        #[arg(long)]
        location: String,

        #[arg(long)]
        category: String,

        /// Number of units to register
        #[arg(short, long, default_value = "1")]
        quantity: usize,

        #[arg(long, default_value = "BAIK")]
        status: String,

        #[arg(long, default_value = "")]
        position: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        notes: String,

        /// Entry date, YYYY-MM-DD
        #[arg(long)]
        entry_date: Option<String>,
    },
    /// List assets
    List {
        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        room: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Only assets not assigned to any room
        #[arg(long)]
        unassigned: bool,
    },
    /// Show one asset with its audit trail
    Show { id: String },
    /// Change an asset
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        position: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete an asset (its audit trail is kept)
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum ChecklistCommand {
    /// Submit a checklist from a JSON file and apply it
    Submit {
        /// JSON file with roomId, roomStatus, overallNotes and items
        file: PathBuf,
    },
    /// List checklists
    List {
        /// Only checklists no admin has opened yet
        #[arg(long)]
        unread: bool,
    },
    /// Show a checklist and mark it as read
    Read { id: String },
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    Add { name: String },
    List,
    Delete { name: String },
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

/// Print a JSON success envelope
pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if output_mode == OutputMode::Json {
        let envelope = serde_json::json!({
            "ok": true,
            "command": command,
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }
    Ok(())
}

/// Everything a command needs besides its own arguments
pub struct Context {
    pub output_mode: OutputMode,
    pub database: PathBuf,
    pub config_path: PathBuf,
    pub operator: Operator,
    pub debounce: Duration,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let file_config = config::load_config(Some(&config_path))?.unwrap_or_default();

    let database = cli
        .database
        .clone()
        .or_else(|| file_config.database.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| config::default_database_path_in(std::path::Path::new(".")));

    let ctx = Context {
        output_mode: if cli.json { OutputMode::Json } else { OutputMode::Human },
        database,
        config_path,
        operator: file_config.operator(cli.operator.as_deref(), cli.role.as_deref())?,
        debounce: file_config.debounce(),
    };

    tracing::debug!("Using database {:?} as {} ({})", ctx.database, ctx.operator.name, ctx.operator.role);

    let result = commands::run(cli.command, &ctx);
    if let Err(e) = &result {
        if ctx.output_mode == OutputMode::Json {
            let envelope = serde_json::json!({ "ok": false, "error": e.to_string() });
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        } else {
            studioledger::ui::error(&e.to_string());
        }
        std::process::exit(1);
    }

    Ok(())
}
