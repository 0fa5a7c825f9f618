//! CLI parse: clap types for Warden. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Warden CLI - zone protection settings over spatial scenes
#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "Resolve zone protection settings over prioritized spatial scenes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a setting at a point
    #[command(allow_negative_numbers = true)]
    Resolve {
        /// Setting key id
        key: String,
        domain: String,
        x: f64,
        y: f64,
        z: f64,
        /// Actor the lookup is made for (omit for an anonymous lookup)
        #[arg(long)]
        actor: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List hosts containing a point, in resolution order
    #[command(allow_negative_numbers = true)]
    Hosts {
        domain: String,
        x: f64,
        y: f64,
        z: f64,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List registered setting keys
    Keys {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List scenes by resolution order
    Scenes {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Manage domains (coordinate spaces)
    Domain {
        #[command(subcommand)]
        command: DomainCommands,
    },
    /// Manage scenes
    Scene {
        #[command(subcommand)]
        command: SceneCommands,
    },
    /// Manage scene volumes
    Zone {
        #[command(subcommand)]
        command: ZoneCommands,
    },
    /// Assign a setting value on a host
    Set {
        /// Scene name or the global host name
        host: String,
        key: String,
        value: String,
        /// Add entries to a multi-valued setting instead of replacing it
        #[arg(long, conflicts_with = "remove")]
        add: bool,
        /// Remove entries from a multi-valued setting instead of replacing it
        #[arg(long)]
        remove: bool,
    },
    /// Remove a setting value from a host
    Unset { host: String, key: String },
}

#[derive(Subcommand)]
pub enum DomainCommands {
    /// Register a domain
    Add { name: String },
    /// List registered domains
    List,
}

#[derive(Subcommand)]
pub enum SceneCommands {
    /// Create a scene
    Create {
        name: String,
        /// Priority (higher wins)
        #[arg(long, default_value = "0")]
        priority: i32,
    },
    /// Destroy a scene and its volumes
    Destroy { name: String },
    /// Rename a scene
    Rename { old: String, new: String },
    /// Change a scene's priority, bumping overlapping scenes out of the way
    Priority { name: String, priority: i32 },
}

#[derive(Subcommand)]
pub enum ZoneCommands {
    /// Add a cuboid spanning two corners
    #[command(allow_negative_numbers = true)]
    AddBox {
        scene: String,
        domain: String,
        x1: f64,
        y1: f64,
        z1: f64,
        x2: f64,
        y2: f64,
        z2: f64,
    },
    /// Add a vertical cylinder from its base center
    #[command(allow_negative_numbers = true)]
    AddCylinder {
        scene: String,
        domain: String,
        x: f64,
        y: f64,
        z: f64,
        radius: f64,
        height: f64,
    },
    /// Add a horizontally unbounded slab
    #[command(allow_negative_numbers = true)]
    AddSlab {
        scene: String,
        domain: String,
        y: f64,
        height: f64,
    },
    /// Add a sphere
    #[command(allow_negative_numbers = true)]
    AddSphere {
        scene: String,
        domain: String,
        x: f64,
        y: f64,
        z: f64,
        radius: f64,
    },
    /// Remove a volume by id
    Remove { id: u64 },
}
