//! CLI subcommands — layout table, config, descriptor, codec, painting.

mod codec;
mod config_cmd;
mod descriptor;
mod layouts;
mod paint;

use std::path::Path;

use clap::Subcommand;
use serde::Serialize;

pub(super) use ledmatrix_lib::color;
pub(super) use ledmatrix_lib::config::Config;
pub(super) use ledmatrix_lib::descriptor::Descriptor;
pub(super) use ledmatrix_lib::error::Result;
pub(super) use ledmatrix_lib::{MatrixError, StripLayout};

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w - 2);
}

/// Print any serializable value as pretty JSON.
pub(super) fn print_json(value: &impl Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("serializing output: {e}"),
    }
}

/// Load config from `custom_path` if given, else the platform default.
/// Parse problems are logged and defaults used.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    let (config, warnings) = match custom_path {
        Some(p) => Config::load_from(p),
        None => Config::load_with_warnings(),
    };
    for w in &warnings {
        log::warn!("{w}");
    }
    config
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct LayoutJson {
    pub name: String,
    pub code: String,
    pub channels: usize,
}

#[derive(Serialize)]
pub(super) struct LayoutsOutput {
    pub count: usize,
    pub layouts: Vec<LayoutJson>,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub problems: Vec<String>,
}

#[derive(Serialize)]
pub(super) struct ConfigInitOutput {
    pub config_file: String,
    pub replaced: bool,
}

#[derive(Serialize)]
pub(super) struct DescriptorOutput {
    pub active_channel: usize,
    pub descriptor: Descriptor,
}

#[derive(Serialize)]
pub(super) struct ColorJson {
    pub packed: String,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub white: u8,
    pub hex: String,
}

#[derive(Serialize)]
pub(super) struct FrameOutput {
    pub channel: usize,
    pub pixels: Vec<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the strip layouts the driver understands
    Layouts,

    /// Show the effective configuration and any problems with it
    Config {
        /// Write a config file with default settings instead
        #[arg(long)]
        init: bool,
        /// With --init, replace an existing file
        #[arg(long, requires = "init")]
        force: bool,
    },

    /// Show the driver descriptor built from the configuration
    Descriptor {
        /// Override the configured strip length
        #[arg(long)]
        size: Option<usize>,
    },

    /// Encode a color into the driver's packed word
    Encode {
        /// Color as #RRGGBB, #RRGGBBWW or a name (red, warm, off, ...)
        color: String,
    },

    /// Decode a packed driver word into its channels
    Decode {
        /// Packed word, e.g. 0x00FF8000
        packed: String,
    },

    /// Set every LED to one color and render
    Fill {
        /// Color as #RRGGBB, #RRGGBBWW or a name
        color: String,
        /// Run against an in-memory driver and print the frame
        #[arg(long)]
        dry_run: bool,
    },

    /// Set a single LED and render
    Set {
        /// LED index (0-based)
        index: usize,
        /// Color as #RRGGBB, #RRGGBBWW or a name
        color: String,
        /// Run against an in-memory driver and print the frame
        #[arg(long)]
        dry_run: bool,
    },

    /// Turn every LED off
    Clear {
        /// Run against an in-memory driver and print the frame
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn run(cmd: Command, json: bool, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        Command::Layouts => layouts::cmd_layouts(json),
        Command::Config { init: true, force } => {
            config_cmd::cmd_config_init(force, json, config_path)
        }
        Command::Config { init: false, .. } => config_cmd::cmd_config(json, config_path),
        Command::Descriptor { size } => descriptor::cmd_descriptor(size, json, config_path),
        Command::Encode { color } => codec::cmd_encode(&color, json),
        Command::Decode { packed } => codec::cmd_decode(&packed, json),
        Command::Fill { color, dry_run } => {
            let c = color::parse_color(&color)?;
            paint::cmd_paint(paint::Paint::Fill(c), dry_run, json, config_path)
        }
        Command::Set {
            index,
            color,
            dry_run,
        } => {
            let c = color::parse_color(&color)?;
            paint::cmd_paint(paint::Paint::Single(index, c), dry_run, json, config_path)
        }
        Command::Clear { dry_run } => {
            paint::cmd_paint(paint::Paint::Clear, dry_run, json, config_path)
        }
    }
}
