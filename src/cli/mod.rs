//! CLI module for Perseus
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ConfigOverrides;
use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;
pub mod session;

/// Perseus video editor
///
/// Imports media into an in-memory timeline, trims, splits and reorders
/// clips, and renders the result through ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "perseus")]
#[command(about = "Perseus - timeline editing and rendering over ffmpeg")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Path to the ffmpeg binary
    #[arg(long, global = true)]
    pub ffmpeg: Option<PathBuf>,

    /// Path to the ffprobe binary
    #[arg(long, global = true)]
    pub ffprobe: Option<PathBuf>,

    /// Duration assumed when a source cannot be probed, in seconds
    #[arg(long, global = true)]
    pub default_duration: Option<f64>,

    /// Skip thumbnail and waveform generation on import
    #[arg(long, global = true)]
    pub no_previews: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration values given on the command line
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            log_level: self.log_level.clone(),
            log_format: self.log_format,
            ffmpeg_path: self.ffmpeg.clone(),
            ffprobe_path: self.ffprobe.clone(),
            default_duration: self.default_duration,
            no_previews: self.no_previews,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print media metadata for a file
    Probe(args::ProbeArgs),
    /// Build a timeline and print the render job without running it
    Plan(args::TimelineArgs),
    /// Build a timeline and render it
    Render(args::TimelineArgs),
    /// Interactive editing session over stdin
    Session,
}
