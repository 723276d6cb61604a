//! CLI interface for syncstat
//!
//! This module defines the command-line interface using clap.
//!
//! # Example
//!
//! ```bash
//! # Profile two rotated logs, oldest first
//! syncstat /var/log/taskd.log.1 /var/log/taskd.log
//!
//! # Include storage and per-user figures from the data root
//! syncstat --data /var/taskd /var/log/taskd.log
//!
//! # Machine-readable output
//! syncstat --json /var/log/taskd.log
//! ```

use clap::Parser;
use std::path::PathBuf;
use syncstat_core::error::Result;
use syncstat_provider_taskd::check_data_root;

/// Generate user profiles from sync server logs
#[derive(Parser, Debug, Clone)]
#[command(name = "syncstat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log files to scan, in chronological order
    #[arg(required = true, value_name = "LOG")]
    pub logs: Vec<PathBuf>,

    /// Location of the server data root
    #[arg(long, env = "SYNCSTAT_DATA_ROOT", value_name = "DIR")]
    pub data: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable bold section headers
    #[arg(long)]
    pub no_color: bool,

    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Show a progress bar even when stdout is not a terminal
    #[arg(long)]
    pub progress: bool,
}

impl Cli {
    /// Check the data root before any log is read
    ///
    /// Log files are checked when the scanner is created.
    pub fn validate(&self) -> Result<()> {
        if let Some(root) = &self.data {
            check_data_root(root)?;
        }
        Ok(())
    }

    /// Whether to draw a progress bar over the input files
    pub fn show_progress(&self) -> bool {
        if self.json {
            return false;
        }
        self.progress || is_terminal::is_terminal(std::io::stdout())
    }
}
