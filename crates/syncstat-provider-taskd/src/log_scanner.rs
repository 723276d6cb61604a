//! Log scanner for Taskserver transaction logs
//!
//! Drives the line classifier over every line of every input file, in the
//! order the files were given and then in file order, feeding each event
//! into one [`AggregateState`].
//!
//! All input paths are checked when the scanner is created, so a missing
//! file aborts the run before any line is read.
//!
//! # Examples
//!
//! ```no_run
//! use syncstat_provider_taskd::log_scanner::LogScanner;
//!
//! # fn example() -> syncstat_core::Result<()> {
//! let scanner = LogScanner::new(["taskd.log.1", "taskd.log"])?;
//! let state = scanner.scan()?;
//! println!("{} syncs", state.sync_count);
//! # Ok(())
//! # }
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use syncstat_core::error::{Result, SyncstatError};
use syncstat_core::state::AggregateState;
use tracing::{debug, info};

/// Line and file counts from one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub files: usize,
    pub lines: u64,
}

/// Sequential scanner over a fixed list of log files
#[derive(Debug, Clone)]
pub struct LogScanner {
    /// Log files in scan order
    paths: Vec<PathBuf>,
    /// Whether to show a progress bar
    show_progress: bool,
}

impl LogScanner {
    /// Create a scanner over `paths`
    ///
    /// # Errors
    ///
    /// Returns [`SyncstatError::InvalidArgument`] for an empty list and
    /// [`SyncstatError::MissingFile`] for the first path that does not exist.
    pub fn new<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        if paths.is_empty() {
            return Err(SyncstatError::InvalidArgument(
                "at least one log file is required".to_string(),
            ));
        }

        if let Some(missing) = paths.iter().find(|path| !path.exists()) {
            return Err(SyncstatError::MissingFile(missing.clone()));
        }

        debug!("Scanning {} log files", paths.len());
        Ok(Self {
            paths,
            show_progress: false,
        })
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Scan every file into a fresh state
    pub fn scan(&self) -> Result<AggregateState> {
        let mut state = AggregateState::new();
        self.scan_into(&mut state)?;
        Ok(state)
    }

    /// Scan every file into an existing state
    pub fn scan_into(&self, state: &mut AggregateState) -> Result<ScanSummary> {
        let progress = if self.show_progress {
            let pb = ProgressBar::new(self.paths.len() as u64);
            let style = ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} files")
                .map(|style| style.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            pb.set_style(style);
            pb.set_message("Scanning logs");
            Some(pb)
        } else {
            None
        };

        let mut summary = ScanSummary::default();
        for path in &self.paths {
            let lines = scan_file(path, state)?;
            debug!("Scanned {} lines from {}", lines, path.display());
            summary.files += 1;
            summary.lines += lines;
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("Scan complete");
        }

        info!(
            "Scanned {} lines from {} files: {} syncs, {} bounces",
            summary.lines, summary.files, state.sync_count, state.bounce_count
        );
        Ok(summary)
    }
}

/// Feed one file into `state`, returning the number of lines read
///
/// Invalid UTF-8 is replaced rather than rejected, so a corrupt line cannot
/// end the scan.
fn scan_file(path: &Path, state: &mut AggregateState) -> Result<u64> {
    let read_failed = |source: std::io::Error| match source.kind() {
        std::io::ErrorKind::NotFound => SyncstatError::MissingFile(path.to_path_buf()),
        _ => SyncstatError::ReadFailed {
            path: path.to_path_buf(),
            source,
        },
    };
    let file = File::open(path).map_err(read_failed)?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut lines = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(read_failed)? == 0 {
            break;
        }
        lines += 1;
        let line = String::from_utf8_lossy(&buf);
        state.ingest_line(line.trim_end_matches(['\n', '\r']));
    }

    Ok(lines)
}
