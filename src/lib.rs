//! syncstat - Generate usage profiles from sync server transaction logs
//!
//! This library provides functionality to:
//! - Classify Taskserver log lines into typed events
//! - Aggregate traffic, error, and identity statistics in a single pass
//! - Augment the statistics with totals from a server data root
//! - Render the resulting profile as text or JSON
//!
//! # Examples
//!
//! ```no_run
//! use syncstat::{generate_profile, get_formatter};
//!
//! fn main() -> syncstat::Result<()> {
//!     let report = generate_profile(&["/var/log/taskd.log"], None, false)?;
//!     print!("{}", get_formatter(false).format_profile(&report)?);
//!     Ok(())
//! }
//! ```

pub mod cli;

use std::path::{Path, PathBuf};
use tracing::info;

// Re-export commonly used types
pub use syncstat_core::{
    AggregateState, ClientName, LogEvent, LogTimestamp, OrgName, ProfileReport, Result,
    SyncstatError, UserKey, classifier, metrics, state,
};
pub use syncstat_provider_taskd::{LogScanner, scan_data_root};
pub use syncstat_terminal::{OutputFormatter, get_formatter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scan `logs` (and `data_root` when given) and build the profile report
///
/// Every input path is checked before the first line is read, so a missing
/// file or data root fails the run without partial work.
pub fn generate_profile<P>(
    logs: &[P],
    data_root: Option<&Path>,
    show_progress: bool,
) -> Result<ProfileReport>
where
    P: AsRef<Path>,
{
    let scanner = LogScanner::new(logs.iter().map(|p| PathBuf::from(p.as_ref())))?
        .with_progress(show_progress);
    if let Some(root) = data_root {
        syncstat_provider_taskd::check_data_root(root)?;
    }

    let mut state = AggregateState::new();
    scanner.scan_into(&mut state)?;

    if let Some(root) = data_root {
        info!("Scanning data root {}", root.display());
        scan_data_root(root, &mut state)?;
    }

    ProfileReport::build(state, data_root.is_some())
}
