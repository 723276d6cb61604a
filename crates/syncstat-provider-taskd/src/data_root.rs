//! Data root scanner
//!
//! A Taskserver data root has the fixed shape
//! `<root>/orgs/<org>/users/<user>/`, with each user's transactions stored in
//! [`USER_DATA_FILE`]. Scanning records every organization and user found
//! and sums the sizes of the per-user data files.

use std::path::Path;
use syncstat_core::error::{Result, SyncstatError};
use syncstat_core::state::AggregateState;
use syncstat_core::types::{OrgName, UserKey};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Name of the per-user transaction file
pub const USER_DATA_FILE: &str = "tx.data";

/// Totals found by one data root scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataRootSummary {
    pub orgs: usize,
    pub users: usize,
    pub bytes: u64,
}

/// Fail with [`SyncstatError::MissingDataRoot`] if `root` does not exist
pub fn check_data_root(root: &Path) -> Result<()> {
    if root.exists() {
        Ok(())
    } else {
        Err(SyncstatError::MissingDataRoot(root.to_path_buf()))
    }
}

/// Record every organization and user under `root` into `state`
///
/// Entries are visited in file-name order. Symlinked directories are
/// followed; plain files at the organization or user level are skipped.
///
/// # Errors
///
/// Returns [`SyncstatError::MissingDataRoot`] when `root` does not exist, and
/// [`SyncstatError::Parse`] when `orgs` or an organization's `users`
/// directory is missing.
pub fn scan_data_root(root: &Path, state: &mut AggregateState) -> Result<DataRootSummary> {
    check_data_root(root)?;

    let orgs_path = root.join("orgs");
    let mut summary = DataRootSummary::default();

    for org_dir in subdirectories(&orgs_path)? {
        let org = OrgName::new(file_name(&org_dir));
        let users_path = org_dir.join("users");

        for user_dir in subdirectories(&users_path)? {
            let user = UserKey::new(&org, &file_name(&user_dir));
            let data_path = user_dir.join(USER_DATA_FILE);
            let bytes = match std::fs::metadata(&data_path) {
                Ok(metadata) if metadata.is_file() => Some(metadata.len()),
                _ => None,
            };

            debug!("Found user {} ({} bytes)", user, bytes.unwrap_or(0));
            summary.users += 1;
            summary.bytes += bytes.unwrap_or(0);
            state.add_total_user(user, bytes);
        }

        summary.orgs += 1;
        state.add_total_org(org);
    }

    info!(
        "Data root {}: {} orgs, {} users, {} bytes",
        root.display(),
        summary.orgs,
        summary.users,
        summary.bytes
    );
    Ok(summary)
}

/// Immediate subdirectories of `dir`, sorted by name
fn subdirectories(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    if !dir.is_dir() {
        return Err(SyncstatError::Parse {
            file: dir.to_path_buf(),
            error: "expected a directory".to_string(),
        });
    }

    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            SyncstatError::ReadFailed {
                path,
                source: e.into(),
            }
        })?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        } else {
            debug!("Skipping non-directory {}", entry.path().display());
        }
    }
    Ok(dirs)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
