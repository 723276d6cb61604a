//! Taskserver provider for syncstat
//!
//! This crate reads Taskserver transaction logs line by line into an
//! [`AggregateState`](syncstat_core::AggregateState), and optionally walks a
//! Taskserver data root for organization, user, and storage totals.

pub mod data_root;
pub mod log_scanner;

pub use data_root::{DataRootSummary, USER_DATA_FILE, check_data_root, scan_data_root};
pub use log_scanner::{LogScanner, ScanSummary};
