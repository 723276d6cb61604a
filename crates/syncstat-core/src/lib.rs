//! Core types and the classification engine for syncstat
//!
//! This crate provides the line classifier, the aggregate statistics it
//! feeds, and the derived metrics used by every report format.

pub mod classifier;
pub mod error;
pub mod event;
pub mod metrics;
pub mod report;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SyncstatError};
pub use event::LogEvent;
pub use report::ProfileReport;
pub use state::AggregateState;
pub use types::{ClientName, LogTimestamp, OrgName, UserKey};
