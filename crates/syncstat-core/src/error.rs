//! Error types for syncstat
//!
//! This module defines the error types used throughout the syncstat crates.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! Line classification and state updates never fail: a line that does not
//! match a pattern simply produces no event. Errors come from the edges of a
//! run (missing inputs, unreadable files) and from derived metrics that would
//! otherwise divide by an empty time range.
//!
//! # Example
//!
//! ```
//! use syncstat_core::error::{SyncstatError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to SyncstatError
//!     let _file = std::fs::read_to_string("nonexistent.txt")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for syncstat operations
#[derive(Error, Debug)]
pub enum SyncstatError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A log file named on the command line does not exist
    #[error("File '{}' does not exist", .0.display())]
    MissingFile(PathBuf),

    /// The supplied data root does not exist
    #[error("Directory '{}' does not exist", .0.display())]
    MissingDataRoot(PathBuf),

    /// A rate metric needs a non-empty time range to divide by
    #[error("Time range is empty: at least two distinct timestamps are required")]
    DegenerateTimeRange,

    /// An input exists but could not be read
    #[error("Cannot read '{}': {source}", .path.display())]
    ReadFailed {
        /// The file or directory that failed
        path: PathBuf,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The data root exists but does not have the expected layout
    #[error("Parse error in {file}: {error}")]
    Parse {
        /// The path that caused the error
        file: PathBuf,
        /// The error message
        error: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results in syncstat
///
/// # Example
///
/// ```
/// use syncstat_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, SyncstatError>;
