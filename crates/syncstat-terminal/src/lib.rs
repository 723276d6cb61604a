//! Terminal output formatting for syncstat
//!
//! This crate renders a [`ProfileReport`](syncstat_core::ProfileReport) as
//! plain text for the terminal or as JSON for other tools.

pub mod duration;
pub mod output;

pub use output::{JsonFormatter, OutputFormatter, TextFormatter, get_formatter};
