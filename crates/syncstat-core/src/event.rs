//! Typed events extracted from a single log line

use crate::types::{ClientName, LogTimestamp, OrgName};

/// One recognized signal on a log line
///
/// A line can carry several events at once: a timestamp prefix plus a sync
/// marker plus a key-status marker is a common combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// Leading `YYYY-MM-DD HH:MM:SS` prefix
    Timestamp(LogTimestamp),
    /// Server startup banner
    Bounce,
    /// Sync transaction that reported the client software in use
    SyncWithClient {
        org: OrgName,
        user: String,
        client: ClientName,
    },
    /// Sync transaction from an older server without client reporting
    SyncNoClient { org: OrgName, user: String },
    /// The client's sync key was still valid
    SyncTrivial,
    /// The server issued a new sync key
    SyncNontrivial,
    /// Number of records loaded from storage
    Loaded(u64),
    /// Number of tasks merged
    Merged(u64),
    /// Error with a numeric status code
    ErrorCoded(String),
    /// Error with no extractable code
    ErrorUncoded,
    Warning,
}

impl LogEvent {
    /// Short name of the event kind, used in trace output
    pub fn kind(&self) -> &'static str {
        match self {
            LogEvent::Timestamp(_) => "timestamp",
            LogEvent::Bounce => "bounce",
            LogEvent::SyncWithClient { .. } => "sync-with-client",
            LogEvent::SyncNoClient { .. } => "sync-no-client",
            LogEvent::SyncTrivial => "sync-trivial",
            LogEvent::SyncNontrivial => "sync-nontrivial",
            LogEvent::Loaded(_) => "loaded",
            LogEvent::Merged(_) => "merged",
            LogEvent::ErrorCoded(_) => "error-coded",
            LogEvent::ErrorUncoded => "error-uncoded",
            LogEvent::Warning => "warning",
        }
    }
}
