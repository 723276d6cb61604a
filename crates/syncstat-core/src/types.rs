//! Core domain types for syncstat
//!
//! Strongly-typed wrappers for the identifiers that appear in sync server
//! logs and in the data root, plus the timestamp type used for the scanned
//! time range.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format of the timestamp prefix written by the sync server
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Strongly-typed organization name
///
/// # Examples
/// ```
/// use syncstat_core::types::OrgName;
///
/// let org = OrgName::new("GBF");
/// assert_eq!(org.as_str(), "GBF");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrgName(String);

impl OrgName {
    /// Create a new OrgName from any string-like type
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrgName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrgName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Organization-qualified user identifier, `org/user`
///
/// Users are scoped to an organization, so the same user name under two
/// organizations is two distinct users.
///
/// # Examples
/// ```
/// use syncstat_core::types::{OrgName, UserKey};
///
/// let user = UserKey::new(&OrgName::new("GBF"), "Paul");
/// assert_eq!(user.as_str(), "GBF/Paul");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserKey(String);

impl UserKey {
    /// Qualify a user name with its organization
    pub fn new(org: &OrgName, user: &str) -> Self {
        Self(format!("{}/{}", org.as_str(), user))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Client identifier reported by a syncing client, e.g. `task 2.5.0`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientName(String);

impl ClientName {
    /// Create a new ClientName
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ClientName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Server-local timestamp taken from the start of a log line
///
/// The server writes wall-clock time without a zone, so this wraps a
/// `NaiveDateTime`.
///
/// # Examples
/// ```
/// use syncstat_core::types::LogTimestamp;
///
/// let ts = LogTimestamp::parse("2015-10-11 01:46:53").unwrap();
/// assert_eq!(ts.to_string(), "2015-10-11 01:46:53");
/// assert!(LogTimestamp::parse("2015-13-11 01:46:53").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogTimestamp(NaiveDateTime);

impl LogTimestamp {
    /// Parse a `YYYY-MM-DD HH:MM:SS` string, returning `None` for
    /// out-of-range fields such as month 13
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .ok()
            .map(Self)
    }

    /// Get the inner NaiveDateTime
    pub fn inner(&self) -> &NaiveDateTime {
        &self.0
    }

    /// Signed duration from `earlier` to `self`
    pub fn since(&self, earlier: &LogTimestamp) -> TimeDelta {
        self.0 - earlier.0
    }
}

impl fmt::Display for LogTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}
