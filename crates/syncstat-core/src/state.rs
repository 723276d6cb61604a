//! Aggregate statistics accumulated over a scan
//!
//! [`AggregateState`] is created empty at the start of a run, updated once
//! per classified event in scan order, and then handed read-only to the
//! report. Counters only ever grow.
//!
//! # Timestamp range
//!
//! The first timestamp seen in the whole run becomes `oldest_timestamp` and
//! is never replaced. Every later timestamp overwrites `newest_timestamp`,
//! so the range is "first seen" to "last seen" in scan order, not a min/max.
//! Log files must be supplied in chronological order for the range to be
//! meaningful.
//!
//! # Examples
//!
//! ```
//! use syncstat_core::state::AggregateState;
//!
//! let mut state = AggregateState::new();
//! state.ingest_line("==== taskd 1.2.0 ====");
//! state.ingest_line("[1] 'sync' from 'GBF/Paul' using 'task 2.5.0' at 1.2.3.4:1");
//! assert_eq!(state.bounce_count, 1);
//! assert_eq!(state.sync_count, 1);
//! ```

use crate::classifier::classifier;
use crate::event::LogEvent;
use crate::types::{ClientName, LogTimestamp, OrgName, UserKey};
use chrono::TimeDelta;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Counters, identifier tallies, and the timestamp range for one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateState {
    /// Server starts seen
    pub bounce_count: u64,
    /// Sync transactions, with or without client information
    pub sync_count: u64,
    /// Syncs whose key was still valid
    pub sync_trivial_count: u64,
    /// Syncs that issued a new key
    pub sync_nontrivial_count: u64,
    /// Sum of `Loaded <N>` counts
    pub loaded_total: u64,
    /// Sum of `merged <N>` counts
    pub merged_total: u64,
    /// All errors, coded and uncoded
    pub error_count: u64,
    pub warning_count: u64,
    /// Coded errors by status code
    pub errors_by_code: BTreeMap<String, u64>,
    /// Sync count per organization
    pub active_orgs: BTreeMap<OrgName, u64>,
    /// Sync count per `org/user`
    pub active_users: BTreeMap<UserKey, u64>,
    /// Distinct client identifiers
    pub clients: BTreeSet<ClientName>,
    pub oldest_timestamp: Option<LogTimestamp>,
    pub newest_timestamp: Option<LogTimestamp>,
    /// Organizations found under the data root, in discovery order
    pub total_orgs: Vec<OrgName>,
    /// Users found under the data root, in discovery order
    pub total_users: Vec<UserKey>,
    /// Bytes of per-user data found under the data root
    pub stored_bytes: u64,
}

impl AggregateState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a line and apply every event it carries
    pub fn ingest_line(&mut self, line: &str) {
        for event in classifier().classify(line) {
            self.apply(event);
        }
    }

    /// Apply a single event
    pub fn apply(&mut self, event: LogEvent) {
        trace!("Applying {} event", event.kind());
        match event {
            LogEvent::Timestamp(ts) => {
                if self.oldest_timestamp.is_none() {
                    self.oldest_timestamp = Some(ts);
                } else {
                    self.newest_timestamp = Some(ts);
                }
            }
            LogEvent::Bounce => self.bounce_count += 1,
            LogEvent::SyncWithClient { org, user, client } => {
                self.record_sync(org, &user);
                self.clients.insert(client);
            }
            LogEvent::SyncNoClient { org, user } => self.record_sync(org, &user),
            LogEvent::SyncTrivial => self.sync_trivial_count += 1,
            LogEvent::SyncNontrivial => self.sync_nontrivial_count += 1,
            LogEvent::Loaded(n) => self.loaded_total = self.loaded_total.saturating_add(n),
            LogEvent::Merged(n) => self.merged_total = self.merged_total.saturating_add(n),
            LogEvent::ErrorCoded(code) => {
                self.error_count += 1;
                *self.errors_by_code.entry(code).or_insert(0) += 1;
            }
            LogEvent::ErrorUncoded => self.error_count += 1,
            LogEvent::Warning => self.warning_count += 1,
        }
    }

    fn record_sync(&mut self, org: OrgName, user: &str) {
        self.sync_count += 1;
        let user_key = UserKey::new(&org, user);
        *self.active_users.entry(user_key).or_insert(0) += 1;
        *self.active_orgs.entry(org).or_insert(0) += 1;
    }

    /// Record an organization found under the data root
    pub fn add_total_org(&mut self, org: OrgName) {
        self.total_orgs.push(org);
    }

    /// Record a user found under the data root, with the size of its data
    /// file if one exists
    pub fn add_total_user(&mut self, user: UserKey, data_bytes: Option<u64>) {
        self.total_users.push(user);
        if let Some(bytes) = data_bytes {
            self.stored_bytes = self.stored_bytes.saturating_add(bytes);
        }
    }

    /// Signed span from the first to the last timestamp seen
    ///
    /// `None` until at least two timestamp lines have been seen.
    pub fn time_range(&self) -> Option<TimeDelta> {
        match (self.oldest_timestamp, self.newest_timestamp) {
            (Some(oldest), Some(newest)) => Some(newest.since(&oldest)),
            _ => None,
        }
    }

    /// Sum of the per-code error tallies
    pub fn coded_error_total(&self) -> u64 {
        self.errors_by_code.values().sum()
    }
}
