//! Report model: the final state, its derived metrics, and sorted listings
//!
//! Building a [`ProfileReport`] performs every computation the report needs,
//! so formatters only lay out text.

use crate::error::Result;
use crate::metrics::ProfileMetrics;
use crate::state::AggregateState;
use serde::Serialize;
use std::collections::BTreeMap;

/// One organization, user, or client in a report listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub name: String,
    /// Whether the identifier appeared in at least one sync
    pub active: bool,
}

impl ListingEntry {
    fn new(name: &str, active: bool) -> Self {
        Self {
            name: name.to_string(),
            active,
        }
    }
}

/// Sorted listing of identifiers with an activity flag
///
/// When the data root produced identifiers, every one of them is listed and
/// those absent from `active` are flagged inactive. Otherwise the active
/// identifiers themselves are listed.
pub fn listing<K>(total: &[K], active: &BTreeMap<K, u64>) -> Vec<ListingEntry>
where
    K: Ord + AsRef<str>,
{
    if total.is_empty() {
        return active
            .keys()
            .map(|key| ListingEntry::new(key.as_ref(), true))
            .collect();
    }

    let mut sorted: Vec<&K> = total.iter().collect();
    sorted.sort();
    sorted
        .into_iter()
        .map(|key| ListingEntry::new(key.as_ref(), active.contains_key(key)))
        .collect()
}

/// Everything a formatter needs to render the usage profile
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub state: AggregateState,
    pub metrics: ProfileMetrics,
    /// Whether a data root was scanned
    pub data_root_scanned: bool,
    pub orgs: Vec<ListingEntry>,
    pub users: Vec<ListingEntry>,
    pub clients: Vec<String>,
}

impl ProfileReport {
    /// Compute metrics and listings from a finished state
    ///
    /// # Errors
    ///
    /// Propagates [`ProfileMetrics::compute`] failures; no report exists
    /// for a degenerate time range.
    pub fn build(state: AggregateState, data_root_scanned: bool) -> Result<Self> {
        let metrics = ProfileMetrics::compute(&state, data_root_scanned)?;
        let orgs = listing(&state.total_orgs, &state.active_orgs);
        let users = listing(&state.total_users, &state.active_users);
        let clients = state
            .clients
            .iter()
            .map(|client| client.as_str().to_string())
            .collect();

        Ok(Self {
            state,
            metrics,
            data_root_scanned,
            orgs,
            users,
            clients,
        })
    }
}
