//! Derived metrics computed from a finished [`AggregateState`]
//!
//! Ratios over bounces and syncs are only computed when the divisor is
//! non-zero, and are `None` otherwise. Rates per day divide by the elapsed
//! time range; an empty range is reported as
//! [`SyncstatError::DegenerateTimeRange`] rather than producing infinity or
//! NaN.
//!
//! # Examples
//!
//! ```
//! use syncstat_core::metrics::ProfileMetrics;
//! use syncstat_core::state::AggregateState;
//!
//! let mut state = AggregateState::new();
//! state.ingest_line("2015-10-11 00:00:00 ==== taskd 1.2.0 ====");
//! state.ingest_line("2015-10-13 00:00:00 [1] 'sync' from GBF/Paul at 1.2.3.4:1");
//!
//! let metrics = ProfileMetrics::compute(&state, false).unwrap();
//! assert_eq!(metrics.elapsed_days, 2.0);
//! assert_eq!(metrics.average_uptime_days, Some(2.0));
//! assert_eq!(metrics.average_syncs_per_day, 0.5);
//! ```

use crate::error::{Result, SyncstatError};
use crate::state::AggregateState;
use serde::Serialize;

/// Seconds in one day
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Metrics normalized by the number of users in the data root
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerUserMetrics {
    pub syncs_per_user_per_day: f64,
    pub nontrivial_syncs_per_user_per_day: f64,
    /// Stored bytes divided by user count, rounded down
    pub bytes_per_user: u64,
}

/// Rates and ratios derived from the aggregate counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileMetrics {
    /// Seconds from the first to the last timestamp seen, if both exist
    pub elapsed_seconds: Option<i64>,
    /// Elapsed range in fractional days, zero without a range
    pub elapsed_days: f64,
    /// Elapsed days per bounce, when at least one bounce was seen
    pub average_uptime_days: Option<f64>,
    /// Syncs per bounce, when at least one bounce was seen
    pub syncs_per_bounce: Option<f64>,
    pub average_syncs_per_day: f64,
    /// Present when a data root with at least one user was scanned
    pub per_user: Option<PerUserMetrics>,
    /// Non-trivial syncs over all syncs, when at least one sync was seen
    pub nontrivial_sync_ratio: Option<f64>,
}

impl ProfileMetrics {
    /// Compute every derived metric
    ///
    /// `data_root_scanned` selects whether the per-user metrics apply.
    ///
    /// # Errors
    ///
    /// Returns [`SyncstatError::DegenerateTimeRange`] when the elapsed range
    /// is zero or fewer than two timestamps were seen, since the average
    /// sync rate divides by it.
    pub fn compute(state: &AggregateState, data_root_scanned: bool) -> Result<Self> {
        let elapsed_seconds = state.time_range().map(|range| range.num_seconds());
        let elapsed_days =
            elapsed_seconds.map_or(0.0, |secs| secs as f64 / SECONDS_PER_DAY as f64);

        let average_uptime_days = ratio(elapsed_days, state.bounce_count);
        let syncs_per_bounce = ratio(state.sync_count as f64, state.bounce_count);
        let average_syncs_per_day = per_day(state.sync_count as f64, elapsed_days)?;

        let total_users = state.total_users.len() as u64;
        let per_user = if data_root_scanned && total_users > 0 {
            let user_days = total_users as f64 * elapsed_days;
            Some(PerUserMetrics {
                syncs_per_user_per_day: per_day(state.sync_count as f64, user_days)?,
                nontrivial_syncs_per_user_per_day: per_day(
                    state.sync_nontrivial_count as f64,
                    user_days,
                )?,
                bytes_per_user: state.stored_bytes / total_users,
            })
        } else {
            None
        };

        let nontrivial_sync_ratio = ratio(state.sync_nontrivial_count as f64, state.sync_count);

        Ok(Self {
            elapsed_seconds,
            elapsed_days,
            average_uptime_days,
            syncs_per_bounce,
            average_syncs_per_day,
            per_user,
            nontrivial_sync_ratio,
        })
    }
}

/// `numerator / count`, or `None` when `count` is zero
fn ratio(numerator: f64, count: u64) -> Option<f64> {
    (count > 0).then(|| numerator / count as f64)
}

/// `count / days`, failing on an empty range
fn per_day(count: f64, days: f64) -> Result<f64> {
    if days == 0.0 {
        return Err(SyncstatError::DegenerateTimeRange);
    }
    Ok(count / days)
}
