//! Common test utilities and helpers for syncstat tests
//!
//! Builders for Taskserver log lines plus helpers that lay out log files and
//! data roots in a temporary directory.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Organizations used across tests
pub const TEST_ORGS: &[&str] = &["GBF", "ACME", "Public"];

/// Client strings used across tests
pub const TEST_CLIENTS: &[&str] = &["task 2.5.0", "task 2.4.4", "Mirakel 3.0"];

/// Builder for the lines the server writes around one sync transaction
pub struct SyncLineBuilder {
    timestamp: NaiveDateTime,
    txn: u64,
    org: String,
    user: String,
    client: Option<String>,
    new_key: bool,
    loaded: u64,
    merged: u64,
}

impl SyncLineBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            timestamp: NaiveDate::from_ymd_opt(2015, 10, 11)
                .unwrap()
                .and_hms_opt(1, 46, 53)
                .unwrap(),
            txn: 1,
            org: TEST_ORGS[0].to_string(),
            user: "Paul".to_string(),
            client: Some(TEST_CLIENTS[0].to_string()),
            new_key: false,
            loaded: 0,
            merged: 0,
        }
    }

    pub fn at(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_txn(mut self, txn: u64) -> Self {
        self.txn = txn;
        self
    }

    pub fn with_user(mut self, org: &str, user: &str) -> Self {
        self.org = org.to_string();
        self.user = user.to_string();
        self
    }

    pub fn with_client(mut self, client: &str) -> Self {
        self.client = Some(client.to_string());
        self
    }

    pub fn without_client(mut self) -> Self {
        self.client = None;
        self
    }

    pub fn with_new_key(mut self) -> Self {
        self.new_key = true;
        self
    }

    pub fn with_counts(mut self, loaded: u64, merged: u64) -> Self {
        self.loaded = loaded;
        self.merged = merged;
        self
    }

    /// Build the log lines for this transaction
    pub fn build(self) -> Vec<String> {
        let ts = self.timestamp.format("%Y-%m-%d %H:%M:%S");
        let txn = self.txn;
        let mut lines = Vec::new();

        match &self.client {
            Some(client) => lines.push(format!(
                "{ts} [{txn}] 'sync' from '{}/{}' using '{client}' at 10.0.0.1:52013",
                self.org, self.user
            )),
            None => lines.push(format!(
                "{ts} [{txn}] 'sync' from {}/{} at 10.0.0.1:52013",
                self.org, self.user
            )),
        }
        lines.push(format!("{ts} [{txn}] Loaded {} records", self.loaded));
        lines.push(format!(
            "{ts} [{txn}] Stored 0 tasks, merged {} tasks",
            self.merged
        ));
        if self.new_key {
            lines.push(format!("{ts} [{txn}] New sync key 'f0e1d2c3'"));
        } else {
            lines.push(format!("{ts} [{txn}] Sync key 'f0e1d2c3' still valid"));
        }
        lines.push(format!("{ts} [{txn}] Serviced in 0.004213s"));
        lines
    }
}

/// Server startup banner at `timestamp`
pub fn bounce_lines(timestamp: NaiveDateTime) -> Vec<String> {
    let ts = timestamp.format("%Y-%m-%d %H:%M:%S");
    vec![
        format!("{ts} ==== taskd 1.2.0 ===="),
        format!("{ts} Server starting"),
        format!("{ts} Server ready"),
    ]
}

/// Midnight on the given day of October 2015, plus `hours`
pub fn october(day: u32, hours: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 10, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + TimeDelta::hours(hours)
}

/// Write `lines` to `dir/name`, one per line
pub fn write_log(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}

/// Add a user to a data root, optionally with a data file of `bytes` bytes
pub fn add_data_user(root: &Path, org: &str, user: &str, bytes: Option<usize>) {
    let user_dir = root.join("orgs").join(org).join("users").join(user);
    fs::create_dir_all(&user_dir).unwrap();
    if let Some(bytes) = bytes {
        fs::write(user_dir.join("tx.data"), vec![b'x'; bytes]).unwrap();
    }
}

/// A week of traffic from three users across two log files
///
/// Returns the temp dir and the log paths in chronological order.
pub fn week_of_logs() -> (TempDir, Vec<PathBuf>) {
    let temp_dir = TempDir::new().unwrap();
    let mut older = bounce_lines(october(1, 0));
    let mut newer = Vec::new();
    let mut txn = 1;

    for day in 1..=7u32 {
        let lines = if day <= 3 { &mut older } else { &mut newer };
        if day == 4 {
            lines.extend(bounce_lines(october(day, 0)));
        }
        for (hour, (org, user)) in [("GBF", "Paul"), ("GBF", "Anna"), ("ACME", "Wile")]
            .into_iter()
            .enumerate()
        {
            let builder = SyncLineBuilder::new()
                .at(october(day, 9 + hour as i64))
                .with_txn(txn)
                .with_user(org, user)
                .with_client(TEST_CLIENTS[hour % TEST_CLIENTS.len()])
                .with_counts(10, 1);
            let builder = if hour == 0 { builder.with_new_key() } else { builder };
            lines.extend(builder.build());
            txn += 1;
        }
    }
    newer.push(format!(
        "{} [{txn}] ERROR 500 Internal error",
        october(8, 0).format("%Y-%m-%d %H:%M:%S")
    ));

    let older_path = write_log(temp_dir.path(), "taskd.log.1", &older);
    let newer_path = write_log(temp_dir.path(), "taskd.log", &newer);
    (temp_dir, vec![older_path, newer_path])
}
