//! Output formatting for usage profiles
//!
//! This module provides formatters for displaying a profile in different
//! formats:
//! - Text with labeled sections for the terminal
//! - JSON for machine-readable output and integration with other tools
//!
//! All numbers are computed by [`ProfileReport::build`]; formatters only
//! decide layout.
//!
//! # Examples
//!
//! ```
//! use syncstat_core::{AggregateState, ProfileReport};
//! use syncstat_terminal::output::get_formatter;
//!
//! let mut state = AggregateState::new();
//! state.ingest_line("2015-10-11 00:00:00 ==== taskd 1.2.0 ====");
//! state.ingest_line("2015-10-12 00:00:00 [1] 'sync' from GBF/Paul at 1.2.3.4:1");
//! let report = ProfileReport::build(state, false).unwrap();
//!
//! let text = get_formatter(false).format_profile(&report).unwrap();
//! assert!(text.contains("Bounces:"));
//!
//! let json = get_formatter(true).format_profile(&report).unwrap();
//! assert!(json.contains("\"bounces\": 1"));
//! ```

use crate::duration::format_optional_range;
use colored::Colorize;
use prettytable::format::FormatBuilder;
use prettytable::{Table, row};
use serde_json::json;
use std::fmt::Write;
use syncstat_core::error::Result;
use syncstat_core::report::{ListingEntry, ProfileReport};

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render a complete profile report
    fn format_profile(&self, report: &ProfileReport) -> Result<String>;
}

/// Width of the label column in the text report
const LABEL_WIDTH: usize = 26;

/// Plain-text formatter with bold section headers
pub struct TextFormatter;

impl TextFormatter {
    /// Format a number with thousands separators
    fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, ch) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }

        result.chars().rev().collect()
    }

    fn header(out: &mut String, title: &str) {
        let _ = writeln!(out, "{}", title.bold());
    }

    fn field(out: &mut String, label: &str, value: impl std::fmt::Display) {
        let label = format!("  {label}:");
        let _ = writeln!(out, "{label:<LABEL_WIDTH$} {value}");
    }

    fn error_codes(report: &ProfileReport) -> String {
        let mut table = Table::new();
        table.set_format(FormatBuilder::new().padding(0, 2).indent(4).build());
        for (code, count) in &report.state.errors_by_code {
            table.add_row(row![format!("Error {code:>3}"), r -> count]);
        }
        table.to_string()
    }

    fn listing(out: &mut String, title: &str, entries: &[ListingEntry]) {
        Self::header(out, title);
        for entry in entries {
            if entry.active {
                let _ = writeln!(out, "  {}", entry.name);
            } else {
                let _ = writeln!(out, "  {} (inactive)", entry.name);
            }
        }
        out.push('\n');
    }
}

impl OutputFormatter for TextFormatter {
    fn format_profile(&self, report: &ProfileReport) -> Result<String> {
        let state = &report.state;
        let metrics = &report.metrics;
        let mut out = String::from("\n");

        Self::header(&mut out, "Server");
        Self::field(
            &mut out,
            "Time range",
            format_optional_range(metrics.elapsed_seconds),
        );
        Self::field(&mut out, "Bounces", state.bounce_count);
        if let Some(uptime) = metrics.average_uptime_days {
            Self::field(&mut out, "Average uptime", format!("{uptime:.2} days"));
        }
        Self::field(&mut out, "Errors", state.error_count);
        Self::field(&mut out, "Warnings", state.warning_count);
        if report.data_root_scanned {
            Self::field(
                &mut out,
                "Data stored",
                format!("{} bytes", Self::format_number(state.stored_bytes)),
            );
        }
        if !state.errors_by_code.is_empty() {
            out.push_str("  Error Codes\n");
            out.push_str(&Self::error_codes(report));
        }

        Self::header(&mut out, "Configuration");
        if report.data_root_scanned {
            Self::field(&mut out, "Organizations", state.total_orgs.len());
            Self::field(&mut out, "Users", state.total_users.len());
        }
        Self::field(&mut out, "Active Organizations", state.active_orgs.len());
        Self::field(&mut out, "Active Users", state.active_users.len());

        Self::header(&mut out, "Traffic");
        if let Some(per_bounce) = metrics.syncs_per_bounce {
            Self::field(&mut out, "Syncs per bounce", format!("{per_bounce:.2}"));
        }
        Self::field(
            &mut out,
            "Average syncs",
            format!("{:.2} per day", metrics.average_syncs_per_day),
        );
        Self::field(&mut out, "Merged", format!("{} tasks", state.merged_total));
        Self::field(&mut out, "Loaded", format!("{} tasks", state.loaded_total));
        Self::field(&mut out, "Clients", state.clients.len());

        Self::header(&mut out, "User Profile");
        if let Some(per_user) = &metrics.per_user {
            Self::field(
                &mut out,
                "Syncs",
                format!("{:.2} per user, per day", per_user.syncs_per_user_per_day),
            );
            Self::field(
                &mut out,
                "Non-trivial syncs",
                format!(
                    "{:.2} per user, per day",
                    per_user.nontrivial_syncs_per_user_per_day
                ),
            );
            Self::field(
                &mut out,
                "Data",
                format!(
                    "{} bytes per user",
                    Self::format_number(per_user.bytes_per_user)
                ),
            );
        }
        if let Some(ratio) = metrics.nontrivial_sync_ratio {
            Self::field(&mut out, "Non-trivial sync ratio", format!("{ratio:.2}"));
        }
        out.push('\n');

        Self::listing(&mut out, "Orgs", &report.orgs);
        Self::listing(&mut out, "Users", &report.users);
        if !report.clients.is_empty() {
            Self::header(&mut out, "Clients");
            for client in &report.clients {
                let _ = writeln!(out, "  {client}");
            }
            out.push('\n');
        }

        Ok(out)
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_profile(&self, report: &ProfileReport) -> Result<String> {
        let state = &report.state;
        let metrics = &report.metrics;

        let output = json!({
            "server": {
                "oldest": state.oldest_timestamp.map(|t| t.to_string()),
                "newest": state.newest_timestamp.map(|t| t.to_string()),
                "elapsed_seconds": metrics.elapsed_seconds,
                "elapsed_days": metrics.elapsed_days,
                "bounces": state.bounce_count,
                "average_uptime_days": metrics.average_uptime_days,
                "errors": state.error_count,
                "error_codes": state.errors_by_code,
                "warnings": state.warning_count,
                "stored_bytes": report.data_root_scanned.then_some(state.stored_bytes),
            },
            "configuration": {
                "organizations": report.data_root_scanned.then_some(state.total_orgs.len()),
                "users": report.data_root_scanned.then_some(state.total_users.len()),
                "active_organizations": state.active_orgs.len(),
                "active_users": state.active_users.len(),
            },
            "traffic": {
                "syncs": state.sync_count,
                "syncs_trivial": state.sync_trivial_count,
                "syncs_nontrivial": state.sync_nontrivial_count,
                "syncs_per_bounce": metrics.syncs_per_bounce,
                "average_syncs_per_day": metrics.average_syncs_per_day,
                "merged": state.merged_total,
                "loaded": state.loaded_total,
                "clients": state.clients.len(),
            },
            "user_profile": {
                "per_user": metrics.per_user,
                "nontrivial_sync_ratio": metrics.nontrivial_sync_ratio,
            },
            "orgs": report.orgs,
            "users": report.users,
            "clients": report.clients,
        });

        Ok(serde_json::to_string_pretty(&output)?)
    }
}

/// Get the formatter for the requested output mode
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TextFormatter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syncstat_core::state::AggregateState;
    use syncstat_core::types::{OrgName, UserKey};

    fn sample_state() -> AggregateState {
        let mut state = AggregateState::new();
        for line in [
            "2015-10-11 00:00:00 ==== taskd 1.2.0 ====",
            "2015-10-11 01:46:53 [133] 'sync' from 'GBF/Paul' using 'task 2.5.0' at 1.2.3.4:1",
            "2015-10-11 01:46:53 [133] New sync key 'abc'",
            "2015-10-11 02:46:53 [134] Loaded 10 records",
            "2015-10-11 02:46:53 [134] Stored 4 tasks, merged 2 tasks",
            "2015-10-12 00:00:00 [135] ERROR 500 Internal error",
            "2015-10-13 00:00:00 [136] WARNING slow request",
        ] {
            state.ingest_line(line);
        }
        state
    }

    fn plain(report: &ProfileReport) -> String {
        colored::control::set_override(false);
        TextFormatter.format_profile(report).unwrap()
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(TextFormatter::format_number(1234567), "1,234,567");
        assert_eq!(TextFormatter::format_number(999), "999");
        assert_eq!(TextFormatter::format_number(0), "0");
    }

    #[test]
    fn test_text_sections() {
        let report = ProfileReport::build(sample_state(), false).unwrap();
        let output = plain(&report);

        for section in ["Server", "Configuration", "Traffic", "User Profile", "Orgs", "Users", "Clients"] {
            assert!(output.contains(section), "missing section {section}");
        }
        assert!(output.contains("  Time range:              2 days, 0:00:00"));
        assert!(output.contains("  Bounces:                 1"));
        assert!(output.contains("  Average uptime:          2.00 days"));
        assert!(output.contains("  Syncs per bounce:        1.00"));
        assert!(output.contains("  Average syncs:           0.50 per day"));
        assert!(output.contains("  Merged:                  2 tasks"));
        assert!(output.contains("  Loaded:                  10 tasks"));
        assert!(output.contains("  Non-trivial sync ratio:  1.00"));
        assert!(output.contains("Error 500"));
        assert!(output.contains("  task 2.5.0"));
        // No data root, so no storage or per-user lines
        assert!(!output.contains("Data stored"));
        assert!(!output.contains("per user"));
        assert!(!output.contains("(inactive)"));
    }

    #[test]
    fn test_text_with_data_root() {
        let mut state = sample_state();
        let gbf = OrgName::new("GBF");
        let zed = OrgName::new("ZED");
        state.add_total_org(zed.clone());
        state.add_total_org(gbf.clone());
        state.add_total_user(UserKey::new(&gbf, "Paul"), Some(3000));
        state.add_total_user(UserKey::new(&zed, "Ann"), Some(1000));

        let report = ProfileReport::build(state, true).unwrap();
        let output = plain(&report);

        assert!(output.contains("  Data stored:             4,000 bytes"));
        assert!(output.contains("  Organizations:           2"));
        assert!(output.contains("  Syncs:                   0.25 per user, per day"));
        assert!(output.contains("  Data:                    2,000 bytes per user"));
        assert!(output.contains("  ZED (inactive)"));
        assert!(output.contains("  ZED/Ann (inactive)"));
        assert!(output.contains("  GBF/Paul\n"));

        let gbf_at = output.find("  GBF\n").unwrap();
        let zed_at = output.find("  ZED (inactive)").unwrap();
        assert!(gbf_at < zed_at);
    }

    #[test]
    fn test_guarded_lines_omitted() {
        let mut state = AggregateState::new();
        state.ingest_line("2015-10-11 00:00:00 start");
        state.ingest_line("2015-10-12 00:00:00 end");
        let report = ProfileReport::build(state, false).unwrap();
        let output = plain(&report);

        assert!(!output.contains("Average uptime"));
        assert!(!output.contains("Syncs per bounce"));
        assert!(!output.contains("Non-trivial sync ratio"));
        assert!(!output.contains("Error Codes"));
        assert!(!output.contains("Clients\n"));
    }

    #[test]
    fn test_json_output() {
        let report = ProfileReport::build(sample_state(), false).unwrap();
        let output = JsonFormatter.format_profile(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["server"]["bounces"], 1);
        assert_eq!(value["server"]["error_codes"]["500"], 1);
        assert_eq!(value["server"]["elapsed_days"], 2.0);
        assert!(value["server"]["stored_bytes"].is_null());
        assert_eq!(value["traffic"]["syncs"], 1);
        assert_eq!(value["traffic"]["loaded"], 10);
        assert_eq!(value["orgs"][0]["name"], "GBF");
        assert_eq!(value["orgs"][0]["active"], true);
        assert_eq!(value["clients"][0], "task 2.5.0");
        assert!(value["user_profile"]["per_user"].is_null());
    }

    #[test]
    fn test_get_formatter() {
        let report = ProfileReport::build(sample_state(), false).unwrap();
        assert!(
            get_formatter(true)
                .format_profile(&report)
                .unwrap()
                .starts_with('{')
        );
        assert!(
            get_formatter(false)
                .format_profile(&report)
                .unwrap()
                .contains("Traffic")
        );
    }
}
