//! Line classifier for sync server transaction logs
//!
//! The classifier is a fixed table of rules. Each rule is tested against
//! every line independently and yields at most one [`LogEvent`], so a
//! single line may produce several events.
//!
//! Two rule pairs are ordered alternations rather than independent checks,
//! because the richer pattern's trigger text is a superset of the simpler
//! one's:
//!
//! - `'sync' from '<org>/<user>' using '<client>' at` is tried first, and the
//!   client-less `'sync' from <org>/<user> at` only when it does not match.
//! - `ERROR <code>` is tried first, and bare `ERROR` only when it does not
//!   match.
//!
//! Numeric captures accept ASCII digits only. A count that does not fit in a
//! `u64` fails the match instead of raising an error.
//!
//! # Examples
//!
//! ```
//! use syncstat_core::classifier::classifier;
//! use syncstat_core::event::LogEvent;
//!
//! let events = classifier().classify("2015-10-11 02:46:53 [134] Loaded 10 records");
//! assert_eq!(events.len(), 2);
//! assert_eq!(events[1], LogEvent::Loaded(10));
//! ```

use crate::event::LogEvent;
use crate::types::{ClientName, LogTimestamp, OrgName};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use smallvec::SmallVec;

/// Events extracted from one line. Most lines carry two or fewer.
pub type LineEvents = SmallVec<[LogEvent; 4]>;

static CLASSIFIER: Lazy<LineClassifier> = Lazy::new(LineClassifier::new);

/// Shared classifier, compiled on first use and read-only afterwards
pub fn classifier() -> &'static LineClassifier {
    &CLASSIFIER
}

/// What a pattern produces when it matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Timestamp,
    Bounce,
    SyncWithClient,
    SyncNoClient,
    SyncTrivial,
    SyncNontrivial,
    Loaded,
    Merged,
    ErrorCoded,
    ErrorUncoded,
    Warning,
}

/// A compiled pattern bound to the event kind it produces
#[derive(Debug)]
struct Pattern {
    kind: PatternKind,
    regex: Regex,
}

impl Pattern {
    fn new(kind: PatternKind, source: &str) -> Self {
        let regex = Regex::new(source)
            .unwrap_or_else(|e| panic!("invalid built-in pattern {source:?}: {e}"));
        Self { kind, regex }
    }

    fn extract(&self, line: &str) -> Option<LogEvent> {
        match self.kind {
            PatternKind::Timestamp => {
                let caps = self.regex.captures(line)?;
                LogTimestamp::parse(&caps[1]).map(LogEvent::Timestamp)
            }
            PatternKind::Bounce => self.regex.is_match(line).then_some(LogEvent::Bounce),
            PatternKind::SyncWithClient => {
                let caps = self.regex.captures(line)?;
                Some(LogEvent::SyncWithClient {
                    org: OrgName::new(&caps[1]),
                    user: caps[2].to_string(),
                    client: ClientName::new(&caps[3]),
                })
            }
            PatternKind::SyncNoClient => {
                let caps = self.regex.captures(line)?;
                Some(LogEvent::SyncNoClient {
                    org: OrgName::new(&caps[1]),
                    user: caps[2].to_string(),
                })
            }
            PatternKind::SyncTrivial => self.regex.is_match(line).then_some(LogEvent::SyncTrivial),
            PatternKind::SyncNontrivial => {
                self.regex.is_match(line).then_some(LogEvent::SyncNontrivial)
            }
            PatternKind::Loaded => parse_count(self.regex.captures(line)?).map(LogEvent::Loaded),
            PatternKind::Merged => parse_count(self.regex.captures(line)?).map(LogEvent::Merged),
            PatternKind::ErrorCoded => {
                let caps = self.regex.captures(line)?;
                Some(LogEvent::ErrorCoded(caps[1].to_string()))
            }
            PatternKind::ErrorUncoded => self.regex.is_match(line).then_some(LogEvent::ErrorUncoded),
            PatternKind::Warning => self.regex.is_match(line).then_some(LogEvent::Warning),
        }
    }
}

fn parse_count(caps: Captures<'_>) -> Option<u64> {
    caps[1].parse().ok()
}

/// One entry in the rule table
#[derive(Debug)]
enum Rule {
    Single(Pattern),
    /// `fallback` is only consulted when `primary` does not match
    Fallthrough { primary: Pattern, fallback: Pattern },
}

impl Rule {
    fn apply(&self, line: &str) -> Option<LogEvent> {
        match self {
            Rule::Single(pattern) => pattern.extract(line),
            Rule::Fallthrough { primary, fallback } => {
                primary.extract(line).or_else(|| fallback.extract(line))
            }
        }
    }

    fn kinds(&self) -> SmallVec<[PatternKind; 2]> {
        match self {
            Rule::Single(pattern) => smallvec::smallvec![pattern.kind],
            Rule::Fallthrough { primary, fallback } => {
                smallvec::smallvec![primary.kind, fallback.kind]
            }
        }
    }
}

/// Stateless classifier over the fixed rule table
#[derive(Debug)]
pub struct LineClassifier {
    rules: Vec<Rule>,
}

impl LineClassifier {
    /// Compile the rule table
    ///
    /// Prefer [`classifier()`], which compiles the table once per process.
    pub fn new() -> Self {
        use PatternKind::*;

        let rules = vec![
            Rule::Single(Pattern::new(
                Timestamp,
                r"^([0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2})",
            )),
            Rule::Single(Pattern::new(Bounce, r"==== taskd")),
            Rule::Fallthrough {
                primary: Pattern::new(
                    SyncWithClient,
                    r"'sync' from '([^/]+)/(.+)' using '([^']+)' at",
                ),
                fallback: Pattern::new(SyncNoClient, r"'sync' from ([^/]+)/(.+) at"),
            },
            Rule::Single(Pattern::new(SyncTrivial, r"still valid")),
            Rule::Single(Pattern::new(SyncNontrivial, r"New sync key")),
            Rule::Single(Pattern::new(Loaded, r"Loaded ([0-9]+)")),
            Rule::Single(Pattern::new(Merged, r"merged ([0-9]+)")),
            Rule::Fallthrough {
                primary: Pattern::new(ErrorCoded, r"ERROR ([0-9]+)"),
                fallback: Pattern::new(ErrorUncoded, r"ERROR"),
            },
            Rule::Single(Pattern::new(Warning, r"WARNING")),
        ];

        Self { rules }
    }

    /// Classify one line, returning every event it carries in rule order
    pub fn classify(&self, line: &str) -> LineEvents {
        self.rules.iter().filter_map(|rule| rule.apply(line)).collect()
    }

    /// Every pattern kind in the table, in evaluation order
    pub fn pattern_kinds(&self) -> Vec<PatternKind> {
        self.rules.iter().flat_map(Rule::kinds).collect()
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(line: &str) -> LineEvents {
        classifier().classify(line)
    }

    #[test]
    fn test_table_covers_every_kind() {
        let kinds = classifier().pattern_kinds();
        assert_eq!(kinds.len(), 11);
        assert_eq!(kinds.first(), Some(&PatternKind::Timestamp));
        assert_eq!(kinds.last(), Some(&PatternKind::Warning));
    }

    #[test]
    fn test_timestamp_prefix() {
        let events = classify("2015-10-11 01:46:53 [133] Server ready");
        assert_eq!(
            events.as_slice(),
            &[LogEvent::Timestamp(
                LogTimestamp::parse("2015-10-11 01:46:53").unwrap()
            )]
        );

        // Timestamp must be at the start of the line
        assert!(classify("  2015-10-11 01:46:53 Server ready").is_empty());
        // Out-of-range fields are not a timestamp
        assert!(classify("2015-13-11 01:46:53 Server ready").is_empty());
    }

    #[test]
    fn test_bounce_banner_only() {
        let events = classify("==== taskd 1.2.0 ====");
        assert_eq!(events.as_slice(), &[LogEvent::Bounce]);
    }

    #[test]
    fn test_sync_with_client() {
        let events =
            classify("2015-10-11 01:46:53 [133] 'sync' from 'GBF/Paul' using 'task 2.5.0' at 1.2.3.4:1");
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            LogEvent::SyncWithClient {
                org: OrgName::new("GBF"),
                user: "Paul".to_string(),
                client: ClientName::new("task 2.5.0"),
            }
        );
    }

    #[test]
    fn test_sync_without_client_is_fallthrough_only() {
        let events = classify("[12] 'sync' from GBF/Paul at 1.2.3.4:1");
        assert_eq!(
            events.as_slice(),
            &[LogEvent::SyncNoClient {
                org: OrgName::new("GBF"),
                user: "Paul".to_string(),
            }]
        );

        // The client-less pattern also matches the quoted form; only one sync
        // event may come out of it.
        let events = classify("'sync' from 'GBF/Paul' using 'task 2.4.4' at 10.0.0.1:55");
        let syncs = events
            .iter()
            .filter(|e| matches!(e, LogEvent::SyncWithClient { .. } | LogEvent::SyncNoClient { .. }))
            .count();
        assert_eq!(syncs, 1);
    }

    #[test]
    fn test_sync_key_markers() {
        assert_eq!(
            classify("[1] Sync key 'abc' still valid").as_slice(),
            &[LogEvent::SyncTrivial]
        );
        assert_eq!(
            classify("[1] New sync key 'abc'").as_slice(),
            &[LogEvent::SyncNontrivial]
        );
    }

    #[test]
    fn test_counts() {
        assert_eq!(classify("[1] Loaded 10 records").as_slice(), &[LogEvent::Loaded(10)]);
        assert_eq!(
            classify("[1] Stored 4 tasks, merged 2 tasks").as_slice(),
            &[LogEvent::Merged(2)]
        );
    }

    #[test]
    fn test_malformed_counts_do_not_match() {
        assert!(classify("[1] Loaded ten records").is_empty());
        assert!(classify("[1] merged -3 tasks").is_empty());
        // Too large for u64
        assert!(classify("[1] Loaded 99999999999999999999999 records").is_empty());
    }

    #[test]
    fn test_error_fallthrough() {
        assert_eq!(
            classify("[7] ERROR 500 Internal error").as_slice(),
            &[LogEvent::ErrorCoded("500".to_string())]
        );
        assert_eq!(
            classify("[7] ERROR: Unrecognized message type 'foo'").as_slice(),
            &[LogEvent::ErrorUncoded]
        );
        assert_eq!(classify("[7] ERROR").as_slice(), &[LogEvent::ErrorUncoded]);
    }

    #[test]
    fn test_independent_patterns_combine() {
        let events = classify("2015-10-11 01:46:53 WARNING ERROR 430 merged 3 still valid");
        let kinds: Vec<_> = events.iter().map(LogEvent::kind).collect();
        assert_eq!(
            kinds,
            vec!["timestamp", "sync-trivial", "merged", "error-coded", "warning"]
        );
    }

    #[test]
    fn test_unrecognized_line() {
        assert!(classify("[3] Serviced in 0.001234s").is_empty());
        assert!(classify("").is_empty());
    }
}
