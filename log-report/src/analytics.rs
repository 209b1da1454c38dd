use indexmap::IndexMap;
use regex::Regex;
use std::{collections::HashSet, hash::Hash, sync::LazyLock};
use tracing::warn;

use crate::{
    invariants::{Needle, StatusCode},
    models::{LEVEL, LogRecord, MESSAGE, REQUEST_PATH, TIME_UTC, TYPE},
    report::{Detail, MessageCount, Report, StatusCount},
};

static ERROR_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)error|failed").expect("valid const regex"));

pub const DEFAULT_URL: &str = "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/logs_result-fctMKMUxJU9OVshcvoe4Fnlpp2S90Z.csv";
pub const DEFAULT_PATH_FILTER: &str = "/welcome";
pub const DEFAULT_AUTH_FILTER: &str = "Auth error";
pub const DEFAULT_STATUS: i64 = 200;
pub const ERROR_THRESHOLD: i64 = 400;
pub const DETAIL_LIMIT: usize = 10;
pub const TOP_MESSAGES: usize = 10;

/// Knobs for the report passes.
#[derive(Debug, Clone)]
pub struct Policy {
    pub path_filter: Needle,
    pub auth_filter: Needle,
    /// Substituted for a missing or blank status before the threshold check.
    pub default_status: i64,
    pub error_threshold: i64,
    pub detail_limit: usize,
    pub top_messages: usize,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            path_filter: DEFAULT_PATH_FILTER.parse().expect("non-empty const"),
            auth_filter: DEFAULT_AUTH_FILTER.parse().expect("non-empty const"),
            default_status: DEFAULT_STATUS,
            error_threshold: ERROR_THRESHOLD,
            detail_limit: DETAIL_LIMIT,
            top_messages: TOP_MESSAGES,
        }
    }
}

/// Frequency counter that remembers first-seen order, so equal counts rank
/// in the order they were first met.
#[derive(Debug)]
pub struct Tally<K>(IndexMap<K, usize>);

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self(IndexMap::new())
    }
}

impl<K: Eq + Hash> Tally<K> {
    pub fn record(&mut self, key: K) {
        *self.0.entry(key).or_default() += 1;
    }

    /// Highest counts first. `None` keeps every key.
    pub fn most_common(self, n: Option<usize>) -> Vec<(K, usize)> {
        let mut counts: Vec<_> = self.0.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(n) = n {
            counts.truncate(n);
        }
        counts
    }
}

impl<K: Eq + Hash> FromIterator<K> for Tally<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut tally = Self::default();
        for key in iter {
            tally.record(key);
        }
        tally
    }
}

/// Read-only passes over one parsed export.
#[derive(Debug)]
pub struct Analytics<'a> {
    records: &'a [LogRecord],
    policy: &'a Policy,
}

impl<'a> Analytics<'a> {
    pub fn new(records: &'a [LogRecord], policy: &'a Policy) -> Self {
        Self { records, policy }
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn path_matches(&self) -> Vec<&'a LogRecord> {
        self.records
            .iter()
            .filter(|r| self.policy.path_filter.found_in(r.text(REQUEST_PATH)))
            .collect()
    }

    /// Rows with `level == "error"` or a status at or above the threshold.
    pub fn error_rows(&self) -> Vec<&'a LogRecord> {
        let mut unparsable = HashSet::new();
        self.records
            .iter()
            .filter(|r| {
                if r.text(LEVEL) == "error" {
                    return true;
                }
                match r.status_number(self.policy.default_status) {
                    Some(code) => code >= self.policy.error_threshold,
                    None => {
                        let raw = r.status();
                        if unparsable.insert(raw.clone()) {
                            warn!(status = %raw, "non-numeric status code, not counted as an error");
                        }
                        false
                    }
                }
            })
            .collect()
    }

    pub fn status_frequency(&self) -> Vec<(StatusCode, usize)> {
        self.records
            .iter()
            .map(LogRecord::status)
            .collect::<Tally<_>>()
            .most_common(None)
    }

    pub fn auth_error_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| self.policy.auth_filter.found_in(r.text(MESSAGE)))
            .count()
    }

    /// The most frequent messages, then only those that read like failures.
    pub fn top_error_messages(&self) -> Vec<(String, usize)> {
        self.records
            .iter()
            .map(|r| r.text(MESSAGE))
            .filter(|m| !m.is_empty())
            .collect::<Tally<_>>()
            .most_common(Some(self.policy.top_messages))
            .into_iter()
            .filter(|(m, _)| ERROR_WORDS.is_match(m))
            .map(|(m, count)| (m.to_string(), count))
            .collect()
    }

    pub fn report(&self) -> Report {
        let limit = self.policy.detail_limit;
        let path_matches = self.path_matches();
        let errors = self.error_rows();
        let recent = &errors[errors.len().saturating_sub(limit)..];

        Report {
            total: self.total(),
            path_filter: self.policy.path_filter.to_string(),
            path_matches: path_matches.len(),
            path_details: path_matches.iter().take(limit).map(|r| detail(r)).collect(),
            errors: errors.len(),
            recent_errors: recent.iter().map(|r| detail(r)).collect(),
            status_distribution: self
                .status_frequency()
                .into_iter()
                .map(|(status, count)| StatusCount { status, count })
                .collect(),
            auth_filter: self.policy.auth_filter.to_string(),
            auth_errors: self.auth_error_count(),
            top_error_messages: self
                .top_error_messages()
                .into_iter()
                .map(|(message, count)| MessageCount { message, count })
                .collect(),
        }
    }
}

fn detail(record: &LogRecord) -> Detail {
    Detail {
        time: record.text(TIME_UTC).to_string(),
        path: record.text(REQUEST_PATH).to_string(),
        status: record.status(),
        kind: record.text(TYPE).to_string(),
        message: record.text(MESSAGE).to_string(),
    }
}
