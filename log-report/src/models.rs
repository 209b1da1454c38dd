use serde::Deserialize;
use std::{collections::HashMap, num::IntErrorKind};

use crate::invariants::StatusCode;

pub const TIME_UTC: &str = "TimeUTC";
pub const REQUEST_PATH: &str = "requestPath";
pub const STATUS: &str = "responseStatusCode";
pub const TYPE: &str = "type";
pub const MESSAGE: &str = "message";
pub const LEVEL: &str = "level";

/// One CSV row keyed by header name. Columns nobody reads are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LogRecord(HashMap<String, String>);

impl LogRecord {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Field value, or `""` when the column is absent.
    pub fn text(&self, name: &str) -> &str {
        self.field(name).unwrap_or_default()
    }

    pub fn status(&self) -> StatusCode {
        self.text(STATUS).into()
    }

    /// Numeric status. Absent or blank falls back to `default`; garbage is `None`.
    /// Integers too wide for `i64` saturate instead of being rejected.
    pub fn status_number(&self, default: i64) -> Option<i64> {
        match self.field(STATUS).map(str::trim) {
            None | Some("") => Some(default),
            Some(raw) => match raw.parse::<i64>() {
                Ok(code) => Some(code),
                Err(e) => match e.kind() {
                    IntErrorKind::PosOverflow => Some(i64::MAX),
                    IntErrorKind::NegOverflow => Some(i64::MIN),
                    _ => None,
                },
            },
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LogRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
