use std::str::FromStr;

use derive_more::{AsRef, Debug, Display};
use serde::Serialize;

/// Raw `responseStatusCode` value, kept exactly as it appeared in the CSV.
#[derive(Debug, Display, AsRef, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StatusCode(String);

impl From<&str> for StatusCode {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

/// Literal, case-sensitive substring used by the record filters.
#[derive(Debug, Display, AsRef, Clone, PartialEq, Eq)]
pub struct Needle(String);

impl Needle {
    pub fn found_in(&self, haystack: &str) -> bool {
        haystack.contains(self.0.as_str())
    }
}

impl FromStr for Needle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("filter text must not be empty".into());
        }
        Ok(Self(s.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asserting::prelude::*;

    #[test]
    fn empty_needle_is_rejected() {
        assert_that!("".parse::<Needle>()).is_err();
    }

    #[test]
    fn needle_matching_is_case_sensitive() {
        let needle: Needle = "/welcome".parse().unwrap();
        assert!(needle.found_in("/en/welcome?x=1"));
        assert!(!needle.found_in("/WELCOME"));
        assert!(!needle.found_in(""));
    }

    #[test]
    fn status_code_displays_raw_value() {
        let code = StatusCode::from("404");
        assert_eq!(code.to_string(), "404");
        let raw: &String = code.as_ref();
        assert_eq!(raw, "404");
    }
}
