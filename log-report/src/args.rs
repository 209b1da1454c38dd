use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};
use derive_getters::Getters;

use crate::{
    analytics::{
        DEFAULT_AUTH_FILTER, DEFAULT_PATH_FILTER, DEFAULT_STATUS, DEFAULT_URL, DETAIL_LIMIT,
        ERROR_THRESHOLD, Policy, TOP_MESSAGES,
    },
    ingest::Source,
    invariants::Needle,
};

#[derive(Parser, Debug, Getters)]
#[command(version, about = "Summarise a CSV log export", long_about = None)]
pub struct CliArgs {
    /// CSV export to download
    #[arg(long, default_value = DEFAULT_URL, conflicts_with = "file")]
    url: String,

    /// Read the export from disk instead of downloading it
    #[arg(long)]
    file: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_PATH_FILTER)]
    path_filter: Needle,

    #[arg(long, default_value = DEFAULT_AUTH_FILTER)]
    auth_filter: Needle,

    /// Status assumed for rows with no status code
    #[arg(long, default_value_t = DEFAULT_STATUS, allow_negative_numbers = true)]
    default_status: i64,

    #[arg(long, default_value_t = ERROR_THRESHOLD, allow_negative_numbers = true)]
    error_threshold: i64,

    /// How many rows each detail listing shows
    #[arg(long, default_value_t = DETAIL_LIMIT)]
    detail_limit: usize,

    #[arg(long, default_value_t = TOP_MESSAGES)]
    top_messages: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Give up on the download after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl CliArgs {
    pub fn source(&self) -> Source {
        match &self.file {
            Some(path) => Source::File(path.clone()),
            None => Source::Url(self.url.clone()),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn policy(&self) -> Policy {
        Policy {
            path_filter: self.path_filter.clone(),
            auth_filter: self.auth_filter.clone(),
            default_status: self.default_status,
            error_threshold: self.error_threshold,
            detail_limit: self.detail_limit,
            top_messages: self.top_messages,
        }
    }
}
