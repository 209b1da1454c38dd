use std::io::{self, Write};

use serde::Serialize;

use crate::{error::ReportError, invariants::StatusCode};

const RULE_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detail {
    pub time: String,
    pub path: String,
    pub status: StatusCode,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: StatusCode,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageCount {
    pub message: String,
    pub count: usize,
}

/// Everything the report prints, computed up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub total: usize,
    pub path_filter: String,
    pub path_matches: usize,
    pub path_details: Vec<Detail>,
    pub errors: usize,
    pub recent_errors: Vec<Detail>,
    pub status_distribution: Vec<StatusCount>,
    pub auth_filter: String,
    pub auth_errors: usize,
    pub top_error_messages: Vec<MessageCount>,
}

impl Report {
    pub fn write_text<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "[v0] Total log entries: {}", self.total)?;
        writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;

        writeln!(out, "\n[v0] {} requests: {}", self.path_filter, self.path_matches)?;
        if !self.path_details.is_empty() {
            writeln!(out, "\n[v0] {} request details:", self.path_filter)?;
            for d in &self.path_details {
                writeln!(out, "  - Time: {}", d.time)?;
                writeln!(out, "    Status: {}", d.status)?;
                writeln!(out, "    Type: {}", d.kind)?;
                writeln!(out, "    Message: {}", d.message)?;
                writeln!(out)?;
            }
        }

        writeln!(out, "\n[v0] Error logs: {}", self.errors)?;
        if !self.recent_errors.is_empty() {
            writeln!(out, "\n[v0] Recent errors:")?;
            for d in &self.recent_errors {
                writeln!(out, "  - Time: {}", d.time)?;
                writeln!(out, "    Path: {}", d.path)?;
                writeln!(out, "    Status: {}", d.status)?;
                writeln!(out, "    Message: {}", d.message)?;
                writeln!(out)?;
            }
        }

        writeln!(out, "\n[v0] Status code distribution:")?;
        for StatusCount { status, count } in &self.status_distribution {
            writeln!(out, "  {status}: {count}")?;
        }

        writeln!(out, "\n[v0] Middleware auth errors: {}", self.auth_errors)?;

        writeln!(out, "\n[v0] Top error messages:")?;
        for MessageCount { message, count } in &self.top_error_messages {
            writeln!(out, "  [{count}x] {message}")?;
        }
        out.flush()
    }

    pub fn write_json<W: Write>(&self, mut out: W) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(&mut out, self)?;
        writeln!(out).map_err(ReportError::Output)
    }
}
