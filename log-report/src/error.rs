use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to fetch log export")]
    Fetch(#[from] reqwest::Error),

    #[error("log export request to {url} returned {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV")]
    Parse(#[from] csv::Error),

    #[error("failed to encode report as JSON")]
    Render(#[from] serde_json::Error),

    #[error("failed to write report")]
    Output(#[source] std::io::Error),
}
