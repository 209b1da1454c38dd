use std::{path::Path, time::Duration};

use reqwest::Client;
use tracing::{debug, info};

use crate::{error::ReportError, models::LogRecord};

/// Where the CSV export comes from.
#[derive(Debug, Clone)]
pub enum Source {
    Url(String),
    File(std::path::PathBuf),
}

pub async fn load(source: &Source, timeout: Option<Duration>) -> Result<String, ReportError> {
    match source {
        Source::Url(url) => fetch_csv(url, timeout).await,
        Source::File(path) => read_csv(path).await,
    }
}

/// Single GET, no retries. Any non-2xx status is an error.
pub async fn fetch_csv(url: &str, timeout: Option<Duration>) -> Result<String, ReportError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build()?;

    info!(url, "fetching log export");
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ReportError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }
    let body = response.text().await?;
    debug!(%status, bytes = body.len(), "log export downloaded");
    Ok(body)
}

async fn read_csv(path: &Path) -> Result<String, ReportError> {
    info!(path = %path.display(), "reading log export");
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Parse a CSV document with a header row. Ragged rows are a hard error.
pub fn parse_csv(body: &str) -> Result<Vec<LogRecord>, ReportError> {
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let records = reader
        .deserialize::<LogRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    info!(records = records.len(), "parsed log export");
    Ok(records)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::{MESSAGE, REQUEST_PATH, STATUS};
    use asserting::prelude::*;

    #[test]
    fn parse_csv_keys_rows_by_header() {
        let body = "TimeUTC,requestPath,responseStatusCode,message,extra\n\
                    2025-01-01 00:00:00,/welcome,200,hello,x\n\
                    2025-01-01 00:00:01,/api,500,\"boom, again\",y\n";
        let records = parse_csv(body).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text(REQUEST_PATH), "/welcome");
        assert_eq!(records[1].text(STATUS), "500");
        assert_eq!(records[1].text(MESSAGE), "boom, again");
        assert_eq!(records[1].text("extra"), "y");
    }

    #[test]
    fn parse_csv_header_only_yields_nothing() {
        assert_that!(parse_csv("TimeUTC,message\n").unwrap().len()).is_equal_to(0);
        assert_that!(parse_csv("").unwrap().len()).is_equal_to(0);
    }

    #[test]
    fn parse_csv_rejects_ragged_rows() {
        let body = "TimeUTC,message\n2025-01-01,ok\n2025-01-02,too,many\n";
        assert!(matches!(parse_csv(body), Err(ReportError::Parse(_))));
    }

    #[tokio::test]
    async fn non_utf8_file_is_an_io_error() {
        let path = std::env::temp_dir().join(format!("log-report-bad-{}.csv", std::process::id()));
        tokio::fs::write(&path, b"TimeUTC,message\n2025-01-01,\xff\xfe\n")
            .await
            .unwrap();
        let loaded = load(&Source::File(path.clone()), None).await;
        let _ = tokio::fs::remove_file(&path).await;

        assert!(matches!(loaded, Err(ReportError::Io { .. })));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let source = Source::File("/definitely/not/here.csv".into());
        assert!(matches!(
            load(&source, None).await,
            Err(ReportError::Io { .. })
        ));
    }
}
