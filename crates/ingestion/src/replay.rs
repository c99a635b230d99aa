//! ReplayFeed - replays items recorded in a text file
//!
//! One item per line: `<query_id> <value>`. The value is everything after
//! the first run of whitespace following the id. Blank lines and lines
//! starting with `#` are ignored.

use std::path::{Path, PathBuf};
use std::time::Duration;

use contracts::{ContractError, DataItem, QueryId};
use dispatcher::QueueProducer;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{IngestionError, Result};
use crate::feed::{pace, push_or_cancel, FeedReport};

/// Parse one feed line
///
/// Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line_no: usize, line: &str) -> std::result::Result<Option<DataItem>, ContractError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (id, value) = trimmed
        .split_once(char::is_whitespace)
        .ok_or_else(|| ContractError::feed_parse(line_no, "missing value after query id"))?;

    let query_id: QueryId = id
        .parse()
        .map_err(|e| ContractError::feed_parse(line_no, format!("invalid query id '{id}': {e}")))?;

    Ok(Some(DataItem::new(query_id, value.trim_start())))
}

/// Replay data source
#[derive(Debug, Clone)]
pub struct ReplayFeed {
    path: PathBuf,
    interval: Duration,
}

impl ReplayFeed {
    pub fn new(path: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            path: path.into(),
            interval,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) async fn run(
        &self,
        producer: &QueueProducer,
        cancel: &CancellationToken,
    ) -> Result<FeedReport> {
        let read_failed = |source| IngestionError::ReadFailed {
            path: self.path.clone(),
            source,
        };

        let file = File::open(&self.path).await.map_err(read_failed)?;
        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut report = FeedReport::default();
        let mut line_no = 0usize;

        info!(path = %self.path.display(), "replay feed started");

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await.map_err(read_failed)? == 0 {
                break;
            }
            line_no += 1;

            let parsed = std::str::from_utf8(&buf)
                .map_err(|e| ContractError::feed_parse(line_no, format!("invalid UTF-8: {e}")))
                .and_then(|line| parse_line(line_no, line));

            let item = match parsed {
                Ok(Some(item)) => item,
                Ok(None) => continue,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Skipping malformed feed line");
                    report.skipped += 1;
                    continue;
                }
            };

            if !push_or_cancel(producer, cancel, item).await? {
                report.cancelled = true;
                break;
            }
            report.produced += 1;
            observability::record_item_produced("replay");

            if !pace(self.interval, cancel).await {
                report.cancelled = true;
                break;
            }
        }

        debug!(
            produced = report.produced,
            skipped = report.skipped,
            cancelled = report.cancelled,
            "replay feed stopped"
        );
        Ok(report)
    }
}
