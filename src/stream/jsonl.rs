//! JSONL complaint file reader
//!
//! One complaint object per line. Applies a `RecordQuery` while reading so
//! callers see only records in their span / zip / reporter.

use super::{RecordQuery, RecordStream};
use crate::error::StreamError;
use crate::record::{ComplaintRecord, RawComplaint};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

pub struct JsonlRecordStream {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    query: RecordQuery,
    line_no: usize,
    yielded: u64,
    skipped: u64,
}

impl JsonlRecordStream {
    pub async fn open(path: impl AsRef<Path>, query: RecordQuery) -> Result<Self, StreamError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).await?;

        log::info!("📖 Reading complaints from: {}", path.display());

        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            query,
            line_no: 0,
            yielded: 0,
            skipped: 0,
        })
    }

    /// Records yielded so far
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    /// Records read but rejected by the query
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

#[async_trait]
impl RecordStream for JsonlRecordStream {
    async fn next_with_err(&mut self) -> Result<Option<ComplaintRecord>, StreamError> {
        loop {
            let line = match self.lines.next_line().await? {
                Some(line) => line,
                None => {
                    log::debug!(
                        "📖 End of {}: {} records yielded, {} filtered out",
                        self.path.display(),
                        self.yielded,
                        self.skipped
                    );
                    return Ok(None);
                }
            };
            self.line_no += 1;

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let raw = RawComplaint::from_jsonl(line).map_err(|source| StreamError::Parse {
                line: self.line_no,
                source,
            })?;
            let record = raw.into_record(self.line_no)?;

            if !self.query.matches(&record) {
                self.skipped += 1;
                continue;
            }

            self.yielded += 1;
            return Ok(Some(record));
        }
    }
}
