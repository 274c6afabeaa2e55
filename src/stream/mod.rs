//! Record sources the engine pulls complaints from
//!
//! The engine only ever calls `next_with_err`, so that "exhausted" and
//! "underlying query failed" stay distinguishable.

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlRecordStream;
pub use memory::MemoryRecordStream;

use crate::error::StreamError;
use crate::record::ComplaintRecord;
use crate::span::TimeSpan;
use async_trait::async_trait;

#[async_trait]
pub trait RecordStream: Send {
    /// Next record, `Ok(None)` at end of stream
    async fn next_with_err(&mut self) -> Result<Option<ComplaintRecord>, StreamError>;

    /// Next record; a source failure is logged and reads as end of stream
    async fn next(&mut self) -> Option<ComplaintRecord> {
        match self.next_with_err().await {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Record stream failed, treating as exhausted: {}", e);
                None
            }
        }
    }
}

/// Filters a source applies before yielding records
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub span: Option<TimeSpan>,
    pub zip: Option<String>,
    pub reporter: Option<String>,
}

impl RecordQuery {
    pub fn in_span(span: TimeSpan) -> Self {
        Self {
            span: Some(span),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &ComplaintRecord) -> bool {
        if let Some(span) = &self.span {
            if !span.contains(&record.timestamp) {
                return false;
            }
        }
        if let Some(zip) = &self.zip {
            if record.zip() != Some(zip.as_str()) {
                return false;
            }
        }
        if let Some(reporter) = &self.reporter {
            if record.reporter_id != *reporter {
                return false;
            }
        }
        true
    }
}
