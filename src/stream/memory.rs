//! In-memory record source

use super::RecordStream;
use crate::error::StreamError;
use crate::record::ComplaintRecord;
use async_trait::async_trait;
use std::collections::VecDeque;

/// Queue of records (or injected failures) yielded in insertion order
#[derive(Debug, Default)]
pub struct MemoryRecordStream {
    items: VecDeque<Result<ComplaintRecord, StreamError>>,
}

impl MemoryRecordStream {
    pub fn from_records(records: impl IntoIterator<Item = ComplaintRecord>) -> Self {
        Self {
            items: records.into_iter().map(Ok).collect(),
        }
    }

    pub fn push_record(&mut self, record: ComplaintRecord) {
        self.items.push_back(Ok(record));
    }

    /// Queue a failure; it is returned once, in order
    pub fn push_error(&mut self, error: StreamError) {
        self.items.push_back(Err(error));
    }

    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

#[async_trait]
impl RecordStream for MemoryRecordStream {
    async fn next_with_err(&mut self) -> Result<Option<ComplaintRecord>, StreamError> {
        self.items.pop_front().transpose()
    }
}
