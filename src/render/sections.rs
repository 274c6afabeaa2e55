//! Per-section filtering policies
//!
//! The equipment and airline sections filter differently on purpose:
//! equipment stops at the first key under the threshold, airline skips
//! failing keys and keeps scanning. Both are kept as-is for output parity.

use crate::aggregator::{CounterEntry, CounterSnapshot};
use crate::ranker::rank_by_count_desc;

/// Minimum count for a key to appear in the equipment and airline sections
pub const MIN_SECTION_COUNT: u64 = 5;

/// Longer airline codes are malformed or unknown
pub const MAX_AIRLINE_CODE_LEN: usize = 2;

/// Equipment types by count desc, up to the first one under the threshold
pub fn equipment_rows(counter: &CounterSnapshot) -> Vec<&CounterEntry> {
    rank_by_count_desc(counter)
        .into_iter()
        .filter_map(|key| counter.get(key))
        .take_while(|entry| entry.count >= MIN_SECTION_COUNT)
        .collect()
}

/// Airline codes by count desc, skipping rare or over-long codes
pub fn airline_rows(counter: &CounterSnapshot) -> Vec<&CounterEntry> {
    rank_by_count_desc(counter)
        .into_iter()
        .filter_map(|key| counter.get(key))
        .filter(|entry| entry.count >= MIN_SECTION_COUNT && entry.key.len() <= MAX_AIRLINE_CODE_LEN)
        .collect()
}

/// Every key by count desc, no threshold
pub fn ranked_rows(counter: &CounterSnapshot) -> Vec<&CounterEntry> {
    rank_by_count_desc(counter)
        .into_iter()
        .filter_map(|key| counter.get(key))
        .collect()
}
