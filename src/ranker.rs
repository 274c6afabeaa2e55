//! Deterministic key orderings over a finished counter snapshot

use crate::aggregator::CounterSnapshot;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Keys by count, highest first
///
/// Keys with equal counts stay together and keep the order in which they
/// were first seen during aggregation; they are not re-sorted by name.
pub fn rank_by_count_desc(counter: &CounterSnapshot) -> Vec<&str> {
    let mut by_count: BTreeMap<Reverse<u64>, Vec<&str>> = BTreeMap::new();
    for entry in counter.iter() {
        by_count
            .entry(Reverse(entry.count))
            .or_default()
            .push(entry.key.as_str());
    }

    by_count.into_values().flatten().collect()
}

/// Keys in lexicographic order
pub fn rank_by_key_asc(counter: &CounterSnapshot) -> Vec<&str> {
    let mut keys: Vec<&str> = counter.iter().map(|entry| entry.key.as_str()).collect();
    keys.sort_unstable();
    keys
}
