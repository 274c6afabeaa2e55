//! Per-dimension counters and unique-reporter sets
//!
//! Reporter identifiers are interned once per request into a `ReporterArena`;
//! buckets then track small integer ids instead of cloned strings. Interning
//! is keyed on the exact identifier, so uniqueness keeps string equality.

use super::dimension::HOURS_PER_DAY;
use std::collections::{HashMap, HashSet};

pub type ReporterId = u32;

/// Request-scoped intern table for reporter identifiers
#[derive(Debug, Default)]
pub struct ReporterArena {
    ids: HashMap<String, ReporterId>,
}

impl ReporterArena {
    pub fn intern(&mut self, reporter: &str) -> ReporterId {
        if let Some(&id) = self.ids.get(reporter) {
            return id;
        }
        let id = self.ids.len() as ReporterId;
        self.ids.insert(reporter.to_string(), id);
        id
    }

    /// Distinct reporters seen so far
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
struct Bucket {
    count: u64,
    reporters: HashSet<ReporterId>,
}

impl Bucket {
    fn record(&mut self, reporter: ReporterId) {
        self.count += 1;
        self.reporters.insert(reporter);
    }
}

/// Sparse counter keyed by string, remembering first-seen key order
#[derive(Debug, Default)]
pub struct KeyedCounter {
    slots: HashMap<String, usize>,
    keys: Vec<String>,
    buckets: Vec<Bucket>,
}

impl KeyedCounter {
    pub fn record(&mut self, key: &str, reporter: ReporterId) {
        let slot = match self.slots.get(key) {
            Some(&slot) => slot,
            None => {
                let slot = self.keys.len();
                self.slots.insert(key.to_string(), slot);
                self.keys.push(key.to_string());
                self.buckets.push(Bucket::default());
                slot
            }
        };
        self.buckets[slot].record(reporter);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        let entries = self
            .keys
            .iter()
            .zip(&self.buckets)
            .map(|(key, bucket)| CounterEntry {
                key: key.clone(),
                count: bucket.count,
                unique_reporters: bucket.reporters.len(),
            })
            .collect();
        CounterSnapshot::from_entries(entries)
    }
}

/// Fixed 24-bucket hour-of-day counter
#[derive(Debug, Default)]
pub struct HourCounter {
    buckets: [Bucket; HOURS_PER_DAY],
}

impl HourCounter {
    pub fn record(&mut self, hour: usize, reporter: ReporterId) {
        self.buckets[hour % HOURS_PER_DAY].record(reporter);
    }

    pub fn snapshot(&self) -> HourSnapshot {
        let mut snapshot = HourSnapshot::default();
        for (hour, bucket) in self.buckets.iter().enumerate() {
            snapshot.counts[hour] = bucket.count;
            snapshot.unique_reporters[hour] = bucket.reporters.len();
        }
        snapshot
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterEntry {
    pub key: String,
    pub count: u64,
    pub unique_reporters: usize,
}

/// Read-only view of one sparse dimension, entries in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterSnapshot {
    entries: Vec<CounterEntry>,
    index: HashMap<String, usize>,
}

impl CounterSnapshot {
    pub fn from_entries(entries: Vec<CounterEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.key.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// Snapshot from bare counts, listed in first-seen order
    pub fn from_counts(counts: &[(&str, u64)]) -> Self {
        Self::from_entries(
            counts
                .iter()
                .map(|(key, count)| CounterEntry {
                    key: key.to_string(),
                    count: *count,
                    unique_reporters: 0,
                })
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &CounterEntry> {
        self.entries.iter()
    }

    pub fn get(&self, key: &str) -> Option<&CounterEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Zero for keys never seen
    pub fn count(&self, key: &str) -> u64 {
        self.get(key).map_or(0, |entry| entry.count)
    }

    pub fn unique_reporters(&self, key: &str) -> usize {
        self.get(key).map_or(0, |entry| entry.unique_reporters)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|entry| entry.count).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HourSnapshot {
    pub counts: [u64; HOURS_PER_DAY],
    pub unique_reporters: [usize; HOURS_PER_DAY],
}

impl HourSnapshot {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}
