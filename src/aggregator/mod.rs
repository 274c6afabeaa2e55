//! Single-pass multi-dimensional aggregation
//!
//! One `Aggregator` is created per report request, fed every record of a
//! `RecordStream`, then frozen into an `AggregateSnapshot`. A failed or
//! timed-out pass drops the aggregator; partial counters never escape.

pub mod counter;
pub mod dimension;

pub use counter::{CounterEntry, CounterSnapshot, HourSnapshot, KeyedCounter, ReporterArena};
pub use dimension::{Dimension, HOURS_PER_DAY};

use crate::error::ReportError;
use crate::record::ComplaintRecord;
use crate::stream::RecordStream;
use chrono_tz::Tz;
use counter::HourCounter;
use std::time::{Duration, Instant};

pub struct Aggregator {
    tz: Tz,
    reporters: ReporterArena,
    total_records: u64,
    dates: KeyedCounter,
    hours: HourCounter,
    cities: KeyedCounter,
    airlines: KeyedCounter,
    equipment: KeyedCounter,
}

/// Frozen result of an aggregation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateSnapshot {
    pub total_records: u64,
    /// Distinct reporters across the whole span
    pub unique_reporters: usize,
    pub dates: CounterSnapshot,
    pub hours: HourSnapshot,
    pub cities: CounterSnapshot,
    pub airlines: CounterSnapshot,
    pub equipment: CounterSnapshot,
}

impl AggregateSnapshot {
    /// Number of distinct days with at least one record
    pub fn days(&self) -> usize {
        self.dates.len()
    }

    /// Sparse counter for a dimension; hours are fixed-size and live in `hours`
    pub fn counter(&self, dimension: Dimension) -> Option<&CounterSnapshot> {
        match dimension {
            Dimension::Date => Some(&self.dates),
            Dimension::Hour => None,
            Dimension::City => Some(&self.cities),
            Dimension::Airline => Some(&self.airlines),
            Dimension::Equipment => Some(&self.equipment),
        }
    }
}

impl Aggregator {
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            reporters: ReporterArena::default(),
            total_records: 0,
            dates: KeyedCounter::default(),
            hours: HourCounter::default(),
            cities: KeyedCounter::default(),
            airlines: KeyedCounter::default(),
            equipment: KeyedCounter::default(),
        }
    }

    /// Fold one record into every applicable dimension
    pub fn ingest(&mut self, record: &ComplaintRecord) {
        let reporter = self.reporters.intern(&record.reporter_id);
        self.total_records += 1;

        self.dates.record(&dimension::date_key(record, self.tz), reporter);
        self.hours.record(dimension::hour_index(record, self.tz), reporter);

        if let Some(city) = record.city() {
            self.cities.record(city, reporter);
        }
        if let Some(airline) = record.airline() {
            self.airlines.record(airline, reporter);
        }
        if let Some(equip) = record.equipment() {
            self.equipment.record(equip, reporter);
        }
    }

    pub fn finalize(&self) -> AggregateSnapshot {
        AggregateSnapshot {
            total_records: self.total_records,
            unique_reporters: self.reporters.len(),
            dates: self.dates.snapshot(),
            hours: self.hours.snapshot(),
            cities: self.cities.snapshot(),
            airlines: self.airlines.snapshot(),
            equipment: self.equipment.snapshot(),
        }
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    /// Drain `stream` under `deadline` and return the finished snapshot
    pub async fn consume<S>(self, stream: &mut S, deadline: Duration) -> Result<AggregateSnapshot, ReportError>
    where
        S: RecordStream + ?Sized,
    {
        self.consume_with(stream, deadline, |_| {}).await
    }

    /// Like `consume`, also handing each record to `on_record` before ingesting it
    pub async fn consume_with<S, F>(
        mut self,
        stream: &mut S,
        deadline: Duration,
        mut on_record: F,
    ) -> Result<AggregateSnapshot, ReportError>
    where
        S: RecordStream + ?Sized,
        F: FnMut(&ComplaintRecord),
    {
        let started = Instant::now();

        let pass = async {
            while let Some(record) = stream.next_with_err().await? {
                on_record(&record);
                self.ingest(&record);
            }
            Ok::<(), ReportError>(())
        };

        let outcome = tokio::time::timeout(deadline, pass).await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log::warn!(
                    "❌ Aggregation aborted after {} records: {}",
                    self.total_records,
                    e
                );
                return Err(e);
            }
            Err(_) => {
                log::warn!(
                    "⏱️  Aggregation timed out after {:?} ({} records discarded)",
                    deadline,
                    self.total_records
                );
                return Err(ReportError::Timeout { after: deadline });
            }
        }

        let snapshot = self.finalize();
        log::info!(
            "📊 Aggregated {} records from {} reporters over {} days in {}ms",
            snapshot.total_records,
            snapshot.unique_reporters,
            snapshot.days(),
            started.elapsed().as_millis()
        );
        for dimension in Dimension::all() {
            if let Some(counter) = snapshot.counter(dimension) {
                log::debug!("   {} keys: {}", dimension.as_str(), counter.len());
            }
        }

        Ok(snapshot)
    }
}
