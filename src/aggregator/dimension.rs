//! Aggregation axes and key derivation

use crate::record::ComplaintRecord;
use chrono::Timelike;
use chrono_tz::Tz;

/// Number of hour-of-day buckets
pub const HOURS_PER_DAY: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Date,
    Hour,
    City,
    Airline,
    Equipment,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Date => "date",
            Dimension::Hour => "hour",
            Dimension::City => "city",
            Dimension::Airline => "airline",
            Dimension::Equipment => "equipment",
        }
    }

    pub fn all() -> [Dimension; 5] {
        [
            Dimension::Date,
            Dimension::Hour,
            Dimension::City,
            Dimension::Airline,
            Dimension::Equipment,
        ]
    }
}

/// Date key `YYYY.MM.DD` in the report timezone
pub fn date_key(record: &ComplaintRecord, tz: Tz) -> String {
    record.timestamp.with_timezone(&tz).format("%Y.%m.%d").to_string()
}

/// Hour of day (0-23) in the report timezone
pub fn hour_index(record: &ComplaintRecord, tz: Tz) -> usize {
    record.timestamp.with_timezone(&tz).hour() as usize
}
