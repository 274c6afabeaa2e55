//! Report time spans, localized to the configured civil timezone

use crate::error::ReportError;
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Inclusive `[start, end]` window a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeSpan {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self, ReportError> {
        if end < start {
            return Err(ReportError::InvalidRequest(format!(
                "span ends ({}) before it starts ({})",
                format_instant(&end),
                format_instant(&start)
            )));
        }
        Ok(Self { start, end })
    }

    /// Whole local days: 00:00:00 on `first` through 23:59:59 on `last`
    pub fn from_date_range(first: NaiveDate, last: NaiveDate, tz: Tz) -> Result<Self, ReportError> {
        let start = local_midnight(first, tz)?;
        let end = local_midnight(next_day(last)?, tz)? - chrono::Duration::seconds(1);
        Self::new(start, end)
    }

    /// `num` days starting on day `day` of the given month
    ///
    /// Day and count may run past the end of the month; the window simply
    /// continues into the next one (day=21, num=11 covers the 31st).
    pub fn for_month_window(year: i32, month: u32, day: u32, num: u32, tz: Tz) -> Result<Self, ReportError> {
        let first_of_month = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ReportError::InvalidRequest(format!("no such month: {}-{}", year, month))
        })?;
        if day == 0 {
            return Err(ReportError::InvalidRequest("day must be 1-31".to_string()));
        }

        let first = add_days(first_of_month, u64::from(day - 1))?;
        let after_last = add_days(first, u64::from(num))?;

        let start = local_midnight(first, tz)?;
        let end = local_midnight(after_last, tz)? - chrono::Duration::seconds(1);
        Self::new(start, end)
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start.with_timezone(&Utc) && *instant <= self.end.with_timezone(&Utc)
    }

    /// Export filename: `complaints-YYYYMMDD-YYYYMMDD.csv`
    pub fn export_filename(&self) -> String {
        format!(
            "complaints-{}-{}.csv",
            self.start.format("%Y%m%d"),
            self.end.format("%Y%m%d")
        )
    }
}

/// Instant as printed in report headers, e.g. `2015-10-01 00:00:00 -0700 PDT`
pub fn format_instant(instant: &DateTime<Tz>) -> String {
    instant.format("%Y-%m-%d %H:%M:%S %z %Z").to_string()
}

/// Accepts `YYYY-MM-DD` or `YYYY/MM/DD`
pub fn parse_date(s: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .map_err(|e| ReportError::InvalidRequest(format!("bad date '{}': {}", s, e)))
}

fn local_midnight(date: NaiveDate, tz: Tz) -> Result<DateTime<Tz>, ReportError> {
    let naive = NaiveDateTime::new(date, NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| ReportError::InvalidRequest(format!("{} has no local midnight in {}", date, tz)))
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate, ReportError> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| ReportError::InvalidRequest(format!("{} + {} days is out of range", date, days)))
}

fn next_day(date: NaiveDate) -> Result<NaiveDate, ReportError> {
    add_days(date, 1)
}
