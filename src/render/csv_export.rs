//! Raw per-record CSV exports
//!
//! Two fixed column sets: the full admin export over a span, and a single
//! reporter's own export. Rows go straight to the output as records arrive;
//! a failure mid-export leaves already-flushed rows in place.

use super::format::decimals;
use crate::error::RenderError;
use crate::record::ComplaintRecord;
use chrono::DateTime;
use chrono_tz::Tz;
use std::io::Write;
use std::time::{Duration, Instant};

pub const CONTENT_TYPE: &str = "application/csv";

pub const ADMIN_COLUMNS: [&str; 14] = [
    "CallerCode", "Name", "Address", "Zip", "Email", "HomeLat", "HomeLong",
    "UnixEpoch", "Date", "Time(PDT)",
    "Notes", "Flightnumber", "ActivityDisturbed", "AutoSubmit",
];

pub const PERSONAL_COLUMNS: [&str; 18] = [
    "Date", "Time(PDT)", "Notes", "Speedbrakes", "Loudness", "Activity",
    "Flightnumber", "Origin", "Destination", "Speed(Knots)", "Altitude(Feet)",
    "Lat", "Long", "Registration", "Callsign",
    "VerticalSpeed(FeetPerMin)", "Dist2(km)", "Dist3(km)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Every reporter in a span, with profile details
    Admin,
    /// One reporter's complaints with flight telemetry
    Personal,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Admin => "admin",
            ExportKind::Personal => "personal",
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            ExportKind::Admin => &ADMIN_COLUMNS,
            ExportKind::Personal => &PERSONAL_COLUMNS,
        }
    }

    pub fn row(&self, record: &ComplaintRecord, tz: Tz) -> Vec<String> {
        let local = record.timestamp.with_timezone(&tz);
        let date = local.format("%Y/%m/%d").to_string();
        let time = local.format("%H:%M:%S").to_string();

        match self {
            ExportKind::Admin => vec![
                record.caller_code.clone(),
                record.full_name.clone(),
                record.address.clone(),
                record.zip().unwrap_or_default().to_string(),
                record.reporter_id.clone(),
                decimals(record.home_lat, 4),
                decimals(record.home_long, 4),
                record.timestamp.timestamp().to_string(),
                date,
                time,
                record.notes.clone(),
                record.flight_number.clone(),
                record.activity_disturbed.clone(),
                record.auto_submit.to_string(),
            ],
            ExportKind::Personal => vec![
                date,
                time,
                record.notes.clone(),
                if record.used_speedbrakes { "y" } else { "" }.to_string(),
                record.loudness.to_string(),
                record.activity_disturbed.clone(),
                record.flight_number.clone(),
                record.origin.clone(),
                record.destination.clone(),
                decimals(record.speed_knots, 0),
                decimals(record.altitude_feet, 0),
                decimals(record.aircraft_lat, 5),
                decimals(record.aircraft_long, 5),
                record.registration.clone(),
                record.callsign.clone(),
                decimals(record.vertical_speed_fpm, 0),
                decimals(record.dist2_km, 1),
                decimals(record.dist3_km, 1),
            ],
        }
    }
}

/// `complaints-YYYYMMDD.csv`, dated by the day the export runs
pub fn personal_export_filename(today: &DateTime<Tz>) -> String {
    format!("complaints-{}.csv", today.format("%Y%m%d"))
}

pub fn content_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename)
}

/// Header-first CSV writer that enforces the declared column count
pub struct CsvExporter<W: Write> {
    writer: csv::Writer<W>,
    kind: ExportKind,
    tz: Tz,
    rows: u64,
    last_flush: Instant,
}

impl<W: Write> CsvExporter<W> {
    /// Writes the header row immediately
    pub fn new(out: W, kind: ExportKind, tz: Tz) -> Result<Self, RenderError> {
        let mut writer = csv::WriterBuilder::new().flexible(false).from_writer(out);
        writer.write_record(kind.columns())?;

        Ok(Self {
            writer,
            kind,
            tz,
            rows: 0,
            last_flush: Instant::now(),
        })
    }

    pub fn write_record(&mut self, record: &ComplaintRecord) -> Result<(), RenderError> {
        let row = self.kind.row(record, self.tz);
        self.write_row(&row)
    }

    pub fn write_row(&mut self, row: &[String]) -> Result<(), RenderError> {
        let expected = self.kind.columns().len();
        if row.len() != expected {
            return Err(RenderError::ColumnCount {
                expected,
                found: row.len(),
            });
        }

        self.writer.write_record(row)?;
        self.rows += 1;

        // Flush every 5 seconds so long exports trickle out
        if self.last_flush.elapsed() > Duration::from_secs(5) {
            self.flush()?;
            self.last_flush = Instant::now();
        }

        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), RenderError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the number of data rows written
    pub fn finish(mut self) -> Result<u64, RenderError> {
        self.flush()?;
        Ok(self.rows)
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use chrono_tz::America::Los_Angeles;

    fn record() -> ComplaintRecord {
        let mut record = ComplaintRecord::new(Utc.with_ymd_and_hms(2015, 10, 1, 16, 5, 9).unwrap(), "a@example.com");
        record.caller_code = "QWERTY".to_string();
        record.full_name = "Alice Smith".to_string();
        record.address = "1 Main St, Palo Alto, CA 94301".to_string();
        record.location_zip = Some("94301".to_string());
        record.home_lat = 37.445123;
        record.home_long = -122.160987;
        record.notes = "said \"wow\", then left".to_string();
        record.flight_number = "UA123".to_string();
        record.activity_disturbed = "Sleeping".to_string();
        record.auto_submit = true;
        record.loudness = 2;
        record.used_speedbrakes = true;
        record.speed_knots = 212.6;
        record.altitude_feet = 4123.2;
        record.aircraft_lat = 37.4412345;
        record.aircraft_long = -122.1512345;
        record.vertical_speed_fpm = -704.5;
        record.dist2_km = 1.26;
        record.dist3_km = 1.94;
        record
    }

    #[test]
    fn test_admin_row() {
        let row = ExportKind::Admin.row(&record(), Los_Angeles);
        assert_eq!(row.len(), ADMIN_COLUMNS.len());
        assert_eq!(row[3], "94301");
        assert_eq!(row[4], "a@example.com");
        assert_eq!(row[5], "37.4451");
        assert_eq!(row[6], "-122.1610");
        assert_eq!(row[7], "1443715509");
        assert_eq!(row[8], "2015/10/01");
        assert_eq!(row[9], "09:05:09");
        assert_eq!(row[13], "true");
    }

    #[test]
    fn test_personal_row() {
        let row = ExportKind::Personal.row(&record(), Los_Angeles);
        assert_eq!(row.len(), PERSONAL_COLUMNS.len());
        assert_eq!(row[3], "y");
        assert_eq!(row[4], "2");
        assert_eq!(row[9], "213");
        assert_eq!(row[10], "4123");
        assert_eq!(row[11], "37.44123");
        assert_eq!(row[12], "-122.15123");
        assert_eq!(row[16], "1.3");
        assert_eq!(row[17], "1.9");
    }

    #[test]
    fn test_exporter_quotes_and_counts() {
        let mut out = Vec::new();
        let mut exporter = CsvExporter::new(&mut out, ExportKind::Admin, Los_Angeles).unwrap();
        exporter.write_record(&record()).unwrap();
        assert_eq!(exporter.finish().unwrap(), 1);

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), ADMIN_COLUMNS.join(","));
        let row = lines.next().unwrap();
        assert!(row.contains("\"1 Main St, Palo Alto, CA 94301\""));
        assert!(row.contains("\"said \"\"wow\"\", then left\""));
    }

    #[test]
    fn test_exporter_rejects_wrong_column_count() {
        let mut out = Vec::new();
        let mut exporter = CsvExporter::new(&mut out, ExportKind::Personal, Los_Angeles).unwrap();
        let short = vec!["2015/10/01".to_string(); 17];
        assert!(matches!(
            exporter.write_row(&short),
            Err(RenderError::ColumnCount { expected: 18, found: 17 })
        ));
        assert_eq!(exporter.rows(), 0);
    }

    #[test]
    fn test_filenames_and_headers() {
        let today = Los_Angeles.with_ymd_and_hms(2015, 10, 21, 12, 0, 0).unwrap();
        assert_eq!(personal_export_filename(&today), "complaints-20151021.csv");
        assert_eq!(
            content_disposition("complaints-20151021.csv"),
            "attachment; filename=\"complaints-20151021.csv\""
        );
        assert_eq!(ExportKind::Admin.as_str(), "admin");
    }
}
