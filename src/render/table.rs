//! Zip-code report as a ragged table of cells

use super::format::fixed_width;
use crate::aggregator::{AggregateSnapshot, HOURS_PER_DAY};
use crate::error::RenderError;
use crate::ranker::rank_by_key_asc;
use std::io::Write;

const SEPARATOR: &str = "------";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTable {
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    /// Per-date and per-hour counts with unique reporters, then the overall unique count
    pub fn zip_report(snap: &AggregateSnapshot) -> Self {
        let mut rows: Vec<Vec<String>> = Vec::new();

        rows.push(cells(&["Date", "NumComplaints", "UniqueComplainers"]));
        for key in rank_by_key_asc(&snap.dates) {
            rows.push(vec![
                key.to_string(),
                snap.dates.count(key).to_string(),
                snap.dates.unique_reporters(key).to_string(),
            ]);
        }
        rows.push(cells(&[SEPARATOR]));

        rows.push(cells(&["HourAcrossAllDays", "NumComplaints", "UniqueComplainers"]));
        for hour in 0..HOURS_PER_DAY {
            rows.push(vec![
                format!("{:02}:00", hour),
                snap.hours.counts[hour].to_string(),
                snap.hours.unique_reporters[hour].to_string(),
            ]);
        }
        rows.push(cells(&[SEPARATOR]));

        rows.push(vec![
            "UniqueComplainersAcrossAllDays".to_string(),
            snap.unique_reporters.to_string(),
        ]);

        Self { rows }
    }

    /// Columns padded to their widest cell, separated by two spaces
    pub fn write_text<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut widths: Vec<usize> = Vec::new();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }

        for row in &self.rows {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| fixed_width(cell, widths[i]))
                .collect();
            writeln!(out, "{}", line.join("  ").trim_end())?;
        }
        Ok(())
    }

    /// Rows have different widths, so the writer runs in flexible mode
    pub fn write_csv<W: Write>(&self, out: W) -> Result<(), RenderError> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Aggregator;
    use crate::record::ComplaintRecord;
    use chrono::{TimeZone, Utc};
    use chrono_tz::America::Los_Angeles;

    fn snapshot() -> AggregateSnapshot {
        let mut agg = Aggregator::new(Los_Angeles);
        // 2015-10-02 01:00 UTC = 2015-10-01 18:00 PDT
        agg.ingest(&ComplaintRecord::new(Utc.with_ymd_and_hms(2015, 10, 2, 1, 0, 0).unwrap(), "a@x"));
        agg.ingest(&ComplaintRecord::new(Utc.with_ymd_and_hms(2015, 10, 2, 1, 30, 0).unwrap(), "a@x"));
        agg.ingest(&ComplaintRecord::new(Utc.with_ymd_and_hms(2015, 9, 30, 20, 0, 0).unwrap(), "b@x"));
        agg.finalize()
    }

    #[test]
    fn test_zip_report_rows() {
        let table = ReportTable::zip_report(&snapshot());

        assert_eq!(table.rows.len(), 1 + 2 + 1 + 1 + 24 + 1 + 1);
        assert_eq!(table.rows[0], cells(&["Date", "NumComplaints", "UniqueComplainers"]));
        assert_eq!(table.rows[1], cells(&["2015.09.30", "1", "1"]));
        assert_eq!(table.rows[2], cells(&["2015.10.01", "2", "1"]));
        assert_eq!(table.rows[3], cells(&["------"]));
        assert_eq!(table.rows[5], cells(&["00:00", "0", "0"]));
        assert_eq!(table.rows[5 + 18], cells(&["18:00", "2", "1"]));
        assert_eq!(table.rows[5 + 13], cells(&["13:00", "1", "1"]));
        assert_eq!(table.rows.last().unwrap(), &cells(&["UniqueComplainersAcrossAllDays", "2"]));
    }

    #[test]
    fn test_write_csv_is_ragged() {
        let mut out = Vec::new();
        ReportTable::zip_report(&snapshot()).write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Date,NumComplaints,UniqueComplainers\n2015.09.30,1,1\n"));
        assert!(text.contains("\n------\n"));
        assert!(text.ends_with("UniqueComplainersAcrossAllDays,2\n"));
    }

    #[test]
    fn test_write_text_aligns_columns() {
        let table = ReportTable {
            rows: vec![cells(&["Date", "N"]), cells(&["2015.10.01", "12"]), cells(&["---"])],
        };
        let mut out = Vec::new();
        table.write_text(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Date        N\n2015.10.01  12\n---\n"
        );
    }
}
