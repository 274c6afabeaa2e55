//! Plain-text summary and personal reports
//!
//! Column widths and header lines are relied on by scripts that scrape
//! these reports; keep them byte-stable.

use super::format::{fixed_width, fixed_width_right, spaced};
use super::sections::{airline_rows, equipment_rows, ranked_rows};
use crate::aggregator::{AggregateSnapshot, HOURS_PER_DAY};
use crate::ranker::rank_by_key_asc;
use crate::record::ComplaintRecord;
use crate::span::{format_instant, TimeSpan};
use chrono_tz::Tz;
use std::io::Write;

/// Display width of city and equipment names
pub const NAME_WIDTH: usize = 40;

/// Aggregate report over every reporter in a span
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub span: TimeSpan,
    pub snapshot: AggregateSnapshot,
}

impl SummaryReport {
    pub fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let snap = &self.snapshot;

        write!(
            out,
            "Summary of disturbance reports:\n From [{}]\n To   [{}]\n",
            format_instant(&self.span.start),
            format_instant(&self.span.end)
        )?;

        write!(
            out,
            "\nTotals:\n Days                : {}\n Disturbance reports : {}\n People reporting    : {}\n",
            snap.days(),
            snap.total_records,
            snap.unique_reporters
        )?;

        writeln!(out, "\nDisturbance reports, counted by City (where known):")?;
        for entry in ranked_rows(&snap.cities) {
            writeln!(
                out,
                " {}: {} ({} people reporting)",
                fixed_width(&entry.key, NAME_WIDTH),
                spaced(entry.count, 5),
                spaced(entry.unique_reporters as u64, 3)
            )?;
        }

        writeln!(out, "\nDisturbance reports, counted by date:")?;
        for key in rank_by_key_asc(&snap.dates) {
            writeln!(
                out,
                " {}: {} ({} people reporting)",
                key,
                spaced(snap.dates.count(key), 5),
                spaced(snap.dates.unique_reporters(key) as u64, 3)
            )?;
        }

        writeln!(out, "\nDisturbance reports, counted by aircraft equipment type (where known):")?;
        for entry in equipment_rows(&snap.equipment) {
            writeln!(out, " {}: {}", fixed_width(&entry.key, NAME_WIDTH), spaced(entry.count, 5))?;
        }

        writeln!(out, "\nDisturbance reports, counted by Airline (where known):")?;
        for entry in airline_rows(&snap.airlines) {
            writeln!(out, " {}: {}", entry.key, spaced(entry.count, 6))?;
        }

        writeln!(out, "\nDisturbance reports, counted by hour of day (across all dates):")?;
        for hour in 0..HOURS_PER_DAY {
            writeln!(out, " {:02}: {}", hour, spaced(snap.hours.counts[hour], 5))?;
        }

        Ok(())
    }
}

/// One reporter's own complaints, aggregated and then listed in full
#[derive(Debug, Clone)]
pub struct PersonalReport {
    pub reporter: String,
    pub span: TimeSpan,
    pub snapshot: AggregateSnapshot,
    pub dump: Vec<String>,
}

impl PersonalReport {
    pub fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let snap = &self.snapshot;

        write!(
            out,
            "Personal disturbances report for <{}>:\n From [{}]\n To   [{}]\n",
            self.reporter,
            format_instant(&self.span.start),
            format_instant(&self.span.end)
        )?;

        write!(
            out,
            "\nTotal number of disturbance reports, over {} days:  {}\n",
            snap.days(),
            snap.total_records
        )?;

        writeln!(out, "\nDisturbance reports, counted by Airline (where known):")?;
        for entry in ranked_rows(&snap.airlines) {
            writeln!(out, " {}: {}", entry.key, spaced(entry.count, 4))?;
        }

        writeln!(out, "\nDisturbance reports, counted by date:")?;
        for key in rank_by_key_asc(&snap.dates) {
            writeln!(out, " {}: {}", key, spaced(snap.dates.count(key), 4))?;
        }

        writeln!(out, "\nDisturbance reports, counted by hour of day (across all dates):")?;
        for hour in 0..HOURS_PER_DAY {
            writeln!(out, " {:02}: {}", hour, spaced(snap.hours.counts[hour], 4))?;
        }

        write!(out, "\nFull dump of all disturbance reports:\n\n")?;
        for line in &self.dump {
            writeln!(out, "{}", line)?;
        }

        Ok(())
    }
}

/// Dump line for the personal report's full listing
pub fn dump_line(record: &ComplaintRecord, tz: Tz) -> String {
    format!(
        "Time: {}, Loudness:{}, Speedbrakes:{}, Flight:{}, Notes:{}",
        record.timestamp.with_timezone(&tz).format("%Y.%m.%d %H:%M:%S"),
        record.loudness,
        record.used_speedbrakes,
        fixed_width_right(&record.flight_number, 6),
        record.notes
    )
}
