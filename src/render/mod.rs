//! Report and export rendering over finalized aggregates

pub mod csv_export;
pub mod format;
pub mod sections;
pub mod table;
pub mod text;

pub use csv_export::{content_disposition, personal_export_filename, CsvExporter, ExportKind, CONTENT_TYPE};
pub use table::ReportTable;
pub use text::{dump_line, PersonalReport, SummaryReport};
