//! Request-scoped report orchestration
//!
//! A `ReportRequest` selects one report flavour from its filters and render
//! mode. Aggregated flavours run RecordStream → Aggregator → Ranker →
//! Renderer; CSV exports stream rows straight from the RecordStream.

use crate::aggregator::Aggregator;
use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::render::{dump_line, personal_export_filename, CsvExporter, ExportKind, PersonalReport, ReportTable, SummaryReport};
use crate::span::TimeSpan;
use crate::stream::{RecordQuery, RecordStream};
use chrono::Utc;
use std::io::Write;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Structured report for humans
    Text,
    /// CSV for download
    Csv,
}

/// What a request resolves to once its filters and mode are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Summary,
    Personal,
    ZipTable,
    AdminExport,
    PersonalExport,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Summary => "summary",
            ReportKind::Personal => "personal",
            ReportKind::ZipTable => "zip",
            ReportKind::AdminExport => "admin-export",
            ReportKind::PersonalExport => "personal-export",
        }
    }

    pub fn is_export(&self) -> bool {
        matches!(self, ReportKind::AdminExport | ReportKind::PersonalExport)
    }
}

#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub span: Option<TimeSpan>,
    pub zip: Option<String>,
    pub reporter: Option<String>,
    pub mode: RenderMode,
}

impl ReportRequest {
    pub fn summary(span: TimeSpan) -> Self {
        Self { span: Some(span), zip: None, reporter: None, mode: RenderMode::Text }
    }

    pub fn personal(span: TimeSpan, reporter: impl Into<String>) -> Self {
        Self { span: Some(span), zip: None, reporter: Some(reporter.into()), mode: RenderMode::Text }
    }

    pub fn zip(span: Option<TimeSpan>, zip: impl Into<String>, mode: RenderMode) -> Self {
        Self { span, zip: Some(zip.into()), reporter: None, mode }
    }

    pub fn admin_export(span: TimeSpan) -> Self {
        Self { span: Some(span), zip: None, reporter: None, mode: RenderMode::Csv }
    }

    /// Every complaint a reporter ever filed unless `span` narrows it
    pub fn personal_export(span: Option<TimeSpan>, reporter: impl Into<String>) -> Self {
        Self { span, zip: None, reporter: Some(reporter.into()), mode: RenderMode::Csv }
    }

    /// Filters the record source must apply before yielding
    pub fn query(&self) -> RecordQuery {
        RecordQuery {
            span: self.span,
            zip: self.zip.clone(),
            reporter: self.reporter.clone(),
        }
    }

    pub fn kind(&self) -> Result<ReportKind, ReportError> {
        let kind = match (&self.zip, &self.reporter, self.mode) {
            (Some(_), Some(_), _) => {
                return Err(ReportError::InvalidRequest(
                    "zip and reporter filters cannot be combined".to_string(),
                ))
            }
            (Some(_), None, _) => ReportKind::ZipTable,
            (None, Some(_), RenderMode::Text) => ReportKind::Personal,
            (None, Some(_), RenderMode::Csv) => ReportKind::PersonalExport,
            (None, None, RenderMode::Text) => ReportKind::Summary,
            (None, None, RenderMode::Csv) => ReportKind::AdminExport,
        };

        let needs_span = matches!(kind, ReportKind::Summary | ReportKind::Personal | ReportKind::AdminExport);
        if needs_span && self.span.is_none() {
            return Err(ReportError::InvalidRequest(format!(
                "{} report requires a time span",
                kind.as_str()
            )));
        }

        Ok(kind)
    }

    fn required_span(&self) -> Result<TimeSpan, ReportError> {
        self.span
            .ok_or_else(|| ReportError::InvalidRequest("missing time span".to_string()))
    }
}

/// Result of one finished request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    pub kind: ReportKind,
    /// Records consumed from the stream
    pub records: u64,
}

pub struct ReportEngine {
    config: ReportConfig,
}

impl ReportEngine {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Download filename for CSV flavours, `None` for reports
    pub fn export_filename(&self, request: &ReportRequest) -> Result<Option<String>, ReportError> {
        match request.kind()? {
            ReportKind::AdminExport => Ok(Some(request.required_span()?.export_filename())),
            ReportKind::PersonalExport => {
                let today = Utc::now().with_timezone(&self.config.timezone);
                Ok(Some(personal_export_filename(&today)))
            }
            ReportKind::ZipTable if request.mode == RenderMode::Csv => {
                Ok(request.span.map(|span| span.export_filename()))
            }
            _ => Ok(None),
        }
    }

    /// Drain `stream` and write the requested report to `out`
    ///
    /// Aggregated reports write nothing unless the whole pass succeeds.
    /// Exports write as they go and stop at the first failure.
    pub async fn run<S, W>(
        &self,
        request: &ReportRequest,
        stream: &mut S,
        out: &mut W,
    ) -> Result<ReportOutcome, ReportError>
    where
        S: RecordStream + ?Sized,
        W: Write,
    {
        let kind = request.kind()?;
        let started = Instant::now();
        log::info!("🚀 Running {} report", kind.as_str());

        let records = match kind {
            ReportKind::Summary => self.summary(request.required_span()?, stream, out).await?,
            ReportKind::Personal => self.personal(request, stream, out).await?,
            ReportKind::ZipTable => self.zip_table(request.mode, stream, out).await?,
            ReportKind::AdminExport => self.export(ExportKind::Admin, stream, out).await?,
            ReportKind::PersonalExport => self.export(ExportKind::Personal, stream, out).await?,
        };

        log::info!(
            "✅ {} report done: {} records in {}ms",
            kind.as_str(),
            records,
            started.elapsed().as_millis()
        );

        Ok(ReportOutcome { kind, records })
    }

    async fn summary<S, W>(&self, span: TimeSpan, stream: &mut S, out: &mut W) -> Result<u64, ReportError>
    where
        S: RecordStream + ?Sized,
        W: Write,
    {
        let snapshot = Aggregator::new(self.config.timezone)
            .consume(stream, self.config.report_timeout)
            .await?;
        let records = snapshot.total_records;

        SummaryReport { span, snapshot }.render(out)?;
        Ok(records)
    }

    async fn personal<S, W>(&self, request: &ReportRequest, stream: &mut S, out: &mut W) -> Result<u64, ReportError>
    where
        S: RecordStream + ?Sized,
        W: Write,
    {
        let span = request.required_span()?;
        let reporter = request.reporter.clone().unwrap_or_default();
        let tz = self.config.timezone;

        let mut dump = Vec::new();
        let snapshot = Aggregator::new(tz)
            .consume_with(stream, self.config.report_timeout, |record| {
                dump.push(dump_line(record, tz))
            })
            .await?;
        let records = snapshot.total_records;

        PersonalReport { reporter, span, snapshot, dump }.render(out)?;
        Ok(records)
    }

    async fn zip_table<S, W>(&self, mode: RenderMode, stream: &mut S, out: &mut W) -> Result<u64, ReportError>
    where
        S: RecordStream + ?Sized,
        W: Write,
    {
        let snapshot = Aggregator::new(self.config.timezone)
            .consume(stream, self.config.report_timeout)
            .await?;
        let table = ReportTable::zip_report(&snapshot);

        match mode {
            RenderMode::Text => table.write_text(out)?,
            RenderMode::Csv => table.write_csv(out)?,
        }
        Ok(snapshot.total_records)
    }

    async fn export<S, W>(&self, kind: ExportKind, stream: &mut S, out: &mut W) -> Result<u64, ReportError>
    where
        S: RecordStream + ?Sized,
        W: Write,
    {
        let deadline = self.config.export_timeout;
        let mut exporter = CsvExporter::new(out, kind, self.config.timezone)?;

        let pass = async {
            while let Some(record) = stream.next_with_err().await? {
                exporter.write_record(&record)?;
            }
            Ok::<(), ReportError>(())
        };

        let outcome = tokio::time::timeout(deadline, pass).await;
        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e),
            Err(_) => Some(ReportError::Timeout { after: deadline }),
        };

        if let Some(e) = failure {
            log::error!(
                "❌ {} export aborted after {} rows: {}",
                kind.as_str(),
                exporter.rows(),
                e
            );
            // Rows already written stay written
            if let Err(flush_err) = exporter.flush() {
                log::warn!("⚠️  Failed to flush partial export: {}", flush_err);
            }
            return Err(e);
        }

        Ok(exporter.finish()?)
    }
}
