//! noiseflow - render complaint reports and exports from a JSONL record file
//!
//! ## Usage
//!
//! ```bash
//! noiseflow summary --from 2015-10-01 --to 2015-10-07
//! noiseflow personal --reporter someone@example.com --from 2015-10-01 --to 2015-10-07
//! noiseflow zip --zip 94301 --from 2015-10-01 --to 2015-10-31 --csv
//! noiseflow download --reporter someone@example.com --out-dir exports
//! noiseflow month --year 2015 --month 10 --day 1 --num 7 --out-dir exports
//! ```
//!
//! ## Environment Variables
//!
//! - NOISEFLOW_INPUT_PATH - JSONL complaint records (default: data/complaints.jsonl)
//! - NOISEFLOW_TIMEZONE - IANA zone for date/hour bucketing (default: America/Los_Angeles)
//! - REPORT_TIMEOUT_SECS - Deadline for aggregated reports (default: 60)
//! - EXPORT_TIMEOUT_SECS - Deadline for CSV exports (default: 180)
//! - RUST_LOG - Logging level (optional, default: info)

use clap::{Args, Parser, Subcommand};
use noiseflow::render::{content_disposition, CONTENT_TYPE};
use noiseflow::span::parse_date;
use noiseflow::{JsonlRecordStream, RenderMode, ReportConfig, ReportEngine, ReportRequest, TimeSpan};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "noiseflow", about = "Aircraft noise complaint reports")]
struct Cli {
    /// Overrides NOISEFLOW_INPUT_PATH
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate report over every reporter
    Summary {
        #[command(flatten)]
        range: DateRange,
    },
    /// One reporter's report with a full dump of their complaints
    Personal {
        #[arg(long)]
        reporter: String,
        #[command(flatten)]
        range: DateRange,
    },
    /// Per-date and per-hour table for one zip code
    Zip {
        #[arg(long)]
        zip: String,
        #[command(flatten)]
        range: DateRange,
        /// Write CSV instead of aligned text
        #[arg(long)]
        csv: bool,
    },
    /// A reporter's own complaints as CSV
    Download {
        #[arg(long)]
        reporter: String,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Admin CSV export over a window of days within a month
    Month {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        #[arg(long, default_value_t = 1)]
        day: u32,
        #[arg(long, default_value_t = 31)]
        num: u32,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct DateRange {
    /// First day, YYYY-MM-DD or YYYY/MM/DD
    #[arg(long)]
    from: String,
    /// Last day, inclusive; defaults to the first
    #[arg(long)]
    to: Option<String>,
}

impl DateRange {
    fn span(&self, config: &ReportConfig) -> Result<TimeSpan, Box<dyn std::error::Error>> {
        let first = parse_date(&self.from)?;
        let last = match &self.to {
            Some(to) => parse_date(to)?,
            None => first,
        };
        Ok(TimeSpan::from_date_range(first, last, config.timezone)?)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config = ReportConfig::from_env();
    if let Some(input) = cli.input {
        config = config.with_input_path(input);
    }
    config.validate()?;

    log::info!("🚀 Starting noiseflow");
    log::info!("   Input: {}", config.input_path.display());
    log::info!("   Timezone: {}", config.timezone.name());
    log::info!("   Report timeout: {:?}", config.report_timeout);
    log::info!("   Export timeout: {:?}", config.export_timeout);

    let (request, out_dir) = match cli.command {
        Command::Summary { range } => (ReportRequest::summary(range.span(&config)?), None),
        Command::Personal { reporter, range } => (ReportRequest::personal(range.span(&config)?, reporter), None),
        Command::Zip { zip, range, csv } => {
            let mode = if csv { RenderMode::Csv } else { RenderMode::Text };
            (ReportRequest::zip(Some(range.span(&config)?), zip, mode), None)
        }
        Command::Download { reporter, out_dir } => (ReportRequest::personal_export(None, reporter), Some(out_dir)),
        Command::Month { year, month, day, num, out_dir } => {
            let span = TimeSpan::for_month_window(year, month, day, num, config.timezone)?;
            (ReportRequest::admin_export(span), Some(out_dir))
        }
    };

    let engine = ReportEngine::new(config);
    let mut stream = JsonlRecordStream::open(&engine.config().input_path, request.query()).await?;

    let outcome = match out_dir {
        Some(dir) => {
            let filename = engine
                .export_filename(&request)?
                .ok_or("export request produced no filename")?;
            std::fs::create_dir_all(&dir)?;
            let path = dir.join(&filename);

            log::info!("📁 Content-Type: {}", CONTENT_TYPE);
            log::info!("📁 Content-Disposition: {}", content_disposition(&filename));

            let mut out = BufWriter::new(File::create(&path)?);
            let outcome = engine.run(&request, &mut stream, &mut out).await?;
            out.flush()?;
            log::info!("💾 Wrote {}", path.display());
            outcome
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let outcome = engine.run(&request, &mut stream, &mut out).await?;
            out.flush()?;
            outcome
        }
    };

    log::info!(
        "✅ {} finished: {} records matched, {} filtered out",
        outcome.kind.as_str(),
        stream.yielded(),
        stream.skipped()
    );

    Ok(())
}
