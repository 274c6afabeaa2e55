//! noiseflow - streaming aggregation engine for aircraft noise complaints
//!
//! Consumes an ordered stream of complaint records and renders personal,
//! summary and zip-code reports, or flat CSV exports.
//!
//! # Architecture
//!
//! ```text
//! RecordStream (JSONL file / in-memory)
//!     ↓
//! Aggregator (date, hour, city, airline, equipment + unique reporters)
//!     ↓
//! Ranker (count desc with first-seen tie-break, key asc)
//!     ↓
//! Renderer → text report / zip table / CSV export
//! ```
//!
//! CSV exports skip the Aggregator and Ranker and stream raw rows straight
//! from the RecordStream through the Renderer.

pub mod aggregator;
pub mod config;
pub mod engine;
pub mod error;
pub mod ranker;
pub mod record;
pub mod render;
pub mod span;
pub mod stream;

pub use aggregator::{AggregateSnapshot, Aggregator, CounterSnapshot, Dimension, HourSnapshot};
pub use config::ReportConfig;
pub use engine::{RenderMode, ReportEngine, ReportKind, ReportOutcome, ReportRequest};
pub use error::{ConfigError, RenderError, ReportError, StreamError};
pub use ranker::{rank_by_count_desc, rank_by_key_asc};
pub use record::ComplaintRecord;
pub use span::TimeSpan;
pub use stream::{JsonlRecordStream, MemoryRecordStream, RecordQuery, RecordStream};
