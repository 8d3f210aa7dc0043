//! Job catalog: listing records, search filters, the configured data source,
//! and plain-text exports.

pub mod domain;
pub mod export;
pub mod filter;
pub mod sample;
pub mod source;

pub use domain::{Job, JobId, JobType};
pub use export::{export_job_description, ExportError, ExportFormat, TextExport};
pub use filter::JobFilter;
pub use sample::sample_jobs;
pub use source::JobSource;
