//! likely-baseline — Offline baseline builder.
//!
//! - CSV extraction (registry-coded or tidy layouts)
//! - Registry code decoding
//! - Aggregation of historical records into the per-(age, ethnicity) table
//! - Batch job that persists records and swaps the stored baseline

pub mod builder;
pub mod extract;
pub mod pipeline;
pub mod transform;

pub use builder::{build_baseline, REQUIRED_FIELDS};
pub use extract::{discover_sources, extract_csv, read_records, CsvFormat};
pub use pipeline::{rebuild_from_store, run_baseline_job, BaselineJob, BaselineJobResult};
