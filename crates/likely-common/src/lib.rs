//! likely-common — Shared types and errors used across all Likely crates.

pub mod baseline;
pub mod entities;
pub mod error;

// Re-export commonly used types
pub use baseline::{BaselineEntry, BaselineTable};
pub use entities::{Ethnicity, HistoricalRecord, UnknownEthnicity};
pub use error::{ApiError, DataValidationError, LikelyError, Result, SchemaValidationError};
