//! Likely Database Layer
//!
//! SQLite storage (through sqlx) for the three tables the system keeps:
//!
//! - `risk_factors`: cleaned historical records produced by the batch job
//! - `risk_baseline`: the per-(age, ethnicity) rate table, replaced wholesale
//! - `risk_submissions`: an audit log of scored questionnaires
//!
//! # Example
//!
//! ```rust,no_run
//! use likely_db::{Database, BaselineRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::open("sqlite://data/processed/breast_cancer_risk.db").await?;
//!     db.initialize().await?;
//!
//!     let baseline = BaselineRepository::new(std::sync::Arc::new(db));
//!     let table = baseline.load().await?;
//!     println!("{} baseline entries", table.len());
//!     Ok(())
//! }
//! ```

pub mod baseline;
pub mod database;
pub mod error;
pub mod historical;
pub mod schema;
pub mod submissions;

pub use baseline::BaselineRepository;
pub use database::Database;
pub use error::{DbError, Result};
pub use historical::HistoricalRepository;
pub use schema::{TABLE_RISK_BASELINE, TABLE_RISK_FACTORS, TABLE_SUBMISSIONS};
pub use submissions::{NewSubmission, Submission, SubmissionRepository};
