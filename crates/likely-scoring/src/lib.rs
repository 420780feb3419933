//! likely-scoring — Breast-cancer risk context engine.
//!
//! Combines a demographic baseline rate with multiplicative adjustment
//! factors into a bounded percentage, a risk level and the explanations
//! shown alongside it.

pub mod baseline;
pub mod comparison;
pub mod explain;
pub mod factors;
pub mod profile;
pub mod provider;
pub mod scorer;

pub use baseline::{resolve_baseline, BaselineRisk, BaselineSource, DEFAULT_BASELINE_RATE};
pub use comparison::ComparisonSeries;
pub use factors::{compute_factors, FactorSet};
pub use profile::{AnxietyLevel, Answer, BrcaStatus, Exercise, ProfileContext, RiskForm, UserProfile};
pub use provider::{BaselineProvider, BaselineUnavailable, SharedBaseline, StaticBaseline, UnavailableBaseline};
pub use scorer::{categorize, FactorBreakdown, RiskEngine, RiskLevel, RiskResult};
