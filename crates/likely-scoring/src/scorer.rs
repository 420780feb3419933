//! Risk score computation.
//!
//! adjusted   = baseline × genetic × hormonal × lifestyle × breast_health
//! percentage = clamp(adjusted × 100, 0, 100)

use std::fmt;
use std::sync::Arc;

use likely_common::{BaselineTable, Ethnicity, SchemaValidationError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::baseline::{resolve_baseline, BaselineRisk, BaselineSource};
use crate::comparison::ComparisonSeries;
use crate::explain::{contextual_reasons, recommendations};
use crate::factors::{compute_factors, FactorSet};
use crate::profile::{RiskForm, UserProfile};
use crate::provider::BaselineProvider;

/// Ordered risk categories. Breakpoints are lower-inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a percentage to its level.
pub fn categorize(risk_percentage: f64) -> RiskLevel {
    if risk_percentage < 5.0 {
        RiskLevel::VeryLow
    } else if risk_percentage < 10.0 {
        RiskLevel::Low
    } else if risk_percentage < 20.0 {
        RiskLevel::Moderate
    } else if risk_percentage < 30.0 {
        RiskLevel::High
    } else {
        RiskLevel::VeryHigh
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Factor set plus the baseline, rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub baseline: f64,
    pub genetic: f64,
    pub hormonal: f64,
    pub lifestyle: f64,
    pub breast_health: f64,
}

impl FactorBreakdown {
    pub fn new(baseline: f64, f: &FactorSet) -> Self {
        Self {
            baseline: round_to(baseline, 4),
            genetic: round_to(f.genetic, 2),
            hormonal: round_to(f.hormonal, 2),
            lifestyle: round_to(f.lifestyle, 2),
            breast_health: round_to(f.breast_health, 2),
        }
    }
}

/// Final scored questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub risk_level: RiskLevel,
    /// Unrounded, in [0, 100].
    pub risk_percentage: f64,
    pub factor_breakdown: FactorBreakdown,
    pub contextual_reasons: Vec<String>,
    pub recommendations: Vec<String>,
    pub chart_data: ComparisonSeries,
    pub baseline_source: BaselineSource,
}

/// Scores profiles against snapshots from an injected provider.
#[derive(Clone)]
pub struct RiskEngine {
    provider: Arc<dyn BaselineProvider>,
}

impl RiskEngine {
    pub fn new(provider: Arc<dyn BaselineProvider>) -> Self {
        Self { provider }
    }

    fn snapshot(&self) -> Option<Arc<BaselineTable>> {
        match self.provider.snapshot() {
            Ok(table) => Some(table),
            Err(e) => {
                warn!(error = %e, "Baseline snapshot unavailable, using default rate");
                None
            }
        }
    }

    /// Baseline rate and the tier that produced it.
    pub fn resolve(&self, age: u32, ethnicity: Ethnicity) -> BaselineRisk {
        match self.snapshot() {
            Some(table) => resolve(&table, age, ethnicity),
            None => BaselineRisk::default_rate(),
        }
    }

    pub fn get_baseline_risk(&self, age: u32, ethnicity: Ethnicity) -> f64 {
        self.resolve(age, ethnicity).rate
    }

    /// Score a validated profile. Baseline problems degrade, never fail.
    pub fn score(&self, profile: &UserProfile) -> RiskResult {
        // One snapshot for the whole computation.
        let table = self.snapshot();

        let baseline = match &table {
            Some(t) => resolve(t, profile.age, profile.ethnicity),
            None => BaselineRisk::default_rate(),
        };
        let factors = compute_factors(profile);

        let adjusted = baseline.rate * factors.product();
        let risk_percentage = (adjusted * 100.0).clamp(0.0, 100.0);
        let risk_level = categorize(risk_percentage);

        let chart_data = match &table {
            Some(t) => ComparisonSeries::build(t, profile.age, profile.ethnicity, baseline.rate),
            None => ComparisonSeries::unavailable(profile.age),
        };

        debug!(
            age = profile.age,
            ethnicity = %profile.ethnicity,
            baseline = baseline.rate,
            source = ?baseline.source,
            risk_percentage,
            level = %risk_level,
            "Profile scored"
        );

        RiskResult {
            risk_level,
            risk_percentage,
            factor_breakdown: FactorBreakdown::new(baseline.rate, &factors),
            contextual_reasons: contextual_reasons(baseline.rate, &factors, profile.anxiety_level),
            recommendations: recommendations(risk_level, &factors),
            chart_data,
            baseline_source: baseline.source,
        }
    }

    /// Validate a raw form, then score it.
    pub fn score_form(&self, form: RiskForm) -> Result<(UserProfile, RiskResult), SchemaValidationError> {
        let profile = UserProfile::try_from(form)?;
        let result = self.score(&profile);
        Ok((profile, result))
    }
}

fn resolve(table: &BaselineTable, age: u32, ethnicity: Ethnicity) -> BaselineRisk {
    let risk = resolve_baseline(table, age, ethnicity);
    match risk.source {
        BaselineSource::NearestAge => {}
        BaselineSource::PopulationMean => {
            warn!(%ethnicity, "No baseline entries for ethnicity, using population mean")
        }
        BaselineSource::Default => warn!("Baseline table is empty, using default rate"),
    }
    risk
}
