//! Human-readable reasons and recommendations.
//!
//! Sentences are emitted in a fixed order (baseline, genetic, hormonal,
//! lifestyle, breast health, anxiety) so the same profile always produces the
//! same list.

use crate::factors::FactorSet;
use crate::profile::AnxietyLevel;
use crate::scorer::RiskLevel;

pub const STRONG_FAMILY_HISTORY: &str = "Strong family history significantly increases risk";
pub const MODERATE_FAMILY_HISTORY: &str = "Family history moderately increases risk";
pub const HORMONAL_EXPOSURE: &str = "Your hormonal history points to elevated lifetime hormonal exposure";
pub const LIFESTYLE_RISK: &str = "Lifestyle choices (smoking/alcohol/inactivity) increase risk";
pub const LIFESTYLE_PROTECTIVE: &str = "Healthy lifestyle choices provide some protection";
pub const BREAST_HEALTH_RISK: &str = "Breast health history indicates elevated risk";
pub const ANXIETY_SUPPORT: &str = "You're feeling very anxious. This tool is designed to guide and support, \
                                   not diagnose; please consult a healthcare professional for evaluation";

pub const SCREENING_ADVICE: &str = "Talk to a healthcare professional about breast screening suited to your risk";
pub const LIFESTYLE_ADVICE: &str = "Cutting down on alcohol, not smoking and exercising regularly can lower your risk";
pub const HORMONAL_ADVICE: &str = "Discuss your hormonal history and any hormone therapy with your doctor";

pub fn baseline_sentence(baseline: f64) -> String {
    format!("Baseline risk for your demographic: {:.1}%", baseline * 100.0)
}

pub fn contextual_reasons(baseline: f64, f: &FactorSet, anxiety: AnxietyLevel) -> Vec<String> {
    let mut reasons = vec![baseline_sentence(baseline)];

    if f.genetic > 1.5 {
        let note = if f.genetic >= 3.0 { STRONG_FAMILY_HISTORY } else { MODERATE_FAMILY_HISTORY };
        reasons.push(note.into());
    }
    if f.hormonal >= 1.2 {
        reasons.push(HORMONAL_EXPOSURE.into());
    }
    if f.lifestyle >= 1.2 {
        reasons.push(LIFESTYLE_RISK.into());
    } else if f.lifestyle <= 0.9 {
        reasons.push(LIFESTYLE_PROTECTIVE.into());
    }
    if f.breast_health >= 1.3 {
        reasons.push(BREAST_HEALTH_RISK.into());
    }
    if anxiety.is_elevated() {
        reasons.push(ANXIETY_SUPPORT.into());
    }
    reasons
}

pub fn recommendations(level: RiskLevel, f: &FactorSet) -> Vec<String> {
    let mut out = Vec::new();
    if level >= RiskLevel::Moderate {
        out.push(SCREENING_ADVICE.to_string());
    }
    if f.lifestyle > 1.1 {
        out.push(LIFESTYLE_ADVICE.to_string());
    }
    if f.hormonal > 1.2 {
        out.push(HORMONAL_ADVICE.to_string());
    }
    out
}
