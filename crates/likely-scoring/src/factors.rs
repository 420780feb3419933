//! Multiplicative adjustment factors.

use serde::{Deserialize, Serialize};

use crate::profile::{Answer, BrcaStatus, Exercise, UserProfile};

/// One multiplier per factor category. Every value starts at 1.0 and stays
/// strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorSet {
    pub genetic: f64,
    pub hormonal: f64,
    pub lifestyle: f64,
    pub breast_health: f64,
}

impl Default for FactorSet {
    fn default() -> Self {
        Self {
            genetic: 1.0,
            hormonal: 1.0,
            lifestyle: 1.0,
            breast_health: 1.0,
        }
    }
}

impl FactorSet {
    /// Product of the four category multipliers.
    pub fn product(&self) -> f64 {
        self.genetic * self.hormonal * self.lifestyle * self.breast_health
    }
}

/// Apply every rule to its category's running product. Rules are
/// independent; an `else` only separates mutually exclusive answers.
pub fn compute_factors(p: &UserProfile) -> FactorSet {
    let mut f = FactorSet::default();

    // Genetic & family history
    if p.relatives_with_cancer >= 2 {
        f.genetic *= 3.0;
    } else if p.relatives_with_cancer == 1 {
        f.genetic *= 1.8;
    }
    match p.brca_known {
        BrcaStatus::Yes => f.genetic *= 4.0,
        BrcaStatus::NotTested => f.genetic *= 1.2,
        BrcaStatus::No => {}
    }

    // Hormonal history
    if p.age_menarche <= 11 {
        f.hormonal *= 1.3;
    }
    if p.menopause == Answer::Yes && p.age_menopause.is_some_and(|a| a > 55) {
        f.hormonal *= 1.4;
    } else if p.menopause == Answer::No && p.age > 55 {
        f.hormonal *= 1.2;
    }
    if p.hormonal_use == Answer::Yes {
        f.hormonal *= 1.25;
    }
    if p.pregnancy == Answer::Yes && p.pregnancy_age.is_some_and(|a| a >= 30) {
        f.hormonal *= 1.15;
    } else if p.pregnancy == Answer::No {
        f.hormonal *= 1.1;
    }
    if p.breastfeeding == Answer::Yes {
        f.hormonal *= 0.9;
    }
    if p.pcos == Answer::Yes {
        f.hormonal *= 1.2;
    }

    // Lifestyle
    if p.smoking == Answer::Yes {
        f.lifestyle *= 1.3;
    }
    if p.alcohol == Answer::Yes {
        f.lifestyle *= 1.2;
    }
    match p.exercise {
        Exercise::Rarely | Exercise::OneToTwoWeekly => f.lifestyle *= 1.15,
        Exercise::Daily => f.lifestyle *= 0.9,
        Exercise::ThreeToFiveWeekly => {}
    }

    // Breast health
    if p.breast_density == Answer::Yes {
        f.breast_health *= 1.4;
    }
    if p.benign_lumps == Answer::Yes {
        f.breast_health *= 1.3;
    }
    if p.had_mammo == Answer::Yes {
        f.breast_health *= 0.8;
    }

    f
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::RiskForm;
    use likely_test_utils::{form_with, neutral_form};
    use serde_json::json;

    fn profile(value: serde_json::Value) -> UserProfile {
        let form: RiskForm = serde_json::from_value(value).unwrap();
        UserProfile::try_from(form).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_neutral_profile_has_unit_factors() {
        let f = compute_factors(&profile(neutral_form()));
        assert_eq!(f, FactorSet::default());
        assert_eq!(f.product(), 1.0);
    }

    #[test]
    fn test_genetic_rules_compound() {
        let f = compute_factors(&profile(form_with(json!({
            "relatives_with_cancer": 1,
            "brca_known": "Not tested / Not sure"
        }))));
        assert!(close(f.genetic, 1.8 * 1.2));

        let f = compute_factors(&profile(form_with(json!({
            "relatives_with_cancer": 5,
            "brca_known": "Yes"
        }))));
        assert!(close(f.genetic, 12.0));
    }

    #[test]
    fn test_late_menopause_needs_gate_and_age() {
        let f = compute_factors(&profile(form_with(json!({
            "age": 60, "menopause": "Yes", "age_menopause": 57
        }))));
        assert!(close(f.hormonal, 1.4));

        // Gate open but age missing: no adjustment.
        let f = compute_factors(&profile(form_with(json!({
            "age": 60, "menopause": "Yes", "age_menopause": null
        }))));
        assert!(close(f.hormonal, 1.0));

        // Still menstruating past 55.
        let f = compute_factors(&profile(form_with(json!({ "age": 56, "menopause": "No" }))));
        assert!(close(f.hormonal, 1.2));
    }

    #[test]
    fn test_menopause_thresholds_are_strict() {
        let f = compute_factors(&profile(form_with(json!({
            "age": 60, "menopause": "Yes", "age_menopause": 55
        }))));
        assert!(close(f.hormonal, 1.0));

        let f = compute_factors(&profile(form_with(json!({
            "age": 60, "menopause": "Yes", "age_menopause": 56
        }))));
        assert!(close(f.hormonal, 1.4));

        let f = compute_factors(&profile(form_with(json!({ "age": 55, "menopause": "No" }))));
        assert!(close(f.hormonal, 1.0));
    }

    #[test]
    fn test_hormonal_rules() {
        let f = compute_factors(&profile(form_with(json!({
            "age_menarche": 11,
            "hormonal_use": "Yes",
            "pregnancy": "No",
            "breastfeeding": "Yes",
            "pcos": "Yes"
        }))));
        assert!(close(f.hormonal, 1.3 * 1.25 * 1.1 * 0.9 * 1.2));

        let f = compute_factors(&profile(form_with(json!({
            "pregnancy": "Yes", "pregnancy_age": 30
        }))));
        assert!(close(f.hormonal, 1.15));
    }

    #[test]
    fn test_lifestyle_and_breast_health() {
        let f = compute_factors(&profile(form_with(json!({
            "smoking": "Yes", "alcohol": "Yes", "exercise": "Rarely",
            "breast_density": "Yes", "benign_lumps": "Yes", "had_mammo": "Yes"
        }))));
        assert!(close(f.lifestyle, 1.3 * 1.2 * 1.15));
        assert!(close(f.breast_health, 1.4 * 1.3 * 0.8));

        let f = compute_factors(&profile(form_with(json!({ "exercise": "Daily" }))));
        assert!(close(f.lifestyle, 0.9));
    }

    #[test]
    fn test_unsure_answers_never_adjust() {
        let f = compute_factors(&profile(form_with(json!({
            "menopause": "Not sure", "pregnancy": "Not sure", "hormonal_use": "Not sure",
            "breast_density": "Don't know", "smoking": "Prefer not to say"
        }))));
        assert_eq!(f, FactorSet::default());
    }
}
