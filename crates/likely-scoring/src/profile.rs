//! Questionnaire input and its validated form.
//!
//! `RiskForm` is what arrives over the wire: every field optional, answers
//! as free strings. `UserProfile` is what the engine scores. The conversion
//! between them is the only place a questionnaire is validated.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use likely_common::{Ethnicity, SchemaValidationError};
use serde::{Deserialize, Serialize};

/// Raw questionnaire as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskForm {
    pub symptom: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub access_healthcare: Option<String>,
    pub age_menarche: Option<i64>,
    pub age_thelarche: Option<i64>,
    pub menopause: Option<String>,
    pub age_menopause: Option<i64>,
    pub pregnancy: Option<String>,
    pub pregnancy_age: Option<i64>,
    pub breastfeeding: Option<String>,
    pub pcos: Option<String>,
    pub hormonal_use: Option<String>,
    pub relatives_with_cancer: Option<i64>,
    pub brca_known: Option<String>,
    pub ethnicity: Option<String>,
    pub had_mammo: Option<String>,
    pub breast_density: Option<String>,
    pub benign_lumps: Option<String>,
    pub smoking: Option<String>,
    pub alcohol: Option<String>,
    pub exercise: Option<String>,
    pub anxiety_level: Option<String>,
}

impl RiskForm {
    /// Decode a JSON body. Fields whose value has the wrong JSON type are
    /// reported under `invalid` rather than failing the whole body.
    pub fn from_json(value: serde_json::Value) -> Result<Self, SchemaValidationError> {
        let serde_json::Value::Object(fields) = value else {
            return Err(SchemaValidationError {
                missing: Vec::new(),
                invalid: vec!["body: expected a JSON object".to_string()],
            });
        };

        let invalid: Vec<String> = fields
            .iter()
            .filter_map(|(name, field)| {
                let single = serde_json::Map::from_iter([(name.clone(), field.clone())]);
                serde_json::from_value::<RiskForm>(serde_json::Value::Object(single))
                    .err()
                    .map(|e| format!("{name}: {e}"))
            })
            .collect();
        if !invalid.is_empty() {
            return Err(SchemaValidationError { missing: Vec::new(), invalid });
        }

        serde_json::from_value(serde_json::Value::Object(fields)).map_err(|e| SchemaValidationError {
            missing: Vec::new(),
            invalid: vec![format!("body: {e}")],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised {kind} {value:?}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownLabel {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

/// Lowercase, trim and fold typographic variants so that labels typed by
/// hand and labels sent by the form compare equal.
fn fold(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .replace(['’', '‘'], "'")
        .replace(['–', '—'], "-")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Answer types ──────────────────────────────────────────────────────────────

/// Yes / No / Unsure answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Answer {
    Yes,
    No,
    Unsure,
}

impl FromStr for Answer {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            "unsure" | "not sure" | "don't know" | "dont know" | "prefer not to say" => Ok(Self::Unsure),
            _ => Err(UnknownLabel::new("answer", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BrcaStatus {
    Yes,
    No,
    #[serde(rename = "Not tested / Not sure")]
    NotTested,
}

impl FromStr for BrcaStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold(s).replace(' ', "");
        match folded.as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            "nottested/notsure" | "nottested" | "notsure" | "unsure" => Ok(Self::NotTested),
            _ => Err(UnknownLabel::new("BRCA status", s)),
        }
    }
}

/// Weekly exercise frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Exercise {
    Rarely,
    #[serde(rename = "1–2x/week")]
    OneToTwoWeekly,
    #[serde(rename = "3–5x/week")]
    ThreeToFiveWeekly,
    Daily,
}

impl FromStr for Exercise {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).replace(' ', "").as_str() {
            "rarely" => Ok(Self::Rarely),
            "1-2x/week" => Ok(Self::OneToTwoWeekly),
            "3-5x/week" => Ok(Self::ThreeToFiveWeekly),
            "daily" => Ok(Self::Daily),
            _ => Err(UnknownLabel::new("exercise frequency", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum AnxietyLevel {
    Low,
    Moderate,
    High,
    Debilitating,
}

impl AnxietyLevel {
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::High | Self::Debilitating)
    }
}

impl FromStr for AnxietyLevel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "low" => Ok(Self::Low),
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            "debilitating" => Ok(Self::Debilitating),
            _ => Err(UnknownLabel::new("anxiety level", s)),
        }
    }
}

impl fmt::Display for AnxietyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── Validated profile ────────────────────────────────────────────────────────

/// Free-text context that is echoed back but never scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileContext {
    pub symptom: Option<String>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub access_healthcare: Option<String>,
    pub age_thelarche: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub age: u32,
    pub ethnicity: Ethnicity,
    pub relatives_with_cancer: u32,
    pub brca_known: BrcaStatus,
    pub age_menarche: u32,
    pub menopause: Answer,
    /// Present only when `menopause` is `Yes`.
    pub age_menopause: Option<u32>,
    pub pregnancy: Answer,
    /// Present only when `pregnancy` is `Yes`.
    pub pregnancy_age: Option<u32>,
    pub breastfeeding: Answer,
    pub pcos: Answer,
    pub hormonal_use: Answer,
    pub smoking: Answer,
    pub alcohol: Answer,
    pub exercise: Exercise,
    pub breast_density: Answer,
    pub benign_lumps: Answer,
    pub had_mammo: Answer,
    pub anxiety_level: AnxietyLevel,
    #[serde(flatten)]
    pub context: ProfileContext,
}

pub const AGE_RANGE: RangeInclusive<i64> = 10..=100;
const LIFE_EVENT_AGE: RangeInclusive<i64> = 0..=100;
const RELATIVES: RangeInclusive<i64> = 0..=u32::MAX as i64;

/// Collects every problem in a form instead of stopping at the first.
#[derive(Default)]
struct Checker {
    error: SchemaValidationError,
}

impl Checker {
    fn int(&mut self, field: &str, value: Option<i64>, range: RangeInclusive<i64>) -> Option<u32> {
        match value {
            None => {
                self.error.missing.push(field.to_string());
                None
            }
            Some(v) => self.in_range(field, v, range),
        }
    }

    fn in_range(&mut self, field: &str, value: i64, range: RangeInclusive<i64>) -> Option<u32> {
        if !range.contains(&value) {
            self.error.invalid.push(format!(
                "{field}: {value} outside {}..={}",
                range.start(),
                range.end()
            ));
            return None;
        }
        u32::try_from(value).ok()
    }

    fn label<T: FromStr>(&mut self, field: &str, value: Option<&str>) -> Option<T>
    where
        T::Err: fmt::Display,
    {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => {
                self.error.missing.push(field.to_string());
                None
            }
            Some(raw) => match raw.parse::<T>() {
                Ok(v) => Some(v),
                Err(e) => {
                    self.error.invalid.push(format!("{field}: {e}"));
                    None
                }
            },
        }
    }

    /// A number that only counts when its gate answered `Yes`.
    fn gated(&mut self, field: &str, gate: Option<Answer>, value: Option<i64>) -> Option<u32> {
        match (gate, value) {
            (Some(Answer::Yes), Some(v)) => self.in_range(field, v, LIFE_EVENT_AGE),
            _ => None,
        }
    }
}

fn text(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl TryFrom<RiskForm> for UserProfile {
    type Error = SchemaValidationError;

    fn try_from(form: RiskForm) -> Result<Self, Self::Error> {
        let mut c = Checker::default();

        let age = c.int("age", form.age, AGE_RANGE);
        let ethnicity = c.label::<Ethnicity>("ethnicity", form.ethnicity.as_deref());
        let relatives = c.int("relatives_with_cancer", form.relatives_with_cancer, RELATIVES);
        let brca = c.label::<BrcaStatus>("brca_known", form.brca_known.as_deref());
        let menarche = c.int("age_menarche", form.age_menarche, LIFE_EVENT_AGE);
        let menopause = c.label::<Answer>("menopause", form.menopause.as_deref());
        let age_menopause = c.gated("age_menopause", menopause, form.age_menopause);
        let pregnancy = c.label::<Answer>("pregnancy", form.pregnancy.as_deref());
        let pregnancy_age = c.gated("pregnancy_age", pregnancy, form.pregnancy_age);
        let breastfeeding = c.label::<Answer>("breastfeeding", form.breastfeeding.as_deref());
        let pcos = c.label::<Answer>("pcos", form.pcos.as_deref());
        let hormonal_use = c.label::<Answer>("hormonal_use", form.hormonal_use.as_deref());
        let smoking = c.label::<Answer>("smoking", form.smoking.as_deref());
        let alcohol = c.label::<Answer>("alcohol", form.alcohol.as_deref());
        let exercise = c.label::<Exercise>("exercise", form.exercise.as_deref());
        let breast_density = c.label::<Answer>("breast_density", form.breast_density.as_deref());
        let benign_lumps = c.label::<Answer>("benign_lumps", form.benign_lumps.as_deref());
        let had_mammo = c.label::<Answer>("had_mammo", form.had_mammo.as_deref());
        let anxiety = c.label::<AnxietyLevel>("anxiety_level", form.anxiety_level.as_deref());

        // Free context: a nonsensical thelarche age is dropped, not rejected.
        let age_thelarche = form
            .age_thelarche
            .filter(|a| LIFE_EVENT_AGE.contains(a))
            .and_then(|a| u32::try_from(a).ok());

        if !c.error.is_empty() {
            return Err(c.error);
        }

        let (
            Some(age),
            Some(ethnicity),
            Some(relatives_with_cancer),
            Some(brca_known),
            Some(age_menarche),
            Some(menopause),
            Some(pregnancy),
            Some(breastfeeding),
            Some(pcos),
            Some(hormonal_use),
            Some(smoking),
            Some(alcohol),
            Some(exercise),
            Some(breast_density),
            Some(benign_lumps),
            Some(had_mammo),
            Some(anxiety_level),
        ) = (
            age,
            ethnicity,
            relatives,
            brca,
            menarche,
            menopause,
            pregnancy,
            breastfeeding,
            pcos,
            hormonal_use,
            smoking,
            alcohol,
            exercise,
            breast_density,
            benign_lumps,
            had_mammo,
            anxiety,
        )
        else {
            return Err(c.error);
        };

        Ok(Self {
            age,
            ethnicity,
            relatives_with_cancer,
            brca_known,
            age_menarche,
            menopause,
            age_menopause,
            pregnancy,
            pregnancy_age,
            breastfeeding,
            pcos,
            hormonal_use,
            smoking,
            alcohol,
            exercise,
            breast_density,
            benign_lumps,
            had_mammo,
            anxiety_level,
            context: ProfileContext {
                symptom: text(form.symptom),
                gender: text(form.gender),
                location: text(form.location),
                access_healthcare: text(form.access_healthcare),
                age_thelarche,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use likely_test_utils::{form_with, neutral_form};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<UserProfile, SchemaValidationError> {
        let form: RiskForm = serde_json::from_value(value).unwrap();
        UserProfile::try_from(form)
    }

    #[test]
    fn test_neutral_form_validates() {
        let profile = parse(neutral_form()).unwrap();
        assert_eq!(profile.age, 35);
        assert_eq!(profile.ethnicity, Ethnicity::White);
        assert_eq!(profile.pregnancy, Answer::Unsure);
        assert_eq!(profile.exercise, Exercise::ThreeToFiveWeekly);
        assert_eq!(profile.context.location.as_deref(), Some("Nepal"));
    }

    #[test]
    fn test_missing_fields_are_listed() {
        let mut form = neutral_form();
        let obj = form.as_object_mut().unwrap();
        obj.remove("ethnicity");
        obj.remove("anxiety_level");
        obj.insert("smoking".into(), json!("  "));

        let err = parse(form).unwrap_err();
        assert_eq!(err.missing, vec!["ethnicity", "smoking", "anxiety_level"]);
        assert!(err.invalid.is_empty());
    }

    #[test]
    fn test_out_of_range_and_unknown_labels() {
        let err = parse(form_with(json!({
            "age": 7,
            "relatives_with_cancer": -1,
            "exercise": "Hourly"
        })))
        .unwrap_err();
        assert!(err.missing.is_empty());
        assert_eq!(err.invalid.len(), 3);
        assert!(err.invalid[0].starts_with("age:"));
        assert!(err.invalid[2].contains("Hourly"));
    }

    #[test]
    fn test_age_bounds_are_inclusive() {
        assert!(parse(form_with(json!({ "age": 10 }))).is_ok());
        assert!(parse(form_with(json!({ "age": 100 }))).is_ok());
        assert!(parse(form_with(json!({ "age": 101 }))).is_err());
    }

    #[test]
    fn test_gated_fields_dropped_without_yes() {
        let profile = parse(form_with(json!({
            "menopause": "No",
            "age_menopause": 58,
            "pregnancy": "Yes",
            "pregnancy_age": 31
        })))
        .unwrap();
        assert_eq!(profile.age_menopause, None);
        assert_eq!(profile.pregnancy_age, Some(31));

        // Junk behind a closed gate is ignored rather than rejected.
        assert!(parse(form_with(json!({ "menopause": "No", "age_menopause": -4 }))).is_ok());
    }

    #[test]
    fn test_wrong_json_types_are_invalid() {
        let err = RiskForm::from_json(form_with(json!({ "age": "35", "smoking": 1 }))).unwrap_err();
        assert!(err.missing.is_empty());
        assert_eq!(err.invalid.len(), 2);
        for field in ["age", "smoking"] {
            let prefix = format!("{field}: invalid type");
            assert!(err.invalid.iter().any(|e| e.starts_with(&prefix)), "got {:?}", err.invalid);
        }

        let err = RiskForm::from_json(json!([1, 2])).unwrap_err();
        assert_eq!(err.invalid, vec!["body: expected a JSON object"]);

        let form = RiskForm::from_json(neutral_form()).unwrap();
        assert_eq!(form.age, Some(35));
    }

    #[test]
    fn test_label_variants() {
        assert_eq!("Don’t know".parse::<Answer>(), Ok(Answer::Unsure));
        assert_eq!("Not tested / Not sure".parse::<BrcaStatus>(), Ok(BrcaStatus::NotTested));
        assert_eq!("1-2x/week".parse::<Exercise>(), Ok(Exercise::OneToTwoWeekly));
        assert_eq!("1–2x/week".parse::<Exercise>(), Ok(Exercise::OneToTwoWeekly));
        assert!("maybe".parse::<Answer>().is_err());
    }

    #[test]
    fn test_profile_serializes_with_form_labels() {
        let profile = parse(form_with(json!({ "brca_known": "not sure" }))).unwrap();
        let v = serde_json::to_value(&profile).unwrap();
        assert_eq!(v["brca_known"], json!("Not tested / Not sure"));
        assert_eq!(v["exercise"], json!("3–5x/week"));
        assert_eq!(v["symptom"], json!("breast lump"));
    }
}
