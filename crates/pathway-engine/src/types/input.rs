//! Student input record.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Lowest unweighted GPA the form accepts.
pub const GPA_MIN: f64 = 2.0;
/// Highest unweighted GPA the form accepts.
pub const GPA_MAX: f64 = 4.0;

/// Facts about one student, as read from the intake form.
///
/// Every field is optional on the wire. Keys this struct does not name are
/// kept in [`extra`](Self::extra) so rule conditions can still reach them
/// as `input.<key>`.
///
/// The nullable fields are `Option<Option<T>>`: `None` when the key was
/// absent, `Some(None)` when it was an explicit `null`. Both survive into
/// the `input.*` view, so `null` compares the same way on named and extra
/// keys. A `null` list reads as empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::option_option)]
pub struct StudentInput {
    /// Current grade, normally 9-12.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<i64>,
    /// Month bucket, only meaningful in grade 12 (e.g. `"october_or_later"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_month_bucket: Option<String>,
    /// Unweighted GPA.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa_unweighted: Option<f64>,
    /// Direction of recent grades (e.g. `"rising"`, `"flat"`, `"falling"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa_trend: Option<String>,
    /// Where the course rigor is concentrated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_concentration: Option<String>,
    /// Coarse intended-major bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major_bucket: Option<String>,
    /// Systems under consideration (`"uc"`, `"csu"`, `"cc_transfer"`, ...).
    #[serde(deserialize_with = "null_as_empty")]
    pub systems_considered: Vec<String>,
    /// Willing to take community college courses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub willing_cc_courses: Option<bool>,
    /// Willing to take summer coursework.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub willing_summer_courses: Option<bool>,
    /// Willing to sit standardized tests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub willing_testing: Option<bool>,
    /// Willing to pursue internships.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub willing_internships: Option<bool>,
    /// Weeks of summer travel, if any.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable"
    )]
    pub summer_travel_weeks: Option<Option<i64>>,
    /// UC campus codes targeted (`"UCM"`, `"UCLA"`, ...).
    #[serde(deserialize_with = "null_as_empty")]
    pub campus_targets_uc: Vec<String>,
    /// When an academic anomaly happened, if any.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable"
    )]
    pub academic_anomaly_timing: Option<Option<String>>,
    /// Level of extracurricular leadership recognition, if any.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable"
    )]
    pub ec_leadership_recognition: Option<Option<String>>,
    /// Signals from the senior-year course plan.
    #[serde(deserialize_with = "null_as_empty")]
    pub senior_course_signals: Vec<String>,
    /// Routing facts not modeled above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl StudentInput {
    /// Clamp `gpa_unweighted` into `[GPA_MIN, GPA_MAX]`.
    ///
    /// A non-finite GPA is dropped.
    pub fn clamp_gpa(&mut self) {
        self.gpa_unweighted = self
            .gpa_unweighted
            .filter(|gpa| gpa.is_finite())
            .map(|gpa| gpa.clamp(GPA_MIN, GPA_MAX));
    }

    /// JSON view used for `input.*` lookups.
    ///
    /// Absent optional fields are omitted so they resolve as undefined;
    /// explicit `null`s on nullable fields are kept.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Present-but-`null` becomes `Some(None)`; an absent key never reaches
/// this and falls back to the field default.
#[allow(clippy::option_option)]
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_partial_record() {
        let input: StudentInput = serde_json::from_value(json!({
            "grade_level": 11,
            "gpa_unweighted": 3.4,
            "systems_considered": ["uc", "csu"]
        }))
        .unwrap();
        assert_eq!(input.grade_level, Some(11));
        assert_eq!(input.gpa_unweighted, Some(3.4));
        assert_eq!(input.systems_considered, vec!["uc", "csu"]);
        assert!(input.campus_targets_uc.is_empty());
    }

    #[test]
    fn unknown_keys_kept_as_extra() {
        let input: StudentInput = serde_json::from_value(json!({
            "grade_level": 10,
            "route_hint": "athletics"
        }))
        .unwrap();
        assert_eq!(input.extra.get("route_hint"), Some(&json!("athletics")));
        assert_eq!(input.to_value()["route_hint"], "athletics");
    }

    #[test]
    fn to_value_omits_absent_optionals() {
        let input = StudentInput {
            grade_level: Some(9),
            ..Default::default()
        };
        let value = input.to_value();
        assert_eq!(value["grade_level"], 9);
        assert!(value.get("gpa_unweighted").is_none());
        assert!(value.get("summer_travel_weeks").is_none());
        assert_eq!(value["systems_considered"], json!([]));
    }

    #[test]
    fn explicit_null_is_kept_apart_from_absent() {
        let input: StudentInput = serde_json::from_value(json!({
            "summer_travel_weeks": null,
            "ec_leadership_recognition": "state"
        }))
        .unwrap();
        assert_eq!(input.summer_travel_weeks, Some(None));
        assert_eq!(input.ec_leadership_recognition, Some(Some("state".to_string())));
        assert_eq!(input.academic_anomaly_timing, None);

        let value = input.to_value();
        assert_eq!(value.get("summer_travel_weeks"), Some(&Value::Null));
        assert!(value.get("academic_anomaly_timing").is_none());
    }

    #[test]
    fn null_lists_read_as_empty() {
        let input: StudentInput = serde_json::from_value(json!({
            "grade_level": 12,
            "systems_considered": null,
            "campus_targets_uc": null,
            "senior_course_signals": null
        }))
        .unwrap();
        assert_eq!(input.grade_level, Some(12));
        assert!(input.systems_considered.is_empty());
        assert!(input.campus_targets_uc.is_empty());
        assert!(input.senior_course_signals.is_empty());
        assert_eq!(input.to_value()["campus_targets_uc"], json!([]));
    }

    #[test]
    fn clamp_gpa_bounds() {
        let mut high = StudentInput {
            gpa_unweighted: Some(4.6),
            ..Default::default()
        };
        high.clamp_gpa();
        assert_eq!(high.gpa_unweighted, Some(GPA_MAX));

        let mut low = StudentInput {
            gpa_unweighted: Some(1.2),
            ..Default::default()
        };
        low.clamp_gpa();
        assert_eq!(low.gpa_unweighted, Some(GPA_MIN));

        let mut nan = StudentInput {
            gpa_unweighted: Some(f64::NAN),
            ..Default::default()
        };
        nan.clamp_gpa();
        assert_eq!(nan.gpa_unweighted, None);
    }
}
