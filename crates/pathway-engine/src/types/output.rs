//! Presentation record handed to the rendering layer.

use serde::{Deserialize, Serialize};

use crate::derived::{GpaBand, TimeWindow};
use crate::success::TemplateKey;

/// The five shaped output categories.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedOutputs {
    /// Options that are effectively decided.
    pub locked: Vec<String>,
    /// Options still open.
    pub viable: Vec<String>,
    /// Recommended next steps, after suppression filtering.
    pub actions: Vec<String>,
    /// Things to stop doing.
    pub stop: Vec<String>,
    /// Free-form notes.
    pub notes: Vec<String>,
}

impl CategorizedOutputs {
    /// Whether every category is empty.
    pub fn is_empty(&self) -> bool {
        self.locked.is_empty()
            && self.viable.is_empty()
            && self.actions.is_empty()
            && self.stop.is_empty()
            && self.notes.is_empty()
    }
}

/// Final result of one evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Bounded, filtered category lists.
    #[serde(flatten)]
    pub outputs: CategorizedOutputs,
    /// Selected success narrative key.
    pub template_key: TemplateKey,
    /// Narrative text for `template_key`, or the generic fallback.
    pub success_text: String,
    /// Derived GPA band, for display.
    pub gpa_band: GpaBand,
    /// Derived time window, for display.
    pub time_window: TimeWindow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_flat_camel_case() {
        let rec = Recommendation {
            outputs: CategorizedOutputs {
                locked: vec!["UC eligibility".into()],
                ..Default::default()
            },
            template_key: TemplateKey::MidUcLate,
            success_text: "text".into(),
            gpa_band: GpaBand::B,
            time_window: TimeWindow::Late,
        };
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["locked"][0], "UC eligibility");
        assert_eq!(value["actions"], serde_json::json!([]));
        assert_eq!(value["templateKey"], "mid_uc_late");
        assert_eq!(value["successText"], "text");
        assert_eq!(value["gpaBand"], "B");
        assert_eq!(value["timeWindow"], "late");
    }

    #[test]
    fn is_empty_checks_all_categories() {
        let mut outputs = CategorizedOutputs::default();
        assert!(outputs.is_empty());
        outputs.stop.push("x".into());
        assert!(!outputs.is_empty());
    }
}
