//! Facts derived once from the input before any rule runs.
//!
//! Exposed to conditions as `derived.gpa_band` and `derived.time_window`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::StudentInput;

/// Month bucket that closes the grade-12 window.
pub const OCTOBER_OR_LATER: &str = "october_or_later";

/// Coarse letter band of unweighted GPA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GpaBand {
    /// 3.80 and above.
    A,
    /// 3.50 to 3.79.
    B,
    /// 3.20 to 3.49.
    C,
    /// 2.80 to 3.19.
    D,
    /// Below 2.80, or unknown.
    E,
}

impl GpaBand {
    /// Band for a GPA value; the highest threshold reached wins.
    pub fn from_gpa(gpa: f64) -> Self {
        if gpa >= 3.80 {
            Self::A
        } else if gpa >= 3.50 {
            Self::B
        } else if gpa >= 3.20 {
            Self::C
        } else if gpa >= 2.80 {
            Self::D
        } else {
            Self::E
        }
    }

    /// Bands where the community-college route is the primary track.
    pub fn is_cc_track(self) -> bool {
        matches!(self, Self::C | Self::D | Self::E)
    }

    /// Wire name of the band.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        }
    }
}

impl std::fmt::Display for GpaBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much application runway remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    /// Grades 9-10, or an unrecognized grade.
    Early,
    /// Grade 11.
    Late,
    /// Grade 12 before October.
    Final,
    /// Grade 12, October or later.
    Closed,
}

impl TimeWindow {
    /// Window for a grade level and month bucket.
    pub fn from_grade(grade_level: Option<i64>, month_bucket: Option<&str>) -> Self {
        match grade_level {
            Some(11) => Self::Late,
            Some(12) if month_bucket == Some(OCTOBER_OR_LATER) => Self::Closed,
            Some(12) => Self::Final,
            _ => Self::Early,
        }
    }

    /// Wire name of the window.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Early => "early",
            Self::Late => "late",
            Self::Final => "final",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `derived` namespace of an evaluation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFacts {
    /// Band of `gpa_unweighted`.
    pub gpa_band: GpaBand,
    /// Window from `grade_level` and `grade_month_bucket`.
    pub time_window: TimeWindow,
}

impl DerivedFacts {
    /// Compute derived facts for an input record.
    pub fn compute(input: &StudentInput) -> Self {
        Self {
            gpa_band: input.gpa_unweighted.map_or(GpaBand::E, GpaBand::from_gpa),
            time_window: TimeWindow::from_grade(
                input.grade_level,
                input.grade_month_bucket.as_deref(),
            ),
        }
    }

    /// Value of one derived fact by name.
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            "gpa_band" => Some(Value::from(self.gpa_band.as_str())),
            "time_window" => Some(Value::from(self.time_window.as_str())),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
