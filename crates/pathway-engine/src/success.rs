//! Success narrative selection.
//!
//! Picks exactly one template key from a fixed priority table once every
//! rule has run. The order of the branches is part of the contract:
//!
//! 1. closed window
//! 2. community-college track (GPA band C-E)
//! 3. UC-bound profiles, narrowed by campus targets and time window
//! 4. CSU fallback

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::context::EvaluationContext;
use crate::derived::TimeWindow;

/// Text used when a ruleset has no entry for the selected key.
pub const FALLBACK_SUCCESS_TEXT: &str =
    "Success means keeping a realistic set of college options open and taking the next concrete step toward them.";

/// UC campuses that guard a selectivity floor.
const FLOOR_GUARDED_CAMPUSES: [&str; 4] = ["UCR", "UCSC", "UCSD", "UCLA"];

/// The access campus, checked before the floor-guarded set.
const ACCESS_CAMPUS: &str = "UCM";

/// Key of a success narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKey {
    /// Grade 12, October or later.
    ClosedWindow,
    /// Community-college track with transfer in view.
    CcToUc,
    /// Community-college track without transfer under consideration.
    CcTransferRefused,
    /// UC-bound, targeting the access campus.
    AccessUc,
    /// UC-bound, targeting floor-guarded campuses.
    FloorGuardedUc,
    /// UC-bound, other campuses, early window.
    MidUcEarly,
    /// UC-bound, other campuses, later window.
    MidUcLate,
    /// Fallback.
    Csu,
}

impl TemplateKey {
    /// Wire name of the key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClosedWindow => "closed_window",
            Self::CcToUc => "cc_to_uc",
            Self::CcTransferRefused => "cc_transfer_refused",
            Self::AccessUc => "access_uc",
            Self::FloorGuardedUc => "floor_guarded_uc",
            Self::MidUcEarly => "mid_uc_early",
            Self::MidUcLate => "mid_uc_late",
            Self::Csu => "csu",
        }
    }

    /// Narrative text for this key from `templates`, or the fallback.
    pub fn text<'a>(self, templates: &'a BTreeMap<String, String>) -> &'a str {
        templates
            .get(self.as_str())
            .map_or(FALLBACK_SUCCESS_TEXT, String::as_str)
    }
}

impl std::fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Choose the success template for a fully evaluated context.
pub fn select_template(ctx: &EvaluationContext) -> TemplateKey {
    let considers = |system: &str| ctx.list_contains("input.systems_considered", system);
    let targets = |campus: &str| ctx.list_contains("input.campus_targets_uc", campus);

    if ctx.derived.time_window == TimeWindow::Closed {
        return TemplateKey::ClosedWindow;
    }

    if ctx.derived.gpa_band.is_cc_track() {
        return if considers("cc_transfer") {
            TemplateKey::CcToUc
        } else {
            TemplateKey::CcTransferRefused
        };
    }

    if considers("uc") {
        if targets(ACCESS_CAMPUS) {
            return TemplateKey::AccessUc;
        }
        if FLOOR_GUARDED_CAMPUSES.into_iter().any(targets) {
            return TemplateKey::FloorGuardedUc;
        }
        return if ctx.derived.time_window == TimeWindow::Early {
            TemplateKey::MidUcEarly
        } else {
            TemplateKey::MidUcLate
        };
    }

    TemplateKey::Csu
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
