//! Output shaping: truncation, suppression filtering and note dedup.
//!
//! Suppression filtering is a coarse, case-insensitive substring match of
//! each action line against the keywords of every active flag. It can drop
//! lines that merely contain a keyword (`"ap"` inside `"apply"`).

use std::collections::HashSet;

use tracing::debug;

use crate::state::{EngineState, OutputCategory, SuppressionState};
use crate::types::{CategorizedOutputs, OutputConstraints};

/// Substrings that mark an action line as belonging to a suppressed flag.
pub const SUPPRESSION_KEYWORDS: &[(&str, &[&str])] = &[
    ("testing", &["test"]),
    ("cc", &["cc"]),
    ("ap", &["ap", "honors"]),
    ("internships", &["intern"]),
    ("extracurriculars", &["ec", "club"]),
    ("middle_college", &["middle college"]),
];

/// Keywords of every active flag.
pub fn active_keywords(suppress: &SuppressionState) -> Vec<&'static str> {
    SUPPRESSION_KEYWORDS
        .iter()
        .filter(|(flag, _)| suppress.is_suppressed(flag))
        .flat_map(|(_, keywords)| keywords.iter().copied())
        .collect()
}

/// Whether `line` mentions any of `keywords`, ignoring case.
pub fn mentions_any(line: &str, keywords: &[&str]) -> bool {
    let lower = line.to_lowercase();
    keywords.iter().any(|keyword| lower.contains(keyword))
}

/// Shape accumulated state into bounded output lists.
///
/// 1. `locked` and `viable` keep their first N lines.
/// 2. `actions` drops lines matching an active flag's keywords, then keeps
///    its first N.
/// 3. `stop` keeps its first N.
/// 4. `notes` is deduplicated and keeps its first N.
pub fn shape(state: EngineState, constraints: &OutputConstraints) -> CategorizedOutputs {
    let keywords = active_keywords(&state.suppress);

    let mut locked = state.locked.into_vec();
    locked.truncate(constraints.limit(OutputCategory::Locked));

    let mut viable = state.viable.into_vec();
    viable.truncate(constraints.limit(OutputCategory::Viable));

    let mut actions: Vec<String> = state
        .actions
        .into_vec()
        .into_iter()
        .filter(|line| {
            let drop = mentions_any(line, &keywords);
            if drop {
                debug!(line = %line, "action suppressed");
            }
            !drop
        })
        .collect();
    actions.truncate(constraints.limit(OutputCategory::Actions));

    let mut stop = state.stop.into_vec();
    stop.truncate(constraints.limit(OutputCategory::Stop));

    let mut seen = HashSet::new();
    let mut notes: Vec<String> = state
        .notes
        .into_vec()
        .into_iter()
        .filter(|note| seen.insert(note.clone()))
        .collect();
    notes.truncate(constraints.limit(OutputCategory::Notes));

    CategorizedOutputs {
        locked,
        viable,
        actions,
        stop,
        notes,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
