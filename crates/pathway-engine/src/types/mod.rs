//! Record types at the engine boundary.
//!
//! - [`StudentInput`]: the facts a caller supplies for one evaluation
//! - [`Ruleset`]: the externally supplied rule configuration
//! - [`Recommendation`]: the shaped presentation record

mod input;
mod output;
mod ruleset;

pub use input::*;
pub use output::*;
pub use ruleset::*;
