#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Percentage, letter and points for raw marks.
pub mod classify;
/// Table rendering for the CLI.
pub mod report;
/// Input and result types.
pub mod results;
/// Threshold tables.
pub mod scale;
/// Per-examination statistics over stored records.
pub mod stats;

pub use classify::{GradeError, classify, classify_str, round2};
pub use results::{GradeInput, GradeResult};
pub use scale::{GradeScale, ScaleBand};
pub use stats::{ExaminationStats, LetterCount, aggregate, aggregate_all};
