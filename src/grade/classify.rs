#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use thiserror::Error;

use super::results::GradeResult;
use crate::types::AcademicLevel;

/// Ways classification can refuse its input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradeError {
    /// Marks are outside `[0, max_marks]`, `max_marks` is not positive, or a
    /// value is not finite.
    #[error("Invalid marks: {0}")]
    InvalidInput(String),
    /// The academic level is not one of `PRIMARY`, `O_LEVEL`, `A_LEVEL` or
    /// `UNIVERSITY`.
    #[error("Unknown academic level `{0}`; expected one of PRIMARY, O_LEVEL, A_LEVEL, UNIVERSITY")]
    UnknownLevel(String),
}

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Checks `0 <= raw_marks <= max_marks` and `max_marks > 0`.
fn validate(raw_marks: f64, max_marks: f64) -> Result<(), GradeError> {
    if !raw_marks.is_finite() || !max_marks.is_finite() {
        return Err(GradeError::InvalidInput(format!(
            "marks must be finite numbers (got {raw_marks}/{max_marks})"
        )));
    }
    if max_marks <= 0.0 {
        return Err(GradeError::InvalidInput(format!(
            "maximum marks must be greater than zero (got {max_marks})"
        )));
    }
    if raw_marks < 0.0 || raw_marks > max_marks {
        return Err(GradeError::InvalidInput(format!(
            "raw marks must be between 0 and {max_marks} (got {raw_marks})"
        )));
    }
    Ok(())
}

/// Classifies `raw_marks` out of `max_marks` on the scale for `level`.
///
/// The percentage is rounded to two decimals before the band lookup, so the
/// letter and points are a function of the rounded percentage and the level
/// only.
pub fn classify(
    raw_marks: f64,
    max_marks: f64,
    level: AcademicLevel,
) -> Result<GradeResult, GradeError> {
    validate(raw_marks, max_marks)?;

    let percentage = round2(raw_marks / max_marks * 100.0);
    let band = level.scale().band_for(percentage);

    Ok(GradeResult {
        percentage,
        letter_grade: band.letter,
        grade_points: band.points,
    })
}

/// Same as [`classify`], with the level given as text.
///
/// The level is parsed first, so an unknown level is reported even when the
/// marks are also invalid.
pub fn classify_str(
    raw_marks: f64,
    max_marks: f64,
    level: &str,
) -> Result<GradeResult, GradeError> {
    let level: AcademicLevel = level.parse()?;
    classify(raw_marks, max_marks, level)
}
