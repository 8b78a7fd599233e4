#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tabled::Tabled;
use typed_builder::TypedBuilder;

use super::classify::{GradeError, classify};
use crate::types::{AcademicLevel, LetterGrade};

/// Marks for one student on one examination, ready to be classified.
#[derive(Debug, Clone, Copy, PartialEq, TypedBuilder, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeInput {
    /// Marks obtained, `0 <= raw_marks <= max_marks`.
    pub raw_marks:      f64,
    /// Maximum marks for the examination, strictly positive.
    pub max_marks:      f64,
    /// Level the examination is set at.
    pub academic_level: AcademicLevel,
}

impl GradeInput {
    /// Classifies these marks.
    pub fn classify(&self) -> Result<GradeResult, GradeError> {
        classify(self.raw_marks, self.max_marks, self.academic_level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Tabled, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Percentage, letter and points for a set of marks
pub struct GradeResult {
    #[tabled(rename = "Percentage")]
    /// * `percentage`: marks as a percentage of the maximum, 2 decimal places
    pub percentage:   f64,
    #[tabled(rename = "Grade")]
    /// * `letter_grade`: letter from the level's scale
    pub letter_grade: LetterGrade,
    #[tabled(rename = "Points")]
    /// * `grade_points`: points attached to `letter_grade`
    pub grade_points: f64,
}

impl Display for GradeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}% {} ({:.1})", self.percentage, self.letter_grade, self.grade_points)
    }
}
