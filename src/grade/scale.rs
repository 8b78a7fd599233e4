#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::types::LetterGrade;

/// One row of a threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct ScaleBand {
    #[tabled(rename = "From (%)")]
    /// Inclusive lower bound on the percentage.
    pub min_percentage: f64,
    #[tabled(rename = "Grade")]
    /// Letter awarded for this band.
    pub letter:         LetterGrade,
    #[tabled(rename = "Points")]
    /// Grade points awarded for this band.
    pub points:         f64,
}

/// Shorthand for building the static tables below.
const fn band(min_percentage: f64, letter: LetterGrade, points: f64) -> ScaleBand {
    ScaleBand {
        min_percentage,
        letter,
        points,
    }
}

/// University table, descending.
static UNIVERSITY_BANDS: [ScaleBand; 8] = [
    band(90.0, LetterGrade::APlus, 4.0),
    band(80.0, LetterGrade::A, 3.7),
    band(75.0, LetterGrade::BPlus, 3.3),
    band(70.0, LetterGrade::B, 3.0),
    band(65.0, LetterGrade::CPlus, 2.7),
    band(60.0, LetterGrade::C, 2.3),
    band(50.0, LetterGrade::D, 2.0),
    band(0.0, LetterGrade::F, 0.0),
];

/// Primary, O-Level and A-Level table, descending.
static SECONDARY_BANDS: [ScaleBand; 5] = [
    band(80.0, LetterGrade::A, 7.0),
    band(60.0, LetterGrade::B, 5.0),
    band(40.0, LetterGrade::C, 3.0),
    band(20.0, LetterGrade::D, 1.0),
    band(0.0, LetterGrade::F, 0.0),
];

/// A threshold table mapping percentages to letters and points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeScale {
    /// Eight-band GPA scale used for university examinations.
    University,
    /// Five-band scale shared by primary and secondary examinations.
    Secondary,
}

impl GradeScale {
    /// Bands in descending order of `min_percentage`; the last band always
    /// starts at zero.
    pub fn bands(&self) -> &'static [ScaleBand] {
        match self {
            GradeScale::University => &UNIVERSITY_BANDS,
            GradeScale::Secondary => &SECONDARY_BANDS,
        }
    }

    /// Finds the band for `percentage`. Lower bounds are inclusive and checked
    /// top-down, so a value sitting exactly on a boundary gets the higher
    /// band.
    pub fn band_for(&self, percentage: f64) -> &'static ScaleBand {
        let bands = self.bands();
        bands
            .iter()
            .find(|b| percentage >= b.min_percentage)
            .unwrap_or(&bands[bands.len() - 1])
    }

    /// Letters this scale can award, best first.
    pub fn letters(self) -> impl Iterator<Item = LetterGrade> {
        self.bands().iter().map(|b| b.letter)
    }
}

impl Display for GradeScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeScale::University => f.write_str("University"),
            GradeScale::Secondary => f.write_str("Secondary"),
        }
    }
}
