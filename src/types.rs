#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::grade::{GradeError, GradeScale};

/// The academic level an examination is set at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcademicLevel {
    /// Primary school.
    Primary,
    /// Ordinary level secondary school.
    OLevel,
    /// Advanced level secondary school.
    ALevel,
    /// University or college.
    University,
}

impl AcademicLevel {
    /// Every recognised level, in ascending order.
    pub const ALL: [AcademicLevel; 4] = [
        AcademicLevel::Primary,
        AcademicLevel::OLevel,
        AcademicLevel::ALevel,
        AcademicLevel::University,
    ];

    /// Canonical token for this level, eg. `O_LEVEL`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AcademicLevel::Primary => "PRIMARY",
            AcademicLevel::OLevel => "O_LEVEL",
            AcademicLevel::ALevel => "A_LEVEL",
            AcademicLevel::University => "UNIVERSITY",
        }
    }

    /// The threshold table used to grade examinations at this level.
    ///
    /// Primary, O-Level and A-Level currently share the secondary table.
    pub fn scale(&self) -> GradeScale {
        match self {
            AcademicLevel::University => GradeScale::University,
            AcademicLevel::Primary | AcademicLevel::OLevel | AcademicLevel::ALevel => {
                GradeScale::Secondary
            }
        }
    }
}

impl Display for AcademicLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AcademicLevel {
    type Err = GradeError;

    /// Accepts the canonical tokens in any case, with `-` or spaces in place
    /// of underscores (`o-level`, `O Level`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "PRIMARY" => Ok(AcademicLevel::Primary),
            "O_LEVEL" => Ok(AcademicLevel::OLevel),
            "A_LEVEL" => Ok(AcademicLevel::ALevel),
            "UNIVERSITY" => Ok(AcademicLevel::University),
            _ => Err(GradeError::UnknownLevel(s.to_string())),
        }
    }
}

/// A letter grade across both scales, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    /// `A+`, university scale only.
    #[serde(rename = "A+")]
    APlus,
    /// `A`
    A,
    /// `B+`, university scale only.
    #[serde(rename = "B+")]
    BPlus,
    /// `B`
    B,
    /// `C+`, university scale only.
    #[serde(rename = "C+")]
    CPlus,
    /// `C`
    C,
    /// `D`
    D,
    /// `F`
    F,
}

impl LetterGrade {
    /// Display form, eg. `B+`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }

    /// Anything but `F` counts as a pass.
    pub fn is_pass(&self) -> bool {
        !matches!(self, LetterGrade::F)
    }
}

impl Display for LetterGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication state of a stored grade record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GradeStatus {
    /// Entered by staff, not yet visible to students or parents.
    #[default]
    Draft,
    /// Released.
    Published,
}

impl Display for GradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeStatus::Draft => f.write_str("DRAFT"),
            GradeStatus::Published => f.write_str("PUBLISHED"),
        }
    }
}
