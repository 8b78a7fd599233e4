#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::BTreeMap;

use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use super::classify::round2;
use crate::{store::GradeRecord, types::LetterGrade};

/// How many records received a given letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct LetterCount {
    #[tabled(rename = "Grade")]
    /// The letter.
    pub letter: LetterGrade,
    #[tabled(rename = "Count")]
    /// Records with that letter.
    pub count:  usize,
}

/// Summary of the stored grades for one examination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExaminationStats {
    /// Examination the summary is for.
    pub examination_id:     String,
    /// Number of records summarised.
    pub count:              usize,
    /// Mean raw marks.
    pub average_marks:      Option<f64>,
    /// Lowest raw marks.
    pub min_marks:          Option<f64>,
    /// Highest raw marks.
    pub max_marks:          Option<f64>,
    /// Mean percentage.
    pub average_percentage: Option<f64>,
    /// Lowest percentage.
    pub min_percentage:     Option<f64>,
    /// Highest percentage.
    pub max_percentage:     Option<f64>,
    /// Mean grade points.
    pub average_points:     Option<f64>,
    /// Records with any letter other than `F`.
    pub pass_count:         usize,
    /// Records per letter, best letter first. Letters nobody received are
    /// left out.
    pub distribution:       Vec<LetterCount>,
}

impl ExaminationStats {
    /// Share of records that passed, as a percentage.
    pub fn pass_rate(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(round2(self.pass_count as f64 / self.count as f64 * 100.0))
        }
    }
}

/// Mean of `values`, rounded to two decimals; `None` when empty.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0f64, 0usize), |acc, v| (acc.0 + v, acc.1 + 1));
    if n == 0 { None } else { Some(round2(sum / n as f64)) }
}

/// Lowest and highest of `values`.
fn bounds(values: impl Iterator<Item = f64>) -> (Option<f64>, Option<f64>) {
    match values.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => (None, None),
        MinMaxResult::OneElement(v) => (Some(v), Some(v)),
        MinMaxResult::MinMax(lo, hi) => (Some(lo), Some(hi)),
    }
}

/// Summarises the records belonging to `examination_id`.
///
/// Works purely off the stored `raw_marks`, `percentage`, `letter_grade` and
/// `grade_points`; nothing is reclassified. Records for other examinations
/// are skipped.
pub fn aggregate<'a>(
    examination_id: &str,
    records: impl IntoIterator<Item = &'a GradeRecord>,
) -> ExaminationStats {
    let records: Vec<&GradeRecord> = records
        .into_iter()
        .filter(|r| r.examination_id == examination_id)
        .collect();

    let (min_marks, max_marks) = bounds(records.iter().map(|r| r.raw_marks));
    let (min_percentage, max_percentage) = bounds(records.iter().map(|r| r.percentage));

    let mut letters: BTreeMap<LetterGrade, usize> = BTreeMap::new();
    for r in &records {
        *letters.entry(r.letter_grade).or_default() += 1;
    }

    ExaminationStats {
        examination_id: examination_id.to_string(),
        count: records.len(),
        average_marks: mean(records.iter().map(|r| r.raw_marks)),
        min_marks,
        max_marks,
        average_percentage: mean(records.iter().map(|r| r.percentage)),
        min_percentage,
        max_percentage,
        average_points: mean(records.iter().map(|r| r.grade_points)),
        pass_count: records.iter().filter(|r| r.letter_grade.is_pass()).count(),
        distribution: letters
            .into_iter()
            .map(|(letter, count)| LetterCount { letter, count })
            .collect(),
    }
}

/// Summarises every examination present in `records`, ordered by
/// examination id.
pub fn aggregate_all(records: &[GradeRecord]) -> Vec<ExaminationStats> {
    records
        .iter()
        .map(|r| r.examination_id.as_str())
        .unique()
        .sorted()
        .map(|id| aggregate(id, records))
        .collect()
}
