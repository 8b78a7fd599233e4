#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use tabled::{
    Table, Tabled,
    builder::Builder,
    settings::{Alignment, Modify, Panel, Style, object::Rows},
};

use super::{ExaminationStats, GradeResult, GradeScale};
use crate::{store::GradeRecord, types::AcademicLevel};

/// A stored record flattened for display.
#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Student")]
    /// Student id.
    student:    String,
    #[tabled(rename = "Subject")]
    /// Subject id.
    subject:    String,
    #[tabled(rename = "Marks")]
    /// `raw/max`.
    marks:      String,
    #[tabled(rename = "Percentage")]
    /// Percentage to one decimal, as shown on report pages.
    percentage: String,
    #[tabled(rename = "Grade")]
    /// Letter.
    grade:      String,
    #[tabled(rename = "Points")]
    /// Points.
    points:     String,
    #[tabled(rename = "Status")]
    /// Publication state.
    status:     String,
}

impl From<&GradeRecord> for RecordRow {
    fn from(r: &GradeRecord) -> Self {
        Self {
            student:    r.student_id.clone(),
            subject:    r.subject_id.clone(),
            marks:      format!("{}/{}", r.raw_marks, r.max_marks),
            percentage: format!("{:.1}", r.percentage),
            grade:      r.letter_grade.to_string(),
            points:     format!("{:.1}", r.grade_points),
            status:     r.status.to_string(),
        }
    }
}

/// Applies the house style and centres the header row.
fn styled(table: &mut Table, header: String) -> String {
    table
        .with(Panel::header(header))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern());
    table.to_string()
}

/// Renders one classification.
pub fn render_result(level: AcademicLevel, result: &GradeResult) -> String {
    styled(&mut Table::new([result]), format!("Classification ({level})"))
}

/// Renders a level's threshold table.
pub fn render_scale(level: AcademicLevel) -> String {
    let scale: GradeScale = level.scale();
    styled(&mut Table::new(scale.bands()), format!("{scale} scale ({level})"))
}

/// Renders stored records for one examination.
pub fn render_records(examination_id: &str, records: &[GradeRecord]) -> String {
    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
    styled(&mut Table::new(rows), format!("Examination {examination_id}"))
}

/// Renders the records in `records` that belong to `examination_id`,
/// ordered by student then subject.
pub fn render_examination(examination_id: &str, records: &[GradeRecord]) -> String {
    let mut scoped: Vec<GradeRecord> = records
        .iter()
        .filter(|r| r.examination_id == examination_id)
        .cloned()
        .collect();
    scoped.sort_by_key(GradeRecord::key);
    render_records(examination_id, &scoped)
}

/// Renders an examination summary, followed by its letter distribution.
pub fn render_stats(stats: &ExaminationStats) -> String {
    let show = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));

    let mut builder = Builder::default();
    builder.push_record(["Records".to_string(), stats.count.to_string()]);
    builder.push_record(["Average marks".to_string(), show(stats.average_marks)]);
    builder.push_record(["Lowest marks".to_string(), show(stats.min_marks)]);
    builder.push_record(["Highest marks".to_string(), show(stats.max_marks)]);
    builder.push_record(["Average %".to_string(), show(stats.average_percentage)]);
    builder.push_record(["Lowest %".to_string(), show(stats.min_percentage)]);
    builder.push_record(["Highest %".to_string(), show(stats.max_percentage)]);
    builder.push_record(["Average points".to_string(), show(stats.average_points)]);
    builder.push_record(["Passed".to_string(), stats.pass_count.to_string()]);
    builder.push_record(["Pass rate %".to_string(), show(stats.pass_rate())]);

    let summary = styled(&mut builder.build(), format!("Examination {}", stats.examination_id));
    if stats.distribution.is_empty() {
        return summary;
    }

    let distribution = styled(&mut Table::new(&stats.distribution), "Distribution".to_string());
    format!("{summary}\n{distribution}")
}
