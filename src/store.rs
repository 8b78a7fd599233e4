#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{collections::HashMap, sync::RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::{
    grade::{GradeError, GradeResult, classify},
    types::{AcademicLevel, GradeStatus, LetterGrade},
};

/// Errors surfaced by a [`GradeRecordStore`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The marks or level on the write could not be classified; nothing was
    /// written.
    #[error(transparent)]
    Grade(#[from] GradeError),
    /// No record with this id.
    #[error("No grade record with id {0}")]
    NotFound(Uuid),
}

/// Identifies a student's grade for one subject on one examination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeKey {
    /// Examination id.
    pub examination_id: String,
    /// Student id.
    pub student_id:     String,
    /// Subject id.
    pub subject_id:     String,
}

impl GradeKey {
    /// Creates a key from its three parts.
    pub fn new(
        examination_id: impl Into<String>,
        student_id: impl Into<String>,
        subject_id: impl Into<String>,
    ) -> Self {
        Self {
            examination_id: examination_id.into(),
            student_id:     student_id.into(),
            subject_id:     subject_id.into(),
        }
    }
}

/// Everything needed to create a grade record. The computed fields are
/// filled in by the store.
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct GradeEntry {
    /// Examination id.
    #[builder(setter(into))]
    pub examination_id: String,
    /// Student id.
    #[builder(setter(into))]
    pub student_id:     String,
    /// Subject id.
    #[builder(setter(into))]
    pub subject_id:     String,
    /// Marks obtained.
    pub raw_marks:      f64,
    /// Maximum marks for the examination.
    pub max_marks:      f64,
    /// Level the examination is set at.
    pub academic_level: AcademicLevel,
    /// Free-form remarks from the grading staff.
    #[builder(default, setter(strip_option, into))]
    pub comments:       Option<String>,
    /// Publication state.
    #[builder(default)]
    pub status:         GradeStatus,
}

impl GradeEntry {
    /// The composite key this entry is stored under.
    pub fn key(&self) -> GradeKey {
        GradeKey::new(&self.examination_id, &self.student_id, &self.subject_id)
    }
}

/// Partial update of a stored record. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradePatch {
    /// New raw marks.
    pub raw_marks:      Option<f64>,
    /// New maximum marks.
    pub max_marks:      Option<f64>,
    /// New academic level.
    pub academic_level: Option<AcademicLevel>,
    /// New comments. A blank string clears them.
    pub comments:       Option<String>,
    /// New status.
    pub status:         Option<GradeStatus>,
}

/// A classified, persisted grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    /// Record id.
    pub id:             Uuid,
    /// Examination id.
    pub examination_id: String,
    /// Student id.
    pub student_id:     String,
    /// Subject id.
    pub subject_id:     String,
    /// Marks obtained.
    pub raw_marks:      f64,
    /// Maximum marks for the examination.
    pub max_marks:      f64,
    /// Level the examination is set at.
    pub academic_level: AcademicLevel,
    /// Computed percentage.
    pub percentage:     f64,
    /// Computed letter.
    pub letter_grade:   LetterGrade,
    /// Computed points.
    pub grade_points:   f64,
    /// Free-form remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments:       Option<String>,
    /// Publication state.
    #[serde(default)]
    pub status:         GradeStatus,
    /// When the record was first written.
    pub created_at:     DateTime<Utc>,
    /// When the record was last written.
    pub updated_at:     DateTime<Utc>,
}

impl GradeRecord {
    /// Composite key of this record.
    pub fn key(&self) -> GradeKey {
        GradeKey::new(&self.examination_id, &self.student_id, &self.subject_id)
    }

    /// The computed part of the record.
    pub fn result(&self) -> GradeResult {
        GradeResult {
            percentage:   self.percentage,
            letter_grade: self.letter_grade,
            grade_points: self.grade_points,
        }
    }

    /// Overwrites the computed fields.
    fn apply(&mut self, result: GradeResult) {
        self.percentage = result.percentage;
        self.letter_grade = result.letter_grade;
        self.grade_points = result.grade_points;
    }
}

/// Persistence for classified grades.
///
/// Every write that carries marks goes through [`classify`], so the computed
/// fields of a stored record always match its marks and level.
pub trait GradeRecordStore: Send + Sync {
    /// Classifies and stores `entry`. An existing record under the same
    /// composite key is overwritten in place and keeps its id.
    fn create(&self, entry: GradeEntry) -> Result<GradeRecord, StoreError>;

    /// Looks a record up by id.
    fn get(&self, id: Uuid) -> Result<GradeRecord, StoreError>;

    /// Looks a record up by composite key.
    fn find(&self, key: &GradeKey) -> Option<GradeRecord>;

    /// All records for an examination, ordered by student then subject.
    fn list_for_examination(&self, examination_id: &str) -> Vec<GradeRecord>;

    /// Applies `patch` and reclassifies.
    fn update(&self, id: Uuid, patch: GradePatch) -> Result<GradeRecord, StoreError>;

    /// Removes a record and returns it.
    fn delete(&self, id: Uuid) -> Result<GradeRecord, StoreError>;
}

/// Maps guarded together by [`InMemoryGradeStore`].
#[derive(Default)]
struct StoreInner {
    /// Records by id.
    records: HashMap<Uuid, GradeRecord>,
    /// Composite key index into `records`.
    by_key:  HashMap<GradeKey, Uuid>,
}

/// A [`GradeRecordStore`] held in process memory.
#[derive(Default)]
pub struct InMemoryGradeStore {
    /// Records and index, behind a single lock.
    inner: RwLock<StoreInner>,
}

impl InMemoryGradeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.inner.read().expect("grade store poisoned").records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GradeRecordStore for InMemoryGradeStore {
    fn create(&self, entry: GradeEntry) -> Result<GradeRecord, StoreError> {
        let result = classify(entry.raw_marks, entry.max_marks, entry.academic_level)?;
        let key = entry.key();
        let now = Utc::now();

        let mut inner = self.inner.write().expect("grade store poisoned");
        let existing = inner
            .by_key
            .get(&key)
            .and_then(|id| inner.records.get(id))
            .map(|r| (r.id, r.created_at));

        let (id, created_at) = existing.unwrap_or_else(|| (Uuid::new_v4(), now));
        let record = GradeRecord {
            id,
            examination_id: entry.examination_id,
            student_id: entry.student_id,
            subject_id: entry.subject_id,
            raw_marks: entry.raw_marks,
            max_marks: entry.max_marks,
            academic_level: entry.academic_level,
            percentage: result.percentage,
            letter_grade: result.letter_grade,
            grade_points: result.grade_points,
            comments: entry.comments,
            status: entry.status,
            created_at,
            updated_at: now,
        };

        if existing.is_some() {
            tracing::debug!("Overwriting grade {} for {:?}", id, key);
        } else {
            tracing::debug!("Creating grade {} for {:?}", id, key);
        }

        inner.by_key.insert(key, id);
        inner.records.insert(id, record.clone());
        Ok(record)
    }

    fn get(&self, id: Uuid) -> Result<GradeRecord, StoreError> {
        self.inner
            .read()
            .expect("grade store poisoned")
            .records
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn find(&self, key: &GradeKey) -> Option<GradeRecord> {
        let inner = self.inner.read().expect("grade store poisoned");
        inner
            .by_key
            .get(key)
            .and_then(|id| inner.records.get(id))
            .cloned()
    }

    fn list_for_examination(&self, examination_id: &str) -> Vec<GradeRecord> {
        let inner = self.inner.read().expect("grade store poisoned");
        let mut records: Vec<GradeRecord> = inner
            .records
            .values()
            .filter(|r| r.examination_id == examination_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            (&a.student_id, &a.subject_id).cmp(&(&b.student_id, &b.subject_id))
        });
        records
    }

    fn update(&self, id: Uuid, patch: GradePatch) -> Result<GradeRecord, StoreError> {
        let mut inner = self.inner.write().expect("grade store poisoned");
        let current = inner.records.get(&id).ok_or(StoreError::NotFound(id))?;

        let mut updated = current.clone();
        if let Some(raw_marks) = patch.raw_marks {
            updated.raw_marks = raw_marks;
        }
        if let Some(max_marks) = patch.max_marks {
            updated.max_marks = max_marks;
        }
        if let Some(level) = patch.academic_level {
            updated.academic_level = level;
        }
        if let Some(comments) = patch.comments {
            updated.comments = if comments.trim().is_empty() { None } else { Some(comments) };
        }
        if let Some(status) = patch.status {
            updated.status = status;
        }

        updated.apply(classify(updated.raw_marks, updated.max_marks, updated.academic_level)?);
        updated.updated_at = Utc::now();

        tracing::debug!("Updated grade {}: {}", id, updated.result());
        inner.records.insert(id, updated.clone());
        Ok(updated)
    }

    fn delete(&self, id: Uuid) -> Result<GradeRecord, StoreError> {
        let mut inner = self.inner.write().expect("grade store poisoned");
        let record = inner.records.remove(&id).ok_or(StoreError::NotFound(id))?;
        inner.by_key.remove(&record.key());
        tracing::debug!("Deleted grade {}", id);
        Ok(record)
    }
}
