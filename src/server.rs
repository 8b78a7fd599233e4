//! REST API over a [`GradeRecordStore`].

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{
        FromRequest, FromRequestParts, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    grade::{ExaminationStats, GradeError, GradeResult, GradeScale, ScaleBand, aggregate, classify_str},
    store::{GradeEntry, GradePatch, GradeRecord, GradeRecordStore, StoreError},
    types::{AcademicLevel, GradeStatus},
};

/// Envelope for every JSON response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data:    Option<T>,
    /// Error message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Wraps a successful payload.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data:    Some(data),
            message: None,
        }
    }

    /// Wraps an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data:    None,
            message: Some(message.into()),
        }
    }
}

/// Errors returned by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Marks or level rejected by the classifier.
    #[error(transparent)]
    Grade(#[from] GradeError),
    /// Unknown record id.
    #[error("No grade record with id {0}")]
    NotFound(Uuid),
    /// Request body missing, malformed, or of the wrong shape.
    #[error(transparent)]
    Body(#[from] JsonRejection),
    /// A path segment could not be parsed, eg. an id that is not a UUID.
    #[error(transparent)]
    PathParam(#[from] PathRejection),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Grade(e) => ApiError::Grade(e),
            StoreError::NotFound(id) => ApiError::NotFound(id),
        }
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Grade(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::PathParam(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Body(rejection) => rejection.body_text(),
            ApiError::PathParam(rejection) => rejection.body_text(),
            other => other.to_string(),
        };
        tracing::warn!("{} {}", status, message);
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

/// JSON body extractor whose rejections are reported through [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections are reported through [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Where grade records live.
    pub store: Arc<dyn GradeRecordStore>,
}

impl AppState {
    /// Wraps a store.
    pub fn new(store: impl GradeRecordStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Body of `POST /grades/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    /// Marks obtained.
    pub raw_marks:      f64,
    /// Maximum marks.
    pub max_marks:      f64,
    /// Academic level token.
    pub academic_level: String,
}

/// Body of `POST /grades`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGradeRequest {
    /// Examination id.
    pub examination_id: String,
    /// Student id.
    pub student_id:     String,
    /// Subject id.
    pub subject_id:     String,
    /// Marks obtained.
    pub raw_marks:      f64,
    /// Maximum marks.
    pub max_marks:      f64,
    /// Academic level token.
    pub academic_level: String,
    /// Remarks.
    #[serde(default)]
    pub comments:       Option<String>,
    /// Publication state, `DRAFT` when omitted.
    #[serde(default)]
    pub status:         GradeStatus,
}

impl TryFrom<CreateGradeRequest> for GradeEntry {
    type Error = GradeError;

    fn try_from(req: CreateGradeRequest) -> Result<Self, Self::Error> {
        Ok(GradeEntry {
            academic_level: req.academic_level.parse()?,
            examination_id: req.examination_id,
            student_id:     req.student_id,
            subject_id:     req.subject_id,
            raw_marks:      req.raw_marks,
            max_marks:      req.max_marks,
            comments:       req.comments,
            status:         req.status,
        })
    }
}

/// Body of `PUT /grades/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGradeRequest {
    /// New marks.
    #[serde(default)]
    pub raw_marks:      Option<f64>,
    /// New maximum marks.
    #[serde(default)]
    pub max_marks:      Option<f64>,
    /// New academic level token.
    #[serde(default)]
    pub academic_level: Option<String>,
    /// New remarks; `""` removes them.
    #[serde(default)]
    pub comments:       Option<String>,
    /// New publication state.
    #[serde(default)]
    pub status:         Option<GradeStatus>,
}

impl TryFrom<UpdateGradeRequest> for GradePatch {
    type Error = GradeError;

    fn try_from(req: UpdateGradeRequest) -> Result<Self, Self::Error> {
        Ok(GradePatch {
            raw_marks:      req.raw_marks,
            max_marks:      req.max_marks,
            academic_level: req
                .academic_level
                .as_deref()
                .map(str::parse::<AcademicLevel>)
                .transpose()?,
            comments:       req.comments,
            status:         req.status,
        })
    }
}

/// Response of `GET /scales/{level}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleView {
    /// The level asked for.
    pub level: AcademicLevel,
    /// The scale that level uses.
    pub scale: GradeScale,
    /// Its bands, best first.
    pub bands: Vec<ScaleBand>,
}

/// Handler result alias.
type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Liveness check.
pub async fn health() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("ok"))
}

/// Classifies marks without storing anything.
pub async fn preview_grade(ApiJson(req): ApiJson<ClassifyRequest>) -> ApiResult<GradeResult> {
    let result = classify_str(req.raw_marks, req.max_marks, &req.academic_level)?;
    Ok(Json(ApiResponse::success(result)))
}

/// Classifies and stores a grade, replacing any grade under the same
/// examination, student and subject.
pub async fn create_grade(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateGradeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GradeRecord>>), ApiError> {
    let entry = GradeEntry::try_from(req)?;
    let record = state.store.create(entry)?;
    tracing::info!(
        "Stored grade {} ({}) for student {} in {}",
        record.id,
        record.letter_grade,
        record.student_id,
        record.examination_id
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::success(record))))
}

/// Reads a grade by id.
pub async fn get_grade(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<GradeRecord> {
    Ok(Json(ApiResponse::success(state.store.get(id)?)))
}

/// Patches a grade and reclassifies it.
pub async fn update_grade(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateGradeRequest>,
) -> ApiResult<GradeRecord> {
    let patch = GradePatch::try_from(req)?;
    let record = state.store.update(id, patch)?;
    tracing::info!("Updated grade {} to {}", id, record.result());
    Ok(Json(ApiResponse::success(record)))
}

/// Deletes a grade.
pub async fn delete_grade(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<GradeRecord> {
    let record = state.store.delete(id)?;
    tracing::info!("Deleted grade {}", id);
    Ok(Json(ApiResponse::success(record)))
}

/// Lists the grades recorded for an examination.
pub async fn list_examination_grades(
    State(state): State<AppState>,
    ApiPath(examination_id): ApiPath<String>,
) -> ApiResult<Vec<GradeRecord>> {
    Ok(Json(ApiResponse::success(state.store.list_for_examination(&examination_id))))
}

/// Summarises the grades recorded for an examination.
pub async fn examination_stats(
    State(state): State<AppState>,
    ApiPath(examination_id): ApiPath<String>,
) -> ApiResult<ExaminationStats> {
    let records = state.store.list_for_examination(&examination_id);
    Ok(Json(ApiResponse::success(aggregate(&examination_id, &records))))
}

/// Returns the threshold table for a level.
pub async fn level_scale(ApiPath(level): ApiPath<String>) -> ApiResult<ScaleView> {
    let level: AcademicLevel = level.parse()?;
    let scale = level.scale();
    Ok(Json(ApiResponse::success(ScaleView {
        level,
        scale,
        bands: scale.bands().to_vec(),
    })))
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/grades", post(create_grade))
        .route("/grades/preview", post(preview_grade))
        .route("/grades/{id}", get(get_grade).put(update_grade).delete(delete_grade))
        .route("/examinations/{id}/grades", get(list_examination_grades))
        .route("/examinations/{id}/stats", get(examination_stats))
        .route("/scales/{level}", get(level_scale))
        .with_state(state)
}

/// Binds `addr` and serves the API until the process is stopped.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Could not bind {addr}"))?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .await
        .context("API server stopped unexpectedly")
}
