use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use shule::{
    server::{
        ApiJson, ApiPath, AppState, ClassifyRequest, CreateGradeRequest, UpdateGradeRequest,
        create_grade, delete_grade, examination_stats, get_grade, health, level_scale,
        list_examination_grades, preview_grade, update_grade,
    },
    store::InMemoryGradeStore,
    types::{GradeStatus, LetterGrade},
};
use uuid::Uuid;

fn state() -> AppState {
    AppState::new(InMemoryGradeStore::new())
}

fn create_request(student: &str, raw: f64, level: &str) -> CreateGradeRequest {
    CreateGradeRequest {
        examination_id: "terminal-2026".into(),
        student_id:     student.into(),
        subject_id:     "english".into(),
        raw_marks:      raw,
        max_marks:      100.0,
        academic_level: level.into(),
        comments:       None,
        status:         GradeStatus::Draft,
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let Json(body) = health().await;
    assert!(body.success);
    assert_eq!(body.data, Some("ok"));
}

#[tokio::test]
async fn preview_classifies_without_storing() {
    let state = state();
    let Json(body) = preview_grade(ApiJson(ClassifyRequest {
        raw_marks:      80.0,
        max_marks:      100.0,
        academic_level: "O_LEVEL".into(),
    }))
    .await
    .expect("preview");

    let result = body.data.expect("data");
    assert_eq!(result.letter_grade, LetterGrade::A);
    assert_eq!(result.grade_points, 7.0);

    let Json(list) = list_examination_grades(State(state), ApiPath("terminal-2026".into()))
        .await
        .expect("list");
    assert_eq!(list.data.map(|d| d.len()), Some(0));
}

#[tokio::test]
async fn preview_errors_are_bad_requests() {
    let err = preview_grade(ApiJson(ClassifyRequest {
        raw_marks:      101.0,
        max_marks:      100.0,
        academic_level: "O_LEVEL".into(),
    }))
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let err = preview_grade(ApiJson(ClassifyRequest {
        raw_marks:      50.0,
        max_marks:      100.0,
        academic_level: "UNKNOWN".into(),
    }))
    .await
    .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn grade_lifecycle() {
    let state = state();

    let (status, Json(created)) =
        create_grade(State(state.clone()), ApiJson(create_request("s-1", 72.0, "university")))
            .await
            .expect("create");
    assert_eq!(status, StatusCode::CREATED);
    let created = created.data.expect("data");
    assert_eq!(created.letter_grade, LetterGrade::B);

    let Json(fetched) = get_grade(State(state.clone()), ApiPath(created.id))
        .await
        .expect("get");
    assert_eq!(fetched.data.as_ref(), Some(&created));

    let Json(updated) = update_grade(
        State(state.clone()),
        ApiPath(created.id),
        ApiJson(UpdateGradeRequest {
            raw_marks: Some(91.0),
            status: Some(GradeStatus::Published),
            ..UpdateGradeRequest::default()
        }),
    )
    .await
    .expect("update");
    let updated = updated.data.expect("data");
    assert_eq!(updated.letter_grade, LetterGrade::APlus);
    assert_eq!(updated.grade_points, 4.0);
    assert_eq!(updated.status, GradeStatus::Published);

    let Json(deleted) = delete_grade(State(state.clone()), ApiPath(created.id))
        .await
        .expect("delete");
    assert_eq!(deleted.data.map(|r| r.id), Some(created.id));

    let err = get_grade(State(state), ApiPath(created.id)).await.unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_unknown_level_is_rejected() {
    let state = state();
    let (_, Json(created)) =
        create_grade(State(state.clone()), ApiJson(create_request("s-1", 50.0, "O_LEVEL")))
            .await
            .expect("create");
    let id = created.data.expect("data").id;

    let err = update_grade(
        State(state),
        ApiPath(id),
        ApiJson(UpdateGradeRequest {
            academic_level: Some("college".into()),
            ..UpdateGradeRequest::default()
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_of_missing_record_is_not_found() {
    let err = update_grade(
        State(state()),
        ApiPath(Uuid::new_v4()),
        ApiJson(UpdateGradeRequest::default()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn examination_stats_cover_stored_grades() {
    let state = state();
    for (student, raw) in [("s-1", 85.0), ("s-2", 55.0), ("s-3", 15.0)] {
        create_grade(State(state.clone()), ApiJson(create_request(student, raw, "O_LEVEL")))
            .await
            .expect("create");
    }

    let Json(body) = examination_stats(State(state), ApiPath("terminal-2026".into()))
        .await
        .expect("stats");
    let stats = body.data.expect("data");
    assert_eq!(stats.count, 3);
    assert_eq!(stats.pass_count, 2);
    assert_eq!(stats.max_percentage, Some(85.0));
    assert_eq!(stats.average_marks, Some(51.67));
}

#[tokio::test]
async fn scale_endpoint_lists_bands() {
    let Json(body) = level_scale(ApiPath("a-level".into())).await.expect("scale");
    let view = body.data.expect("data");
    assert_eq!(view.bands.len(), 5);
    assert_eq!(view.bands[0].letter, LetterGrade::A);

    let err = level_scale(ApiPath("nursery".into())).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}
