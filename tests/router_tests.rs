use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shule::{
    server::{AppState, router},
    store::InMemoryGradeStore,
};
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> Router {
    router(AppState::new(InMemoryGradeStore::new()))
}

/// Sends one request and returns the status with the decoded JSON body.
async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(text) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(text.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).expect("request"))
        .await
        .expect("infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("{status} body is not JSON ({e}): {bytes:?}"));
    (status, value)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let text = body.map(|b| b.to_string());
    send_raw(app, method, uri, text.as_deref()).await
}

fn grade_body(student: &str, raw: f64) -> Value {
    json!({
        "examinationId": "end-term-2026",
        "studentId": student,
        "subjectId": "kiswahili",
        "rawMarks": raw,
        "maxMarks": 100,
        "academicLevel": "O_LEVEL",
    })
}

/// Asserts the failure envelope: `success` is false, a message is present
/// and no payload is attached.
fn assert_error_envelope(body: &Value) {
    assert_eq!(body["success"], false, "{body}");
    assert!(
        body["message"].as_str().is_some_and(|m| !m.is_empty()),
        "{body}"
    );
    assert!(body.get("data").is_none(), "{body}");
}

#[tokio::test]
async fn health_is_enveloped() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": "ok" }));
}

#[tokio::test]
async fn preview_classifies_and_stores_nothing() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/grades/preview",
        Some(json!({ "rawMarks": 80, "maxMarks": 100, "academicLevel": "O_LEVEL" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body.get("message").is_none());
    assert_eq!(body["data"]["percentage"], 80.0);
    assert_eq!(body["data"]["letterGrade"], "A");
    assert_eq!(body["data"]["gradePoints"], 7.0);

    let (_, listed) = send(&app, Method::GET, "/examinations/end-term-2026/grades", None).await;
    assert_eq!(listed["data"], json!([]));
}

#[tokio::test]
async fn preview_of_invalid_marks_is_bad_request() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/grades/preview",
        Some(json!({ "rawMarks": 120, "maxMarks": 100, "academicLevel": "O_LEVEL" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
}

#[tokio::test]
async fn grade_crud_over_http() {
    let app = app();

    let (status, created) = send(&app, Method::POST, "/grades", Some(grade_body("s-1", 58.0))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["letterGrade"], "B");
    assert_eq!(created["data"]["status"], "DRAFT");
    let id = created["data"]["id"].as_str().expect("id").to_string();
    let uri = format!("/grades/{id}");

    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], created["data"]);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "rawMarks": 88, "status": "PUBLISHED", "comments": "Vizuri sana" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["id"], id.as_str());
    assert_eq!(updated["data"]["letterGrade"], "A");
    assert_eq!(updated["data"]["status"], "PUBLISHED");
    assert_eq!(updated["data"]["comments"], "Vizuri sana");

    let (status, cleared) = send(&app, Method::PUT, &uri, Some(json!({ "comments": "" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["data"].get("comments").is_none(), "{cleared}");

    let (status, deleted) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["data"]["id"], id.as_str());

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_envelope(&body);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = app();
    let uri = format!("/grades/{}", Uuid::new_v4());

    for method in [Method::GET, Method::DELETE] {
        let (status, body) = send(&app, method, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_error_envelope(&body);
    }

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "rawMarks": 10 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_envelope(&body);
}

#[tokio::test]
async fn examination_routes_list_and_summarise() {
    let app = app();
    for (student, raw) in [("s-2", 35.0), ("s-1", 90.0), ("s-3", 10.0)] {
        let (status, _) = send(&app, Method::POST, "/grades", Some(grade_body(student, raw))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, listed) = send(&app, Method::GET, "/examinations/end-term-2026/grades", None).await;
    assert_eq!(status, StatusCode::OK);
    let students: Vec<&str> = listed["data"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|r| r["studentId"].as_str())
        .collect();
    assert_eq!(students, vec!["s-1", "s-2", "s-3"]);

    let (status, stats) = send(&app, Method::GET, "/examinations/end-term-2026/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["data"]["examinationId"], "end-term-2026");
    assert_eq!(stats["data"]["count"], 3);
    assert_eq!(stats["data"]["passCount"], 2);
    assert_eq!(stats["data"]["maxPercentage"], 90.0);

    let (status, empty) = send(&app, Method::GET, "/examinations/nothing/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["data"]["count"], 0);
}

#[tokio::test]
async fn scale_route_accepts_lenient_levels() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/scales/a-level", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["level"], "A_LEVEL");
    assert_eq!(body["data"]["scale"], "secondary");
    assert_eq!(body["data"]["bands"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["data"]["bands"][0]["letter"], "A");

    let (status, body) = send(&app, Method::GET, "/scales/nursery", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
}

#[tokio::test]
async fn unknown_status_is_unprocessable_and_enveloped() {
    let mut body = grade_body("s-1", 70.0);
    body["status"] = json!("ARCHIVED");

    let (status, body) = send(&app(), Method::POST, "/grades", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_envelope(&body);
    assert!(body["message"].as_str().is_some_and(|m| m.contains("ARCHIVED")), "{body}");
}

#[tokio::test]
async fn string_marks_are_unprocessable_and_enveloped() {
    let mut body = grade_body("s-1", 70.0);
    body["rawMarks"] = json!("80");

    let app = app();
    let (status, body) = send(&app, Method::POST, "/grades", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_envelope(&body);

    let (status, body) = send(
        &app,
        Method::POST,
        "/grades/preview",
        Some(json!({ "rawMarks": "80", "maxMarks": 100, "academicLevel": "O_LEVEL" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_envelope(&body);
}

#[tokio::test]
async fn malformed_json_is_bad_request_and_enveloped() {
    let (status, body) = send_raw(&app(), Method::POST, "/grades", Some("{\"rawMarks\": ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
}

#[tokio::test]
async fn body_without_json_content_type_is_enveloped() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/grades/preview")
        .body(Body::from(
            json!({ "rawMarks": 80, "maxMarks": 100, "academicLevel": "O_LEVEL" }).to_string(),
        ))
        .expect("request");
    let response = app().oneshot(request).await.expect("infallible");
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert_error_envelope(&body);
}

#[tokio::test]
async fn non_uuid_ids_are_bad_request_and_enveloped() {
    let app = app();
    for method in [Method::GET, Method::DELETE] {
        let (status, body) = send(&app, method, "/grades/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error_envelope(&body);
    }

    let (status, body) = send(
        &app,
        Method::PUT,
        "/grades/not-a-uuid",
        Some(json!({ "rawMarks": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
}
