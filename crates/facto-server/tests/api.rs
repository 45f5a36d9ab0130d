//! In-process router tests.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tower::ServiceExt;

use facto_server::{build_router, ApiState};

#[tokio::test]
async fn test_status_is_ok() {
    let app = build_router(ApiState::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_upload_rejects_invalid_base64() {
    let app = build_router(ApiState::default());

    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"filecontent": "!!! not base64 !!!"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_rejects_non_pdf_payload() {
    let app = build_router(ApiState::default());

    let body = format!(
        r#"{{"filename": "x.pdf", "filecontent": "{}"}}"#,
        BASE64.encode(b"definitely not a pdf")
    );
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_requires_filecontent_field() {
    let app = build_router(ApiState::default());

    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"filename": "x.pdf"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    // missing required field is a client error
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_convert_rejects_empty_body() {
    let app = build_router(ApiState::default());

    let request = Request::builder()
        .method("POST")
        .uri("/convert")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
