//! Router tests driven through `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use vsound_ai::GeminiConfig;
use vsound_api::{create_router, ApiConfig, AppState};
use vsound_media::ExtractorConfig;

const BOUNDARY: &str = "vsound-test-boundary";

fn app() -> Router {
    let state = AppState::new(
        ApiConfig::default(),
        ExtractorConfig::default(),
        // Never reached by these tests
        GeminiConfig::new("test-key").with_base_url("http://127.0.0.1:9"),
    )
    .unwrap();
    create_router(state)
}

fn multipart_body(field: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"clip.bin\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_genre_catalog() {
    let response = app()
        .oneshot(Request::builder().uri("/api/genres").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let genres = body.as_array().unwrap();
    assert_eq!(genres.len(), 8);
    assert_eq!(genres[0]["genre"], "Uplifting Cinematic");
    assert!(genres
        .iter()
        .all(|g| g["track_url"].as_str().unwrap().starts_with("https://")));
}

#[tokio::test]
async fn test_non_video_upload_is_rejected() {
    for mime in ["image/png", "audio/mpeg", "text/plain"] {
        let response = app()
            .oneshot(upload(multipart_body("video", mime, b"not a video")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE, "{mime}");
        let body = json_body(response).await;
        assert_eq!(body["detail"], "Please upload a valid video file.");
    }
}

#[tokio::test]
async fn test_missing_video_field() {
    let response = app()
        .oneshot(upload(multipart_body("file", "video/mp4", b"data")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_video_field() {
    let response = app()
        .oneshot(upload(multipart_body("video", "video/mp4", b"")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_undecodable_video_is_unprocessable() {
    let response = app()
        .oneshot(upload(multipart_body(
            "video",
            "video/mp4",
            b"definitely not an mp4 container",
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert!(body["detail"].as_str().unwrap().starts_with("Could not"));
}

#[tokio::test]
async fn test_unknown_route() {
    let response = app()
        .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
