use super::*;
use crate::test_support::{sample_result, spawn_backend};
use axum::http::StatusCode;

#[tokio::test]
async fn posts_text_payload_and_parses_result() {
    let backend = spawn_backend().await;
    backend.reply_with_result(&sample_result("https://x/video.mp4", "out.mp4"));
    let transport = HttpTransport::new(backend.url());

    let result = transport
        .generate(&GenerationRequest::new("Hello world"))
        .await
        .expect("generate");

    assert_eq!(result.result.video.url, "https://x/video.mp4");
    assert_eq!(result.result.video.clips.len(), 2);
    assert_eq!(backend.calls(), 1);
    assert_eq!(backend.requests()[0].text, "Hello world");
}

#[tokio::test]
async fn non_success_status_surfaces_backend_message() {
    let backend = spawn_backend().await;
    backend.reply_with(
        StatusCode::UNPROCESSABLE_ENTITY,
        serde_json::json!({ "code": "validation", "message": "script is too long" }),
    );
    let transport = HttpTransport::new(backend.url());

    let err = transport
        .generate(&GenerationRequest::new("Hello world"))
        .await
        .expect_err("must fail");

    assert_eq!(err.status(), Some(422));
    assert_eq!(err.to_string(), "script is too long");
}

#[tokio::test]
async fn non_success_status_without_body_uses_generic_message() {
    let backend = spawn_backend().await;
    backend.reply_with(StatusCode::BAD_GATEWAY, serde_json::Value::Null);
    let transport = HttpTransport::new(backend.url());

    let err = transport
        .generate(&GenerationRequest::new("Hello world"))
        .await
        .expect_err("must fail");

    assert_eq!(err.status(), Some(502));
    assert!(
        err.to_string().contains("502"),
        "unexpected message: {err}"
    );
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let backend = spawn_backend().await;
    backend.reply_with(StatusCode::OK, serde_json::json!({ "message": "partial" }));
    let transport = HttpTransport::new(backend.url());

    let err = transport
        .generate(&GenerationRequest::new("Hello world"))
        .await
        .expect_err("must fail");

    assert!(matches!(err, TransportError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn empty_video_url_is_rejected() {
    let backend = spawn_backend().await;
    backend.reply_with_result(&sample_result("", "out.mp4"));
    let transport = HttpTransport::new(backend.url());

    let err = transport
        .generate(&GenerationRequest::new("Hello world"))
        .await
        .expect_err("must fail");

    assert_eq!(
        err,
        TransportError::Decode("video url is missing".to_string())
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let transport = HttpTransport::new(Url::parse(&format!("http://{addr}")).expect("url"));
    let err = transport
        .generate(&GenerationRequest::new("Hello world"))
        .await
        .expect_err("must fail");

    assert!(matches!(err, TransportError::Network(_)), "got {err:?}");
    assert!(err.to_string().starts_with("failed to reach generation service"));
}

#[test]
fn endpoint_joins_base_path_without_double_slash() {
    let transport = HttpTransport::new(Url::parse("http://localhost:8000/api/").expect("url"));
    assert_eq!(transport.endpoint(), "http://localhost:8000/api/generate-dummy");

    let transport = HttpTransport::new(Url::parse("http://localhost:8000").expect("url"));
    assert_eq!(transport.endpoint(), "http://localhost:8000/generate-dummy");
}
