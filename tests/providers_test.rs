//! Wiremock tests for the Jikan, Gemini and image clients.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aniran::AniranError;
use aniran::providers::gemini::{DEFAULT_MODEL, MISSING_KEY_MESSAGE};
use aniran::providers::{GeminiClient, ImageProxy, JikanClient, TranslationProvider};
use aniran::types::TranslationCandidate;

fn generate_path() -> String {
    format!("/v1beta/models/{DEFAULT_MODEL}:generateContent")
}

fn text_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

// ============================================================================
// Jikan
// ============================================================================

#[tokio::test]
async fn jikan_fetch_unwraps_data_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/anime/20/full"))
        .and(header("user-agent", "Aniran-App-Serverless-Proxy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "mal_id": 20,
                "title": "Naruto",
                "title_english": "Naruto",
                "synopsis": "Moments prior to Naruto Uzumaki's birth...",
                "episodes": 220
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = JikanClient::with_base_url(server.uri());
    let record = client.fetch_anime("20").await.unwrap();

    assert_eq!(record.title.as_deref(), Some("Naruto"));
    assert_eq!(record.extra["mal_id"], json!(20));
    assert_eq!(record.extra["episodes"], json!(220));
}

#[tokio::test]
async fn jikan_fetch_error_keeps_upstream_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/anime/0/full"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": 404,
            "type": "BadResponseException",
            "message": "Resource does not exist"
        })))
        .mount(&server)
        .await;

    let client = JikanClient::with_base_url(server.uri());
    match client.fetch_anime("0").await.unwrap_err() {
        AniranError::Upstream { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Jikan API error: Resource does not exist");
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn jikan_proxy_relays_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/anime"))
        .and(query_param("q", "naruto"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "pagination": {}})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/top/anime"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"status": 429, "message": "slow down"})),
        )
        .mount(&server)
        .await;

    let client = JikanClient::with_base_url(server.uri());

    let ok = client.proxy("anime?q=naruto&limit=5").await.unwrap();
    assert_eq!(ok.status, 200);
    assert_eq!(ok.body["data"], json!([]));

    let limited = client.proxy("/top/anime").await.unwrap();
    assert_eq!(limited.status, 429);
    assert!(!limited.is_success());
    assert_eq!(limited.body["message"], "slow down");
}

// ============================================================================
// Gemini
// ============================================================================

#[tokio::test]
async fn gemini_translate_parses_json_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_reply(
            r#"{"persian_title": "ناروتو", "persian_synopsis": "نینجا"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(Some("test-key".into()), server.uri());
    let candidate = client.translate("Naruto", Some("A ninja.")).await.unwrap();

    assert_eq!(candidate, TranslationCandidate::full("ناروتو", "نینجا"));
}

#[tokio::test]
async fn gemini_honours_custom_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-test:generateContent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(text_reply(r#"{"persian_title": "بلیچ"}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(Some("k".into()), server.uri()).model("gemini-test");
    let candidate = TranslationProvider::translate(&client, "Bleach", None)
        .await
        .unwrap();
    assert_eq!(candidate, TranslationCandidate::title("بلیچ"));
}

#[tokio::test]
async fn gemini_429_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "message": "Resource Exhausted", "status": "RESOURCE_EXHAUSTED" }
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(Some("k".into()), server.uri());
    let err = client.translate("Naruto", Some("A ninja.")).await.unwrap_err();
    assert!(matches!(err, AniranError::RateLimited));
}

#[tokio::test]
async fn gemini_prompt_block_is_content_blocked() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "PROHIBITED_CONTENT" }
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(Some("k".into()), server.uri());
    let err = client.translate("Naruto", Some("A ninja.")).await.unwrap_err();
    assert!(err.is_prohibited_content());
    assert_eq!(err.status_code(), 422);
}

#[tokio::test]
async fn gemini_prose_reply_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(text_reply("Sure! The title is ناروتو.")),
        )
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(Some("k".into()), server.uri());
    let err = client.translate("Naruto", None).await.unwrap_err();
    assert!(matches!(err, AniranError::MalformedResponse(_)));
}

#[tokio::test]
async fn gemini_generate_raw_relays_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(body_partial_json(json!({"contents": [{"parts": [{"text": "hi"}]}]})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "Invalid JSON payload" }
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(Some("k".into()), server.uri());
    let proxied = client
        .generate_raw(&json!({"contents": [{"parts": [{"text": "hi"}]}]}))
        .await
        .unwrap();

    assert_eq!(proxied.status, 400);
    assert_eq!(proxied.body["error"]["message"], "Invalid JSON payload");
}

#[tokio::test]
async fn gemini_without_key_never_calls_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(None, server.uri());
    let err = client.generate_raw(&json!({})).await.unwrap_err();

    assert_eq!(err.status_code(), 500);
    match err {
        AniranError::Configuration(message) => assert_eq!(message, MISSING_KEY_MESSAGE),
        other => panic!("expected Configuration, got {other:?}"),
    }
}

#[tokio::test]
async fn gemini_transport_error_does_not_leak_key() {
    // Nothing listens on the discard port
    let client = GeminiClient::with_base_url(Some("very-secret-key".into()), "http://127.0.0.1:9");

    let err = client.generate_raw(&json!({})).await.unwrap_err();
    assert!(matches!(err, AniranError::Http(_)));
    assert!(!err.to_string().contains("very-secret-key"));

    let err = client.translate("Naruto", None).await.unwrap_err();
    assert!(!err.to_string().contains("very-secret-key"));
}

#[tokio::test]
async fn gemini_key_is_not_sent_in_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(header("x-goog-api-key", "k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(Some("k".into()), server.uri());
    client.generate_raw(&json!({})).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

// ============================================================================
// Images
// ============================================================================

#[tokio::test]
async fn image_fetch_returns_bytes_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/anime/13/17405.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(vec![0xFF, 0xD8, 0xFF]),
        )
        .mount(&server)
        .await;

    let proxy = ImageProxy::with_allowed_hosts(["127.0.0.1"]);
    let image = proxy
        .fetch(&format!("{}/images/anime/13/17405.jpg", server.uri()))
        .await
        .unwrap();

    assert!(image.is_success());
    assert_eq!(image.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(image.bytes, vec![0xFF, 0xD8, 0xFF]);
}

#[tokio::test]
async fn image_fetch_relays_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let proxy = ImageProxy::with_allowed_hosts(["127.0.0.1"]);
    let image = proxy
        .fetch(&format!("{}/missing.jpg", server.uri()))
        .await
        .unwrap();
    assert_eq!(image.status, 404);
}

#[tokio::test]
async fn image_from_forbidden_host_is_never_fetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let proxy = ImageProxy::new();
    let err = proxy
        .fetch(&format!("{}/a.jpg", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, AniranError::ForbiddenHost));
}
