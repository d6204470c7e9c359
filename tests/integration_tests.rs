//! Integration tests for the Medical Consultation API
//!
//! These tests drive the full axum router in-process. Twilio and Sarvam are
//! replaced by wiremock servers, so every outbound call (or its absence) can
//! be asserted.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::{
    matchers::{body_partial_json, body_string_contains, method, path},
    Mock, MockServer, ResponseTemplate,
};

use medconsult_relay::{
    config::Config, routes::create_router, state::AppState, translation::TranslationClient,
};

// ==================== Test Helpers ====================

const MESSAGES_PATH: &str = "/2010-04-01/Accounts/AC-test/Messages.json";

/// Create a config pointing both providers at mock servers, all credentials set
fn create_test_config(twilio_url: &str, sarvam_url: &str) -> Config {
    Config {
        twilio_account_sid: Some("AC-test".to_string()),
        twilio_auth_token: Some("test-auth-token".to_string()),
        messaging_service_sid: "MG-test".to_string(),
        twilio_api_url: twilio_url.to_string(),
        sarvam_api_key: Some("test-sarvam-key".to_string()),
        sarvam_api_url: format!("{}/translate", sarvam_url),
        sarvam_model: "sarvam-translate:v1".to_string(),
        translation_timeout_secs: 30,
        test_translation_timeout_secs: 10,
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

fn app(config: Config) -> Router {
    create_router(AppState::new(config).expect("state should build"))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router should respond");
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).expect("response should be JSON");
    (status, body)
}

fn translated(text: &str) -> Value {
    json!({ "request_id": "req-1", "translated_text": text })
}

// ==================== Languages & Health Tests ====================

#[tokio::test]
async fn test_languages_lists_ten_entries() {
    let (status, body) = call(
        app(create_test_config("http://localhost", "http://localhost")),
        get("/api/languages"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["default_source"], "en-IN");

    let languages = body["languages"].as_object().unwrap();
    assert_eq!(languages.len(), 10);
    assert_eq!(languages["hi"]["code"], "hi-IN");
    assert_eq!(languages["mr"]["name"], "Marathi");
}

#[tokio::test]
async fn test_health_healthy_with_all_credentials() {
    let (status, body) = call(
        app(create_test_config("http://localhost", "http://localhost")),
        get("/api/health"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["dependencies"]["twilio"], "connected");
    assert_eq!(body["dependencies"]["sarvam_ai"], "configured");
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn test_health_degraded_without_translation_key() {
    let mut config = create_test_config("http://localhost", "http://localhost");
    config.sarvam_api_key = None;

    let (status, body) = call(app(config), get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["dependencies"]["sarvam_ai"], "not_configured");
    assert_eq!(body["message"], "Some dependencies are not properly configured");
}

#[tokio::test]
async fn test_unknown_route_returns_structured_404() {
    let (status, body) = call(
        app(create_test_config("http://localhost", "http://localhost")),
        get("/api/does-not-exist"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "Endpoint not found");
}

// ==================== SMS Tests ====================

#[tokio::test]
async fn test_send_sms_missing_to_never_calls_twilio() {
    let twilio = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sid": "SM1"})))
        .expect(0)
        .mount(&twilio)
        .await;

    let (status, body) = call(
        app(create_test_config(&twilio.uri(), "http://localhost")),
        post_json("/api/send_sms", json!({"diagnosis": "Flu"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "Recipient phone number ('to') is required.");
}

#[tokio::test]
async fn test_send_sms_success() {
    let twilio = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MESSAGES_PATH))
        .and(body_string_contains("Medical+Diagnosis"))
        .and(body_string_contains("MessagingServiceSid=MG-test"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sid": "SM42"})))
        .expect(1)
        .mount(&twilio)
        .await;

    let (status, body) = call(
        app(create_test_config(&twilio.uri(), "http://localhost")),
        post_json(
            "/api/send_sms",
            json!({
                "to": "+919812345678",
                "diagnosis": "Viral fever",
                "message_type": "diagnosis"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message_sid"], "SM42");
    assert_eq!(body["to"], "+919812345678");
    assert_eq!(body["message_type"], "diagnosis");
    assert!(body["timestamp"].is_string());
    assert!(body.get("language").is_none());
}

#[tokio::test]
async fn test_send_sms_omits_not_specified_sections() {
    let twilio = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("Diagnosis%3A+Asthma"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sid": "SM7"})))
        .expect(1)
        .mount(&twilio)
        .await;

    let (status, _) = call(
        app(create_test_config(&twilio.uri(), "http://localhost")),
        post_json("/api/send_sms", json!({"to": "+15550001111", "diagnosis": "Asthma"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let requests = twilio.received_requests().await.unwrap();
    let sent = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(!sent.contains("Medicines"));
    assert!(!sent.contains("Not+specified"));
}

#[tokio::test]
async fn test_send_sms_provider_rejection_is_400() {
    let twilio = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 21211,
            "message": "The 'To' number 123 is not a valid phone number.",
            "status": 400
        })))
        .mount(&twilio)
        .await;

    let (status, body) = call(
        app(create_test_config(&twilio.uri(), "http://localhost")),
        post_json("/api/send_sms", json!({"to": "123"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Twilio error: The 'To' number 123 is not a valid phone number."
    );
}

#[tokio::test]
async fn test_send_sms_transport_failure_is_500() {
    let (status, body) = call(
        app(create_test_config("http://127.0.0.1:1", "http://localhost")),
        post_json("/api/send_sms", json!({"to": "+15550001111"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Internal server error"));
}

#[tokio::test]
async fn test_send_sms_without_body_is_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/send_sms")
        .body(Body::empty())
        .unwrap();

    let (status, body) = call(
        app(create_test_config("http://localhost", "http://localhost")),
        request,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No JSON data provided");
}

#[tokio::test]
async fn test_send_translated_sms_names_language() {
    let twilio = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("Important+Notes+%28Hindi%29"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sid": "SM99"})))
        .expect(1)
        .mount(&twilio)
        .await;

    let (status, body) = call(
        app(create_test_config(&twilio.uri(), "http://localhost")),
        post_json(
            "/api/send-translated-sms",
            json!({
                "to": "+919812345678",
                "notes": "तीन दिन आराम करें",
                "language_name": "Hindi",
                "message_type": "notes"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message_sid"], "SM99");
    assert_eq!(body["language"], "Hindi");
    assert_eq!(body["message_type"], "notes");
}

#[tokio::test]
async fn test_send_translated_sms_missing_recipient_is_400() {
    let twilio = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sid": "SM00"})))
        .expect(0)
        .mount(&twilio)
        .await;

    let (status, body) = call(
        app(create_test_config(&twilio.uri(), "http://localhost")),
        post_json(
            "/api/send-translated-sms",
            json!({"diagnosis": "ज्वर", "language_name": "Hindi"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "Recipient phone number ('to') is required.");
}

#[tokio::test]
async fn test_send_translated_sms_provider_rejection_is_400() {
    let twilio = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MESSAGES_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 21608,
            "message": "The number is unverified.",
            "status": 400
        })))
        .expect(1)
        .mount(&twilio)
        .await;

    let (status, body) = call(
        app(create_test_config(&twilio.uri(), "http://localhost")),
        post_json(
            "/api/send-translated-sms",
            json!({
                "to": "+15550001111",
                "medicines": "पैरासिटामोल",
                "language_name": "Hindi",
                "message_type": "medicines"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Twilio error: The number is unverified.");
}

// ==================== PDF Tests ====================

#[tokio::test]
async fn test_generate_translated_pdf_bundle() {
    let (status, body) = call(
        app(create_test_config("http://localhost", "http://localhost")),
        post_json(
            "/api/generate-translated-pdf",
            json!({
                "diagnosis": "மலேரியா",
                "language_name": "Tamil",
                "patient_info": {"name": "Ravi", "age": 34}
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "PDF content prepared for frontend generation");

    let pdf = &body["pdf_content"];
    assert_eq!(pdf["title"], "Medical Consultation Report (Tamil)");
    assert_eq!(pdf["sections"]["diagnosis"], "மலேரியா");
    assert_eq!(pdf["sections"]["medicines"], "");
    assert_eq!(pdf["patient_info"]["name"], "Ravi");
    assert!(pdf["generated_at"].is_string());
}

#[tokio::test]
async fn test_generate_translated_pdf_defaults() {
    let (status, body) = call(
        app(create_test_config("http://localhost", "http://localhost")),
        post_json("/api/generate-translated-pdf", json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pdf_content"]["language"], "Unknown Language");
    assert_eq!(body["pdf_content"]["patient_info"], json!({}));
}

// ==================== Translate Tests ====================

#[tokio::test]
async fn test_translate_success() {
    let sarvam = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_partial_json(json!({"target_language_code": "ta-IN"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(translated("வணக்கம்")))
        .expect(1)
        .mount(&sarvam)
        .await;

    let (status, body) = call(
        app(create_test_config("http://localhost", &sarvam.uri())),
        post_json("/api/translate", json!({"text": "Hello", "targetLang": "ta-IN"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translated_text"], "வணக்கம்");
    assert_eq!(body["source_language"], "en-IN");
    assert_eq!(body["target_language"], "ta-IN");
    assert_eq!(body["language_name"], "Tamil");
}

#[tokio::test]
async fn test_translate_defaults_to_marathi() {
    let sarvam = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "source_language_code": "en-IN",
            "target_language_code": "mr-IN"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(translated("नमस्कार")))
        .expect(1)
        .mount(&sarvam)
        .await;

    let (status, body) = call(
        app(create_test_config("http://localhost", &sarvam.uri())),
        post_json("/api/translate", json!({"text": "Hello"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language_name"], "Marathi");
}

#[tokio::test]
async fn test_translate_unsupported_target_never_calls_provider() {
    let sarvam = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(translated("x")))
        .expect(0)
        .mount(&sarvam)
        .await;

    let (status, body) = call(
        app(create_test_config("http://localhost", &sarvam.uri())),
        post_json("/api/translate", json!({"text": "Hello", "targetLang": "xx-XX"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("xx-XX"));
}

#[tokio::test]
async fn test_translate_missing_text_is_400() {
    let (status, body) = call(
        app(create_test_config("http://localhost", "http://localhost")),
        post_json("/api/translate", json!({"targetLang": "hi-IN"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No text provided for translation");
}

#[tokio::test]
async fn test_translate_missing_key_is_500() {
    let mut config = create_test_config("http://localhost", "http://localhost");
    config.sarvam_api_key = None;

    let (status, body) = call(
        app(config),
        post_json("/api/translate", json!({"text": "Hello", "targetLang": "hi-IN"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "SARVAM_API_KEY not configured");
}

#[tokio::test]
async fn test_translate_provider_status_passthrough() {
    let sarvam = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit exceeded"))
        .mount(&sarvam)
        .await;

    let (status, body) = call(
        app(create_test_config("http://localhost", &sarvam.uri())),
        post_json("/api/translate", json!({"text": "Hello", "targetLang": "hi-IN"})),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Translation service unavailable");
    assert_eq!(body["details"], "Rate limit exceeded");
}

#[tokio::test]
async fn test_translate_timeout_is_408() {
    let sarvam = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(translated("late"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&sarvam)
        .await;

    let config = create_test_config("http://localhost", &sarvam.uri());
    let translator = TranslationClient::new(reqwest::Client::new(), &config)
        .with_timeouts(Duration::from_millis(50), Duration::from_millis(50));
    let router = create_router(AppState::new(config).unwrap().with_translator(translator));

    let (status, body) = call(
        router,
        post_json("/api/translate", json!({"text": "Hello", "targetLang": "hi-IN"})),
    )
    .await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body["error"], "Translation request timeout");
}

#[tokio::test]
async fn test_translate_unreachable_is_503() {
    let (status, body) = call(
        app(create_test_config("http://localhost", "http://127.0.0.1:1")),
        post_json("/api/translate", json!({"text": "Hello", "targetLang": "hi-IN"})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Cannot connect to translation service");
}

// ==================== Batch Translate Tests ====================

#[tokio::test]
async fn test_batch_translate_one_failure_is_embedded() {
    let sarvam = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"target_language_code": "hi-IN"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(translated("नमस्ते")))
        .mount(&sarvam)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"target_language_code": "kn-IN"})))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&sarvam)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"target_language_code": "ml-IN"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(translated("നമസ്കാരം")),
        )
        .mount(&sarvam)
        .await;

    let (status, body) = call(
        app(create_test_config("http://localhost", &sarvam.uri())),
        post_json(
            "/api/batch-translate",
            json!({"text": "Hello", "targetLanguages": ["hi-IN", "kn-IN", "ml-IN"]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let translations = body["translations"].as_object().unwrap();
    assert_eq!(translations.len(), 3);

    let successes = translations
        .values()
        .filter(|entry| entry["status"] == "success")
        .count();
    assert_eq!(successes, 2);

    assert_eq!(translations["kn-IN"]["status"], "error");
    assert_eq!(translations["kn-IN"]["language_name"], "Kannada");
    assert_eq!(translations["kn-IN"]["error"], "API returned 503");
    assert_eq!(translations["hi-IN"]["translated_text"], "नमस्ते");
}

#[tokio::test]
async fn test_batch_translate_missing_targets_is_400() {
    let (status, body) = call(
        app(create_test_config("http://localhost", "http://localhost")),
        post_json("/api/batch-translate", json!({"text": "Hello"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No target languages specified");
}

#[tokio::test]
async fn test_batch_translate_null_targets_is_400() {
    let (status, body) = call(
        app(create_test_config("http://localhost", "http://localhost")),
        post_json(
            "/api/batch-translate",
            json!({"text": "Hello", "targetLanguages": null}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No target languages specified");
}

#[tokio::test]
async fn test_batch_translate_unsupported_locale_is_400() {
    let sarvam = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(translated("x")))
        .expect(0)
        .mount(&sarvam)
        .await;

    let (status, body) = call(
        app(create_test_config("http://localhost", &sarvam.uri())),
        post_json(
            "/api/batch-translate",
            json!({"text": "Hello", "targetLanguages": ["hi-IN", "de-DE"]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("de-DE"));
}

// ==================== Self-Test Tests ====================

#[tokio::test]
async fn test_self_test_translates_into_four_locales() {
    let sarvam = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "input": "Hello, how are you today? This is a test of the translation service."
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(translated("ok")))
        .expect(4)
        .mount(&sarvam)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/test-translate")
        .body(Body::empty())
        .unwrap();

    let (status, body) = call(
        app(create_test_config("http://localhost", &sarvam.uri())),
        request,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_object().unwrap();
    assert_eq!(results.len(), 4);
    for locale in ["hi-IN", "mr-IN", "ta-IN", "te-IN"] {
        assert_eq!(results[locale]["status"], 200);
        assert!(results[locale]["preview"].as_str().unwrap().len() <= 50);
    }
    assert_eq!(results["te-IN"]["language"], "Telugu");
}

#[tokio::test]
async fn test_self_test_without_key_is_500() {
    let mut config = create_test_config("http://localhost", "http://localhost");
    config.sarvam_api_key = None;

    let request = Request::builder()
        .method("POST")
        .uri("/api/test-translate")
        .body(Body::empty())
        .unwrap();

    let (status, body) = call(app(config), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
}
