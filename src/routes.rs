use std::any::Any;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::ApiError;
use crate::handlers;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // SMS
        .route("/api/send_sms", post(handlers::send_sms))
        .route("/api/send-translated-sms", post(handlers::send_translated_sms))
        .route(
            "/api/generate-translated-pdf",
            post(handlers::generate_translated_pdf),
        )
        // Translation
        .route("/api/translate", post(handlers::translate))
        .route("/api/languages", get(handlers::languages))
        .route("/api/batch-translate", post(handlers::batch_translate))
        .route("/api/test-translate", post(handlers::test_translate))
        // Health check
        .route("/api/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Handler panicked: {}", detail);

    ApiError::Internal("Internal server error".to_string()).into_response()
}
