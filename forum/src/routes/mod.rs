pub mod categories;
pub mod replies;
pub mod threads;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ForumError;
use crate::health;
use crate::state::AppState;

/// Full application router: `/health` plus the forum API under `/api`
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    let forum_routes = Router::new()
        .merge(categories::routes())
        .merge(threads::routes())
        .merge(replies::routes());

    Router::new()
        .route("/health", get(health::check_health))
        .nest("/api", forum_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Unwrap a JSON body, reporting malformed payloads as invalid arguments
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ForumError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ForumError::invalid(rejection.body_text()))
}
