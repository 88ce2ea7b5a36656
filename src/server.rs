use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Health probe plus the built UI. Unknown paths get `index.html` so the
/// client-side router can handle them.
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.clone();
    let index = ServeFile::new(static_dir.join("index.html"));

    let static_files = Router::new()
        .fallback_service(ServeDir::new(&static_dir).fallback(index))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=86400"),
        ));

    Router::new()
        .route("/health", get(handlers::health::health))
        .with_state(state)
        .merge(static_files)
        .layer(TraceLayer::new_for_http())
}
