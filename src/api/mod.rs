use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::fetch::UpstreamClient;
use crate::render::Renderer;
use crate::safety::DomainBlocklist;

pub mod auth;
pub mod handlers;
pub mod models;

/// Shared by every handler. Built once in `main`.
pub struct AppState {
    pub upstream: UpstreamClient,
    pub renderer: Arc<dyn Renderer>,
    pub blocklist: DomainBlocklist,
    pub api_key: String,
}

/// Routes that exist for client compatibility but answer with the fixed
/// "not implemented" envelope.
const STUB_GET_ROUTES: &[&str] = &[
    "/google/vision/labels",
    "/google/vision/safety",
    "/omni/anime",
    "/omni/anime-supplemental",
    "/omni/manga",
    "/omni/movie",
    "/search/quora",
    "/search/quora-result",
    "/search/reverse-image",
    "/search/booru",
    "/search/wikihow",
    "/search/wolfram-alpha",
    "/search/wolfram-supplemental",
    "/search/youtube",
    "/tts/imtranslator",
    "/tts/moonbase",
    "/tts/playht",
    "/tts/tiktok",
    "/utils/emojipedia",
    "/utils/emoji-search",
    "/utils/perspective",
];

const STUB_POST_ROUTES: &[&str] = &["/google/translate/text", "/google/vision/ocr"];

pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut protected = Router::new()
        .route("/search/duckduckgo", get(handlers::web_search_handler))
        .route("/search/duckduckgo-images", get(handlers::image_search_handler))
        .route("/search/google-maps", get(handlers::maps_handler))
        .route("/search/google-maps-supplemental", get(handlers::supplemental_handler))
        .route("/search/google-news", get(handlers::news_handler))
        .route("/search/google-news-supplemental", get(handlers::supplemental_handler))
        .route("/search/lyrics", get(handlers::lyrics_handler))
        .route("/search/urbandictionary", get(handlers::urban_dictionary_handler))
        .route("/search/weather", get(handlers::weather_handler))
        .route("/utils/dictionary", get(handlers::dictionary_handler))
        .route("/utils/unicode-metadata", get(handlers::unicode_metadata_handler))
        .route("/utils/garfield", get(handlers::garfield_handler))
        .route("/utils/otter", get(handlers::otter_handler))
        .route("/utils/webshot", get(handlers::screenshot_handler))
        .route("/utils/screenshot", get(handlers::screenshot_handler));

    for path in STUB_GET_ROUTES {
        protected = protected.route(path, get(handlers::not_implemented));
    }
    for path in STUB_POST_ROUTES {
        protected = protected.route(path, post(handlers::not_implemented));
    }

    let protected = protected.route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_bearer,
    ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(protected)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
