use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use std::time::Instant;

use crate::adapters::{
    dictionary, feeds, images, lyrics, maps, news, screenshot, slang, unicode, weather, web_search,
};
use crate::data_models::ScreenshotErrorBody;
use crate::envelope::ApiResponse;

use super::AppState;
use super::models::{
    DictionaryParams, Params, ScreenshotParams, SearchParams, UnicodeParams, WeatherParams,
};

pub async fn health() -> &'static str {
    "OK"
}

pub async fn not_implemented() -> impl IntoResponse {
    ApiResponse::not_implemented(Instant::now())
}

pub async fn web_search_handler(
    State(state): State<Arc<AppState>>,
    Params(params): Params<SearchParams>,
) -> impl IntoResponse {
    let started = Instant::now();
    let result = web_search::search(&state.upstream, params.query(), params.nsfw()).await;
    ApiResponse::from_result(started, result)
}

pub async fn image_search_handler(
    State(state): State<Arc<AppState>>,
    Params(params): Params<SearchParams>,
) -> impl IntoResponse {
    let started = Instant::now();
    let result = images::search(&state.upstream, params.query(), params.nsfw()).await;
    ApiResponse::from_result(started, result)
}

pub async fn maps_handler(
    State(state): State<Arc<AppState>>,
    Params(params): Params<SearchParams>,
) -> impl IntoResponse {
    let started = Instant::now();
    let result = maps::search(&state.upstream, params.query()).await;
    ApiResponse::from_result(started, result)
}

pub async fn news_handler(
    State(state): State<Arc<AppState>>,
    Params(params): Params<SearchParams>,
) -> impl IntoResponse {
    let started = Instant::now();
    let result = news::search(&state.upstream, params.query()).await;
    ApiResponse::from_result(started, result)
}

pub async fn supplemental_handler() -> impl IntoResponse {
    ApiResponse::new(Instant::now(), maps::supplemental())
}

pub async fn weather_handler(
    State(state): State<Arc<AppState>>,
    Params(params): Params<WeatherParams>,
) -> impl IntoResponse {
    let started = Instant::now();
    let result = weather::forecast(&state.upstream, params.location.as_deref()).await;
    ApiResponse::from_result(started, result)
}

pub async fn lyrics_handler(
    State(state): State<Arc<AppState>>,
    Params(params): Params<SearchParams>,
) -> impl IntoResponse {
    let started = Instant::now();
    let result = lyrics::search(&state.upstream, params.query()).await;
    ApiResponse::from_result(started, result)
}

pub async fn urban_dictionary_handler(
    State(state): State<Arc<AppState>>,
    Params(params): Params<SearchParams>,
) -> impl IntoResponse {
    let started = Instant::now();
    let result = slang::define(&state.upstream, params.query()).await;
    ApiResponse::from_result(started, result)
}

pub async fn dictionary_handler(
    State(state): State<Arc<AppState>>,
    Params(params): Params<DictionaryParams>,
) -> impl IntoResponse {
    let started = Instant::now();
    let result = dictionary::lookup(&state.upstream, params.word.as_deref()).await;
    ApiResponse::from_result(started, result)
}

pub async fn unicode_metadata_handler(Params(params): Params<UnicodeParams>) -> impl IntoResponse {
    let started = Instant::now();
    ApiResponse::from_result(started, unicode::describe(params.character.as_deref()))
}

pub async fn garfield_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let started = Instant::now();
    ApiResponse::from_result(started, feeds::garfield(&state.upstream).await)
}

pub async fn otter_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let started = Instant::now();
    ApiResponse::from_result(started, feeds::otter(&state.upstream).await)
}

/// PNG bytes on success, a JSON placeholder description otherwise. Clients
/// branch on the content type.
pub async fn screenshot_handler(
    State(state): State<Arc<AppState>>,
    Params(params): Params<ScreenshotParams>,
) -> Response {
    let outcome = screenshot::capture(
        state.renderer.as_ref(),
        &state.blocklist,
        params.url.as_deref(),
        params.nsfw(),
    )
    .await;

    match outcome {
        Ok(png) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        Err(error) => Json(ScreenshotErrorBody { error: &error }).into_response(),
    }
}
