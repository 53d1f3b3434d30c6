use axum::{
    extract::State,
    http::Uri,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::{app::AppState, errors::ErrorResponse};

const INDEX_HTML: &str = include_str!("../static/index.html");
const SERVICE_NAME: &str = "contra-game-web";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub game_running: bool,
    pub uptime_seconds: f64,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub game_running: bool,
    pub start_time: Option<f64>,
    pub error: Option<String>,
    pub tick: u64,
    pub player_health: u32,
    pub enemies_alive: u32,
    pub score: u32,
    pub game_over: bool,
}

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Always healthy while the server answers; a dead simulation shows up in `game_running` and
/// `error`, not in the status code.
pub async fn health_handler(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let status = app_state.status.read();
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        game_running: status.game_running,
        uptime_seconds: status.uptime_seconds(),
        error: status.error.clone(),
    })
}

pub async fn status_handler(State(app_state): State<AppState>) -> Json<StatusResponse> {
    let status = app_state.status.read();
    let game = status.game;
    Json(StatusResponse {
        game_running: status.game_running,
        start_time: status.start_time(),
        error: status.error.clone(),
        tick: game.tick,
        player_health: game.player_health,
        enemies_alive: game.enemies_alive,
        score: game.score,
        game_over: game.game_over,
    })
}

pub async fn fallback_handler(uri: Uri) -> impl IntoResponse {
    debug!(%uri, "No route");
    ErrorResponse::not_found(uri.path().to_string())
}
