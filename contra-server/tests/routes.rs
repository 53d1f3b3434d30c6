mod common;

use axum::http::StatusCode;
use contra::game::GameStatus;
use contra_server::{config::Config, simulation::SimulationStatus};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::common::{test_server, workspace_root};

fn running_status() -> SimulationStatus {
    SimulationStatus {
        game_running: true,
        started_at: Some(UNIX_EPOCH + Duration::from_secs(1_700_000_000)),
        started: Some(Instant::now()),
        error: None,
        game: GameStatus {
            tick: 120,
            player_health: 8,
            enemies_alive: 3,
            score: 100,
            game_over: false,
            paused: false,
        },
    }
}

#[tokio::test]
async fn test_health_reports_running_game() {
    let (server, _) = test_server(Config::with_asset_root(workspace_root()), running_status());

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "contra-game-web");
    assert_eq!(body["game_running"], true);
    assert_eq!(body["error"], serde_json::Value::Null);
    assert!(body["uptime_seconds"].as_f64().is_some());
}

#[tokio::test]
async fn test_health_is_ok_when_game_failed() {
    let status = SimulationStatus {
        error: Some("Level error: missing layer".into()),
        ..SimulationStatus::default()
    };
    let (server, _) = test_server(Config::with_asset_root(workspace_root()), status);

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["game_running"], false);
    assert_eq!(body["uptime_seconds"], 0.0);
    assert_eq!(body["error"], "Level error: missing layer");
}

#[tokio::test]
async fn test_status_reports_game_snapshot() {
    let (server, _) = test_server(Config::with_asset_root(workspace_root()), running_status());

    let body: serde_json::Value = server.get("/api/status").await.json();
    assert_eq!(
        body,
        json!({
            "game_running": true,
            "start_time": 1_700_000_000.0,
            "error": null,
            "tick": 120,
            "player_health": 8,
            "enemies_alive": 3,
            "score": 100,
            "game_over": false,
        })
    );
}

#[tokio::test]
async fn test_status_follows_shared_state() {
    let (server, shared) = test_server(Config::with_asset_root(workspace_root()), running_status());

    {
        let mut status = shared.write();
        status.game.player_health = 0;
        status.game.game_over = true;
    }

    let body: serde_json::Value = server.get("/api/status").await.json();
    assert_eq!(body["player_health"], 0);
    assert_eq!(body["game_over"], true);
}

#[tokio::test]
async fn test_index_page_polls_status() {
    let (server, _) = test_server(Config::with_asset_root(workspace_root()), SimulationStatus::default());

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("/api/status"));
}

#[tokio::test]
async fn test_assets_are_served_from_asset_root() {
    let (server, _) = test_server(Config::with_asset_root(workspace_root()), SimulationStatus::default());

    let response = server.get("/assets/settings.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["window_width"], 1280);
}

#[tokio::test]
async fn test_play_route_absent_without_web_root() {
    let (server, _) = test_server(Config::with_asset_root(workspace_root()), SimulationStatus::default());

    let response = server.get("/play/index.html").expect_failure().await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["description"], "/play/index.html");
}

#[tokio::test]
async fn test_play_route_serves_web_root() {
    let config = Config {
        web_root: Some(workspace_root().join("contra-server").join("static")),
        ..Config::with_asset_root(workspace_root())
    };
    let (server, _) = test_server(config, SimulationStatus::default());

    let response = server.get("/play/index.html").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[test]
fn test_start_time_is_unix_seconds() {
    let status = SimulationStatus {
        started_at: Some(SystemTime::UNIX_EPOCH + Duration::from_millis(1500)),
        ..SimulationStatus::default()
    };
    assert_eq!(status.start_time(), Some(1.5));
    assert_eq!(SimulationStatus::default().start_time(), None);
}
