use axum_test::TestServer;
use contra_server::{
    app::{create_router, AppState},
    config::Config,
    simulation::{SharedStatus, SimulationStatus},
};
use std::path::PathBuf;
use std::time::Duration;

/// The workspace root, which doubles as the asset root (`data/map.tmj`, `settings.json`).
pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..")
}

/// A server over a status the test controls directly; no simulation thread.
pub fn test_server(config: Config, status: SimulationStatus) -> (TestServer, SharedStatus) {
    let shared = SharedStatus::default();
    *shared.write() = status;
    let server = TestServer::new(create_router(AppState::new(config, shared.clone()))).expect("Failed to create test server");
    (server, shared)
}

/// Polls `status` until `done` holds, giving up after a few seconds.
#[allow(dead_code)]
pub async fn wait_for(status: &SharedStatus, done: impl Fn(&SimulationStatus) -> bool) -> bool {
    for _ in 0..100 {
        if done(&status.read()) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}
