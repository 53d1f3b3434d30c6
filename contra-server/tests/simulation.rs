mod common;

use contra_server::{config::Config, simulation::Simulation};
use pretty_assertions::assert_eq;

use crate::common::{wait_for, workspace_root};

#[tokio::test]
async fn test_simulation_runs_bundled_level() {
    let mut simulation = Simulation::spawn(&Config::with_asset_root(workspace_root()));
    let status = simulation.status();

    assert!(wait_for(&status, |status| status.game.tick >= 5).await);
    {
        let status = status.read();
        assert!(status.game_running);
        assert!(status.error.is_none());
        assert!(status.start_time().is_some());
        assert!(status.game.enemies_alive > 0);
    }

    simulation.shutdown();
    assert_eq!(status.read().game_running, false);
}

#[tokio::test]
async fn test_missing_level_is_reported_not_fatal() {
    let config = Config {
        level_path: Some(workspace_root().join("data").join("does-not-exist.tmj")),
        ..Config::with_asset_root(workspace_root())
    };
    let simulation = Simulation::spawn(&config);
    let status = simulation.status();

    assert!(wait_for(&status, |status| status.error.is_some()).await);
    let status = status.read();
    assert!(!status.game_running);
    assert_eq!(status.game.tick, 0);
}
