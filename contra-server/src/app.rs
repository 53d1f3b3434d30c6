use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::routes;
use crate::simulation::SharedStatus;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub status: SharedStatus,
}

impl AppState {
    pub fn new(config: Config, status: SharedStatus) -> Self {
        Self {
            config: Arc::new(config),
            status,
        }
    }
}

pub fn create_router(app_state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(routes::index_handler))
        .route("/health", get(routes::health_handler))
        .route("/api/status", get(routes::status_handler))
        .nest_service("/assets", ServeDir::new(&app_state.config.asset_root));

    if let Some(web_root) = &app_state.config.web_root {
        router = router.nest_service("/play", ServeDir::new(web_root).append_index_html_on_directories(true));
    }

    router
        .fallback(routes::fallback_handler)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
