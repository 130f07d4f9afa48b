use axum::{middleware, routing::get, Router};

use crate::api::handlers;
use crate::api::state::SharedState;

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Browser bootstrap
        .route("/osconsole/config.js", get(handlers::config_js))
        .route("/version.json", get(handlers::version_json))
        // Proxy rules, then static assets, then the app shell
        .fallback(handlers::dispatch)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::guard_plugin_templates,
        ))
        .with_state(state)
}
