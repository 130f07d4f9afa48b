use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use log::{debug, info};
use serde::Serialize;

use crate::api::state::SharedState;
use crate::api::{assets, proxy};
use crate::model::VersionInfo;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

/// `window.OPENSHIFT_CONFIG = {...}` for the browser bootstrap.
pub async fn config_js(State(state): State<SharedState>) -> Response {
    match state.client_config.to_script() {
        Ok(script) => (
            [(header::CONTENT_TYPE, "application/javascript")],
            script,
        )
            .into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

pub async fn version_json(State(state): State<SharedState>) -> Json<VersionInfo> {
    Json(state.version.clone())
}

/// Raw plugin templates are only ever loaded through the template cache.
pub fn is_plugin_template(path: &str) -> bool {
    path.starts_with("/plugins/") && path.ends_with(".html")
}

pub async fn guard_plugin_templates(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path();
    if is_plugin_template(path) {
        debug!("Refusing plugin template {}", path);
        return error_response(StatusCode::NOT_FOUND, "Not found");
    }

    if state.config.other.debug_logging_of_proxy {
        info!("{} {}", req.method(), path);
    }
    next.run(req).await
}

/// Everything not routed explicitly: proxy rules first, then static files.
pub async fn dispatch(State(state): State<SharedState>, req: Request) -> Response {
    let rule = state.config.proxy_rules.find(req.uri().path()).cloned();
    match rule {
        Some(rule) => proxy::forward(&state, &rule, req).await,
        None => assets::serve(&state, req).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_templates_are_recognised() {
        assert!(is_plugin_template("/plugins/wiki/html/view.html"));
        assert!(!is_plugin_template("/plugins/wiki/js/wiki.js"));
        assert!(!is_plugin_template("/index.html"));
        assert!(!is_plugin_template("/libs/plugins/x.html"));
    }

    #[test]
    fn error_body_shape() {
        let body = serde_json::to_value(ErrorResponse::new("upstream down")).unwrap();
        assert_eq!(body, serde_json::json!({"error": "upstream down"}));
    }
}
