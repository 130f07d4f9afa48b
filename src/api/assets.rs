use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::debug;
use std::path::{Component, Path, PathBuf};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::api::handlers::error_response;
use crate::api::state::DevServer;
use crate::logic::decode_path;
use crate::model::StaticAssetRoot;

const DIRECTORY_INDEX: &str = "index.html";

/// Decoded path of `request_path` below `public_path`, without a leading
/// slash. `None` when the request is outside the root or tries to climb out.
///
/// Each segment is decoded on its own; a segment that decodes to a separator
/// or to anything but a plain name is refused.
pub fn relative_asset_path(public_path: &str, request_path: &str) -> Option<String> {
    let rest = request_path.strip_prefix(public_path.trim_end_matches('/'))?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }

    let segments = rest
        .trim_start_matches('/')
        .split('/')
        .map(|segment| decode_path(segment).ok())
        .collect::<Option<Vec<String>>>()?;
    if segments
        .iter()
        .any(|segment| segment.contains(['/', '\\']) || segment == "..")
    {
        return None;
    }

    let relative = segments.join("/");
    let plain = Path::new(&relative)
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    plain.then_some(relative)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

/// First existing file for `request_path` across the roots, in order.
pub async fn locate(roots: &[StaticAssetRoot], request_path: &str) -> Option<PathBuf> {
    for root in roots {
        let Some(relative) = relative_asset_path(&root.public_path, request_path) else {
            continue;
        };

        let mut candidate = root.directory.join(&relative);
        if is_dir(&candidate).await {
            candidate = candidate.join(DIRECTORY_INDEX);
        }
        if is_file(&candidate).await {
            return Some(candidate);
        }
    }
    None
}

async fn serve_file(path: &Path, req: Request) -> Response {
    match ServeFile::new(path).oneshot(req).await {
        Ok(response) => response.map(Body::new).into_response(),
        Err(never) => match never {},
    }
}

/// Static file lookup with the single-page-app fallback document last.
pub async fn serve(state: &DevServer, req: Request) -> Response {
    let path = req.uri().path().to_string();

    if let Some(file) = locate(&state.config.static_assets, &path).await {
        return serve_file(&file, req).await;
    }

    let fallback = &state.config.fallback;
    if is_file(fallback).await {
        debug!("No asset for {}, serving {}", path, fallback.display());
        return serve_file(fallback, req).await;
    }

    error_response(StatusCode::NOT_FOUND, "Not found")
}
