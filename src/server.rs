//! HTTP surface: the one briefing page at `/`.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::snapshot::DashboardSnapshot;

pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

pub fn router(snapshot: Arc<DashboardSnapshot>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .fallback(not_found_handler)
        .with_state(snapshot)
}

/// Serve until ctrl-c.
pub async fn run_server(
    snapshot: Arc<DashboardSnapshot>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let addr = SocketAddr::new(config.host, config.port);
    let app = router(snapshot);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Dashboard running at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

async fn index_handler(
    State(snapshot): State<Arc<DashboardSnapshot>>,
    headers: HeaderMap,
) -> Response {
    let etag = snapshot.etag();

    let cached = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| etag_matches(v, &etag));

    if cached {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
    }

    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::ETAG, etag),
        ],
        Body::from(snapshot.body.clone()),
    )
        .into_response()
}

/// Weak comparison, as `If-None-Match` requires: a `W/` prefix is ignored.
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    if_none_match.split(',').map(str::trim).any(|tag| {
        tag == "*" || tag.strip_prefix("W/").unwrap_or(tag) == etag
    })
}

async fn not_found_handler() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}
