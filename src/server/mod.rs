//! JSON-file-backed demo backend for the table of contents.
//!
//! Serves read-only slices of one [`TocDocument`] loaded at startup, with an
//! artificial delay on every request so loading states are visible.

use crate::models::TocDocument;
use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "toc-server", about = "Serve a table of contents document over HTTP")]
pub struct ServerArgs {
    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    #[arg(long, default_value = "127.0.0.1")]
    pub host: std::net::IpAddr,

    /// Document with `entities` and `topLevelIds`.
    #[arg(long, env = "JSON_PATH", default_value = "toc.json")]
    pub json_path: PathBuf,

    /// Latency added to every request, in milliseconds.
    #[arg(long, env = "TOC_DELAY_MS", default_value_t = 500)]
    pub delay_ms: u64,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

type Doc = Arc<TocDocument>;

pub fn load_document(path: &std::path::Path) -> Result<TocDocument, ServerError> {
    let text = std::fs::read_to_string(path).map_err(|source| ServerError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ServerError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn router(doc: Doc, delay: Duration) -> Router {
    Router::new()
        .route("/topLevelIds", get(top_level_ids))
        .route("/entities", get(entities))
        .route("/entities/pages", get(pages))
        .route("/entities/pages/:id", get(page))
        .route("/entities/pages/:id/anchors", get(page_anchors))
        .route("/entities/anchors", get(anchors))
        .route("/entities/anchors/:id", get(anchor))
        .with_state(doc)
        .layer(middleware::from_fn_with_state(delay, delay_requests))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(args: ServerArgs) -> Result<(), ServerError> {
    let doc = load_document(&args.json_path)?;
    tracing::info!(
        path = %args.json_path.display(),
        pages = doc.entities.pages.len(),
        anchors = doc.entities.anchors.len(),
        "document loaded"
    );

    let addr = SocketAddr::new(args.host, args.port);
    let app = router(Arc::new(doc), Duration::from_millis(args.delay_ms));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    tracing::info!("Server is running at http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for ctrl-c");
            }
        })
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn delay_requests(State(delay): State<Duration>, req: Request, next: Next) -> Response {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    next.run(req).await
}

/// Pretty-printed JSON body. `None` becomes a 404 with a `null` body.
fn pretty<T: Serialize>(value: Option<&T>) -> Response {
    let status = if value.is_some() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    match serde_json::to_string_pretty(&value) {
        Ok(body) => (status, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn top_level_ids(State(doc): State<Doc>) -> Response {
    pretty(Some(&doc.top_level_ids))
}

async fn entities(State(doc): State<Doc>) -> Response {
    pretty(Some(&*doc))
}

async fn pages(State(doc): State<Doc>) -> Response {
    pretty(Some(&doc.entities.pages))
}

async fn page(State(doc): State<Doc>, Path(id): Path<String>) -> Response {
    pretty(doc.entities.pages.get(&id))
}

/// Unknown pages have no anchors rather than a 404.
async fn page_anchors(State(doc): State<Doc>, Path(id): Path<String>) -> Response {
    pretty(Some(&doc.anchors_for_page(&id)))
}

async fn anchors(State(doc): State<Doc>) -> Response {
    pretty(Some(&doc.entities.anchors))
}

async fn anchor(State(doc): State<Doc>, Path(id): Path<String>) -> Response {
    pretty(doc.entities.anchors.get(&id))
}
