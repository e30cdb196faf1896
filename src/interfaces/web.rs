//! Embedded static file server for the browser frontend.

use axum::Router;
use std::io;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Builds a router serving every file under `root`; directories resolve to
/// their `index.html`.
pub fn router(root: impl AsRef<Path>) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(root))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(listener: TcpListener, root: impl AsRef<Path>) -> io::Result<()> {
    axum::serve(listener, router(root)).await
}
