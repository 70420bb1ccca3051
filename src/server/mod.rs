// src/server/mod.rs
// =============================================================================
// The HTTP front door of the service.
//
// Submodules:
// - routes: Handlers and their JSON bodies
// - error: How failures turn into HTTP responses
//
// Every request runs on its own tokio task. They all share one LinkService
// (and through it one RequestStore) via an Arc.
// =============================================================================

mod error;
mod routes;

use crate::checker::Prober;
use crate::service::LinkService;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Builds the router for a service
pub fn router<P: Prober + 'static>(service: Arc<LinkService<P>>) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/check-links", post(routes::check_links::<P>))
        .route("/generate-report", post(routes::generate_report::<P>))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serves until Ctrl-C, then flushes one last snapshot to disk
pub async fn serve<P: Prober + 'static>(
    addr: SocketAddr,
    service: Arc<LinkService<P>>,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(Arc::clone(&service)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Catches the file up if an earlier write failed
    let store = service.store();
    match store.persist() {
        Ok(()) => {
            let snapshot = store.snapshot();
            info!(
                requests = snapshot.requests.len(),
                next_id = snapshot.next_id,
                path = %store.path().display(),
                "final snapshot written"
            );
        }
        Err(e) => error!(error = %e, "failed to write final snapshot"),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        // Without a signal handler we'd never stop; keep serving
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
