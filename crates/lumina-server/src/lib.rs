//! HTTP API for Lumina.
//!
//! [`router`] wires the handlers in [`routes`] to a shared [`Dispatcher`];
//! [`serve`] runs it on a bound listener until the shutdown future resolves.

pub mod routes;

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use lumina_providers::Dispatcher;

pub use routes::AppState;

/// Build the API router.
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/api/ai", post(routes::ask_ai))
        .route("/api/gemini", post(routes::ask_gemini))
        .route("/api/providers", get(routes::list_providers))
        .route("/api/languages", get(routes::list_languages))
        .route("/api/health", get(routes::health))
        .with_state(AppState { dispatcher })
}

/// Serve the API on `listener` until `shutdown` completes.
pub async fn serve<F>(listener: TcpListener, dispatcher: Arc<Dispatcher>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "lumina API listening");
    }

    axum::serve(listener, router(dispatcher))
        .with_graceful_shutdown(shutdown)
        .await
}
