use std::net::SocketAddr;
use std::sync::Arc;
use std::time::SystemTime;

use axum::{
    routing::{get, put},
    Router,
};

use crate::service::TodoService;

mod handlers;
mod models;

use handlers::{add_todo, health, index, list_todos, not_found, remove_todo, update_todo};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TodoService>,
    pub started_at: SystemTime,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/todos", get(list_todos).post(add_todo))
        .route("/todos/:id", put(update_todo).delete(remove_todo))
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve(
    addr: SocketAddr,
    service: Arc<TodoService>,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    let state = AppState {
        service,
        started_at: SystemTime::now(),
    };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("🌐 REST listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
