use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod handlers;
pub mod state;

#[cfg(test)]
mod tests;

pub use state::AppState;

pub const POSTS_REPORT_ROUTE: &str = "/api/posts-report";

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route(POSTS_REPORT_ROUTE, get(handlers::posts_report))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub async fn serve(addr: SocketAddr, state: AppState) -> pr_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🌐 Serving posts report on http://{}{}", listener.local_addr()?, POSTS_REPORT_ROUTE);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}
