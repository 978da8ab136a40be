pub mod api;

use crate::services::{ChartService, RankingProvider, SearchGateway, SessionStore};
use axum::{
    extract::FromRef,
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchGateway>,
    pub charts: Arc<ChartService>,
    pub rankings: Arc<RankingProvider>,
    pub sessions: Arc<SessionStore>,
}

// FromRef implementations to extract specific state components
impl FromRef<AppState> for Arc<SearchGateway> {
    fn from_ref(app_state: &AppState) -> Arc<SearchGateway> {
        app_state.search.clone()
    }
}

impl FromRef<AppState> for Arc<SessionStore> {
    fn from_ref(app_state: &AppState) -> Arc<SessionStore> {
        app_state.sessions.clone()
    }
}

/// Start the axum server
pub async fn serve(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting krx-explorer server");

    // The dashboard frontend runs on a separate dev origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    tracing::info!("Registering routes:");
    tracing::info!("  POST /sessions");
    tracing::info!("  DELETE /sessions/<uuid>");
    tracing::info!("  POST /search");
    tracing::info!("  GET  /results?session_id=<uuid>&page=0");
    tracing::info!("  POST /select");
    tracing::info!("  GET  /chart?session_id=<uuid>&timeframe=monthly");
    tracing::info!("  GET  /market-index?market=kospi");
    tracing::info!("  GET  /rankings");
    tracing::info!("  GET  /health");

    let app = Router::new()
        .route("/sessions", post(api::create_session_handler))
        .route("/sessions/{id}", delete(api::delete_session_handler))
        .route("/search", post(api::search_handler))
        .route("/results", get(api::results_handler))
        .route("/select", post(api::select_handler))
        .route("/chart", get(api::chart_handler))
        .route("/market-index", get(api::market_index_handler))
        .route("/rankings", get(api::rankings_handler))
        .route("/health", get(api::health_handler))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
