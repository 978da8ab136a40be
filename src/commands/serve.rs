use crate::error::Result;
use crate::server::{self, AppState};
use crate::services::{
    ChartService, EmbeddingClient, RankingProvider, SearchClient, SearchGateway, SnapshotClient,
    SessionStore,
};
use std::sync::Arc;

pub async fn run(port: u16) {
    println!("🚀 Starting krx-explorer server on port {}", port);

    let state = match build_state() {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to initialize services: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server::serve(state, port).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}

fn build_state() -> Result<AppState> {
    let embedder = Arc::new(EmbeddingClient::new()?);
    let search = SearchGateway::new(SearchClient::new()?, embedder);
    let charts = ChartService::new()?;
    let rankings = RankingProvider::new(Arc::new(SnapshotClient::new()?));

    Ok(AppState {
        search: Arc::new(search),
        charts: Arc::new(charts),
        rankings: Arc::new(rankings),
        sessions: Arc::new(SessionStore::new()),
    })
}
