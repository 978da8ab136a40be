use crate::constants::PAGE_SIZE;
use crate::error::AppError;
use crate::models::{ChartTimeframe, CompanyRecord, PriceSeries, RankingSnapshot, SearchHit, SearchQuery};
use crate::server::AppState;
use crate::services::{page_slice, PageInfo};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Maps errors to response statuses: bad requests stay 4xx, upstream data
/// source failures surface as 502 so the frontend can distinguish "you asked
/// wrong" from "a backend is down".
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Network(_)
            | AppError::Search(_)
            | AppError::Embedding(_)
            | AppError::Parse(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Io(_) | AppError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        (status, axum::Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
}

/// POST /sessions
pub async fn create_session_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session_id = state.sessions.create().await;
    debug!("Session created: {}", session_id);
    (StatusCode::CREATED, axum::Json(SessionResponse { session_id }))
}

/// DELETE /sessions/{id}
pub async fn delete_session_handler(
    State(state): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    debug!("Session removed: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub query: SearchQuery,
}

/// One page of search results plus the paging position
#[derive(Debug, Serialize)]
pub struct ResultPageResponse {
    pub results: Vec<SearchHit>,
    pub page_info: PageInfo,
    /// Set when the query matched nothing; an empty result set is a normal
    /// outcome, not an error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn result_page(results: &[SearchHit], page: usize) -> Result<ResultPageResponse, AppError> {
    let (slice, page_info) = page_slice(results, PAGE_SIZE, page)?;
    let message = if results.is_empty() {
        Some("no companies matched the query".to_string())
    } else {
        None
    };
    Ok(ResultPageResponse {
        results: slice.to_vec(),
        page_info,
        message,
    })
}

/// POST /search
///
/// Runs the query, installs the result set in the session and returns the
/// first page.
pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<axum::Json<ResultPageResponse>, AppError> {
    // Session must exist before any upstream work happens
    state.sessions.get(request.session_id).await?;

    let hits = state.search.execute(&request.query).await?;
    info!(
        "Search in session {}: {} hits",
        request.session_id,
        hits.len()
    );

    let response = result_page(&hits, 0)?;
    state
        .sessions
        .update(request.session_id, |session| {
            session.set_results(hits);
            Ok(())
        })
        .await?;

    Ok(axum::Json(response))
}

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    pub session_id: Uuid,
    #[serde(default)]
    pub page: usize,
}

/// GET /results?session_id=<uuid>&page=2
///
/// Moves the session to the requested page and returns it.
pub async fn results_handler(
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
) -> Result<axum::Json<ResultPageResponse>, AppError> {
    let response = state
        .sessions
        .update(query.session_id, |session| {
            let response = result_page(&session.results, query.page)?;
            session.page = query.page;
            Ok(response)
        })
        .await?;

    Ok(axum::Json(response))
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub session_id: Uuid,
    pub ticker: String,
}

#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub company: CompanyRecord,
}

/// POST /select
///
/// Marks one company from the current results as selected for the detail
/// panel.
pub async fn select_handler(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<axum::Json<SelectResponse>, AppError> {
    let company = state
        .sessions
        .update(request.session_id, |session| {
            session.select(&request.ticker)?;
            // select() guarantees the selection is set
            session
                .selected
                .clone()
                .ok_or_else(|| AppError::Other("selection missing after select".to_string()))
        })
        .await?;

    debug!("Session {} selected {}", request.session_id, company.ticker);
    Ok(axum::Json(SelectResponse { company }))
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub session_id: Uuid,
    #[serde(default)]
    pub timeframe: ChartTimeframe,
}

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub ticker: String,
    pub name: String,
    pub timeframe: ChartTimeframe,
    pub bars: PriceSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn selected_company(state: &crate::services::SessionState) -> Result<CompanyRecord, AppError> {
    state
        .selected
        .clone()
        .ok_or_else(|| AppError::InvalidInput("no company selected in this session".to_string()))
}

/// GET /chart?session_id=<uuid>&timeframe=weekly
pub async fn chart_handler(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<axum::Json<ChartResponse>, AppError> {
    let session = state.sessions.get(query.session_id).await?;
    let company = selected_company(&session)?;

    let bars = state
        .charts
        .get_chart(&company.ticker, company.market_segment(), query.timeframe)
        .await?;

    let message = if bars.is_empty() {
        Some(format!("no {} data available for {}", query.timeframe, company.name))
    } else {
        None
    };

    Ok(axum::Json(ChartResponse {
        ticker: company.ticker,
        name: company.name,
        timeframe: query.timeframe,
        bars,
        message,
    }))
}

#[derive(Debug, Deserialize)]
pub struct MarketIndexQuery {
    pub market: crate::models::MarketSegment,
}

#[derive(Debug, Serialize)]
pub struct MarketIndexResponse {
    pub market: String,
    pub symbol: String,
    pub bars: PriceSeries,
}

/// GET /market-index?market=kospi|kosdaq|konex
///
/// 1-year index series for a market segment (KONEX serves the KOSDAQ index).
pub async fn market_index_handler(
    State(state): State<AppState>,
    Query(query): Query<MarketIndexQuery>,
) -> Result<axum::Json<MarketIndexResponse>, AppError> {
    let market = query.market;
    let bars = state.charts.get_market_index(market).await?;
    Ok(axum::Json(MarketIndexResponse {
        market: market.to_string(),
        symbol: market.index_symbol().to_string(),
        bars,
    }))
}

/// GET /rankings
pub async fn rankings_handler(
    State(state): State<AppState>,
) -> Result<axum::Json<RankingSnapshot>, AppError> {
    let snapshot = state.rankings.get().await?;
    Ok(axum::Json(snapshot))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub sessions: usize,
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let sessions = state.sessions.count().await;
    axum::Json(HealthResponse {
        status: "ok",
        sessions,
    })
}
