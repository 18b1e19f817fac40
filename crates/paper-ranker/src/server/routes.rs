//! HTTP routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::api;
use crate::error::{ApiError, ApiResult};
use crate::models::{PaperRecord, SearchQuery, SortMode, parse_iso_date};
use crate::pipeline::PaperService;

/// Query parameters for `GET /papers`.
#[derive(Debug, Deserialize)]
pub struct PapersParams {
    pub category: String,
    pub start_date_str: String,
    pub end_date_str: String,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl PapersParams {
    /// Validate into a [`SearchQuery`].
    ///
    /// # Errors
    ///
    /// Returns a validation error for any malformed parameter.
    pub fn into_query(self) -> ApiResult<SearchQuery> {
        let start = parse_iso_date("start_date_str", &self.start_date_str)?;
        let end = parse_iso_date("end_date_str", &self.end_date_str)?;
        let sort = match self.sort_by.as_deref() {
            Some(s) => s.parse()?,
            None => SortMode::default(),
        };
        let limit = self.limit.unwrap_or(api::DEFAULT_LIMIT);

        SearchQuery::new(self.category, start, end, sort, limit)
    }
}

/// Shared state for HTTP handlers.
pub struct AppState {
    pub service: PaperService,
}

/// Create the HTTP router.
pub fn create_router(service: PaperService) -> Router {
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/papers", get(get_papers))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Mirrors origin, method and headers so credentials are allowed
                .layer(CorsLayer::very_permissive()),
        )
        .with_state(state)
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cached = state.service.ranker().cache().len().await;
    Json(serde_json::json!({
        "status": "ok",
        "service": "paper-ranker",
        "version": env!("CARGO_PKG_VERSION"),
        "cachedTitles": cached
    }))
}

async fn get_papers(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PapersParams>, QueryRejection>,
) -> ApiResult<Json<Vec<PaperRecord>>> {
    // Missing or mistyped parameters get the same JSON error body as invalid values
    let Query(params) = params.map_err(|e| ApiError::validation("query", e.body_text()))?;
    let query = params.into_query()?;
    tracing::info!(
        category = %query.category,
        start = %query.start_date,
        end = %query.end_date,
        sort = %query.sort,
        limit = query.limit,
        "Handling /papers"
    );

    let papers = state.service.papers(&query).await?;
    Ok(Json(papers))
}
