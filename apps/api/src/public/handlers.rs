use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::render::render_page;
use super::section::{load_portfolio, Portfolio};
use crate::errors::AppError;
use crate::state::AppState;

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_page))
        .route("/api/v1/portfolio", get(handle_portfolio))
        .route("/demo-assets/*path", get(handle_demo_asset))
}

async fn load(state: &AppState) -> Portfolio {
    let store = (!state.is_demo()).then(|| state.store.clone());
    load_portfolio(store).await
}

/// GET /
pub async fn handle_page(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&load(&state).await))
}

/// GET /api/v1/portfolio
pub async fn handle_portfolio(State(state): State<AppState>) -> Json<Portfolio> {
    Json(load(&state).await)
}

/// GET /demo-assets/*path
///
/// Serves files uploaded while running in demo mode.
pub async fn handle_demo_asset(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound(format!("No asset at {path}"));
    let assets = state.demo_assets.as_ref().ok_or_else(not_found)?;
    let asset = assets.get(&path).await.ok_or_else(not_found)?;

    let content_type = asset
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Ok(([(header::CONTENT_TYPE, content_type)], asset.bytes).into_response())
}
