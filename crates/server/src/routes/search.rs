//! Full-text procedure search, delegated to the database

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use clearcost_core::response::SearchResponse;

use crate::AppState;
use crate::db::CatalogRepository;
use crate::error::AppError;

/// Query parameters for procedure search. `zip` is accepted as an alias for
/// `zip_code` for compatibility with older clients.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub zip_code: Option<String>,
    pub zip: Option<String>,
    pub radius: Option<u32>,
}

/// GET /api/v1/search - Search procedures by name
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.q.trim().to_string();
    if query.len() < 2 {
        return Err(AppError::BadRequest(
            "q must be at least 2 characters".to_string(),
        ));
    }

    let zip_code = params.zip_code.or(params.zip);
    if let Some(zip) = &zip_code {
        if zip.len() != 5 || !zip.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::BadRequest(
                "zip must be a 5-digit ZIP code".to_string(),
            ));
        }
    }
    let radius_miles = params.radius.unwrap_or(25);
    if !(1..=100).contains(&radius_miles) {
        return Err(AppError::BadRequest(
            "radius must be between 1 and 100".to_string(),
        ));
    }

    let repo = CatalogRepository::new(state.pool.clone());
    let results = repo
        .search(&query, zip_code.as_deref(), radius_miles as i32)
        .await?;

    tracing::info!(
        query = %query,
        zip_code = zip_code.as_deref().unwrap_or(""),
        radius_miles,
        results_count = results.len(),
        "Search completed"
    );

    Ok(Json(SearchResponse {
        query,
        location: zip_code,
        radius_miles,
        results_count: results.len(),
        results,
    }))
}
