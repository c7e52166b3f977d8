//! Specialty endpoints, including the geo-radius provider search

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use clearcost_core::response::{SpecialtiesResponse, SpecialtyDetailsResponse};

use crate::AppState;
use crate::db::SpecialtyRepository;
use crate::error::AppError;
use crate::nearby::{self, NearbyQuery};

/// GET /api/v1/specialties - List all specialties
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let repo = SpecialtyRepository::new(state.pool.clone());
    let specialties = repo.list().await?;
    Ok(Json(SpecialtiesResponse { specialties }))
}

/// GET /api/v1/specialties/{slug} - NUCC taxonomy entries for a specialty
pub async fn detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let repo = SpecialtyRepository::new(state.pool.clone());

    let specialty = repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Specialty '{}' not found", slug)))?;

    // A specialty with no mapped taxonomy entries is a valid, empty answer.
    let nucc_specialties = repo.taxonomy_entries(&specialty.id).await?;

    Ok(Json(SpecialtyDetailsResponse {
        specialty_slug: specialty.slug,
        nucc_specialties,
    }))
}

/// Query parameters for the provider search
#[derive(Debug, Deserialize)]
pub struct ProviderSearchParams {
    pub zip_code: String,
    pub radius_miles: Option<u32>,
    pub limit: Option<usize>,
}

impl ProviderSearchParams {
    fn validate(self) -> Result<NearbyQuery, AppError> {
        if self.zip_code.len() != 5 || !self.zip_code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::BadRequest(
                "zip_code must be a 5-digit ZIP code".to_string(),
            ));
        }
        let radius_miles = self.radius_miles.unwrap_or(25);
        if !(1..=100).contains(&radius_miles) {
            return Err(AppError::BadRequest(
                "radius_miles must be between 1 and 100".to_string(),
            ));
        }
        let limit = self.limit.unwrap_or(20);
        if !(1..=100).contains(&limit) {
            return Err(AppError::BadRequest(
                "limit must be between 1 and 100".to_string(),
            ));
        }
        Ok(NearbyQuery {
            zip_code: self.zip_code,
            radius_miles,
            limit,
        })
    }
}

/// GET /api/v1/specialties/{slug}/providers - Providers near a ZIP code
pub async fn providers(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ProviderSearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.validate()?;

    // Resolve the specialty first: an unknown slug fails here, before any
    // downstream query is issued.
    let repo = SpecialtyRepository::new(state.pool.clone());
    let specialty = repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Specialty '{}' not found", slug)))?;

    let response = nearby::specialty_providers(&state, &specialty, &query).await?;

    tracing::info!(
        specialty = %slug,
        zip_code = %query.zip_code,
        radius_miles = query.radius_miles,
        total_results = response.metadata.total_results,
        returned_results = response.metadata.returned_results,
        pricing_coverage_pct = response.metadata.pricing_coverage_pct,
        "Provider search completed"
    );

    Ok(Json(response))
}
