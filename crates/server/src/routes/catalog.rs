//! Category, family, and billing-code endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use clearcost_core::response::{
    BillingCodeDetail, CategoriesResponse, CategoryFamiliesResponse, FamilyProceduresResponse,
};

use crate::AppState;
use crate::db::CatalogRepository;
use crate::error::AppError;

/// GET /api/v1/categories - All categories with family counts
pub async fn categories(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let repo = CatalogRepository::new(state.pool.clone());
    let categories = repo.categories().await?;
    Ok(Json(CategoriesResponse { categories }))
}

/// GET /api/v1/categories/{slug}/families - Families of a category
pub async fn families(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let repo = CatalogRepository::new(state.pool.clone());

    let families = repo.families(&slug).await?;
    if families.is_empty() && !repo.category_exists(&slug).await? {
        return Err(AppError::NotFound(format!("Category '{}' not found", slug)));
    }

    Ok(Json(CategoryFamiliesResponse {
        category_slug: slug,
        families,
    }))
}

/// GET /api/v1/families/{slug}/procedures - Procedures of a family
pub async fn procedures(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let repo = CatalogRepository::new(state.pool.clone());

    let family = repo
        .family_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Family '{}' not found", slug)))?;

    let procedures = repo.family_procedures(&family.id).await?;

    Ok(Json(FamilyProceduresResponse {
        family_slug: family.slug,
        family_name: family.name,
        family_description: family.description,
        procedures,
    }))
}

/// Query parameters for billing-code lookup
#[derive(Debug, Deserialize)]
pub struct BillingCodeParams {
    pub code_type: Option<String>,
}

/// GET /api/v1/codes/{code} - Procedures mapped to a billing code
pub async fn billing_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<BillingCodeParams>,
) -> Result<impl IntoResponse, AppError> {
    let repo = CatalogRepository::new(state.pool.clone());

    let hits = repo
        .billing_code(&code, params.code_type.as_deref())
        .await?;

    let Some(first) = hits.first() else {
        let type_msg = params
            .code_type
            .map(|t| format!(" (type: {t})"))
            .unwrap_or_default();
        return Err(AppError::NotFound(format!(
            "Billing code '{}'{} not found",
            code, type_msg
        )));
    };

    let code_type = first.code_type.clone();
    let code_description = first.code_description.clone();

    Ok(Json(BillingCodeDetail {
        code,
        code_type,
        code_description,
        procedures: hits.into_iter().map(|h| h.mapping).collect(),
    }))
}
