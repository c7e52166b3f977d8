//! Provider detail endpoints

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use clearcost_core::response::{ProviderDetail, ProviderProcedureDetail};

use crate::AppState;
use crate::db::{CatalogRepository, ProviderRepository};
use crate::error::AppError;

/// GET /api/v1/providers/{id} - Provider detail with all procedure pricing
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let repo = ProviderRepository::new(state.pool.clone());

    let provider = repo
        .find(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Provider '{}' not found", id)))?;

    let location = repo.primary_location(&id).await?;
    let overview = repo.price_overview(&id).await?;
    let procedures = repo.procedures(&id).await?;

    let (address, city, state_code, zip_code, latitude, longitude) = match location {
        Some(loc) => (
            loc.address,
            loc.city,
            loc.state,
            loc.zip_code,
            loc.latitude,
            loc.longitude,
        ),
        None => (None, None, None, None, None, None),
    };

    Ok(Json(ProviderDetail {
        provider_id: provider.provider_id.clone(),
        provider_name: provider.display_name(),
        address,
        city,
        state: state_code,
        zip_code,
        latitude,
        longitude,
        total_procedures: overview.total_procedures,
        min_price: overview.min_price,
        max_price: overview.max_price,
        avg_price: overview.avg_price,
        procedures,
    }))
}

/// GET /api/v1/providers/{id}/procedures/{slug} - Provider price for one
/// procedure, with savings vs. the cross-organization average
pub async fn procedure_detail(
    State(state): State<AppState>,
    Path((id, slug)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let catalog = CatalogRepository::new(state.pool.clone());
    let provider_repo = ProviderRepository::new(state.pool.clone());
    let pricing = crate::db::PricingRepository::new(state.pool.clone());

    let proc = catalog
        .procedure_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Procedure '{}' not found", slug)))?;

    let (provider_name, price) = provider_repo
        .procedure_price(&id, &proc.id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Provider '{}' does not offer procedure '{}'",
                id, slug
            ))
        })?;

    let average_price = pricing.procedure_summary(&proc.id).await?.avg_price;
    let savings_vs_average = average_price.and_then(|avg| savings_pct(price, avg));

    Ok(Json(ProviderProcedureDetail {
        provider_id: id,
        provider_name,
        procedure_id: proc.id,
        procedure_name: proc.name,
        procedure_slug: proc.slug,
        price,
        average_price,
        savings_vs_average,
    }))
}

/// Percentage saved relative to the average price, one decimal place.
fn savings_pct(price: Decimal, avg: Decimal) -> Option<f64> {
    if avg <= Decimal::ZERO {
        return None;
    }
    let pct = ((avg - price) / avg * Decimal::from(100)).to_f64()?;
    Some((pct * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn savings_rounds_to_one_decimal() {
        let pct = savings_pct(Decimal::new(85000, 2), Decimal::new(140000, 2)).unwrap();
        assert_eq!(pct, 39.3);
    }

    #[test]
    fn savings_undefined_for_zero_average() {
        assert!(savings_pct(Decimal::new(100, 2), Decimal::ZERO).is_none());
    }
}
