//! Procedure detail and procedure-providers endpoints

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use clearcost_core::response::{ProcedureDetail, ProcedureProvider, ProcedureProvidersResponse};

use crate::AppState;
use crate::db::{CatalogRepository, PricingRepository};
use crate::error::AppError;

/// GET /api/v1/procedures/{slug} - Procedure detail with carrier pricing
pub async fn detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let catalog = CatalogRepository::new(state.pool.clone());
    let pricing = PricingRepository::new(state.pool.clone());

    let proc = catalog
        .procedure_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Procedure '{}' not found", slug)))?;

    let summary = pricing.procedure_summary(&proc.id).await?;

    // Carrier prices are auxiliary to the detail; a failure here degrades to
    // an empty list instead of failing the request.
    let carrier_prices = match pricing.carrier_prices(&proc.id).await {
        Ok(prices) => prices,
        Err(e) => {
            tracing::warn!(procedure = %slug, error = %e, "Could not fetch carrier prices");
            Vec::new()
        }
    };

    Ok(Json(ProcedureDetail {
        id: proc.id,
        name: proc.name,
        slug: proc.slug,
        description: proc.description,
        family_id: proc.family_id,
        family_name: proc.family_name,
        family_slug: proc.family_slug,
        category_id: proc.category_id,
        category_name: proc.category_name,
        category_slug: proc.category_slug,
        min_price: summary.min_price,
        max_price: summary.max_price,
        avg_price: summary.avg_price,
        median_price: summary.median_price,
        carrier_prices,
    }))
}

/// GET /api/v1/procedures/{slug}/providers - Providers offering a procedure
pub async fn providers(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let catalog = CatalogRepository::new(state.pool.clone());
    let pricing = PricingRepository::new(state.pool.clone());

    let proc = catalog
        .procedure_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Procedure '{}' not found", slug)))?;

    let avg_price = pricing.procedure_summary(&proc.id).await?.avg_price;
    let rows = pricing.providers_for_procedure(&proc.id).await?;

    let mut providers: Vec<ProcedureProvider> = rows
        .into_iter()
        .map(|(provider_id, provider_name, price)| {
            let price_relative_to_average =
                avg_price.and_then(|avg| relative_to_average(price, avg));
            ProcedureProvider {
                provider_id,
                provider_name,
                price_estimate: price,
                price_average: avg_price,
                price_relative_to_average,
            }
        })
        .collect();

    // Lowest price first
    providers.sort_by(|a, b| a.price_estimate.cmp(&b.price_estimate));

    Ok(Json(ProcedureProvidersResponse {
        procedure_name: proc.name,
        procedure_slug: proc.slug,
        providers,
    }))
}

fn relative_to_average(price: Decimal, avg: Decimal) -> Option<String> {
    if avg <= Decimal::ZERO {
        return None;
    }
    let pct = ((avg - price) / avg * Decimal::from(100)).to_f64()?;
    let pct = (pct * 10.0).round() / 10.0;
    if pct > 0.0 {
        Some(format!("{pct:.1}% below average"))
    } else {
        Some("at average".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_label_for_below_average_price() {
        let label = relative_to_average(Decimal::new(8000, 2), Decimal::new(10000, 2));
        assert_eq!(label.as_deref(), Some("20.0% below average"));
    }

    #[test]
    fn relative_label_keeps_one_decimal_for_whole_percentages() {
        // 85 vs 105 is 19.0476..%, rounded to one forced decimal
        let label = relative_to_average(Decimal::new(8500, 2), Decimal::new(10500, 2));
        assert_eq!(label.as_deref(), Some("19.0% below average"));
    }

    #[test]
    fn relative_label_at_or_above_average() {
        let label = relative_to_average(Decimal::new(10000, 2), Decimal::new(10000, 2));
        assert_eq!(label.as_deref(), Some("at average"));
    }

    #[test]
    fn no_label_when_average_is_zero() {
        assert!(relative_to_average(Decimal::new(5000, 2), Decimal::ZERO).is_none());
    }
}
