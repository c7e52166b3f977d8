//! JSON response shapes for the ClearCost API.
//!
//! Prices serialize as decimal strings (`"120.50"`), never as floats.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{PriceStats, Specialty, TaxonomyEntry};

/// Response for `GET /api/v1/specialties`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialtiesResponse {
    pub specialties: Vec<Specialty>,
}

/// Response for `GET /api/v1/specialties/{slug}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialtyDetailsResponse {
    pub specialty_slug: String,
    pub nucc_specialties: Vec<TaxonomyEntry>,
}

/// Specialty identity echoed back in provider-search responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialtyRef {
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl From<&Specialty> for SpecialtyRef {
    fn from(s: &Specialty) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            slug: s.slug.clone(),
        }
    }
}

/// Practice-site portion of one provider search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultLocation {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    /// Rounded to one decimal place.
    pub distance_miles: f64,
}

/// One entry of the geo-radius provider search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialtyProviderResult {
    pub provider_id: String,
    pub display_name: String,
    pub org_id: Option<String>,
    pub location: ResultLocation,
    /// Absent when the organization has no observed prices for the
    /// specialty's representative procedure. Absence means "no data",
    /// not a zero-cost procedure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PriceStats>,
}

/// Response-level metadata for the provider search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMetadata {
    /// Locations within the radius before truncation to `limit`.
    pub total_results: usize,
    pub returned_results: usize,
    pub search_radius_miles: u32,
    /// Share of returned results that carry pricing, one decimal.
    pub pricing_coverage_pct: f64,
}

/// Response for `GET /api/v1/specialties/{slug}/providers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialtyProvidersResponse {
    pub specialty: SpecialtyRef,
    pub results: Vec<SpecialtyProviderResult>,
    pub metadata: SearchMetadata,
}

/// One hit of the full-text procedure search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub procedure_id: String,
    pub procedure_name: String,
    pub procedure_slug: String,
    pub family_name: String,
    pub family_slug: String,
    pub category_name: String,
    pub category_slug: String,
    pub best_price: Decimal,
    pub avg_price: Decimal,
    pub price_range: String,
    pub provider_count: i64,
    pub nearest_provider: Option<String>,
    pub nearest_distance_miles: Option<f64>,
    pub match_score: f64,
}

/// Response for `GET /api/v1/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub location: Option<String>,
    pub radius_miles: u32,
    pub results_count: usize,
    pub results: Vec<SearchResult>,
}

/// One carrier's price for a procedure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierPrice {
    pub carrier_id: Option<String>,
    pub carrier_name: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Response for `GET /api/v1/procedures/{slug}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureDetail {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub family_id: String,
    pub family_name: String,
    pub family_slug: String,
    pub category_id: String,
    pub category_name: String,
    pub category_slug: String,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub avg_price: Option<Decimal>,
    pub median_price: Option<Decimal>,
    pub carrier_prices: Vec<CarrierPrice>,
}

/// One provider offering a procedure, with price relative to the average.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureProvider {
    pub provider_id: String,
    pub provider_name: String,
    pub price_estimate: Decimal,
    pub price_average: Option<Decimal>,
    pub price_relative_to_average: Option<String>,
}

/// Response for `GET /api/v1/procedures/{slug}/providers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureProvidersResponse {
    pub procedure_name: String,
    pub procedure_slug: String,
    pub providers: Vec<ProcedureProvider>,
}

/// Procedure pricing offered by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProcedurePricing {
    pub procedure_id: String,
    pub procedure_name: String,
    pub procedure_slug: String,
    pub family_name: String,
    pub family_slug: String,
    pub category_name: String,
    pub category_slug: String,
    pub price: Decimal,
    pub carrier_id: Option<String>,
    pub carrier_name: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Response for `GET /api/v1/providers/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDetail {
    pub provider_id: String,
    pub provider_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub total_procedures: i64,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub avg_price: Option<Decimal>,
    pub procedures: Vec<ProviderProcedurePricing>,
}

/// Response for `GET /api/v1/providers/{id}/procedures/{slug}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProcedureDetail {
    pub provider_id: String,
    pub provider_name: String,
    pub procedure_id: String,
    pub procedure_name: String,
    pub procedure_slug: String,
    pub price: Decimal,
    pub average_price: Option<Decimal>,
    /// Percentage below the average price, one decimal. Absent when no
    /// average exists.
    pub savings_vs_average: Option<f64>,
}

/// A procedure category with its family count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub emoji: Option<String>,
    pub description: Option<String>,
    pub family_count: i64,
}

/// Response for `GET /api/v1/categories`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

/// A procedure family with its procedure count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub procedure_count: i64,
}

/// Response for `GET /api/v1/categories/{slug}/families`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFamiliesResponse {
    pub category_slug: String,
    pub families: Vec<Family>,
}

/// A procedure with its price statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub cpt_code: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub avg_price: Option<Decimal>,
    pub price_count: i64,
}

/// Response for `GET /api/v1/families/{slug}/procedures`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyProceduresResponse {
    pub family_slug: String,
    pub family_name: String,
    pub family_description: Option<String>,
    pub procedures: Vec<ProcedureSummary>,
}

/// A procedure mapped to a billing code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingCodeProcedureMapping {
    pub procedure_id: String,
    pub procedure_name: String,
    pub procedure_slug: String,
    pub procedure_description: Option<String>,
    pub family_name: String,
    pub family_slug: String,
    pub category_name: String,
    pub category_slug: String,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub avg_price: Option<Decimal>,
    pub provider_count: i64,
    pub is_primary: bool,
}

/// Response for `GET /api/v1/codes/{code}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingCodeDetail {
    pub code: String,
    pub code_type: Option<String>,
    pub code_description: Option<String>,
    pub procedures: Vec<BillingCodeProcedureMapping>,
}
