use deadpool_postgres::Pool;
use rust_decimal::Decimal;

use clearcost_core::geo::BoundingBox;
use clearcost_core::model::{Provider, ProviderLocation};
use clearcost_core::response::ProviderProcedurePricing;

use crate::error::AppError;

/// Aggregate pricing figures across everything a provider offers.
#[derive(Debug, Clone)]
pub struct ProviderPriceOverview {
    pub total_procedures: i64,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub avg_price: Option<Decimal>,
}

/// Repository for provider identities, practice locations, and the
/// provider-level procedure pricing used by the detail endpoints.
#[derive(Clone)]
pub struct ProviderRepository {
    pool: Pool,
}

impl ProviderRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Candidate providers whose specialty code is in `codes`, capped at
    /// `cap` rows. The cap is a heuristic over-fetch to compensate for the
    /// geographic filtering that follows; true matches beyond it are
    /// silently dropped.
    pub async fn candidates_by_taxonomy(
        &self,
        codes: &[String],
        cap: i64,
    ) -> Result<Vec<Provider>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT provider_id, first_name, last_name, credential,
                        license_number, license_state_code, specialty_code
                 FROM provider
                 WHERE specialty_code = ANY($1)
                 ORDER BY provider_id
                 LIMIT $2",
                &[&codes, &cap],
            )
            .await?;

        Ok(rows.iter().map(provider_from_row).collect())
    }

    /// Practice locations for the given providers, restricted to the
    /// bounding box. Rows without coordinates are returned too so the caller
    /// can count them before excluding them.
    pub async fn locations_in_bbox(
        &self,
        provider_ids: &[String],
        bbox: &BoundingBox,
    ) -> Result<Vec<ProviderLocation>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT provider_id, org_id, address, city, state, zip_code,
                        latitude, longitude
                 FROM provider_location
                 WHERE provider_id = ANY($1)
                   AND (latitude IS NULL OR longitude IS NULL
                        OR (latitude BETWEEN $2 AND $3
                            AND longitude BETWEEN $4 AND $5))",
                &[
                    &provider_ids,
                    &bbox.min_lat,
                    &bbox.max_lat,
                    &bbox.min_lon,
                    &bbox.max_lon,
                ],
            )
            .await?;

        Ok(rows.iter().map(location_from_row).collect())
    }

    /// Look up a single provider by id.
    pub async fn find(&self, provider_id: &str) -> Result<Option<Provider>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT provider_id, first_name, last_name, credential,
                        license_number, license_state_code, specialty_code
                 FROM provider
                 WHERE provider_id = $1",
                &[&provider_id],
            )
            .await?;

        Ok(row.as_ref().map(provider_from_row))
    }

    /// The provider's first practice location, if any.
    pub async fn primary_location(
        &self,
        provider_id: &str,
    ) -> Result<Option<ProviderLocation>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT provider_id, org_id, address, city, state, zip_code,
                        latitude, longitude
                 FROM provider_location
                 WHERE provider_id = $1
                 ORDER BY org_id NULLS LAST
                 LIMIT 1",
                &[&provider_id],
            )
            .await?;

        Ok(row.as_ref().map(location_from_row))
    }

    /// Every procedure the provider offers, with pricing and catalog context.
    pub async fn procedures(
        &self,
        provider_id: &str,
    ) -> Result<Vec<ProviderProcedurePricing>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT pr.id AS procedure_id, pr.name AS procedure_name,
                        pr.slug AS procedure_slug,
                        f.name AS family_name, f.slug AS family_slug,
                        c.name AS category_name, c.slug AS category_slug,
                        pp.price, pp.carrier_id, pp.carrier_name, pp.updated_at
                 FROM procedure_pricing pp
                 JOIN procedure pr ON pr.id = pp.procedure_id
                 JOIN procedure_family f ON f.id = pr.family_id
                 JOIN procedure_category c ON c.id = f.category_id
                 WHERE pp.provider_id = $1
                 ORDER BY pr.name",
                &[&provider_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| ProviderProcedurePricing {
                procedure_id: row.get("procedure_id"),
                procedure_name: row.get("procedure_name"),
                procedure_slug: row.get("procedure_slug"),
                family_name: row.get("family_name"),
                family_slug: row.get("family_slug"),
                category_name: row.get("category_name"),
                category_slug: row.get("category_slug"),
                price: row.get("price"),
                carrier_id: row.get("carrier_id"),
                carrier_name: row.get("carrier_name"),
                last_updated: row.get("updated_at"),
            })
            .collect())
    }

    /// Price statistics across everything the provider offers.
    pub async fn price_overview(
        &self,
        provider_id: &str,
    ) -> Result<ProviderPriceOverview, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "SELECT COUNT(*) AS total_procedures,
                        MIN(price) AS min_price,
                        MAX(price) AS max_price,
                        ROUND(AVG(price), 2) AS avg_price
                 FROM procedure_pricing
                 WHERE provider_id = $1",
                &[&provider_id],
            )
            .await?;

        Ok(ProviderPriceOverview {
            total_procedures: row.get("total_procedures"),
            min_price: row.get("min_price"),
            max_price: row.get("max_price"),
            avg_price: row.get("avg_price"),
        })
    }

    /// The provider's price for one procedure.
    ///
    /// TODO: a provider can offer the same procedure at multiple sites; this
    /// returns only the first row.
    pub async fn procedure_price(
        &self,
        provider_id: &str,
        procedure_id: &str,
    ) -> Result<Option<(String, Decimal)>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT provider_name, price
                 FROM procedure_pricing
                 WHERE provider_id = $1 AND procedure_id = $2
                 LIMIT 1",
                &[&provider_id, &procedure_id],
            )
            .await?;

        Ok(row.map(|row| (row.get("provider_name"), row.get("price"))))
    }
}

fn provider_from_row(row: &tokio_postgres::Row) -> Provider {
    Provider {
        provider_id: row.get("provider_id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        credential: row.get("credential"),
        license_number: row.get("license_number"),
        license_state_code: row.get("license_state_code"),
        specialty_code: row.get("specialty_code"),
    }
}

fn location_from_row(row: &tokio_postgres::Row) -> ProviderLocation {
    ProviderLocation {
        provider_id: row.get("provider_id"),
        org_id: row.get("org_id"),
        address: row.get("address"),
        city: row.get("city"),
        state: row.get("state"),
        zip_code: row.get("zip_code"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
    }
}
