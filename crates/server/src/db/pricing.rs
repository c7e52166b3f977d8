use std::collections::HashMap;

use deadpool_postgres::Pool;
use rust_decimal::Decimal;

use clearcost_core::model::{OrgPriceRow, PriceStats};
use clearcost_core::response::CarrierPrice;

use crate::error::AppError;

/// Price statistics for one procedure across all organizations.
#[derive(Debug, Clone)]
pub struct ProcedurePriceSummary {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub avg_price: Option<Decimal>,
    pub median_price: Option<Decimal>,
}

/// Repository for observed prices. All joins here use the organization
/// identifier; joining on the provider identifier produces zero coverage.
#[derive(Clone)]
pub struct PricingRepository {
    pool: Pool,
}

impl PricingRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Raw observed prices for (procedure, organization in set). Aggregation
    /// happens in-process via `clearcost_core::pricing::aggregate_by_org`.
    pub async fn org_rows(
        &self,
        procedure_id: &str,
        org_ids: &[String],
    ) -> Result<Vec<OrgPriceRow>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT procedure_id, org_id, carrier_id, carrier_name, price, updated_at
                 FROM org_pricing
                 WHERE procedure_id = $1 AND org_id = ANY($2)",
                &[&procedure_id, &org_ids],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| OrgPriceRow {
                procedure_id: row.get("procedure_id"),
                org_id: row.get("org_id"),
                carrier_id: row.get("carrier_id"),
                carrier_name: row.get("carrier_name"),
                price: row.get("price"),
                updated_at: row.get("updated_at"),
            })
            .collect())
    }

    /// Pre-aggregated per-organization statistics from the
    /// `procedure_org_pricing` view. Alternate read path behind the
    /// `PRICING_VIEW_ENABLED` flag; shape-identical to the in-process path.
    pub async fn org_stats_from_view(
        &self,
        procedure_id: &str,
        org_ids: &[String],
    ) -> Result<HashMap<String, PriceStats>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT org_id, min_price, max_price, avg_price
                 FROM procedure_org_pricing
                 WHERE procedure_id = $1 AND org_id = ANY($2)",
                &[&procedure_id, &org_ids],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| {
                (
                    row.get("org_id"),
                    PriceStats {
                        min_price: row.get("min_price"),
                        max_price: row.get("max_price"),
                        avg_price: row.get("avg_price"),
                    },
                )
            })
            .collect())
    }

    /// Min/max/avg/median across every organization's observed prices for a
    /// procedure. All fields are `None` when no prices exist.
    pub async fn procedure_summary(
        &self,
        procedure_id: &str,
    ) -> Result<ProcedurePriceSummary, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "SELECT MIN(price) AS min_price,
                        MAX(price) AS max_price,
                        ROUND(AVG(price), 2) AS avg_price,
                        (PERCENTILE_CONT(0.5) WITHIN GROUP
                            (ORDER BY price::double precision))::numeric(12,2)
                            AS median_price
                 FROM org_pricing
                 WHERE procedure_id = $1",
                &[&procedure_id],
            )
            .await?;

        Ok(ProcedurePriceSummary {
            min_price: row.get("min_price"),
            max_price: row.get("max_price"),
            avg_price: row.get("avg_price"),
            median_price: row.get("median_price"),
        })
    }

    /// Average observed price per carrier for a procedure.
    pub async fn carrier_prices(&self, procedure_id: &str) -> Result<Vec<CarrierPrice>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT carrier_id, carrier_name,
                        ROUND(AVG(price), 2) AS price,
                        MAX(updated_at) AS last_updated
                 FROM org_pricing
                 WHERE procedure_id = $1
                 GROUP BY carrier_id, carrier_name
                 ORDER BY carrier_name",
                &[&procedure_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| CarrierPrice {
                carrier_id: row.get("carrier_id"),
                carrier_name: row.get("carrier_name"),
                price: row.get("price"),
                currency: "USD".to_string(),
                last_updated: row.get("last_updated"),
            })
            .collect())
    }

    /// Providers offering a procedure, with their price.
    pub async fn providers_for_procedure(
        &self,
        procedure_id: &str,
    ) -> Result<Vec<(String, String, Decimal)>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT provider_id, provider_name, price
                 FROM procedure_pricing
                 WHERE procedure_id = $1",
                &[&procedure_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| {
                (
                    row.get("provider_id"),
                    row.get("provider_name"),
                    row.get("price"),
                )
            })
            .collect())
    }
}
