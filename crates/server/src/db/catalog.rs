use deadpool_postgres::Pool;

use clearcost_core::response::{
    BillingCodeProcedureMapping, Category, Family, ProcedureSummary, SearchResult,
};

use crate::error::AppError;

/// A procedure with its catalog context, as read from the database.
#[derive(Debug, Clone)]
pub struct ProcedureRow {
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
}

/// One billing-code row joined with its mapped procedure.
#[derive(Debug, Clone)]
pub struct BillingCodeHit {
    pub code_type: Option<String>,
    pub code_description: Option<String>,
    pub mapping: BillingCodeProcedureMapping,
}

/// Identity of a procedure family.
#[derive(Debug, Clone)]
pub struct FamilyInfo {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

/// Repository for the procedure catalog: categories, families, procedures,
/// billing codes, and the delegated full-text search.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: Pool,
}

impl CatalogRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// All categories with their family counts.
    pub async fn categories(&self) -> Result<Vec<Category>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT c.id, c.name, c.slug, c.emoji, c.description,
                        COUNT(f.id) AS family_count
                 FROM procedure_category c
                 LEFT JOIN procedure_family f ON f.category_id = c.id
                 GROUP BY c.id, c.name, c.slug, c.emoji, c.description
                 ORDER BY c.name",
                &[],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| Category {
                id: row.get("id"),
                name: row.get("name"),
                slug: row.get("slug"),
                emoji: row.get("emoji"),
                description: row.get("description"),
                family_count: row.get("family_count"),
            })
            .collect())
    }

    pub async fn category_exists(&self, slug: &str) -> Result<bool, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt("SELECT id FROM procedure_category WHERE slug = $1", &[&slug])
            .await?;
        Ok(row.is_some())
    }

    /// Families of a category with their procedure counts.
    pub async fn families(&self, category_slug: &str) -> Result<Vec<Family>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT f.id, f.name, f.slug, f.description,
                        COUNT(p.id) AS procedure_count
                 FROM procedure_family f
                 JOIN procedure_category c ON c.id = f.category_id
                 LEFT JOIN procedure p ON p.family_id = f.id
                 WHERE c.slug = $1
                 GROUP BY f.id, f.name, f.slug, f.description
                 ORDER BY f.name",
                &[&category_slug],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| Family {
                id: row.get("id"),
                name: row.get("name"),
                slug: row.get("slug"),
                description: row.get("description"),
                procedure_count: row.get("procedure_count"),
            })
            .collect())
    }

    pub async fn family_by_slug(&self, slug: &str) -> Result<Option<FamilyInfo>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT id, name, slug, description
                 FROM procedure_family
                 WHERE slug = $1",
                &[&slug],
            )
            .await?;

        Ok(row.map(|row| FamilyInfo {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
            description: row.get("description"),
        }))
    }

    /// Procedures of a family with their price statistics.
    pub async fn family_procedures(
        &self,
        family_id: &str,
    ) -> Result<Vec<ProcedureSummary>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT p.id, p.name, p.slug, p.description, p.cpt_code,
                        MIN(op.price) AS min_price,
                        MAX(op.price) AS max_price,
                        ROUND(AVG(op.price), 2) AS avg_price,
                        COUNT(op.price) AS price_count
                 FROM procedure p
                 LEFT JOIN org_pricing op ON op.procedure_id = p.id
                 WHERE p.family_id = $1
                 GROUP BY p.id, p.name, p.slug, p.description, p.cpt_code
                 ORDER BY p.name",
                &[&family_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| ProcedureSummary {
                id: row.get("id"),
                name: row.get("name"),
                slug: row.get("slug"),
                description: row.get("description"),
                cpt_code: row.get("cpt_code"),
                min_price: row.get("min_price"),
                max_price: row.get("max_price"),
                avg_price: row.get("avg_price"),
                price_count: row.get("price_count"),
            })
            .collect())
    }

    /// Look up a procedure by slug with its family and category context.
    pub async fn procedure_by_slug(&self, slug: &str) -> Result<Option<ProcedureRow>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT p.id, p.name, p.slug, p.description,
                        f.id AS family_id, f.name AS family_name, f.slug AS family_slug,
                        c.id AS category_id, c.name AS category_name, c.slug AS category_slug
                 FROM procedure p
                 JOIN procedure_family f ON f.id = p.family_id
                 JOIN procedure_category c ON c.id = f.category_id
                 WHERE p.slug = $1",
                &[&slug],
            )
            .await?;

        Ok(row.map(|row| ProcedureRow {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
            description: row.get("description"),
            family_id: row.get("family_id"),
            family_name: row.get("family_name"),
            family_slug: row.get("family_slug"),
            category_id: row.get("category_id"),
            category_name: row.get("category_name"),
            category_slug: row.get("category_slug"),
        }))
    }

    /// Procedures mapped to a billing code, optionally filtered by code type.
    pub async fn billing_code(
        &self,
        code: &str,
        code_type: Option<&str>,
    ) -> Result<Vec<BillingCodeHit>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT b.code_type, b.description AS code_description, b.is_primary,
                        p.id AS procedure_id, p.name AS procedure_name,
                        p.slug AS procedure_slug,
                        p.description AS procedure_description,
                        f.name AS family_name, f.slug AS family_slug,
                        c.name AS category_name, c.slug AS category_slug,
                        stats.min_price, stats.max_price, stats.avg_price,
                        COALESCE(pc.provider_count, 0) AS provider_count
                 FROM billing_code b
                 JOIN procedure p ON p.id = b.procedure_id
                 JOIN procedure_family f ON f.id = p.family_id
                 JOIN procedure_category c ON c.id = f.category_id
                 LEFT JOIN LATERAL (
                     SELECT MIN(price) AS min_price,
                            MAX(price) AS max_price,
                            ROUND(AVG(price), 2) AS avg_price
                     FROM org_pricing op
                     WHERE op.procedure_id = p.id
                 ) stats ON TRUE
                 LEFT JOIN LATERAL (
                     SELECT COUNT(DISTINCT provider_id) AS provider_count
                     FROM procedure_pricing pp
                     WHERE pp.procedure_id = p.id
                 ) pc ON TRUE
                 WHERE b.code = $1
                   AND ($2::text IS NULL OR b.code_type = $2)
                 ORDER BY b.is_primary DESC, p.name",
                &[&code, &code_type],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| BillingCodeHit {
                code_type: row.get("code_type"),
                code_description: row.get("code_description"),
                mapping: BillingCodeProcedureMapping {
                    procedure_id: row.get("procedure_id"),
                    procedure_name: row.get("procedure_name"),
                    procedure_slug: row.get("procedure_slug"),
                    procedure_description: row.get("procedure_description"),
                    family_name: row.get("family_name"),
                    family_slug: row.get("family_slug"),
                    category_name: row.get("category_name"),
                    category_slug: row.get("category_slug"),
                    min_price: row.get("min_price"),
                    max_price: row.get("max_price"),
                    avg_price: row.get("avg_price"),
                    provider_count: row.get("provider_count"),
                    is_primary: row.get("is_primary"),
                },
            })
            .collect())
    }

    /// Full-text/fuzzy procedure search, delegated to the database's
    /// `search_procedures` function. Results are ranked by `match_score`.
    pub async fn search(
        &self,
        query: &str,
        zip_code: Option<&str>,
        radius_miles: i32,
    ) -> Result<Vec<SearchResult>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT * FROM search_procedures($1, $2, $3)",
                &[&query, &zip_code, &radius_miles],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| SearchResult {
                procedure_id: row.get("procedure_id"),
                procedure_name: row.get("procedure_name"),
                procedure_slug: row.get("procedure_slug"),
                family_name: row.get("family_name"),
                family_slug: row.get("family_slug"),
                category_name: row.get("category_name"),
                category_slug: row.get("category_slug"),
                best_price: row.get("best_price"),
                avg_price: row.get("avg_price"),
                price_range: format!(
                    "${} - ${}",
                    row.get::<_, rust_decimal::Decimal>("best_price"),
                    row.get::<_, rust_decimal::Decimal>("max_price")
                ),
                provider_count: row.get("provider_count"),
                nearest_provider: row.get("nearest_provider"),
                nearest_distance_miles: row.get("nearest_distance_miles"),
                match_score: row.get("match_score"),
            })
            .collect())
    }
}
