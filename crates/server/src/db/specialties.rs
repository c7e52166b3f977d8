use deadpool_postgres::Pool;

use clearcost_core::model::{ProcedureRef, Specialty, TaxonomyEntry};

use crate::error::AppError;

/// Repository for specialty reference data and its taxonomy mapping.
#[derive(Clone)]
pub struct SpecialtyRepository {
    pool: Pool,
}

impl SpecialtyRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// All specialties, ordered by display name.
    pub async fn list(&self) -> Result<Vec<Specialty>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT id, name, slug, description, is_used
                 FROM specialty
                 ORDER BY name",
                &[],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| Specialty {
                id: row.get("id"),
                name: row.get("name"),
                slug: row.get("slug"),
                description: row.get("description"),
                is_used: row.get("is_used"),
            })
            .collect())
    }

    /// Look up a specialty by its URL slug.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Specialty>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT id, name, slug, description, is_used
                 FROM specialty
                 WHERE slug = $1",
                &[&slug],
            )
            .await?;

        Ok(row.map(|row| Specialty {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
            description: row.get("description"),
            is_used: row.get("is_used"),
        }))
    }

    /// NUCC taxonomy entries mapped to a specialty.
    pub async fn taxonomy_entries(
        &self,
        specialty_id: &str,
    ) -> Result<Vec<TaxonomyEntry>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT t.id, t.nucc_grouping, t.display_name, t.definition
                 FROM taxonomy t
                 JOIN specialty_taxonomy st ON st.taxonomy_id = t.id
                 WHERE st.specialty_id = $1
                 ORDER BY t.display_name",
                &[&specialty_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| TaxonomyEntry {
                id: row.get("id"),
                grouping: row.get("nucc_grouping"),
                display_name: row.get("display_name"),
                definition: row.get("definition"),
            })
            .collect())
    }

    /// The bare taxonomy codes for a specialty. An empty result means "no
    /// providers", not a fault.
    pub async fn taxonomy_codes(&self, specialty_id: &str) -> Result<Vec<String>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT taxonomy_id FROM specialty_taxonomy WHERE specialty_id = $1",
                &[&specialty_id],
            )
            .await?;

        Ok(rows.iter().map(|row| row.get("taxonomy_id")).collect())
    }

    /// The designated standard-visit procedure used as the pricing proxy for
    /// a specialty. `None` when no procedure has been designated.
    pub async fn representative_procedure(
        &self,
        specialty_id: &str,
    ) -> Result<Option<ProcedureRef>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT p.id, p.name, p.slug
                 FROM procedure p
                 JOIN specialty_procedure sp ON sp.procedure_id = p.id
                 WHERE sp.specialty_id = $1 AND sp.is_representative
                 LIMIT 1",
                &[&specialty_id],
            )
            .await?;

        Ok(row.map(|row| ProcedureRef {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
        }))
    }
}
