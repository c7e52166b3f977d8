use deadpool_postgres::Pool;

use clearcost_core::model::ZipCentroid;

use crate::error::AppError;

/// Repository for the static ZIP centroid reference table.
#[derive(Clone)]
pub struct ZipRepository {
    pool: Pool,
}

impl ZipRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn centroid(&self, zip5: &str) -> Result<Option<ZipCentroid>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT zip5, latitude, longitude FROM zip_code WHERE zip5 = $1",
                &[&zip5],
            )
            .await?;

        Ok(row.map(|row| ZipCentroid {
            zip5: row.get("zip5"),
            lat: row.get("latitude"),
            lon: row.get("longitude"),
        }))
    }
}
