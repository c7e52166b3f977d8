//! Typed rows for the reference entities.
//!
//! Every entity is owned and mutated exclusively by the external database and
//! its ETL pipeline; this service only reads. Fields that the pipeline may
//! leave unpopulated are `Option` here rather than defaulted, so "no data" is
//! never confused with a real value.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A medical practice area exposed to end users via a URL slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialty {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_used: bool,
}

/// A NUCC taxonomy entry mapped to a specialty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub id: String,
    pub grouping: Option<String>,
    pub display_name: String,
    pub definition: Option<String>,
}

/// A clinician identity. Carries no location of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub provider_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub credential: Option<String>,
    pub license_number: Option<String>,
    pub license_state_code: Option<String>,
    pub specialty_code: Option<String>,
}

impl Provider {
    /// Human-readable name built from first name, last name and credential,
    /// omitting empty parts. Falls back to `"Unknown Provider"` when every
    /// part is empty.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.credential.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

        if parts.is_empty() {
            "Unknown Provider".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// A practice site. One provider may have several; each may belong to an
/// organization, which is the grain pricing is recorded at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderLocation {
    pub provider_id: String,
    pub org_id: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Static reference mapping a ZIP to its representative coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZipCentroid {
    pub zip5: String,
    pub lat: f64,
    pub lon: f64,
}

/// One observed price for a (procedure, organization, carrier) triple.
///
/// Pricing joins use the organization identifier, never the provider
/// identifier.
#[derive(Debug, Clone)]
pub struct OrgPriceRow {
    pub procedure_id: String,
    pub org_id: String,
    pub carrier_id: Option<String>,
    pub carrier_name: Option<String>,
    pub price: Decimal,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Aggregated price statistics for one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceStats {
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub avg_price: Decimal,
}

/// Minimal reference to a procedure, used where only identity is needed
/// (e.g. a specialty's representative procedure).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureRef {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(first: Option<&str>, last: Option<&str>, credential: Option<&str>) -> Provider {
        Provider {
            provider_id: "prov_001".into(),
            first_name: first.map(Into::into),
            last_name: last.map(Into::into),
            credential: credential.map(Into::into),
            license_number: None,
            license_state_code: None,
            specialty_code: None,
        }
    }

    #[test]
    fn display_name_joins_nonempty_parts() {
        let p = provider(Some("Jane"), Some("Doe"), Some("MD"));
        assert_eq!(p.display_name(), "Jane Doe MD");
    }

    #[test]
    fn display_name_skips_missing_and_blank_parts() {
        let p = provider(Some("Jane"), None, Some("  "));
        assert_eq!(p.display_name(), "Jane");
    }

    #[test]
    fn display_name_defaults_when_all_parts_empty() {
        let p = provider(None, Some(""), None);
        assert_eq!(p.display_name(), "Unknown Provider");
    }
}
