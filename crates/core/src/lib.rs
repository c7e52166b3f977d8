//! clearcost-core: Shared domain types and pure logic
//!
//! This crate provides the types and computations used across the ClearCost
//! server: geographic distance math, typed rows for every reference entity,
//! price aggregation, and the JSON response shapes.

pub mod geo;
pub mod model;
pub mod pricing;
pub mod response;

// Re-export the most commonly used types
pub use geo::{BoundingBox, haversine_miles};
pub use model::{
    OrgPriceRow, PriceStats, Provider, ProviderLocation, Specialty, TaxonomyEntry, ZipCentroid,
};
pub use pricing::{aggregate_by_org, coverage_pct};
