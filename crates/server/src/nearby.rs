//! Geo-radius provider search.
//!
//! The flagship flow of the service: resolve a specialty and a ZIP centroid,
//! fetch candidate providers via the taxonomy mapping, prefilter their
//! locations with a bounding box, filter exactly by haversine distance, then
//! attach organization-level price statistics for the specialty's
//! representative procedure. Every remote read is an explicit repository
//! call, issued sequentially; there is no cross-query consistency guarantee.

use std::collections::{BTreeSet, HashMap};

use clearcost_core::geo::{BoundingBox, haversine_miles};
use clearcost_core::model::{PriceStats, Provider, ProviderLocation};
use clearcost_core::pricing::{aggregate_by_org, coverage_pct};
use clearcost_core::response::{
    ResultLocation, SearchMetadata, SpecialtyProviderResult, SpecialtyProvidersResponse,
    SpecialtyRef,
};
use clearcost_core::{Specialty, ZipCentroid};

use crate::AppState;
use crate::db::{PricingRepository, ProviderRepository, SpecialtyRepository, ZipRepository};
use crate::error::AppError;

/// Validated parameters for the provider search.
#[derive(Debug, Clone)]
pub struct NearbyQuery {
    pub zip_code: String,
    pub radius_miles: u32,
    pub limit: usize,
}

/// Run the full search pipeline for an already-resolved specialty.
///
/// The caller resolves the specialty first so an unknown slug fails with 404
/// before any downstream query is issued.
pub async fn specialty_providers(
    state: &AppState,
    specialty: &Specialty,
    query: &NearbyQuery,
) -> Result<SpecialtyProvidersResponse, AppError> {
    let specialty_repo = SpecialtyRepository::new(state.pool.clone());
    let provider_repo = ProviderRepository::new(state.pool.clone());
    let pricing_repo = PricingRepository::new(state.pool.clone());
    let zip_repo = ZipRepository::new(state.pool.clone());

    let centroid = zip_repo.centroid(&query.zip_code).await?.ok_or_else(|| {
        AppError::BadRequest(format!("ZIP code '{}' not found", query.zip_code))
    })?;

    // An unmapped specialty means "no providers", not a fault.
    let codes = specialty_repo.taxonomy_codes(&specialty.id).await?;
    if codes.is_empty() {
        return Ok(empty_response(specialty, query));
    }

    // Over-fetch to compensate for the geographic filtering that follows.
    let cap = (query.limit * 10) as i64;
    let candidates = provider_repo.candidates_by_taxonomy(&codes, cap).await?;
    if candidates.is_empty() {
        return Ok(empty_response(specialty, query));
    }

    let provider_ids: Vec<String> = candidates.iter().map(|p| p.provider_id.clone()).collect();
    let bbox = BoundingBox::around(centroid.lat, centroid.lon, f64::from(query.radius_miles));
    let locations = provider_repo.locations_in_bbox(&provider_ids, &bbox).await?;

    let ranked = rank_locations(
        locations,
        &centroid,
        f64::from(query.radius_miles),
        query.limit,
    );
    if ranked.missing_coordinates > 0 {
        tracing::debug!(
            specialty = %specialty.slug,
            count = ranked.missing_coordinates,
            "Excluded locations without coordinates"
        );
    }

    // Pricing is scoped to the returned (truncated) set of organizations.
    let representative = specialty_repo.representative_procedure(&specialty.id).await?;
    let stats = match &representative {
        Some(proc_ref) => {
            let org_ids: Vec<String> = ranked
                .results
                .iter()
                .filter_map(|(loc, _)| loc.org_id.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            if org_ids.is_empty() {
                HashMap::new()
            } else if state.pricing_view_enabled {
                pricing_repo.org_stats_from_view(&proc_ref.id, &org_ids).await?
            } else {
                let rows = pricing_repo.org_rows(&proc_ref.id, &org_ids).await?;
                aggregate_by_org(&rows)
            }
        }
        // No representative procedure designated: pricing is omitted for
        // every result rather than failing the request.
        None => HashMap::new(),
    };

    let results = assemble(&candidates, ranked.results, &stats);
    let priced = results.iter().filter(|r| r.pricing.is_some()).count();
    let returned = results.len();

    Ok(SpecialtyProvidersResponse {
        specialty: SpecialtyRef::from(specialty),
        results,
        metadata: SearchMetadata {
            total_results: ranked.total_within_radius,
            returned_results: returned,
            search_radius_miles: query.radius_miles,
            pricing_coverage_pct: coverage_pct(priced, returned),
        },
    })
}

fn empty_response(specialty: &Specialty, query: &NearbyQuery) -> SpecialtyProvidersResponse {
    SpecialtyProvidersResponse {
        specialty: SpecialtyRef::from(specialty),
        results: Vec::new(),
        metadata: SearchMetadata {
            total_results: 0,
            returned_results: 0,
            search_radius_miles: query.radius_miles,
            pricing_coverage_pct: 0.0,
        },
    }
}

struct Ranked {
    /// Locations within the radius, ascending by distance, truncated to the
    /// requested limit.
    results: Vec<(ProviderLocation, f64)>,
    /// Count within the radius before truncation.
    total_within_radius: usize,
    missing_coordinates: usize,
}

/// Exact haversine filter, ascending sort, limit. The bounding box already
/// applied upstream is a superset, so every location is re-checked here.
fn rank_locations(
    locations: Vec<ProviderLocation>,
    center: &ZipCentroid,
    radius_miles: f64,
    limit: usize,
) -> Ranked {
    let mut missing_coordinates = 0;
    let mut within: Vec<(ProviderLocation, f64)> = Vec::new();

    for loc in locations {
        let (Some(lat), Some(lon)) = (loc.latitude, loc.longitude) else {
            missing_coordinates += 1;
            continue;
        };
        let distance = haversine_miles(center.lat, center.lon, lat, lon);
        if distance <= radius_miles {
            within.push((loc, distance));
        }
    }

    within.sort_by(|a, b| a.1.total_cmp(&b.1));
    let total_within_radius = within.len();
    within.truncate(limit);

    Ranked {
        results: within,
        total_within_radius,
        missing_coordinates,
    }
}

/// Join location, distance, provider identity, and optional pricing into the
/// final result records.
fn assemble(
    candidates: &[Provider],
    ranked: Vec<(ProviderLocation, f64)>,
    stats: &HashMap<String, PriceStats>,
) -> Vec<SpecialtyProviderResult> {
    let by_id: HashMap<&str, &Provider> = candidates
        .iter()
        .map(|p| (p.provider_id.as_str(), p))
        .collect();

    ranked
        .into_iter()
        .map(|(loc, distance)| {
            let display_name = by_id
                .get(loc.provider_id.as_str())
                .map(|p| p.display_name())
                .unwrap_or_else(|| "Unknown Provider".to_string());
            let pricing = loc
                .org_id
                .as_deref()
                .and_then(|org_id| stats.get(org_id))
                .cloned();

            SpecialtyProviderResult {
                provider_id: loc.provider_id,
                display_name,
                org_id: loc.org_id,
                location: ResultLocation {
                    address: loc.address,
                    city: loc.city,
                    state: loc.state,
                    zip_code: loc.zip_code,
                    distance_miles: round_tenth(distance),
                },
                pricing,
            }
        })
        .collect()
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> ZipCentroid {
        ZipCentroid {
            zip5: "02114".into(),
            lat: 42.3631,
            lon: -71.0686,
        }
    }

    fn location(provider_id: &str, lat: Option<f64>, lon: Option<f64>) -> ProviderLocation {
        ProviderLocation {
            provider_id: provider_id.into(),
            org_id: Some(format!("org_{provider_id}")),
            address: None,
            city: None,
            state: None,
            zip_code: None,
            latitude: lat,
            longitude: lon,
        }
    }

    #[test]
    fn filters_beyond_radius_and_sorts_ascending() {
        let c = center();
        let locations = vec![
            location("far", Some(40.7128), Some(-74.0060)), // ~190 mi
            location("near", Some(42.3700), Some(-71.0700)), // well inside
            location("mid", Some(42.6000), Some(-71.3000)),
        ];

        let ranked = rank_locations(locations, &c, 25.0, 20);
        assert_eq!(ranked.total_within_radius, 2);
        let ids: Vec<&str> = ranked
            .results
            .iter()
            .map(|(l, _)| l.provider_id.as_str())
            .collect();
        assert_eq!(ids, vec!["near", "mid"]);
        for (_, d) in &ranked.results {
            assert!(*d <= 25.0);
        }
    }

    #[test]
    fn truncates_to_limit_but_counts_all_within_radius() {
        let c = center();
        let locations: Vec<ProviderLocation> = (0..5)
            .map(|i| {
                location(
                    &format!("p{i}"),
                    Some(42.3631 + f64::from(i) * 0.01),
                    Some(-71.0686),
                )
            })
            .collect();

        let ranked = rank_locations(locations, &c, 25.0, 3);
        assert_eq!(ranked.results.len(), 3);
        assert_eq!(ranked.total_within_radius, 5);
    }

    #[test]
    fn counts_locations_missing_coordinates() {
        let c = center();
        let locations = vec![
            location("a", Some(42.3631), Some(-71.0686)),
            location("b", None, Some(-71.0686)),
            location("c", Some(42.3631), None),
        ];

        let ranked = rank_locations(locations, &c, 25.0, 20);
        assert_eq!(ranked.results.len(), 1);
        assert_eq!(ranked.missing_coordinates, 2);
    }

    #[test]
    fn assemble_attaches_pricing_by_org_and_defaults_unknown_names() {
        use rust_decimal::Decimal;

        let providers = vec![Provider {
            provider_id: "a".into(),
            first_name: Some("Jane".into()),
            last_name: Some("Doe".into()),
            credential: Some("MD".into()),
            license_number: None,
            license_state_code: None,
            specialty_code: None,
        }];
        let ranked = vec![
            (location("a", Some(42.37), Some(-71.07)), 0.44),
            (location("b", Some(42.38), Some(-71.08)), 1.26),
        ];
        let mut stats = HashMap::new();
        stats.insert(
            "org_a".to_string(),
            PriceStats {
                min_price: Decimal::new(10000, 2),
                max_price: Decimal::new(20000, 2),
                avg_price: Decimal::new(15000, 2),
            },
        );

        let results = assemble(&providers, ranked, &stats);
        assert_eq!(results[0].display_name, "Jane Doe MD");
        assert!(results[0].pricing.is_some());
        assert_eq!(results[0].location.distance_miles, 0.4);
        // "b" is not among the candidates and its org has no stats.
        assert_eq!(results[1].display_name, "Unknown Provider");
        assert!(results[1].pricing.is_none());
        assert_eq!(results[1].location.distance_miles, 1.3);
    }
}
