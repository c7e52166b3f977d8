//! In-process price aggregation.
//!
//! The raw `org_pricing` table holds one row per (procedure, organization,
//! carrier) observation; the server aggregates per organization at query
//! time. All arithmetic is done in `Decimal` so money never passes through
//! floating point.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::model::{OrgPriceRow, PriceStats};

/// Group raw price rows by organization and compute min/max/arithmetic-mean
/// per organization. The mean is rounded to cents.
///
/// Organizations absent from `rows` simply have no entry in the result;
/// callers render that as absent pricing, never as zero.
pub fn aggregate_by_org(rows: &[OrgPriceRow]) -> HashMap<String, PriceStats> {
    let mut grouped: HashMap<&str, Vec<Decimal>> = HashMap::new();
    for row in rows {
        grouped.entry(&row.org_id).or_default().push(row.price);
    }

    grouped
        .into_iter()
        .map(|(org_id, prices)| {
            let min = prices.iter().min().copied().unwrap_or_default();
            let max = prices.iter().max().copied().unwrap_or_default();
            let sum: Decimal = prices.iter().sum();
            let avg = (sum / Decimal::from(prices.len())).round_dp(2);
            (
                org_id.to_string(),
                PriceStats {
                    min_price: min,
                    max_price: max,
                    avg_price: avg,
                },
            )
        })
        .collect()
}

/// Fraction of returned results carrying pricing, as a percentage rounded to
/// one decimal place. Unpriced results count in the denominator only.
pub fn coverage_pct(priced: usize, returned: usize) -> f64 {
    if returned == 0 {
        return 0.0;
    }
    let pct = priced as f64 / returned as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromStr;

    fn row(org_id: &str, price: &str) -> OrgPriceRow {
        OrgPriceRow {
            procedure_id: "proc_001".into(),
            org_id: org_id.into(),
            carrier_id: None,
            carrier_name: None,
            price: Decimal::from_str(price).unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn aggregates_min_max_avg_per_org() {
        let rows = vec![
            row("org_a", "100.00"),
            row("org_a", "200.00"),
            row("org_a", "150.00"),
            row("org_b", "80.00"),
        ];
        let stats = aggregate_by_org(&rows);

        let a = &stats["org_a"];
        assert_eq!(a.min_price, Decimal::from_str("100.00").unwrap());
        assert_eq!(a.max_price, Decimal::from_str("200.00").unwrap());
        assert_eq!(a.avg_price, Decimal::from_str("150.00").unwrap());

        let b = &stats["org_b"];
        assert_eq!(b.min_price, b.max_price);
        assert_eq!(b.avg_price, Decimal::from_str("80.00").unwrap());
    }

    #[test]
    fn mean_is_rounded_to_cents_without_float_drift() {
        let rows = vec![row("org_a", "10.00"), row("org_a", "10.01"), row("org_a", "10.01")];
        let stats = aggregate_by_org(&rows);
        assert_eq!(stats["org_a"].avg_price, Decimal::from_str("10.01").unwrap());
    }

    #[test]
    fn org_without_rows_has_no_entry() {
        let stats = aggregate_by_org(&[row("org_a", "50.00")]);
        assert!(!stats.contains_key("org_b"));
    }

    #[test]
    fn coverage_counts_unpriced_in_denominator_only() {
        assert_eq!(coverage_pct(1, 2), 50.0);
        assert_eq!(coverage_pct(2, 3), 66.7);
        assert_eq!(coverage_pct(0, 5), 0.0);
        assert_eq!(coverage_pct(0, 0), 0.0);
    }
}
