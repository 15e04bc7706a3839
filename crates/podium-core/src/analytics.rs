//! On-demand aggregation over the full record set.
//!
//! A stateless computation: given a snapshot of every record and the
//! user-chosen filters, it re-derives the filtered count, the perfect-score
//! count, and per-district summaries. No sequencer state is touched; the
//! snapshot comes straight from the record store.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use podium_types::{MAX_SCORE, ResultRecord};

/// User-chosen filters for the analytics view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalyticsFilter {
    /// Case-insensitive text-contains match against the derived district.
    pub district_contains: Option<String>,
    /// Inclusive lower bound on the score.
    pub min_score: u8,
    /// Inclusive upper bound on the score.
    pub max_score: u8,
}

impl Default for AnalyticsFilter {
    fn default() -> Self {
        Self {
            district_contains: None,
            min_score: 0,
            max_score: MAX_SCORE,
        }
    }
}

impl AnalyticsFilter {
    /// Whether a record passes the filter.
    ///
    /// Score bounds only take effect when the range is actually narrowed;
    /// a full `0..=10` range keeps records with no score, while any
    /// narrowed range excludes them. This matches the reference query
    /// semantics, where the bound predicates were only added to the query
    /// when non-default.
    fn matches(&self, record: &ResultRecord) -> bool {
        if let Some(needle) = self.district_contains.as_deref() {
            if !needle.is_empty() {
                let district = record.district().to_lowercase();
                if !district.contains(&needle.to_lowercase()) {
                    return false;
                }
            }
        }

        if self.min_score > 0 && !record.aplus.is_some_and(|score| score >= self.min_score) {
            return false;
        }
        if self.max_score < MAX_SCORE
            && !record.aplus.is_some_and(|score| score <= self.max_score)
        {
            return false;
        }

        true
    }
}

/// Aggregated figures for one district within the filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistrictSummary {
    /// The derived district label.
    pub district: String,
    /// Number of filtered records in the district.
    pub count: u64,
    /// Number of perfect-score records in the district.
    pub perfect_count: u64,
    /// Perfect-score share of the district, percent, two decimal places.
    pub perfect_percentage: Decimal,
}

/// The full analytics report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsReport {
    /// Number of records passing the filter.
    pub total: u64,
    /// Number of perfect-score records among them.
    pub perfect_count: u64,
    /// Per-district summaries, sorted descending by perfect percentage.
    pub districts: Vec<DistrictSummary>,
    /// The filtered records, sorted descending by score (no score last).
    pub results: Vec<ResultRecord>,
}

/// Compute the analytics report for a record-set snapshot.
pub fn aggregate(records: &[ResultRecord], filter: &AnalyticsFilter) -> AnalyticsReport {
    let mut results: Vec<ResultRecord> = records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect();
    // Option<u8> orders None first ascending, so the reverse comparison
    // puts the highest scores first and records with no score last.
    results.sort_by(|a, b| b.aplus.cmp(&a.aplus));

    let total = u64::try_from(results.len()).unwrap_or(u64::MAX);
    let perfect_count =
        u64::try_from(results.iter().filter(|r| r.is_perfect()).count()).unwrap_or(u64::MAX);

    let mut per_district: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for record in &results {
        let entry = per_district.entry(record.district()).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(1);
        if record.is_perfect() {
            entry.1 = entry.1.saturating_add(1);
        }
    }

    let mut districts: Vec<DistrictSummary> = per_district
        .into_iter()
        .map(|(district, (count, perfect))| DistrictSummary {
            district,
            count,
            perfect_count: perfect,
            perfect_percentage: percentage(perfect, count),
        })
        .collect();
    districts.sort_by(|a, b| b.perfect_percentage.cmp(&a.perfect_percentage));

    AnalyticsReport {
        total,
        perfect_count,
        districts,
        results,
    }
}

/// Share of `part` in `whole` as a percentage with two decimal places.
#[allow(clippy::arithmetic_side_effects)] // whole > 0 is checked; Decimal division cannot overflow here
fn percentage(part: u64, whole: u64) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) / Decimal::from(whole) * Decimal::from(100u32)).round_dp(2)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use podium_types::ResultId;

    use super::*;

    fn record(school: &str, aplus: Option<u8>) -> ResultRecord {
        ResultRecord {
            id: ResultId::new(),
            name: Some(String::from("Student")),
            school: Some(school.to_owned()),
            aplus,
            reg_no: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample() -> Vec<ResultRecord> {
        vec![
            record("GHSS Meenangadi, Wayanad", Some(10)),
            record("GHSS Kalpetta, Wayanad", Some(6)),
            record("SNHSS Irinjalakuda, Thrissur", Some(10)),
            record("CMS HSS Thrissur, Thrissur", Some(10)),
            record("GVHSS Kozhikode, Kozhikode", None),
        ]
    }

    #[test]
    fn default_filter_keeps_everything() {
        let report = aggregate(&sample(), &AnalyticsFilter::default());
        assert_eq!(report.total, 5);
        assert_eq!(report.perfect_count, 3);
    }

    #[test]
    fn district_filter_is_case_insensitive_contains() {
        let filter = AnalyticsFilter {
            district_contains: Some(String::from("waya")),
            ..AnalyticsFilter::default()
        };
        let report = aggregate(&sample(), &filter);
        assert_eq!(report.total, 2);
        assert_eq!(report.perfect_count, 1);
        assert_eq!(report.districts.len(), 1);
        assert_eq!(
            report.districts.first().map(|d| d.district.as_str()),
            Some("Wayanad")
        );
    }

    #[test]
    fn narrowed_range_excludes_unscored_records() {
        let filter = AnalyticsFilter {
            min_score: 1,
            ..AnalyticsFilter::default()
        };
        let report = aggregate(&sample(), &filter);
        // The unscored Kozhikode record drops out.
        assert_eq!(report.total, 4);

        let filter = AnalyticsFilter {
            max_score: 9,
            ..AnalyticsFilter::default()
        };
        let report = aggregate(&sample(), &filter);
        // Only the single 6-score record is at most 9 and scored.
        assert_eq!(report.total, 1);
    }

    #[test]
    fn full_range_keeps_unscored_records() {
        let report = aggregate(&sample(), &AnalyticsFilter::default());
        assert!(report.results.iter().any(|r| r.aplus.is_none()));
        // Unscored records sort last.
        assert_eq!(report.results.last().and_then(|r| r.aplus), None);
    }

    #[test]
    fn results_sort_descending_by_score() {
        let report = aggregate(&sample(), &AnalyticsFilter::default());
        let scores: Vec<_> = report.results.iter().map(|r| r.aplus).collect();
        assert_eq!(
            scores,
            vec![Some(10), Some(10), Some(10), Some(6), None]
        );
    }

    #[test]
    fn district_summaries_sort_by_percentage() {
        let report = aggregate(&sample(), &AnalyticsFilter::default());
        // Thrissur: 2/2 perfect (100%), Wayanad: 1/2 (50%), Kozhikode: 0/1.
        let order: Vec<_> = report
            .districts
            .iter()
            .map(|d| d.district.as_str())
            .collect();
        assert_eq!(order, vec!["Thrissur", "Wayanad", "Kozhikode"]);

        let thrissur = report.districts.first().unwrap();
        assert_eq!(thrissur.count, 2);
        assert_eq!(thrissur.perfect_count, 2);
        assert_eq!(thrissur.perfect_percentage, Decimal::from(100));

        let wayanad = report.districts.get(1).unwrap();
        assert_eq!(wayanad.perfect_percentage, Decimal::from(50));
    }

    #[test]
    fn empty_snapshot_produces_empty_report() {
        let report = aggregate(&[], &AnalyticsFilter::default());
        assert_eq!(report.total, 0);
        assert_eq!(report.perfect_count, 0);
        assert!(report.districts.is_empty());
        assert!(report.results.is_empty());
    }
}
