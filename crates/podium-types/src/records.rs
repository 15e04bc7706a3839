//! The result record entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::ResultId;

/// Highest achievable score. A record scoring exactly this value counts as
/// a perfect result in the analytics view.
pub const MAX_SCORE: u8 = 10;

/// District label used when none can be derived from the school field.
pub const UNKNOWN_DISTRICT: &str = "Unknown";

/// A single approved exam result eligible for display.
///
/// Records are immutable values; identity is [`ResultRecord::id`] alone.
/// When the feed redelivers a record, the most recent field values win but
/// the logical entity is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResultRecord {
    /// Stable unique identifier assigned by the upstream store.
    pub id: ResultId,
    /// Student display name.
    pub name: Option<String>,
    /// School label, conventionally ending in a comma-separated district.
    pub school: Option<String>,
    /// Number of top grades achieved, 0 through [`MAX_SCORE`].
    pub aplus: Option<u8>,
    /// Examination registration number.
    pub reg_no: Option<String>,
    /// URL of the scanned result image, when one was uploaded.
    pub image_url: Option<String>,
    /// When the record was first created upstream.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated (approval flips bump this).
    pub updated_at: DateTime<Utc>,
}

impl ResultRecord {
    /// Whether this record carries a perfect score.
    pub fn is_perfect(&self) -> bool {
        self.aplus == Some(MAX_SCORE)
    }

    /// Derive the district grouping label from the school field.
    ///
    /// The convention is `"School Name, District"`; the trailing
    /// comma-separated segment, trimmed, is the district. Records with no
    /// school or an empty trailing segment group under
    /// [`UNKNOWN_DISTRICT`].
    pub fn district(&self) -> String {
        self.school
            .as_deref()
            .and_then(|school| school.split(',').next_back())
            .map(str::trim)
            .filter(|district| !district.is_empty())
            .map_or_else(|| String::from(UNKNOWN_DISTRICT), str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_school(school: Option<&str>) -> ResultRecord {
        ResultRecord {
            id: ResultId::new(),
            name: Some(String::from("Asha")),
            school: school.map(str::to_owned),
            aplus: Some(10),
            reg_no: Some(String::from("402113")),
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn district_is_trailing_segment() {
        let record = record_with_school(Some("GHSS Meenangadi, Wayanad"));
        assert_eq!(record.district(), "Wayanad");
    }

    #[test]
    fn district_without_comma_is_whole_school() {
        let record = record_with_school(Some("Wayanad"));
        assert_eq!(record.district(), "Wayanad");
    }

    #[test]
    fn district_falls_back_to_unknown() {
        assert_eq!(record_with_school(None).district(), UNKNOWN_DISTRICT);
        assert_eq!(
            record_with_school(Some("GHSS Meenangadi,")).district(),
            UNKNOWN_DISTRICT
        );
        assert_eq!(record_with_school(Some("   ")).district(), UNKNOWN_DISTRICT);
    }

    #[test]
    fn perfect_score_requires_max() {
        let mut record = record_with_school(None);
        assert!(record.is_perfect());
        record.aplus = Some(9);
        assert!(!record.is_perfect());
        record.aplus = None;
        assert!(!record.is_perfect());
    }

    #[test]
    fn record_roundtrip_serde() {
        let record = record_with_school(Some("GHSS Meenangadi, Wayanad"));
        let json = serde_json::to_string(&record).unwrap_or_default();
        let restored: Result<ResultRecord, _> = serde_json::from_str(&json);
        assert_eq!(restored.ok(), Some(record));
    }
}
