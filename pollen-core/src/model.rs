use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PollenError;

/// A point on the globe, as produced by the geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build coordinates, rejecting values outside [-90,90] / [-180,180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, PollenError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(PollenError::Geocoding(format!(
                "coordinates out of range: {latitude}, {longitude}"
            )));
        }

        Ok(Self { latitude, longitude })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PollenCategory {
    Tree,
    Grass,
    Weed,
}

impl PollenCategory {
    /// Fixed iteration order used everywhere a reading is walked.
    pub const ALL: [PollenCategory; 3] =
        [PollenCategory::Tree, PollenCategory::Grass, PollenCategory::Weed];

    /// Key used by the pollen API in `Risk` and `Count` objects.
    pub fn key(&self) -> &'static str {
        match self {
            PollenCategory::Tree => "tree_pollen",
            PollenCategory::Grass => "grass_pollen",
            PollenCategory::Weed => "weed_pollen",
        }
    }

    /// Human-readable name: `_pollen` suffix dropped, underscores to spaces, title case.
    pub fn display_name(&self) -> String {
        let stem = self.key().replace("_pollen", "").replace('_', " ");
        title_case(&stem)
    }
}

impl fmt::Display for PollenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Qualitative pollen severity as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::VeryLow,
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::VeryHigh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }

    /// Exact match on the wire string; anything else is not a known level.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == value)
    }

    pub fn is_high(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::VeryHigh)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translucent RGBA color used for the map point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "rgba({r}, {g}, {b}, {a})")
    }
}

/// Raw outcome of one pollen request.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub status: u16,
    /// Parsed JSON body, or an empty object when the body was not JSON.
    pub payload: Value,
}

impl FetchResult {
    /// The payload for a 200, otherwise the matching error: `Auth` for
    /// 401/403, `Api` (carrying the payload) for anything else.
    pub fn into_payload(self) -> Result<Value, PollenError> {
        match self.status {
            200 => Ok(self.payload),
            401 | 403 => Err(PollenError::Auth { status: self.status }),
            status => Err(PollenError::Api { status, payload: self.payload }),
        }
    }
}

/// Risk levels and counts for one location at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollenReading {
    pub risk: BTreeMap<PollenCategory, String>,
    pub counts: BTreeMap<PollenCategory, f64>,
    pub updated_at: Option<String>,
}

impl PollenReading {
    /// Extract the first element of `data`. Missing or malformed pieces are
    /// simply absent; this never fails.
    pub fn from_payload(payload: &Value) -> Self {
        let Some(row) = payload
            .get("data")
            .and_then(Value::as_array)
            .and_then(|rows| rows.first())
        else {
            return Self::default();
        };

        let mut reading = Self::default();

        for category in PollenCategory::ALL {
            if let Some(level) = row
                .get("Risk")
                .and_then(|risk| risk.get(category.key()))
                .and_then(Value::as_str)
            {
                reading.risk.insert(category, level.to_string());
            }

            if let Some(count) = row
                .get("Count")
                .and_then(|counts| counts.get(category.key()))
                .and_then(Value::as_f64)
            {
                reading.counts.insert(category, count);
            }
        }

        reading.updated_at = row.get("updatedAt").and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        });

        reading
    }

    pub fn risk_of(&self, category: PollenCategory) -> Option<&str> {
        self.risk.get(&category).map(String::as_str)
    }

    pub fn risk_label(&self, category: PollenCategory) -> String {
        self.risk_of(category).unwrap_or(NOT_AVAILABLE).to_string()
    }

    pub fn count_label(&self, category: PollenCategory) -> String {
        match self.counts.get(&category) {
            Some(count) if count.fract() == 0.0 => format!("{count:.0}"),
            Some(count) => count.to_string(),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    pub fn updated_at_label(&self) -> &str {
        self.updated_at.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

/// Placeholder shown for any missing field.
pub const NOT_AVAILABLE: &str = "n/a";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_display_names() {
        let names: Vec<String> = PollenCategory::ALL.iter().map(|c| c.display_name()).collect();
        assert_eq!(names, ["Tree", "Grass", "Weed"]);
    }

    #[test]
    fn risk_level_parse_is_exact() {
        assert_eq!(RiskLevel::parse("Very High"), Some(RiskLevel::VeryHigh));
        assert_eq!(RiskLevel::parse("Moderate"), Some(RiskLevel::Moderate));
        assert_eq!(RiskLevel::parse("very high"), None);
        assert_eq!(RiskLevel::parse(""), None);
    }

    #[test]
    fn coordinates_reject_out_of_range() {
        assert!(Coordinates::new(40.7, -74.0).is_ok());
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(90.1, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
    }

    #[test]
    fn reading_from_full_payload() {
        let payload = json!({
            "message": "success",
            "data": [{
                "Risk": {"tree_pollen": "High", "grass_pollen": "Low", "weed_pollen": "Moderate"},
                "Count": {"tree_pollen": 512, "grass_pollen": 12, "weed_pollen": 3.5},
                "updatedAt": "2024-05-01T10:00:00.000Z"
            }]
        });

        let reading = PollenReading::from_payload(&payload);

        assert_eq!(reading.risk_of(PollenCategory::Tree), Some("High"));
        assert_eq!(reading.risk_label(PollenCategory::Grass), "Low");
        assert_eq!(reading.count_label(PollenCategory::Tree), "512");
        assert_eq!(reading.count_label(PollenCategory::Weed), "3.5");
        assert_eq!(reading.updated_at_label(), "2024-05-01T10:00:00.000Z");
    }

    #[test]
    fn reading_from_empty_data_defaults_everything() {
        let reading = PollenReading::from_payload(&json!({"data": []}));

        assert_eq!(reading, PollenReading::default());
        for category in PollenCategory::ALL {
            assert_eq!(reading.risk_label(category), "n/a");
            assert_eq!(reading.count_label(category), "n/a");
        }
        assert_eq!(reading.updated_at_label(), "n/a");
    }

    #[test]
    fn reading_tolerates_missing_or_odd_fields() {
        let reading = PollenReading::from_payload(&json!({
            "data": [{"Risk": {"tree_pollen": 7}, "Count": "nope"}]
        }));
        assert_eq!(reading.risk_of(PollenCategory::Tree), None);
        assert!(reading.counts.is_empty());

        assert_eq!(PollenReading::from_payload(&json!({})), PollenReading::default());
        assert_eq!(PollenReading::from_payload(&json!({"data": null})), PollenReading::default());
    }

    #[test]
    fn fetch_status_classification() {
        let ok = FetchResult { status: 200, payload: json!({"data": []}) };
        assert_eq!(ok.into_payload().ok(), Some(json!({"data": []})));

        let forbidden = FetchResult { status: 403, payload: json!({}) };
        assert!(matches!(forbidden.into_payload(), Err(PollenError::Auth { status: 403 })));

        let unauthorized = FetchResult { status: 401, payload: json!({}) };
        assert!(matches!(unauthorized.into_payload(), Err(PollenError::Auth { status: 401 })));

        let busy = FetchResult { status: 503, payload: json!({"message": "busy"}) };
        match busy.into_payload() {
            Err(PollenError::Api { status, payload }) => {
                assert_eq!(status, 503);
                assert_eq!(payload, json!({"message": "busy"}));
            }
            other => panic!("unexpected: {other:?}"),
        }

        // 2xx other than 200 is not a success for this endpoint
        let created = FetchResult { status: 204, payload: json!({}) };
        assert!(matches!(created.into_payload(), Err(PollenError::Api { status: 204, .. })));
    }

    #[test]
    fn rgba_display() {
        assert_eq!(Rgba([1, 2, 3, 4]).to_string(), "rgba(1, 2, 3, 4)");
    }
}
