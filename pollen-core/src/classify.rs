//! Pure classification helpers: level colors and high-pollen detection.

use std::collections::BTreeMap;

use crate::model::{PollenCategory, RiskLevel, Rgba};

/// Color for levels we don't recognize (or no level at all).
pub const DEFAULT_COLOR: Rgba = Rgba([33, 150, 243, 180]);

pub fn level_color(level: RiskLevel) -> Rgba {
    match level {
        RiskLevel::VeryLow => Rgba([56, 142, 60, 180]),
        RiskLevel::Low => Rgba([76, 175, 80, 180]),
        RiskLevel::Moderate => Rgba([255, 193, 7, 200]),
        RiskLevel::High => Rgba([255, 87, 34, 220]),
        RiskLevel::VeryHigh => Rgba([183, 28, 28, 230]),
    }
}

/// Map a raw level string to its display color, falling back to [`DEFAULT_COLOR`].
pub fn risk_color(level: Option<&str>) -> Rgba {
    level
        .and_then(RiskLevel::parse)
        .map(level_color)
        .unwrap_or(DEFAULT_COLOR)
}

/// Display names of categories at "High" or "Very High", in tree, grass, weed order.
pub fn high_pollen_types(risk: &BTreeMap<PollenCategory, String>) -> Vec<String> {
    PollenCategory::ALL
        .iter()
        .filter(|category| {
            risk.get(*category)
                .and_then(|level| RiskLevel::parse(level))
                .is_some_and(|level| level.is_high())
        })
        .map(PollenCategory::display_name)
        .collect()
}
