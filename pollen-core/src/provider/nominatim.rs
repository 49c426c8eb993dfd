use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{Coordinates, PollenError};

use super::Geocoder;

/// Forward geocoding through an OpenStreetMap Nominatim search endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    url: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn new(url: String, user_agent: &str, timeout: Duration) -> Result<Self, PollenError> {
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| PollenError::Geocoding(format!("Failed to create geocoding client: {e}")))?;

        Ok(Self { url, http })
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn area_to_coordinates(&self, area: &str) -> Result<Coordinates, PollenError> {
        if area.trim().is_empty() {
            return Err(PollenError::NotFound { area: area.to_string() });
        }

        tracing::debug!("Geocoding '{}' via {}", area, self.url);

        let res = self
            .http
            .get(&self.url)
            .query(&[("q", area), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| PollenError::Geocoding(format!("request to geocoder failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(PollenError::Geocoding(format!("geocoder returned status {status}")));
        }

        let places: Vec<NominatimPlace> = res
            .json()
            .await
            .map_err(|e| PollenError::Geocoding(format!("unreadable geocoder response: {e}")))?;

        let Some(place) = places.into_iter().next() else {
            return Err(PollenError::NotFound { area: area.to_string() });
        };

        let latitude = parse_degrees(&place.lat)?;
        let longitude = parse_degrees(&place.lon)?;
        let coords = Coordinates::new(latitude, longitude)?;

        tracing::info!(
            "Geocoded '{}' to {} ({})",
            area,
            coords,
            place.display_name.as_deref().unwrap_or("unnamed")
        );
        Ok(coords)
    }
}

fn parse_degrees(raw: &str) -> Result<f64, PollenError> {
    raw.trim()
        .parse()
        .map_err(|_| PollenError::Geocoding(format!("invalid coordinate in geocoder response: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_degrees_accepts_strings_from_the_api() {
        assert_eq!(parse_degrees("40.7127281").ok(), Some(40.7127281));
        assert_eq!(parse_degrees(" -74.0060152 ").ok(), Some(-74.0060152));
        assert!(matches!(parse_degrees("north"), Err(PollenError::Geocoding(_))));
    }

    #[tokio::test]
    async fn blank_area_is_not_found_without_a_request() {
        let geocoder = NominatimGeocoder::new(
            "http://127.0.0.1:9/search".to_string(),
            "pollen_map_app",
            Duration::from_secs(1),
        )
        .expect("client");

        let err = geocoder.area_to_coordinates("   ").await.unwrap_err();
        assert!(matches!(err, PollenError::NotFound { .. }));
    }
}
