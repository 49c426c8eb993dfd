use crate::{
    Coordinates, FetchResult, PollenError, Settings,
    provider::{ambee::AmbeeClient, nominatim::NominatimGeocoder},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod ambee;
pub mod nominatim;

/// Turns free-text place names into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// `NotFound` when nothing matches `area`, `Geocoding` for any other failure.
    async fn area_to_coordinates(&self, area: &str) -> Result<Coordinates, PollenError>;
}

/// Fetches the latest pollen data for a point.
#[async_trait]
pub trait PollenSource: Send + Sync + Debug {
    /// Non-2xx statuses are returned as-is; only transport failures are errors.
    async fn fetch_pollen(&self, lat: f64, lng: f64, api_key: &str)
    -> Result<FetchResult, PollenError>;
}

/// Construct the geocoder described by `settings`.
pub fn geocoder_from_settings(settings: &Settings) -> Result<Box<dyn Geocoder>, PollenError> {
    let geocoder = NominatimGeocoder::new(
        settings.geocoder_url.clone(),
        &settings.geocoder_user_agent,
        settings.timeout(),
    )?;
    Ok(Box::new(geocoder))
}

/// Construct the pollen client described by `settings`.
pub fn pollen_source_from_settings(
    settings: &Settings,
) -> Result<Box<dyn PollenSource>, PollenError> {
    let client = AmbeeClient::new(settings.pollen_url.clone(), settings.timeout())?;
    Ok(Box::new(client))
}
