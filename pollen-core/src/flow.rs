//! One request cycle: geocode, fetch, classify, describe the page.
//!
//! [`handle`] is stateless. It takes the session (credentials plus the two
//! providers) and what the user did, and returns a [`Page`] that any
//! presentation layer can draw, together with the UI state to go back to.

use serde::Serialize;
use serde_json::Value;

use crate::{
    Coordinates, PollenCategory, PollenError, PollenReading, Rgba, Settings,
    classify::{high_pollen_types, risk_color},
    credentials::API_KEY_VARS,
    provider::{Geocoder, PollenSource, geocoder_from_settings, pollen_source_from_settings},
};

pub const PAGE_TITLE: &str = "Pollen Map";
pub const PAGE_CAPTION: &str = "Live pollen risk from Ambee by Country city area.";
pub const IDLE_HINT: &str = "Enter an area/city and click Get Pollen Data.";
pub const CONFIG_HINT: &str = "AMBEE_API_KEY=your_real_ambee_key";
pub const AUTH_FAILED: &str =
    "Authentication failed (401/403). Check your Ambee API key in .env.";
pub const NO_HIGH_POLLEN: &str = "No high pollen types right now.";

const MAP_ZOOM: u8 = 10;
const POINT_RADIUS_M: u32 = 1200;

/// Everything loaded once at startup.
#[derive(Debug)]
pub struct Session {
    api_key: String,
    geocoder: Box<dyn Geocoder>,
    pollen: Box<dyn PollenSource>,
}

impl Session {
    pub fn new(api_key: String, geocoder: Box<dyn Geocoder>, pollen: Box<dyn PollenSource>) -> Self {
        Self { api_key, geocoder, pollen }
    }

    /// Wire up the real providers from settings.
    pub fn from_settings(api_key: String, settings: &Settings) -> Result<Self, PollenError> {
        Ok(Self::new(
            api_key,
            geocoder_from_settings(settings)?,
            pollen_source_from_settings(settings)?,
        ))
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// What the user supplied for this cycle.
#[derive(Debug, Clone)]
pub struct UserRequest {
    pub area: String,
    /// Whether the user actually asked for data (button press / enter).
    pub trigger: bool,
}

/// Where a cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ConfigMissing,
    AwaitingInput,
    NotFound,
    GeocodingFailed,
    AuthFailed,
    ApiFailed,
    Rendered,
}

impl Stage {
    pub fn is_failure(&self) -> bool {
        !matches!(self, Stage::AwaitingInput | Stage::Rendered)
    }
}

/// UI state to return to once the page is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UiState {
    Idle,
    /// Nothing more can happen until the configuration is fixed.
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

impl Banner {
    fn new(kind: BannerKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub position: Coordinates,
    /// Hover text, e.g. `Tree High`.
    pub label: String,
    pub color: Rgba,
    pub radius_m: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub points: Vec<MapPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

/// Toolkit-independent description of what to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub stage: Stage,
    pub next: UiState,
    pub banners: Vec<Banner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Metric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Page {
    fn new(stage: Stage) -> Self {
        let next = if stage == Stage::ConfigMissing { UiState::Halted } else { UiState::Idle };
        Self {
            stage,
            next,
            banners: Vec::new(),
            code_hint: None,
            coordinates: None,
            raw_payload: None,
            map: None,
            metrics: Vec::new(),
            updated_at: None,
        }
    }

    fn with_banner(mut self, kind: BannerKind, text: impl Into<String>) -> Self {
        self.banners.push(Banner::new(kind, text));
        self
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Banner> {
        self.banners.iter().filter(|b| b.kind == BannerKind::Warning)
    }
}

/// Run one cycle. Only transport failures of the pollen request come back
/// as `Err`; every other outcome is described by the returned page.
pub async fn handle(session: &Session, request: &UserRequest) -> Result<Page, PollenError> {
    if !session.has_credentials() {
        tracing::warn!("No API key found in {}", API_KEY_VARS.join(", "));
        let mut page = Page::new(Stage::ConfigMissing)
            .with_banner(BannerKind::Error, PollenError::Config.to_string());
        page.code_hint = Some(CONFIG_HINT.to_string());
        return Ok(page);
    }

    if !request.trigger {
        return Ok(Page::new(Stage::AwaitingInput).with_banner(BannerKind::Info, IDLE_HINT));
    }

    tracing::info!("Looking up pollen for '{}'", request.area);

    let coords = match session.geocoder.area_to_coordinates(&request.area).await {
        Ok(coords) => coords,
        Err(err @ PollenError::NotFound { .. }) => {
            return Ok(Page::new(Stage::NotFound).with_banner(BannerKind::Error, err.to_string()));
        }
        Err(err) => {
            tracing::warn!("Geocoding '{}' failed: {}", request.area, err);
            return Ok(Page::new(Stage::GeocodingFailed)
                .with_banner(BannerKind::Error, format!("Geocoding failed: {err}")));
        }
    };

    let fetched = session
        .pollen
        .fetch_pollen(coords.latitude, coords.longitude, &session.api_key)
        .await?;

    match fetched.into_payload() {
        Ok(payload) => Ok(render_reading(coords, &PollenReading::from_payload(&payload))),
        Err(err @ PollenError::Auth { .. }) => {
            tracing::warn!("{}", err);
            let mut page = Page::new(Stage::AuthFailed).with_banner(BannerKind::Error, AUTH_FAILED);
            page.coordinates = Some(coords);
            Ok(page)
        }
        Err(PollenError::Api { status, payload }) => {
            tracing::warn!("Pollen API error: {}", status);
            let mut page = Page::new(Stage::ApiFailed)
                .with_banner(BannerKind::Error, format!("API error: {status}"));
            page.coordinates = Some(coords);
            page.raw_payload = Some(payload).filter(|p| !is_blank(p));
            Ok(page)
        }
        Err(err) => Err(err),
    }
}

fn render_reading(coords: Coordinates, reading: &PollenReading) -> Page {
    let high_types = high_pollen_types(&reading.risk);

    let mut page = if high_types.is_empty() {
        Page::new(Stage::Rendered).with_banner(BannerKind::Success, NO_HIGH_POLLEN)
    } else {
        Page::new(Stage::Rendered).with_banner(
            BannerKind::Warning,
            format!(
                "Medication reminder: {} pollen is high. \
                 Consider taking your allergy medication as prescribed.",
                high_types.join(", ")
            ),
        )
    };

    let tree_level = reading.risk_of(PollenCategory::Tree);
    page.coordinates = Some(coords);
    page.map = Some(MapView {
        center: coords,
        zoom: MAP_ZOOM,
        points: vec![MapPoint {
            position: coords,
            label: format!("Tree {}", reading.risk_label(PollenCategory::Tree)),
            color: risk_color(tree_level),
            radius_m: POINT_RADIUS_M,
        }],
    });

    page.metrics = PollenCategory::ALL
        .iter()
        .map(|c| Metric { label: format!("{c} Pollen"), value: reading.risk_label(*c) })
        .chain(
            PollenCategory::ALL
                .iter()
                .map(|c| Metric { label: format!("{c} Count"), value: reading.count_label(*c) }),
        )
        .collect();

    page.updated_at = Some(reading.updated_at_label().to_string());
    page
}

/// `null`, `{}`, `[]` and `""` carry nothing worth showing.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
