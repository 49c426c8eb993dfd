//! Core library for the `pollen` CLI.
//!
//! This crate defines:
//! - API key resolution and on-disk settings
//! - Geocoding and pollen providers behind async traits
//! - Risk classification (colors, high-pollen detection)
//! - The request-cycle flow that turns user input into a [`flow::Page`]
//!
//! It is used by `pollen-cli`, but the flow is independent of any rendering toolkit.

pub mod classify;
pub mod config;
pub mod credentials;
pub mod error;
pub mod flow;
pub mod model;
pub mod provider;

pub use classify::{high_pollen_types, risk_color};
pub use config::Settings;
pub use credentials::load_api_key;
pub use error::PollenError;
pub use flow::{Page, Session, UserRequest, handle};
pub use model::{Coordinates, FetchResult, PollenCategory, PollenReading, RiskLevel, Rgba};
pub use provider::{Geocoder, PollenSource};
