use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::{FetchResult, PollenError};

use super::PollenSource;

/// Client for Ambee's latest-pollen-by-coordinates endpoint.
#[derive(Debug, Clone)]
pub struct AmbeeClient {
    url: String,
    http: Client,
}

impl AmbeeClient {
    /// `timeout` bounds the whole request; hitting it is a transport failure.
    pub fn new(url: String, timeout: Duration) -> Result<Self, PollenError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { url, http })
    }
}

#[async_trait]
impl PollenSource for AmbeeClient {
    async fn fetch_pollen(
        &self,
        lat: f64,
        lng: f64,
        api_key: &str,
    ) -> Result<FetchResult, PollenError> {
        tracing::debug!("GET {} lat={} lng={}", self.url, lat, lng);

        let res = self
            .http
            .get(&self.url)
            .header("x-api-key", api_key)
            .header(CONTENT_TYPE, "application/json")
            .query(&[("lat", lat), ("lng", lng)])
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res.bytes().await?;

        tracing::debug!("Pollen API answered {} ({} bytes)", status, body.len());

        Ok(FetchResult { status, payload: parse_payload(&body) })
    }
}

/// Lenient body parsing: anything that isn't JSON becomes `{}`.
fn parse_payload(body: &[u8]) -> Value {
    match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Pollen API body is not JSON, treating as empty: {}", e);
            Value::Object(Map::new())
        }
    }
}
