//! Address geocoding.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::GeocodeError;

/// Resolves a single-line address into candidate locations, best first.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Vec<Candidate>, GeocodeError>;
}

/// One match returned by a geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub score: f64,
    pub attributes: CandidateAttributes,
}

impl Candidate {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            address: String::new(),
            score: 100.0,
            attributes: CandidateAttributes {
                x: longitude,
                y: latitude,
            },
        }
    }

    pub fn latitude(&self) -> f64 {
        self.attributes.y
    }

    pub fn longitude(&self) -> f64 {
        self.attributes.x
    }
}

/// Candidate coordinates: `X` is longitude, `Y` is latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateAttributes {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
}

/// Settings for the ArcGIS World Geocoding Service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsriGeocoderConfig {
    /// `findAddressCandidates` endpoint
    pub url: String,
    /// ArcGIS API key, if the endpoint requires one
    #[serde(default)]
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub max_locations: u32,
}

impl Default for EsriGeocoderConfig {
    fn default() -> Self {
        Self {
            url: "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer/findAddressCandidates"
                .to_string(),
            token: None,
            timeout_secs: 30,
            max_locations: 1,
        }
    }
}

/// ArcGIS `findAddressCandidates` client.
pub struct EsriGeocoder {
    client: Client,
    config: EsriGeocoderConfig,
}

#[derive(Debug, Deserialize)]
struct FindAddressCandidatesResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<EsriError>,
}

#[derive(Debug, Deserialize)]
struct EsriError {
    code: i64,
    #[serde(default)]
    message: String,
}

impl EsriGeocoder {
    pub fn new(config: EsriGeocoderConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeocodeError::Http(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EsriGeocoderConfig {
        &self.config
    }
}

#[async_trait]
impl Geocoder for EsriGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Vec<Candidate>, GeocodeError> {
        let max_locations = self.config.max_locations.to_string();
        let mut query = vec![
            ("SingleLine", address),
            ("f", "json"),
            ("outFields", "*"),
            ("maxLocations", max_locations.as_str()),
        ];
        if let Some(token) = &self.config.token {
            query.push(("token", token.as_str()));
        }

        let response = self
            .client
            .get(&self.config.url)
            .query(&query)
            .send()
            .await
            .map_err(|e| GeocodeError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeocodeError::Http(e.to_string()))?;

        let candidates = decode_response(&body)?;
        debug!(count = candidates.len(), "Geocoder returned candidates");
        Ok(candidates)
    }
}

/// Decode a `findAddressCandidates` JSON body.
///
/// ArcGIS reports some errors with HTTP 200 and an `error` object.
fn decode_response(body: &str) -> Result<Vec<Candidate>, GeocodeError> {
    let parsed: FindAddressCandidatesResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::Decode(e.to_string()))?;

    if let Some(err) = parsed.error {
        return Err(GeocodeError::Provider {
            code: err.code,
            message: err.message,
        });
    }

    Ok(parsed.candidates)
}
