//! Shared helpers for import pipeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use csv_import::{Candidate, GeocodeError, Geocoder, ImportConfig, ImportPipeline, ParseReport};
use storage::MemoryStakeholderStore;

/// Geocoder that answers from a table and records every request.
pub struct StubGeocoder {
    responses: HashMap<String, Result<Vec<Candidate>, GeocodeError>>,
    default: Vec<Candidate>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl StubGeocoder {
    /// Every address resolves to the given point.
    pub fn always(longitude: f64, latitude: f64) -> Self {
        Self {
            responses: HashMap::new(),
            default: vec![Candidate::new(longitude, latitude)],
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(
        mut self,
        address: &str,
        response: Result<Vec<Candidate>, GeocodeError>,
    ) -> Self {
        self.responses.insert(address.to_string(), response);
        self
    }

    pub fn delay(mut self, address: &str, delay: Duration) -> Self {
        self.delays.insert(address.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, address: &str) -> Result<Vec<Candidate>, GeocodeError> {
        self.calls.lock().unwrap().push(address.to_string());

        if let Some(delay) = self.delays.get(address) {
            tokio::time::sleep(*delay).await;
        }

        match self.responses.get(address) {
            Some(response) => response.clone(),
            None => Ok(self.default.clone()),
        }
    }
}

pub struct Harness {
    pub geocoder: Arc<StubGeocoder>,
    pub store: Arc<MemoryStakeholderStore>,
    pub pipeline: ImportPipeline,
}

pub fn harness(
    geocoder: StubGeocoder,
    store: MemoryStakeholderStore,
    config: ImportConfig,
) -> Harness {
    let geocoder = Arc::new(geocoder);
    let store = Arc::new(store);
    let pipeline = ImportPipeline::new(geocoder.clone(), store.clone(), config).unwrap();
    Harness {
        geocoder,
        store,
        pipeline,
    }
}

/// Harness with an empty in-memory store.
pub fn harness_with(geocoder: StubGeocoder, config: ImportConfig) -> Harness {
    harness(geocoder, MemoryStakeholderStore::new(), config)
}

impl Harness {
    pub async fn parse(&self, csv: &str) -> ParseReport {
        self.pipeline.parse_csv(csv.as_bytes()).await.unwrap()
    }
}

/// CSV with one row per (name, address_1) pair, all in Springfield, IL.
pub fn springfield_csv(rows: &[(&str, &str)]) -> String {
    let mut csv = String::from("name,address_1,address_2,city,state,zip,selectedCategoryIds\n");
    for (name, address) in rows {
        csv.push_str(&format!("{},{},,Springfield,IL,62701,1\n", name, address));
    }
    csv
}

pub fn springfield_address(address_1: &str) -> String {
    format!("{}  Springfield, IL 62701", address_1)
}
