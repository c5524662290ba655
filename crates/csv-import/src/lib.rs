//! Bulk stakeholder import.
//!
//! Converts an uploaded CSV buffer into a batch of normalized
//! [`ImportRow`](foodmap_common::ImportRow)s and hands the batch to a
//! [`StakeholderStore`](storage::StakeholderStore).
//!
//! # Stages
//!
//! - **Parse**: header row becomes field names, each row's category list is
//!   split, coordinates are coerced or resolved through a [`Geocoder`].
//!   Rows are processed in file order with bounded geocoding concurrency
//!   (one request at a time by default).
//! - **Import**: the whole batch goes to storage in a single call. Storage
//!   failures are logged and reported as an [`ImportOutcome`], never
//!   returned as errors.

pub mod address;
pub mod config;
pub mod error;
pub mod geocode;
pub mod outcome;
mod parse;
mod pipeline;

pub use address::{format_map_address, has_address};
pub use config::{FailurePolicy, ImportConfig};
pub use error::{GeocodeError, GeocodeFailure, ImportError, Result, RowFailure, RowFailureReason};
pub use geocode::{Candidate, CandidateAttributes, EsriGeocoder, EsriGeocoderConfig, Geocoder};
pub use outcome::{ImportOutcome, ImportRun, ParseReport};
pub use pipeline::ImportPipeline;
