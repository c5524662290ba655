//! The two-stage import pipeline.

use futures::stream::{self, StreamExt};
use metrics::counter;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use foodmap_common::{ImportAction, ImportRow, TenantId};
use storage::StakeholderStore;

use crate::address::{format_map_address, has_address};
use crate::config::{FailurePolicy, ImportConfig};
use crate::error::{GeocodeFailure, Result, RowFailure, RowFailureReason};
use crate::geocode::Geocoder;
use crate::outcome::{ImportOutcome, ImportRun, ParseReport};
use crate::parse::{
    provided_coordinates, read_rows, split_categories, RawRow, CATEGORY_COLUMN, LATITUDE_COLUMN,
    LATITUDE_RANGE, LONGITUDE_COLUMN, LONGITUDE_RANGE,
};

/// Parses uploads and forwards batches to storage.
pub struct ImportPipeline {
    geocoder: Arc<dyn Geocoder>,
    store: Arc<dyn StakeholderStore>,
    config: ImportConfig,
}

impl ImportPipeline {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        store: Arc<dyn StakeholderStore>,
        config: ImportConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            geocoder,
            store,
            config,
        })
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Parse stage: turn a CSV buffer into normalized rows.
    ///
    /// Rows come back in file order whatever the geocoding concurrency.
    /// Malformed CSV fails the whole call; per-row problems are collected in
    /// the report according to the failure policy.
    #[instrument(skip(self, buffer), fields(bytes = buffer.len()))]
    pub async fn parse_csv(&self, buffer: &[u8]) -> Result<ParseReport> {
        let raw_rows = read_rows(buffer)?;
        info!(rows = raw_rows.len(), "Parsing upload");

        let mut results = stream::iter(raw_rows)
            .map(|raw| self.normalize_row(raw))
            .buffered(self.config.geocode_concurrency);

        let mut report = ParseReport::default();
        while let Some(result) = results.next().await {
            match result {
                Ok(row) => {
                    counter!("import_rows_parsed_total").increment(1);
                    report.rows.push(row);
                }
                Err(failure) => {
                    counter!("import_row_failures_total").increment(1);
                    warn!(
                        index = failure.index,
                        line = failure.line,
                        reason = %failure.reason,
                        "Row left out of batch"
                    );
                    report.failures.push(failure);

                    if self.config.failure_policy == FailurePolicy::Abort {
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        info!(
            parsed = report.rows.len(),
            failed = report.failures.len(),
            aborted = report.aborted,
            "Parse finished"
        );
        Ok(report)
    }

    /// Import stage: hand the batch to storage in one call.
    ///
    /// Storage errors are logged and turned into [`ImportOutcome::Failed`];
    /// this method never fails.
    #[instrument(skip(self, rows), fields(rows = rows.len(), action = %action))]
    pub async fn import_csv(
        &self,
        rows: &[ImportRow],
        action: ImportAction,
        tenant_id: TenantId,
    ) -> ImportOutcome {
        counter!("import_batches_total").increment(1);

        match self.store.insert_bulk(rows, action, tenant_id).await {
            Ok(stored) if stored >= rows.len() => {
                info!(stored, "Batch imported");
                ImportOutcome::Success { stored }
            }
            Ok(stored) => {
                warn!(stored, submitted = rows.len(), "Batch partially imported");
                ImportOutcome::Partial {
                    stored,
                    submitted: rows.len(),
                }
            }
            Err(e) => {
                counter!("import_batch_failures_total").increment(1);
                error!(error = %e, "Bulk insert failed");
                ImportOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Parse then import. Nothing is stored when parsing aborted.
    pub async fn run(
        &self,
        buffer: &[u8],
        action: ImportAction,
        tenant_id: TenantId,
    ) -> Result<ImportRun> {
        let report = self.parse_csv(buffer).await?;

        let outcome = if report.aborted {
            warn!("Parse aborted, skipping storage");
            None
        } else {
            Some(self.import_csv(&report.rows, action, tenant_id).await)
        };

        Ok(ImportRun { report, outcome })
    }

    async fn normalize_row(&self, raw: RawRow) -> std::result::Result<ImportRow, RowFailure> {
        let RawRow {
            index,
            line,
            mut fields,
        } = raw;
        let fail = |reason: RowFailureReason| RowFailure {
            index,
            line,
            reason,
        };

        let coordinates = match provided_coordinates(&fields).map_err(&fail)? {
            Some(coordinates) => coordinates,
            None => self.resolve(&fields).await.map_err(|f| {
                counter!("import_geocode_failures_total").increment(1);
                fail(RowFailureReason::Geocode(f))
            })?,
        };

        let selected_category_ids =
            split_categories(fields.get(CATEGORY_COLUMN).map(String::as_str));
        fields.remove(CATEGORY_COLUMN);
        fields.remove(LATITUDE_COLUMN);
        fields.remove(LONGITUDE_COLUMN);

        Ok(ImportRow {
            fields,
            selected_category_ids,
            latitude: coordinates.0,
            longitude: coordinates.1,
        })
    }

    /// Geocode the row's address and take the first candidate.
    async fn resolve(
        &self,
        fields: &BTreeMap<String, String>,
    ) -> std::result::Result<(f64, f64), GeocodeFailure> {
        if !has_address(fields) {
            return Err(GeocodeFailure::EmptyAddress);
        }

        let address = format_map_address(fields);
        counter!("import_geocode_requests_total").increment(1);

        let candidates = self.geocoder.geocode(&address).await.map_err(|e| {
            GeocodeFailure::Provider {
                address: address.clone(),
                message: e.to_string(),
            }
        })?;

        let Some(first) = candidates.first() else {
            return Err(GeocodeFailure::NoCandidates { address });
        };

        let (latitude, longitude) = (first.latitude(), first.longitude());
        if !LATITUDE_RANGE.contains(&latitude) || !LONGITUDE_RANGE.contains(&longitude) {
            return Err(GeocodeFailure::Provider {
                address,
                message: format!(
                    "candidate coordinates out of range ({}, {})",
                    latitude, longitude
                ),
            });
        }

        debug!(address = %address, latitude, longitude, "Geocoded row");
        Ok((latitude, longitude))
    }
}
