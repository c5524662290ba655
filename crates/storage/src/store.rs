//! The persistence boundary for imported stakeholders.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use foodmap_common::{ImportAction, ImportRow, TenantId};

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Row {row} rejected: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Bulk insertion of normalized import rows.
#[async_trait]
pub trait StakeholderStore: Send + Sync {
    /// Write the whole batch for `tenant_id`. Returns the number of records
    /// written. The batch is all-or-nothing.
    async fn insert_bulk(
        &self,
        rows: &[ImportRow],
        action: ImportAction,
        tenant_id: TenantId,
    ) -> StorageResult<usize>;
}

/// Columns that map onto dedicated stakeholder fields. Everything else in an
/// import row is kept in `attributes`.
const ADDRESS_COLUMNS: [&str; 6] = ["name", "address_1", "address_2", "city", "state", "zip"];

/// A stakeholder as written to storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeholderRecord {
    pub tenant_id: TenantId,
    pub name: String,
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category_ids: Vec<i32>,
    pub attributes: BTreeMap<String, String>,
}

impl StakeholderRecord {
    /// Validate an import row and convert it.
    ///
    /// `index` is the row's position in the batch, used in error messages.
    pub fn from_import_row(
        row: &ImportRow,
        index: usize,
        tenant_id: TenantId,
    ) -> StorageResult<Self> {
        let invalid = |reason: String| StorageError::InvalidRow { row: index, reason };

        if !row.has_valid_coordinates() {
            return Err(invalid(format!(
                "non-numeric coordinates ({}, {})",
                row.latitude, row.longitude
            )));
        }
        if !(-90.0..=90.0).contains(&row.latitude) || !(-180.0..=180.0).contains(&row.longitude) {
            return Err(invalid(format!(
                "coordinates out of range ({}, {})",
                row.latitude, row.longitude
            )));
        }

        let category_ids = row
            .selected_category_ids
            .iter()
            .map(|id| {
                id.trim()
                    .parse::<i32>()
                    .map_err(|_| invalid(format!("category id '{}' is not a number", id)))
            })
            .collect::<StorageResult<Vec<_>>>()?;

        let attributes = row
            .fields
            .iter()
            .filter(|(k, _)| !ADDRESS_COLUMNS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Self {
            tenant_id,
            name: row.field_or_empty("name").to_string(),
            address_1: row.field_or_empty("address_1").to_string(),
            address_2: row.field_or_empty("address_2").to_string(),
            city: row.field_or_empty("city").to_string(),
            state: row.field_or_empty("state").to_string(),
            zip: row.field_or_empty("zip").to_string(),
            latitude: row.latitude,
            longitude: row.longitude,
            category_ids,
            attributes,
        })
    }

    /// Identity used for upserts.
    pub fn natural_key(&self) -> (TenantId, &str, &str, &str) {
        (self.tenant_id, &self.name, &self.address_1, &self.zip)
    }
}

/// Convert a whole batch, failing on the first invalid row.
pub fn records_from_rows(
    rows: &[ImportRow],
    tenant_id: TenantId,
) -> StorageResult<Vec<StakeholderRecord>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| StakeholderRecord::from_import_row(row, i, tenant_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(lat: f64, lon: f64, categories: &[&str]) -> ImportRow {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), "Pantry".to_string());
        fields.insert("zip".to_string(), "62701".to_string());
        fields.insert("phone".to_string(), "555-0100".to_string());
        ImportRow {
            fields,
            selected_category_ids: categories.iter().map(|s| s.to_string()).collect(),
            latitude: lat,
            longitude: lon,
        }
    }

    #[test]
    fn test_record_splits_known_columns() {
        let record =
            StakeholderRecord::from_import_row(&row(39.8, -89.6, &["1", "9"]), 0, 3).unwrap();
        assert_eq!(record.name, "Pantry");
        assert_eq!(record.zip, "62701");
        assert_eq!(record.address_1, "");
        assert_eq!(record.category_ids, vec![1, 9]);
        assert_eq!(record.attributes.get("phone").map(String::as_str), Some("555-0100"));
        assert!(!record.attributes.contains_key("name"));
        assert_eq!(record.tenant_id, 3);
    }

    #[test]
    fn test_nan_rejected() {
        let result = StakeholderRecord::from_import_row(&row(f64::NAN, -89.6, &[]), 4, 1);
        assert!(matches!(result, Err(StorageError::InvalidRow { row: 4, .. })));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(StakeholderRecord::from_import_row(&row(91.0, 0.0, &[]), 0, 1).is_err());
        assert!(StakeholderRecord::from_import_row(&row(0.0, -181.0, &[]), 0, 1).is_err());
    }

    #[test]
    fn test_non_numeric_category_rejected() {
        let result = records_from_rows(&[row(39.8, -89.6, &["1"]), row(39.8, -89.6, &["x"])], 1);
        assert!(matches!(result, Err(StorageError::InvalidRow { row: 1, .. })));
    }
}
