//! Normalized rows produced by the bulk import pipeline.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::FoodMapError;

/// Organization partition that imported records belong to.
pub type TenantId = i32;

/// How storage should treat an imported batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportAction {
    /// Add every row as a new record.
    #[default]
    Insert,
    /// Update records that already exist for the tenant, insert the rest.
    Upsert,
}

impl FromStr for ImportAction {
    type Err = FoodMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insert" | "add" => Ok(ImportAction::Insert),
            "upsert" | "update" | "replace" => Ok(ImportAction::Upsert),
            other => Err(FoodMapError::InvalidField {
                field: "action".to_string(),
                message: format!("unknown import action '{}'", other),
            }),
        }
    }
}

impl fmt::Display for ImportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportAction::Insert => f.write_str("insert"),
            ImportAction::Upsert => f.write_str("upsert"),
        }
    }
}

/// One CSV row after normalization.
///
/// `fields` keeps every original column except the three normalized ones,
/// which live in typed fields. Serialized flat, so the JSON form matches the
/// original column names. When deserializing, numeric and boolean column
/// values are kept as their text and `null` becomes an empty string; nested
/// arrays or objects are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    #[serde(flatten, deserialize_with = "scalar_fields")]
    pub fields: BTreeMap<String, String>,
    #[serde(rename = "selectedCategoryIds")]
    pub selected_category_ids: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl ImportRow {
    /// Raw value of an original column, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Raw value of an original column, empty when absent.
    pub fn field_or_empty(&self, name: &str) -> &str {
        self.field(name).unwrap_or("")
    }

    pub fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

fn scalar_fields<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    BTreeMap::<String, Value>::deserialize(deserializer)?
        .into_iter()
        .map(|(column, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(D::Error::custom(format!(
                        "column '{}' must be a string, number or boolean",
                        column
                    )))
                }
            };
            Ok((column, text))
        })
        .collect()
}
