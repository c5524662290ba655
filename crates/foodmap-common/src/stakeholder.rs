//! Stakeholder records as consumed by the map view.

use serde::{Deserialize, Deserializer, Serialize};

use crate::viewport::LatLng;

/// Database identifier of a stakeholder.
pub type StakeholderId = i64;

/// Identifier of a stakeholder category (e.g. food pantry, meal program).
pub type CategoryId = i32;

/// A category attached to a stakeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A resource location (food pantry, meal program site, ...).
///
/// Every field has a default so that partially populated records coming from
/// the data-fetching layer still deserialize; an explicit `null` counts as
/// missing. Coordinates are parsed leniently: anything that is not a finite
/// number becomes `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stakeholder {
    #[serde(deserialize_with = "null_as_default")]
    pub id: StakeholderId,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address1: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address2: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub zip: String,
    #[serde(deserialize_with = "lenient_coordinate")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient_coordinate")]
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<Category>,
    pub verification_status_id: Option<i32>,
    #[serde(deserialize_with = "null_as_default")]
    pub inactive: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub inactive_temporary: bool,
}

impl Stakeholder {
    /// Marker position, if the stakeholder can be placed on the map.
    ///
    /// Zero and non-finite values count as absent.
    pub fn coordinates(&self) -> Option<LatLng> {
        let present = |v: Option<f64>| v.filter(|v| v.is_finite() && *v != 0.0);
        Some(LatLng::new(present(self.latitude)?, present(self.longitude)?))
    }

    /// True when either closure flag is set.
    pub fn is_closed(&self) -> bool {
        self.inactive || self.inactive_temporary
    }

    pub fn has_category(&self, id: CategoryId) -> bool {
        self.categories.iter().any(|c| c.id == id)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()))
}
