//! Deployment configuration for the map view.
//!
//! Category ids, the default category filter and the marker color table are
//! data, loaded from JSON or YAML so each deployment can customize them.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use foodmap_common::{CategoryId, Color};

/// Errors raised while loading or validating a [`MapConfig`].
#[derive(Debug, Error)]
pub enum MapConfigError {
    #[error("Failed to read map config: {0}")]
    IoError(String),

    #[error("Failed to parse map config: {0}")]
    ParseError(String),

    #[error("Invalid map config: {0}")]
    ValidationError(String),
}

/// Root configuration for the map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Category that selects the food-pantry color
    pub food_pantry_category_id: CategoryId,

    /// Category that selects the meal-program color
    pub meal_program_category_id: CategoryId,

    /// Filter applied when the caller supplies no categories
    pub default_categories: Vec<CategoryId>,

    /// Verification status id that earns the verified badge
    pub verified_status_id: i32,

    pub colors: MarkerColors,

    /// Height taken from the map by the mobile preview panel
    pub mobile_preview_offset_px: u32,

    /// Map height in the stacked (narrow, non-mobile) layout
    pub stacked_height_percent: u8,

    /// Window width at or above which the layout is wide
    pub wide_breakpoint_px: u32,

    pub style: MapStyle,
}

/// Marker colors by status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerColors {
    pub closed: Color,
    pub food_pantry: Color,
    pub meal_program: Color,
}

/// Basemap settings handed to the mapping library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapStyle {
    pub style_url: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub show_compass: bool,
}

impl Default for MarkerColors {
    fn default() -> Self {
        Self {
            closed: Color::rgb(0x54, 0x54, 0x54),
            food_pantry: Color::rgb(0x33, 0x66, 0x99),
            meal_program: Color::rgb(0x00, 0xC4, 0x9F),
        }
    }
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            style_url: "mapbox://styles/mapbox/streets-v11".to_string(),
            access_token: String::new(),
            show_compass: false,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            food_pantry_category_id: 1,
            meal_program_category_id: 9,
            default_categories: vec![1, 9],
            verified_status_id: 4,
            colors: MarkerColors::default(),
            mobile_preview_offset_px: 120,
            stacked_height_percent: 50,
            wide_breakpoint_px: 960,
            style: MapStyle::default(),
        }
    }
}

impl MapConfig {
    /// Parse and validate configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, MapConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| MapConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, MapConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| MapConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MapConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| MapConfigError::IoError(e.to_string()))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    pub fn validate(&self) -> Result<(), MapConfigError> {
        if self.default_categories.is_empty() {
            return Err(MapConfigError::ValidationError(
                "default_categories must not be empty".to_string(),
            ));
        }
        if self.food_pantry_category_id == self.meal_program_category_id {
            return Err(MapConfigError::ValidationError(format!(
                "food pantry and meal program share category id {}",
                self.food_pantry_category_id
            )));
        }
        if self.stacked_height_percent == 0 || self.stacked_height_percent > 100 {
            return Err(MapConfigError::ValidationError(format!(
                "stacked_height_percent must be in 1..=100, got {}",
                self.stacked_height_percent
            )));
        }
        Ok(())
    }

    /// The category filter in effect: the caller's, or the default set when
    /// the caller passes none.
    pub fn effective_categories<'a>(&'a self, category_ids: &'a [CategoryId]) -> &'a [CategoryId] {
        if category_ids.is_empty() {
            &self.default_categories
        } else {
            category_ids
        }
    }
}
