//! Marker placement and color coding.

use serde::Serialize;

use foodmap_common::{CategoryId, Color, LatLng, Stakeholder, StakeholderId};

use crate::config::MapConfig;

/// One stakeholder drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Stable key for the front end's list diffing
    pub key: String,
    /// Position of the stakeholder in the input list, used for click dispatch
    pub index: usize,
    pub stakeholder_id: StakeholderId,
    pub position: LatLng,
    pub color: Color,
    pub is_verified: bool,
    pub category_ids: Vec<CategoryId>,
    pub inactive: bool,
    pub inactive_temporary: bool,
}

impl MapConfig {
    /// Marker color for a stakeholder.
    ///
    /// Closure wins over category. Among open stakeholders, the meal-program
    /// color is used only when the meal-program category survives the filter;
    /// everything else gets the food-pantry color.
    pub fn marker_color(&self, stakeholder: &Stakeholder, effective: &[CategoryId]) -> &Color {
        if stakeholder.is_closed() {
            return &self.colors.closed;
        }

        let is_meal_program = stakeholder
            .categories
            .iter()
            .filter(|c| effective.contains(&c.id))
            .any(|c| c.id == self.meal_program_category_id);

        if is_meal_program {
            &self.colors.meal_program
        } else {
            &self.colors.food_pantry
        }
    }

    /// Verified badge: status id matches exactly.
    pub fn is_verified(&self, stakeholder: &Stakeholder) -> bool {
        stakeholder.verification_status_id == Some(self.verified_status_id)
    }
}

/// Build markers for every stakeholder that has usable coordinates.
///
/// Stakeholders without both coordinates are skipped silently. A missing
/// list yields no markers.
pub fn build_markers(
    config: &MapConfig,
    stakeholders: Option<&[Stakeholder]>,
    category_ids: &[CategoryId],
) -> Vec<Marker> {
    let Some(stakeholders) = stakeholders else {
        return Vec::new();
    };
    let effective = config.effective_categories(category_ids);

    stakeholders
        .iter()
        .enumerate()
        .filter_map(|(index, sh)| sh.coordinates().map(|position| (index, sh, position)))
        .enumerate()
        .map(|(n, (index, sh, position))| Marker {
            key: format!("marker-{}", n),
            index,
            stakeholder_id: sh.id,
            position,
            color: config.marker_color(sh, effective).clone(),
            is_verified: config.is_verified(sh),
            category_ids: sh.categories.iter().map(|c| c.id).collect(),
            inactive: sh.inactive,
            inactive_temporary: sh.inactive_temporary,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodmap_common::Category;

    fn stakeholder(categories: &[CategoryId]) -> Stakeholder {
        Stakeholder {
            latitude: Some(34.0),
            longitude: Some(-118.0),
            categories: categories.iter().map(|&id| Category::new(id, "")).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_meal_program_filtered_out_falls_back_to_pantry() {
        let config = MapConfig::default();
        let sh = stakeholder(&[9]);
        // Caller filters to pantries only, so the meal-program category is
        // not part of the color decision.
        assert_eq!(config.marker_color(&sh, &[1]), &config.colors.food_pantry);
        assert_eq!(config.marker_color(&sh, &[1, 9]), &config.colors.meal_program);
    }

    #[test]
    fn test_keys_follow_marker_order() {
        let config = MapConfig::default();
        let mut missing = stakeholder(&[1]);
        missing.latitude = None;
        let list = vec![missing, stakeholder(&[1])];

        let markers = build_markers(&config, Some(list.as_slice()), &[]);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].key, "marker-0");
        assert_eq!(markers[0].index, 1);
    }
}
