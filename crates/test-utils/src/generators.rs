//! Builders for stakeholder lists.

use foodmap_common::{Category, CategoryId, Stakeholder, StakeholderId};

/// An open, unverified stakeholder at the given position.
pub fn stakeholder_at(id: StakeholderId, latitude: f64, longitude: f64) -> Stakeholder {
    Stakeholder {
        id,
        name: format!("Stakeholder {}", id),
        latitude: Some(latitude),
        longitude: Some(longitude),
        ..Default::default()
    }
}

/// A stakeholder carrying the given categories.
pub fn stakeholder_with_categories(id: StakeholderId, categories: &[CategoryId]) -> Stakeholder {
    Stakeholder {
        categories: categories
            .iter()
            .map(|&c| Category::new(c, format!("Category {}", c)))
            .collect(),
        ..stakeholder_at(id, 34.0 + id as f64 * 0.01, -118.0)
    }
}

/// `total` stakeholders, of which the first `missing` lack one coordinate.
///
/// Missing coordinates alternate between absent latitude, absent longitude
/// and a zero latitude so every falsy form is covered.
pub fn stakeholders_with_missing_coords(total: usize, missing: usize) -> Vec<Stakeholder> {
    (0..total)
        .map(|i| {
            let mut sh = stakeholder_at(i as StakeholderId + 1, 34.0 + i as f64 * 0.001, -118.0);
            if i < missing {
                match i % 3 {
                    0 => sh.latitude = None,
                    1 => sh.longitude = None,
                    _ => sh.latitude = Some(0.0),
                }
            }
            sh
        })
        .collect()
}
