//! Render output of the map view.

use serde::Serialize;

use foodmap_common::{CategoryId, LatLng, Stakeholder, Viewport};

use crate::config::MapStyle;
use crate::layout::{LayoutMode, MapHeight};
use crate::marker::Marker;

/// Inputs for one render, owned by the caller.
#[derive(Debug, Clone, Copy)]
pub struct MapProps<'a> {
    /// Stakeholders to place; `None` when the data layer has nothing yet
    pub stakeholders: Option<&'a [Stakeholder]>,
    /// Active category filter; empty means the configured defaults
    pub category_ids: &'a [CategoryId],
    pub selected: Option<&'a Stakeholder>,
    pub layout: LayoutMode,
    pub viewport: Viewport,
}

/// What the front end should draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum MapFrame {
    /// The interactive map with its overlays.
    Map(MapScene),
    /// Full-screen stakeholder details replacing the map.
    Details(DetailsPanel),
}

impl MapFrame {
    pub fn scene(&self) -> Option<&MapScene> {
        match self {
            MapFrame::Map(scene) => Some(scene),
            MapFrame::Details(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub height: MapHeight,
    pub viewport: Viewport,
    pub style: MapStyle,
    pub markers: Vec<Marker>,
    pub popup: Option<Popup>,
    pub preview: Option<Preview>,
}

/// Popup anchored to the selected stakeholder. Closing it clears the
/// selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub anchor: LatLng,
    pub stakeholder: Stakeholder,
}

/// Compact panel shown under the map on mobile. Tapping it opens details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub stakeholder: Stakeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsPanel {
    pub stakeholder: Stakeholder,
}
