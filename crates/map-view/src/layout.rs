//! Layout modes and map sizing.

use serde::{Deserialize, Serialize};

use crate::config::MapConfig;

/// Form factor the map is rendered in, decided by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Wide window: map beside the list, panels never replace the map.
    Wide,
    /// Mobile device: preview under the map, details replace the map.
    Narrow,
    /// Narrow desktop window: map stacked above the list at reduced height.
    Stacked,
}

impl LayoutMode {
    /// Classify from device capability and window width.
    pub fn classify(is_mobile_device: bool, window_width_px: u32, config: &MapConfig) -> Self {
        if is_mobile_device {
            LayoutMode::Narrow
        } else if window_width_px >= config.wide_breakpoint_px {
            LayoutMode::Wide
        } else {
            LayoutMode::Stacked
        }
    }

    /// Whether the preview/detail flow applies.
    pub fn is_mobile(&self) -> bool {
        matches!(self, LayoutMode::Narrow)
    }
}

/// Height of the map container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum MapHeight {
    Full,
    Percent(u8),
    /// Full height minus a fixed number of pixels.
    FullMinusPx(u32),
}

impl MapHeight {
    /// Height for a layout and selection state.
    pub fn for_layout(layout: LayoutMode, has_selection: bool, config: &MapConfig) -> Self {
        match layout {
            LayoutMode::Wide => MapHeight::Full,
            LayoutMode::Narrow if has_selection => {
                MapHeight::FullMinusPx(config.mobile_preview_offset_px)
            }
            LayoutMode::Narrow => MapHeight::Full,
            LayoutMode::Stacked => MapHeight::Percent(config.stacked_height_percent),
        }
    }

    /// CSS value for the container's `height` property.
    pub fn to_css(&self) -> String {
        match self {
            MapHeight::Full => "100%".to_string(),
            MapHeight::Percent(p) => format!("{}%", p),
            MapHeight::FullMinusPx(px) => format!("calc(100% - {}px)", px),
        }
    }
}

impl From<MapHeight> for String {
    fn from(height: MapHeight) -> Self {
        height.to_css()
    }
}
