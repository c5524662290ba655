//! Selection and panel state of the map view.

use serde::{Deserialize, Serialize};
use tracing::debug;

use foodmap_common::{Stakeholder, Viewport};

use crate::config::MapConfig;
use crate::layout::MapHeight;
use crate::marker::build_markers;
use crate::scene::{DetailsPanel, MapFrame, MapProps, MapScene, Popup, Preview};

/// User interaction reported by the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapEvent {
    /// A marker was clicked; `index` is the marker's `index` field.
    MarkerClicked { index: usize },
    PopupClosed,
    PreviewTapped,
    DetailsClosed,
    ViewportChanged { viewport: Viewport },
}

/// Request for the owner of the map's inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapAction {
    /// Select a stakeholder, or clear the selection with `None`.
    SelectStakeholder { stakeholder: Option<Stakeholder> },
    UpdateViewport { viewport: Viewport },
}

/// Map view component.
///
/// Holds the configuration and the one piece of local UI state: whether the
/// mobile detail panel is open. Everything else arrives through
/// [`MapProps`] on each call.
#[derive(Debug, Clone, Default)]
pub struct MapView {
    config: MapConfig,
    show_details: bool,
}

impl MapView {
    pub fn new(config: MapConfig) -> Self {
        Self {
            config,
            show_details: false,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn is_showing_details(&self) -> bool {
        self.show_details
    }

    /// Render the current frame. Pure with respect to `props` and local state.
    pub fn render(&self, props: &MapProps<'_>) -> MapFrame {
        let mobile = props.layout.is_mobile();

        if let Some(selected) = props.selected {
            if self.show_details && mobile {
                return MapFrame::Details(DetailsPanel {
                    stakeholder: selected.clone(),
                });
            }
        }

        let popup = props.selected.and_then(|sh| {
            sh.coordinates().map(|anchor| Popup {
                anchor,
                stakeholder: sh.clone(),
            })
        });

        let preview = props
            .selected
            .filter(|_| mobile)
            .map(|sh| Preview {
                stakeholder: sh.clone(),
            });

        MapFrame::Map(MapScene {
            height: MapHeight::for_layout(props.layout, props.selected.is_some(), &self.config),
            viewport: props.viewport,
            style: self.config.style.clone(),
            markers: build_markers(&self.config, props.stakeholders, props.category_ids),
            popup,
            preview,
        })
    }

    /// Apply a user interaction and return what the caller should do.
    pub fn handle_event(&mut self, event: MapEvent, props: &MapProps<'_>) -> Vec<MapAction> {
        self.sync_selection(props);

        match event {
            MapEvent::MarkerClicked { index } => {
                let Some(stakeholder) = props.stakeholders.and_then(|list| list.get(index)) else {
                    debug!(index, "Ignoring click on unknown marker");
                    return Vec::new();
                };
                vec![MapAction::SelectStakeholder {
                    stakeholder: Some(stakeholder.clone()),
                }]
            }
            MapEvent::PopupClosed | MapEvent::DetailsClosed => {
                self.show_details = false;
                vec![MapAction::SelectStakeholder { stakeholder: None }]
            }
            MapEvent::PreviewTapped => {
                if props.selected.is_some() && props.layout.is_mobile() {
                    self.show_details = true;
                }
                Vec::new()
            }
            MapEvent::ViewportChanged { viewport } => {
                vec![MapAction::UpdateViewport { viewport }]
            }
        }
    }

    /// Close the detail panel once the selection has been cleared upstream.
    pub fn sync_selection(&mut self, props: &MapProps<'_>) {
        if props.selected.is_none() {
            self.show_details = false;
        }
    }
}
