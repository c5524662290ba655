//! View model for the stakeholder map.
//!
//! Turns a list of stakeholders plus selection and viewport state into a
//! declarative [`MapFrame`] that a browser front end draws with its mapping
//! library:
//!
//! - Marker placement and color coding by category and closure status
//! - Popup, preview and detail-panel state for the selected stakeholder
//! - Map sizing per [`LayoutMode`]
//!
//! The view performs no I/O. Selection and viewport changes are reported
//! back to the caller as [`MapAction`]s.

pub mod config;
pub mod layout;
pub mod marker;
pub mod scene;
pub mod state;

pub use config::{MapConfig, MapConfigError, MapStyle, MarkerColors};
pub use layout::{LayoutMode, MapHeight};
pub use marker::{build_markers, Marker};
pub use scene::{DetailsPanel, MapFrame, MapProps, MapScene, Popup, Preview};
pub use state::{MapAction, MapEvent, MapView};
