//! Common types shared across the foodmap crates and services.

pub mod color;
pub mod error;
pub mod import;
pub mod stakeholder;
pub mod viewport;

pub use color::{Color, ColorParseError};
pub use error::FoodMapError;
pub use import::{ImportAction, ImportRow, TenantId};
pub use stakeholder::{Category, CategoryId, Stakeholder, StakeholderId};
pub use viewport::{LatLng, Viewport};
