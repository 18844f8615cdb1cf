//! Polykit Settings Crate
//!
//! Configuration for the polygon-set engine: arc tolerance, offset defaults,
//! triangulation tuning and query defaults, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{ArcSettings, GeometryConfig, OffsetSettings, QuerySettings, TriangulationSettings};
pub use error::{SettingsError, SettingsResult};
