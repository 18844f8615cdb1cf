//! # Polykit Core
//!
//! Core types and utilities shared by the polykit crates.
//! Provides the integer coordinate primitives the geometry engine is built on,
//! unit conversion helpers, engine-wide constants and the error taxonomy.

pub mod constants;
pub mod error;
pub mod math;
pub mod strategy;
pub mod units;

pub use error::{Error, GeometryError, GeometryResult, Result};
pub use math::{BBox, Point, PointF, Seg};
pub use strategy::CornerStrategy;
pub use units::LengthUnit;
