//! Engine-wide constants.
//!
//! Coordinates are integers in internal units (nanometres), so every
//! distance constant here is expressed in the same unit.

/// Internal units per millimetre.
pub const IU_PER_MM: f64 = 1_000_000.0;

/// Default maximum chord error when approximating arcs and round corners.
pub const DEFAULT_MAX_ERROR: i32 = 5_000;

/// Default extent of a triangulation partition cell.
pub const DEFAULT_PARTITION_EXTENT: i32 = 10_000_000;

/// A full circle is never approximated with fewer segments than this.
pub const MIN_SEGCOUNT_FOR_CIRCLE: usize = 8;

/// Segment counts up to this value are served from the flat corner table.
pub const CORNER_TABLE_FAST_LIMIT: usize = 64;

/// Default mitre limit, as a multiple of the offset distance.
pub const DEFAULT_MITRE_LIMIT: f64 = 10.0;

/// Number of simplification passes attempted before an outline is left
/// untriangulated.
pub const DEFAULT_SIMPLIFY_PASSES: u32 = 4;

/// Vertex-merge tolerance added on every simplification pass.
pub const DEFAULT_SIMPLIFY_STEP: i32 = 2;
