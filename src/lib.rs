//! # Polykit
//!
//! An integer 2D polygon-set engine for board and layout editors.
//!
//! ## Architecture
//!
//! Polykit is organized as a workspace with multiple crates:
//!
//! 1. **polykit-core** - Integer points, boxes and segments, units, constants, errors
//! 2. **polykit-settings** - Engine configuration loaded from JSON or TOML
//! 3. **polykit-geometry** - The polygon set and every operation on it
//! 4. **polykit** - Logging setup and a small debug binary
//!
//! ## Features
//!
//! - **Booleans**: union, difference, intersection and xor with arc provenance
//! - **Offsetting**: inflate and deflate with five corner strategies
//! - **Fracture**: hole bridging for consumers that cannot draw holes
//! - **Triangulation**: cached and invalidated by content hash
//! - **Queries**: containment, distance, collision, hatching

pub mod types;

pub use polykit_core;
pub use polykit_geometry;
pub use polykit_settings;

pub use polykit_core::{
    BBox, CornerStrategy, Error, GeometryError, GeometryResult, LengthUnit, Point, Result, Seg,
};
pub use polykit_geometry::{
    BooleanOp, Collision, CollisionShape, LineChain, OffsetParams, PolySet, Polygon, ShapeArc,
    Triangle, TriangulationParams, VertexIndex,
};
pub use polykit_settings::GeometryConfig;
pub use types::SetSummary;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr so reports on stdout stay clean
/// - RUST_LOG environment variable support, `info` by default
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
