//! # Polykit Geometry
//!
//! The polygon-set engine. A [`PolySet`] holds outlines with holes on the
//! integer grid and supports:
//!
//! - **Booleans**: union, difference, intersection and xor through a
//!   pluggable [`ClipBackend`], keeping arc provenance across the operation
//! - **Offsetting**: corner-strategy-aware inflate and deflate
//! - **Fracture**: bridging holes into their outline and the inverse
//! - **Triangulation**: partitioned, hash-validated and cached
//! - **Queries**: containment, distance, collision, self-intersection and
//!   hatch lines
//! - **Editing**: indexed vertex access, transforms, chamfer and fillet, and
//!   a textual dump for debugging

pub mod arc;
pub mod boolean;
pub mod chain;
pub mod collide;
mod corners;
mod dump;
mod fracture;
mod hatch;
pub mod index;
pub mod offset;
pub mod params;
pub mod poly_set;
mod queries;
mod transform;
pub mod triangulation;

// Re-export commonly used items
pub use arc::{arc_segment_count, ShapeArc};
pub use boolean::{
    BooleanOp, ClipBackend, CsgClipper, IntersectionEvent, PathNode, PathTree, TaggedPath,
    TaggedPolygon,
};
pub use chain::LineChain;
pub use collide::{Collision, CollisionShape};
pub use index::{ContourLayout, VertexIndex};
pub use offset::{inflate_line_chain, CornerTable};
pub use params::{OffsetParams, QueryParams, TriangulationParams};
pub use poly_set::{PolySet, Polygon};
pub use triangulation::{TriangulatedPolygon, Triangle, TriangulationCache};

pub use polykit_core::{BBox, CornerStrategy, GeometryError, GeometryResult, Point, Seg};
