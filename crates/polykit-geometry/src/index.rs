//! Structured and flattened vertex addressing.
//!
//! A [`VertexIndex`] names a vertex by polygon, contour (0 is the outline,
//! holes follow) and position. The global index enumerates every vertex of
//! the set in that same order. [`ContourLayout`] converts between the two.

use serde::{Deserialize, Serialize};

/// Structured address of a vertex in a polygon set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct VertexIndex {
    pub polygon: usize,
    pub contour: usize,
    pub vertex: usize,
}

impl VertexIndex {
    pub const fn new(polygon: usize, contour: usize, vertex: usize) -> Self {
        Self {
            polygon,
            contour,
            vertex,
        }
    }

    pub fn is_hole(&self) -> bool {
        self.contour > 0
    }
}

/// Vertex counts of every contour, grouped by polygon.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContourLayout {
    sizes: Vec<Vec<usize>>,
}

impl ContourLayout {
    pub fn new(sizes: Vec<Vec<usize>>) -> Self {
        Self { sizes }
    }

    pub fn total(&self) -> usize {
        self.sizes.iter().flatten().sum()
    }

    pub fn contour_len(&self, polygon: usize, contour: usize) -> Option<usize> {
        self.sizes.get(polygon)?.get(contour).copied()
    }

    /// Flatten a structured index. `None` when it does not exist.
    pub fn to_global(&self, index: VertexIndex) -> Option<usize> {
        let contours = self.sizes.get(index.polygon)?;
        let len = *contours.get(index.contour)?;
        if index.vertex >= len {
            return None;
        }
        let before_polygons: usize = self.sizes[..index.polygon].iter().flatten().sum();
        let before_contours: usize = contours[..index.contour].iter().sum();
        Some(before_polygons + before_contours + index.vertex)
    }

    /// Expand a global index. `None` when it is past the last vertex.
    pub fn to_relative(&self, global: usize) -> Option<VertexIndex> {
        let mut remaining = global;
        for (polygon, contours) in self.sizes.iter().enumerate() {
            for (contour, &len) in contours.iter().enumerate() {
                if remaining < len {
                    return Some(VertexIndex::new(polygon, contour, remaining));
                }
                remaining -= len;
            }
        }
        None
    }

    /// Global indexes of the previous and next vertex on the same contour.
    pub fn neighbours(&self, global: usize) -> Option<(usize, usize)> {
        let idx = self.to_relative(global)?;
        let len = self.contour_len(idx.polygon, idx.contour)?;
        let start = global - idx.vertex;
        let prev = start + (idx.vertex + len - 1) % len;
        let next = start + (idx.vertex + 1) % len;
        Some((prev, next))
    }
}
