//! Whole-set affine transforms and cleanup.

use crate::poly_set::PolySet;
use polykit_core::Point;

impl PolySet {
    pub fn translate(&mut self, offset: Point) {
        if offset == Point::default() {
            return;
        }
        self.polys_mut()
            .iter_mut()
            .flatten()
            .for_each(|c| c.translate(offset));
    }

    /// Rotate counter-clockwise by `angle` radians around `center`.
    pub fn rotate(&mut self, angle: f64, center: Point) {
        if angle == 0.0 {
            return;
        }
        self.polys_mut()
            .iter_mut()
            .flatten()
            .for_each(|c| c.rotate(angle, center));
    }

    /// Mirror across the vertical (`x`) and/or horizontal (`y`) line through
    /// `about`. Contour orientation is restored afterwards.
    pub fn mirror(&mut self, x: bool, y: bool, about: Point) {
        if !x && !y {
            return;
        }
        self.polys_mut()
            .iter_mut()
            .flatten()
            .for_each(|c| c.mirror(x, y, about));
        if x != y {
            self.normalize_orientation();
        }
    }

    /// Scale about the origin.
    pub fn scale(&mut self, factor: f64) {
        if factor == 1.0 {
            return;
        }
        self.polys_mut()
            .iter_mut()
            .flatten()
            .for_each(|c| c.scale(factor));
        if factor < 0.0 {
            self.normalize_orientation();
        }
    }

    /// Drop zero-length segments from every contour. Returns the number of
    /// vertices removed.
    pub fn remove_null_segments(&mut self) -> usize {
        self.polys_mut()
            .iter_mut()
            .flatten()
            .map(|c| c.remove_duplicate_points())
            .sum()
    }
}
