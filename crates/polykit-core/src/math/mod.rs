//! Integer 2D math primitives.
//!
//! All geometry lives on an `i32` grid. Products that can exceed `i32` are
//! widened to `i64` (and to `i128` where two such products are combined).

mod bbox;
mod point;
mod seg;

pub use bbox::BBox;
pub use point::{Point, PointF};
pub use seg::Seg;

/// Integer square root of a non-negative value, rounded down.
pub fn isqrt(value: i128) -> i64 {
    if value <= 0 {
        return 0;
    }
    let mut r = (value as f64).sqrt() as i128;
    while r * r > value {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= value {
        r += 1;
    }
    r.min(i64::MAX as i128) as i64
}

/// Divide rounding half away from zero.
pub fn rescale(value: i128, numerator: i128, denominator: i128) -> i128 {
    if denominator == 0 {
        return 0;
    }
    let product = value * numerator;
    let half = denominator.abs() / 2;
    let sign = if (product < 0) != (denominator < 0) { -1 } else { 1 };
    (product.abs() + half) / denominator.abs() * sign
}
