//! Hatch-line generation.

use crate::poly_set::PolySet;
use polykit_core::{GeometryError, GeometryResult, Point, PointF, Seg};

impl PolySet {
    /// Parallel fill lines at each of `angles_deg`, `spacing` apart, clipped
    /// to the set's interior.
    ///
    /// Lines sit on multiples of `spacing` measured along their normal, so
    /// the pattern does not drift when the set moves. With `max_dash` each
    /// run is split into equal dashes no longer than that.
    pub fn hatch_lines(
        &self,
        angles_deg: &[f64],
        spacing: i32,
        max_dash: Option<i32>,
    ) -> GeometryResult<Vec<Seg>> {
        if spacing <= 0 {
            return Err(GeometryError::invalid("spacing", "must be positive"));
        }
        if let Some(dash) = max_dash {
            if dash <= 0 {
                return Err(GeometryError::invalid("max_dash", "must be positive"));
            }
        }
        if let Some(bad) = angles_deg.iter().find(|a| !a.is_finite()) {
            return Err(GeometryError::invalid("angle", format!("{} is not finite", bad)));
        }

        let bbox = self.bbox();
        if bbox.is_empty() {
            return Ok(Vec::new());
        }
        let edges: Vec<Seg> = self.segments().map(|(_, s)| s).collect();
        let spacing = spacing as f64;
        let mut lines = Vec::new();

        for angle in angles_deg {
            let (sin, cos) = angle.to_radians().sin_cos();
            let dir = PointF::new(cos, sin);
            let normal = PointF::new(-sin, cos);

            let (lo, hi) = bbox
                .corners()
                .iter()
                .map(|c| c.to_f().dot(normal))
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), o| {
                    (lo.min(o), hi.max(o))
                });

            let mut offset = (lo / spacing).ceil() * spacing;
            while offset <= hi {
                let mut crossings: Vec<f64> = edges
                    .iter()
                    .filter_map(|e| {
                        let a = e.a.to_f();
                        let b = e.b.to_f();
                        let sa = a.dot(normal) - offset;
                        let sb = b.dot(normal) - offset;
                        if (sa > 0.0) == (sb > 0.0) {
                            return None;
                        }
                        let t = a.dot(dir) + (b.sub(a)).dot(dir) * sa / (sa - sb);
                        Some(t)
                    })
                    .collect();
                crossings.sort_by(f64::total_cmp);

                let at = |t: f64| normal.scale(offset).add(dir.scale(t));
                for pair in crossings.windows(2) {
                    let (t0, t1) = (pair[0], pair[1]);
                    if t1 - t0 < 1.0 {
                        continue;
                    }
                    if !self.contains(at((t0 + t1) / 2.0).round(), 0, false) {
                        continue;
                    }
                    let pieces = match max_dash {
                        Some(dash) => ((t1 - t0) / dash as f64).ceil().max(1.0) as usize,
                        None => 1,
                    };
                    let step = (t1 - t0) / pieces as f64;
                    for k in 0..pieces {
                        let start: Point = at(t0 + step * k as f64).round();
                        let end: Point = at(t0 + step * (k + 1) as f64).round();
                        if start != end {
                            lines.push(Seg::new(start, end));
                        }
                    }
                }
                offset += spacing;
            }
        }
        Ok(lines)
    }
}
