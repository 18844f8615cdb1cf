//! Plain-text dump of a polygon set, for debugging and round-tripping.
//!
//! ```text
//! polyset 1
//! poly 2
//! 4
//! 0 0
//! 10 0
//! 10 10
//! 0 10
//! 4
//! 4 4
//! 4 6
//! 6 6
//! 6 4
//! ```
//!
//! Arcs are written as their polyline approximation.

use crate::chain::LineChain;
use crate::poly_set::{PolySet, Polygon};
use polykit_core::{GeometryError, GeometryResult, Point};
use std::fmt;
use std::str::FromStr;

impl fmt::Display for PolySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "polyset {}", self.outline_count())?;
        for poly in self.polygons() {
            writeln!(f, "poly {}", poly.len())?;
            for chain in poly {
                writeln!(f, "{}", chain.point_count())?;
                for p in chain.points() {
                    writeln!(f, "{} {}", p.x, p.y)?;
                }
            }
        }
        Ok(())
    }
}

struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            iter: text.split_whitespace(),
            position: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> GeometryError {
        GeometryError::Parse {
            position: self.position,
            reason: reason.into(),
        }
    }

    fn next(&mut self, expected: &str) -> GeometryResult<&'a str> {
        let token = self
            .iter
            .next()
            .ok_or_else(|| self.error(format!("expected {}, found end of input", expected)))?;
        self.position += 1;
        Ok(token)
    }

    fn keyword(&mut self, word: &str) -> GeometryResult<()> {
        let token = self.next(word)?;
        if token != word {
            self.position -= 1;
            return Err(self.error(format!("expected '{}', found '{}'", word, token)));
        }
        Ok(())
    }

    fn number<T: FromStr>(&mut self, what: &str) -> GeometryResult<T> {
        let token = self.next(what)?;
        token.parse().map_err(|_| {
            self.position -= 1;
            self.error(format!("expected {}, found '{}'", what, token))
        })
    }
}

impl FromStr for PolySet {
    type Err = GeometryError;

    fn from_str(text: &str) -> GeometryResult<Self> {
        let mut tokens = Tokens::new(text);
        tokens.keyword("polyset")?;
        let outlines: usize = tokens.number("outline count")?;

        let mut polys: Vec<Polygon> = Vec::new();
        for _ in 0..outlines {
            tokens.keyword("poly")?;
            let contours: usize = tokens.number("contour count")?;
            if contours == 0 {
                return Err(tokens.error("a polygon needs an outline"));
            }
            let mut poly = Polygon::new();
            for _ in 0..contours {
                let count: usize = tokens.number("point count")?;
                let mut points = Vec::new();
                points.try_reserve(count)?;
                for _ in 0..count {
                    let x = tokens.number("x coordinate")?;
                    let y = tokens.number("y coordinate")?;
                    points.push(Point::new(x, y));
                }
                poly.push(LineChain::closed(points));
            }
            polys.push(poly);
        }

        if let Some(extra) = tokens.iter.next() {
            return Err(tokens.error(format!("unexpected trailing '{}'", extra)));
        }
        Ok(PolySet::from_polygons(polys))
    }
}

impl PolySet {
    /// The textual dump of this set.
    pub fn format(&self) -> String {
        self.to_string()
    }

    /// Read a set back from [`PolySet::format`] output.
    pub fn parse(text: &str) -> GeometryResult<PolySet> {
        text.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: &str = "polyset 1\npoly 2\n4\n0 0\n10 0\n10 10\n0 10\n4\n4 4\n4 6\n6 6\n6 4\n";

    #[test]
    fn test_parse_frame() {
        let set = PolySet::parse(FRAME).unwrap();
        assert_eq!(set.outline_count(), 1);
        assert_eq!(set.hole_count(0), 1);
        assert_eq!(set.area(), 96.0);
        assert_eq!(set.format(), FRAME);
    }

    #[test]
    fn test_empty_set() {
        let set = PolySet::new();
        assert_eq!(set.format(), "polyset 0\n");
        assert!(PolySet::parse("polyset 0").unwrap().is_empty());
    }

    #[test]
    fn test_parse_errors_report_token() {
        let err = PolySet::parse("polygon 1").unwrap_err();
        assert!(matches!(err, GeometryError::Parse { position: 0, .. }));

        let err = PolySet::parse("polyset 1 poly 1 3 0 0 1 x").unwrap_err();
        assert!(matches!(err, GeometryError::Parse { position: 8, .. }));

        let err = PolySet::parse("polyset 1 poly 1 2 0 0").unwrap_err();
        assert!(matches!(err, GeometryError::Parse { position: 7, .. }));

        let err = PolySet::parse("polyset 0 junk").unwrap_err();
        assert!(matches!(err, GeometryError::Parse { position: 2, .. }));
    }
}
