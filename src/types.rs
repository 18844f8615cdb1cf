use polykit_core::{GeometryResult, LengthUnit};
use polykit_geometry::{PolySet, TriangulationParams};
use serde::Serialize;
use std::fmt;

/// What the debug binary reports about a loaded polygon set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SetSummary {
    pub outlines: usize,
    pub holes: usize,
    pub vertices: usize,
    pub arcs: usize,
    pub area: f64,
    /// Unit of `width` and `height`
    pub unit: LengthUnit,
    pub width: f64,
    pub height: f64,
    pub self_intersecting: bool,
    /// Vertex count after fracturing
    pub fractured_vertices: usize,
    /// Outline and hole counts after fracture then unfracture
    pub unfractured_outlines: usize,
    pub unfractured_holes: usize,
    pub unfractured_area: f64,
    pub triangles: usize,
}

impl SetSummary {
    pub fn of(
        set: &PolySet,
        params: &TriangulationParams,
        unit: LengthUnit,
    ) -> GeometryResult<Self> {
        let holes = (0..set.outline_count()).map(|i| set.hole_count(i)).sum();
        let bbox = set.bbox();

        let mut fractured = set.clone();
        fractured.fracture()?;
        let fractured_vertices = fractured.full_point_count();
        let mut restored = fractured;
        restored.unfracture()?;

        let triangles = set
            .triangulate_with(params)?
            .iter()
            .map(|t| t.triangle_count())
            .sum();

        Ok(Self {
            outlines: set.outline_count(),
            holes,
            vertices: set.full_point_count(),
            arcs: set.arc_count(),
            area: set.area(),
            unit,
            width: unit.from_iu(bbox.width()),
            height: unit.from_iu(bbox.height()),
            self_intersecting: set.is_any_self_intersecting(),
            fractured_vertices,
            unfractured_outlines: restored.outline_count(),
            unfractured_holes: (0..restored.outline_count())
                .map(|i| restored.hole_count(i))
                .sum(),
            unfractured_area: restored.area(),
            triangles,
        })
    }
}

impl fmt::Display for SetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "outlines:           {}", self.outlines)?;
        writeln!(f, "holes:              {}", self.holes)?;
        writeln!(f, "vertices:           {}", self.vertices)?;
        writeln!(f, "arcs:               {}", self.arcs)?;
        writeln!(f, "area:               {:.1}", self.area)?;
        writeln!(
            f,
            "extents:            {} x {} {}",
            self.width, self.height, self.unit
        )?;
        writeln!(f, "self-intersecting:  {}", self.self_intersecting)?;
        writeln!(f, "fractured vertices: {}", self.fractured_vertices)?;
        writeln!(
            f,
            "unfractured:        {} outlines, {} holes, area {:.1}",
            self.unfractured_outlines, self.unfractured_holes, self.unfractured_area
        )?;
        write!(f, "triangles:          {}", self.triangles)
    }
}
