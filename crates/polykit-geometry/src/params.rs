//! Operation parameters derived from [`GeometryConfig`].

use polykit_core::constants::{
    DEFAULT_MAX_ERROR, DEFAULT_MITRE_LIMIT, DEFAULT_PARTITION_EXTENT, DEFAULT_SIMPLIFY_PASSES,
    DEFAULT_SIMPLIFY_STEP,
};
use polykit_core::CornerStrategy;
use polykit_settings::GeometryConfig;

/// How an offset is carried out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetParams {
    pub corner_strategy: CornerStrategy,
    /// Maximum chord error of round corners, in internal units.
    pub max_error: i32,
    /// Mitres longer than this multiple of the offset are chamfered.
    pub mitre_limit: f64,
    /// Self-union the result.
    pub simplify_result: bool,
}

impl Default for OffsetParams {
    fn default() -> Self {
        Self {
            corner_strategy: CornerStrategy::default(),
            max_error: DEFAULT_MAX_ERROR,
            mitre_limit: DEFAULT_MITRE_LIMIT,
            simplify_result: true,
        }
    }
}

impl OffsetParams {
    pub fn new(corner_strategy: CornerStrategy, max_error: i32) -> Self {
        Self {
            corner_strategy,
            max_error,
            ..Self::default()
        }
    }

    pub fn from_config(config: &GeometryConfig) -> Self {
        Self {
            corner_strategy: config.offset.corner_strategy,
            max_error: config.max_error_iu(),
            mitre_limit: config.offset.mitre_limit,
            simplify_result: config.offset.simplify_result,
        }
    }
}

/// Triangulation tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriangulationParams {
    /// Split large polygons into grid cells first.
    pub partition: bool,
    /// Grid cell extent, in internal units.
    pub partition_extent: i32,
    pub max_simplify_passes: u32,
    /// Vertex-merge tolerance added per retry, in internal units.
    pub simplify_step: i32,
}

impl Default for TriangulationParams {
    fn default() -> Self {
        Self {
            partition: true,
            partition_extent: DEFAULT_PARTITION_EXTENT,
            max_simplify_passes: DEFAULT_SIMPLIFY_PASSES,
            simplify_step: DEFAULT_SIMPLIFY_STEP,
        }
    }
}

impl TriangulationParams {
    pub fn from_config(config: &GeometryConfig) -> Self {
        Self {
            partition: config.triangulation.partition,
            partition_extent: config.partition_extent_iu(),
            max_simplify_passes: config.triangulation.max_simplify_passes,
            simplify_step: config.triangulation.simplify_step_iu,
        }
    }
}

/// Defaults for containment queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryParams {
    pub use_bbox_caches: bool,
    pub accuracy: i32,
}

impl QueryParams {
    pub fn from_config(config: &GeometryConfig) -> Self {
        Self {
            use_bbox_caches: config.queries.use_bbox_caches,
            accuracy: config.queries.default_accuracy_iu,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_from_default_config() {
        let config = GeometryConfig::default();
        assert_eq!(OffsetParams::from_config(&config), OffsetParams::default());
        assert_eq!(
            TriangulationParams::from_config(&config),
            TriangulationParams::default()
        );
        let q = QueryParams::from_config(&config);
        assert!(q.use_bbox_caches);
        assert_eq!(q.accuracy, 0);
    }
}
