//! Geometry engine configuration
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Arc approximation (chord error)
//! - Offset defaults (corner strategy, mitre limit, post-simplify)
//! - Triangulation tuning (partitioning, simplification retries)
//! - Query defaults (bounding-box caches, containment accuracy)

use crate::error::{SettingsError, SettingsResult};
use polykit_core::constants::{
    DEFAULT_MITRE_LIMIT, DEFAULT_SIMPLIFY_PASSES, DEFAULT_SIMPLIFY_STEP,
};
use polykit_core::units::mm_to_iu;
use polykit_core::CornerStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Arc approximation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcSettings {
    /// Maximum chord error when expanding arcs and round corners (mm)
    pub max_error_mm: f64,
}

impl Default for ArcSettings {
    fn default() -> Self {
        Self {
            max_error_mm: 0.005,
        }
    }
}

/// Offset defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetSettings {
    /// Corner join policy
    #[serde(default)]
    pub corner_strategy: CornerStrategy,
    /// Mitre limit as a multiple of the offset distance
    pub mitre_limit: f64,
    /// Run a self-union after offsetting
    #[serde(default = "default_true")]
    pub simplify_result: bool,
}

impl Default for OffsetSettings {
    fn default() -> Self {
        Self {
            corner_strategy: CornerStrategy::default(),
            mitre_limit: DEFAULT_MITRE_LIMIT,
            simplify_result: true,
        }
    }
}

/// Triangulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangulationSettings {
    /// Split polygons into grid cells before tessellating
    #[serde(default = "default_true")]
    pub partition: bool,
    /// Grid cell extent (mm)
    pub partition_extent_mm: f64,
    /// Simplification retries before an outline is left untriangulated
    pub max_simplify_passes: u32,
    /// Vertex-merge tolerance added on each retry (internal units)
    pub simplify_step_iu: i32,
}

impl Default for TriangulationSettings {
    fn default() -> Self {
        Self {
            partition: true,
            partition_extent_mm: 10.0,
            max_simplify_passes: DEFAULT_SIMPLIFY_PASSES,
            simplify_step_iu: DEFAULT_SIMPLIFY_STEP,
        }
    }
}

/// Query defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySettings {
    /// Use per-contour bounding boxes to reject points early
    #[serde(default = "default_true")]
    pub use_bbox_caches: bool,
    /// Containment accuracy (internal units); points this close to an edge count as inside
    #[serde(default)]
    pub default_accuracy_iu: i32,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            use_bbox_caches: true,
            default_accuracy_iu: 0,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Complete engine configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GeometryConfig {
    #[serde(default)]
    pub arc: ArcSettings,
    #[serde(default)]
    pub offset: OffsetSettings,
    #[serde(default)]
    pub triangulation: TriangulationSettings,
    #[serde(default)]
    pub queries: QuerySettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl GeometryConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the config file in the platform config directory
    pub fn default_config_path() -> SettingsResult<PathBuf> {
        let mut path = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no platform config directory".to_string())
        })?;
        path.push("polykit");
        path.push("geometry.toml");
        Ok(path)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if !(self.arc.max_error_mm > 0.0) {
            return Err(SettingsError::invalid("arc.max_error_mm", "must be > 0"));
        }
        if self.max_error_iu() < 1 {
            return Err(SettingsError::invalid(
                "arc.max_error_mm",
                "must be at least one internal unit",
            ));
        }

        if !(self.offset.mitre_limit >= 1.0) {
            return Err(SettingsError::invalid("offset.mitre_limit", "must be >= 1"));
        }

        if !(self.triangulation.partition_extent_mm > 0.0) {
            return Err(SettingsError::invalid(
                "triangulation.partition_extent_mm",
                "must be > 0",
            ));
        }
        if self.triangulation.simplify_step_iu <= 0 {
            return Err(SettingsError::invalid(
                "triangulation.simplify_step_iu",
                "must be > 0",
            ));
        }

        if self.queries.default_accuracy_iu < 0 {
            return Err(SettingsError::invalid(
                "queries.default_accuracy_iu",
                "must be >= 0",
            ));
        }

        Ok(())
    }

    /// Merge another config into this one, taking every section of `other`
    /// that differs from the defaults.
    pub fn merge(&mut self, other: &GeometryConfig) {
        let defaults = GeometryConfig::default();
        if other.arc != defaults.arc {
            self.arc = other.arc.clone();
        }
        if other.offset != defaults.offset {
            self.offset = other.offset.clone();
        }
        if other.triangulation != defaults.triangulation {
            self.triangulation = other.triangulation.clone();
        }
        if other.queries != defaults.queries {
            self.queries = other.queries.clone();
        }
    }

    /// Chord error in internal units
    pub fn max_error_iu(&self) -> i32 {
        mm_to_iu(self.arc.max_error_mm)
    }

    /// Partition cell extent in internal units
    pub fn partition_extent_iu(&self) -> i32 {
        mm_to_iu(self.triangulation.partition_extent_mm)
    }
}
