//! Segmenter configuration
//!
//! Every field has a default, so a TOML file only needs the values it
//! changes:
//!
//! ```toml
//! margin = 6
//! workers = 4
//!
//! [table]
//! variant = "row-regions"
//!
//! [layout]
//! program = "/opt/layout/run"
//! weights = "/opt/layout/model.onnx"
//! ```

use crate::{PipelineError, PipelineResult};
use catseg_detect::{FallbackOptions, ImageOptions, LayoutModelConfig, TableOptions};
use catseg_grid::{AssignPolicy, DEFAULT_PRODUCT_THRESHOLD, DEFAULT_ROW_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default crop margin around each cell, in pixels
pub const DEFAULT_MARGIN: i32 = 4;

/// Default per-detector deadline, in milliseconds
pub const DEFAULT_DETECTOR_TIMEOUT_MS: u64 = 30_000;

/// Settings for one segmentation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Rule-based table detector
    pub table: TableOptions,
    /// Edge-blob fallback detector
    pub fallback: FallbackOptions,
    /// Photo detector
    pub image: ImageOptions,
    /// Optional layout model; disabled unless `program` is set
    pub layout: LayoutModelConfig,
    /// Grid builder row tolerance, in pixels
    pub row_threshold: i32,
    /// Product segmenter row-closing gap, in pixels
    pub product_threshold: i32,
    /// Photo sharing between product rows
    pub assign_policy: AssignPolicy,
    /// Crop margin around each cell, in pixels
    pub margin: i32,
    /// Per-detector deadline, in milliseconds
    pub detector_timeout_ms: u64,
    /// Page worker count; `None` uses the available parallelism
    pub workers: Option<usize>,
    /// Crop detected photos next to the cells
    pub crop_photos: bool,
    /// Write a debug overlay per page
    pub overlay: bool,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            table: TableOptions::default(),
            fallback: FallbackOptions::default(),
            image: ImageOptions::default(),
            layout: LayoutModelConfig::default(),
            row_threshold: DEFAULT_ROW_THRESHOLD,
            product_threshold: DEFAULT_PRODUCT_THRESHOLD,
            assign_policy: AssignPolicy::default(),
            margin: DEFAULT_MARGIN,
            detector_timeout_ms: DEFAULT_DETECTOR_TIMEOUT_MS,
            workers: None,
            crop_photos: true,
            overlay: false,
        }
    }
}

impl SegmenterConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read and validate a TOML configuration file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let load_error = |message: String| PipelineError::ConfigLoad {
            path: path.to_path_buf(),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        let config = Self::from_toml_str(&text).map_err(|e| load_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every threshold before a run.
    pub fn validate(&self) -> PipelineResult<()> {
        let invalid = |e: catseg_detect::DetectError| PipelineError::InvalidConfig(e.to_string());
        self.table.validate().map_err(invalid)?;
        self.fallback.validate().map_err(invalid)?;
        self.image.validate().map_err(invalid)?;

        if self.row_threshold < 0 || self.product_threshold < 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "thresholds must be non-negative (row {}, product {})",
                self.row_threshold, self.product_threshold
            )));
        }
        if self.margin < 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "margin must be non-negative, got {}",
                self.margin
            )));
        }
        if self.detector_timeout_ms == 0 {
            return Err(PipelineError::InvalidConfig(
                "detector_timeout_ms must be positive".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(PipelineError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-detector deadline
    pub fn detector_timeout(&self) -> Duration {
        Duration::from_millis(self.detector_timeout_ms)
    }

    /// Effective page worker count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catseg_detect::TableVariant;

    #[test]
    fn test_partial_toml() {
        let config = SegmenterConfig::from_toml_str(
            r#"
            margin = 6
            assign_policy = "exclusive"

            [table]
            variant = "row-regions"
            min_cells = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.margin, 6);
        assert_eq!(config.assign_policy, AssignPolicy::Exclusive);
        assert_eq!(config.table.variant, TableVariant::RowRegions);
        assert_eq!(config.table.min_cells, 4);
        assert_eq!(config.table.block_size, TableOptions::default().block_size);
        assert_eq!(config.row_threshold, DEFAULT_ROW_THRESHOLD);
        assert!(config.layout.program.is_none());
    }

    #[test]
    fn test_validate() {
        assert!(SegmenterConfig::default().validate().is_ok());
        let bad = SegmenterConfig {
            margin: -1,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(PipelineError::InvalidConfig(_))));
        let bad = SegmenterConfig {
            workers: Some(0),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(SegmenterConfig::from_toml_str("assign_policy = \"random\"").is_err());
    }
}
