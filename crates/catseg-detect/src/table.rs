//! Rule-based table detector
//!
//! Dark ink is isolated with an inverted adaptive-mean threshold, then one
//! of two variants turns the ink mask into rectangles:
//!
//! - [`TableVariant::LineGrid`] opens the mask with long horizontal and
//!   vertical lines, ORs the two rule masks back into a grid, and reports
//!   the paper regions the grid encloses
//! - [`TableVariant::RowRegions`] reports large outer ink regions, which
//!   on boxed catalogs are whole product rows
//!
//! Too few qualifying rectangles means "no table": the result is empty,
//! not an error.

use crate::{DetectError, DetectResult, DetectionResult, Detector, PageImage, Strategy};
use catseg_core::{Block, Pix, sort_reading_order};
use catseg_filter::adaptive_threshold_mean;
use catseg_morph::{Sel, open};
use catseg_region::{ConnectivityType, external_bounding_boxes, find_connected_components};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How ink is turned into rectangles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableVariant {
    /// Cells enclosed by horizontal and vertical rules
    #[default]
    LineGrid,
    /// Large outer ink regions (row-like table blocks)
    RowRegions,
}

/// Table detector settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Which variant to run
    pub variant: TableVariant,
    /// Adaptive threshold window (odd)
    pub block_size: u32,
    /// Adaptive threshold offset below the local mean
    pub threshold_c: f64,
    /// Horizontal rule SEL length
    pub horizontal_len: u32,
    /// Vertical rule SEL length
    pub vertical_len: u32,
    /// Cells must be strictly wider than this
    pub min_cell_width: i32,
    /// Cells must be strictly taller than this
    pub min_cell_height: i32,
    /// Row regions must be strictly wider than this
    pub min_region_width: i32,
    /// Row regions must be strictly taller than this
    pub min_region_height: i32,
    /// Fewer rectangles than this yields an empty result
    pub min_cells: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            variant: TableVariant::LineGrid,
            block_size: 15,
            threshold_c: 2.0,
            horizontal_len: 40,
            vertical_len: 40,
            min_cell_width: 40,
            min_cell_height: 25,
            min_region_width: 300,
            min_region_height: 80,
            min_cells: 3,
        }
    }
}

impl TableOptions {
    /// Select the variant
    pub fn with_variant(mut self, variant: TableVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the rule SEL lengths
    pub fn with_rule_lengths(mut self, horizontal: u32, vertical: u32) -> Self {
        self.horizontal_len = horizontal;
        self.vertical_len = vertical;
        self
    }

    /// Set the minimum number of rectangles for a table
    pub fn with_min_cells(mut self, min_cells: usize) -> Self {
        self.min_cells = min_cells;
        self
    }

    /// Check the settings before running.
    pub fn validate(&self) -> DetectResult<()> {
        if self.block_size < 3 || self.block_size % 2 == 0 {
            return Err(DetectError::InvalidOptions(format!(
                "block_size must be odd and >= 3, got {}",
                self.block_size
            )));
        }
        if self.horizontal_len == 0 || self.vertical_len == 0 {
            return Err(DetectError::InvalidOptions(
                "rule lengths must be positive".to_string(),
            ));
        }
        if self.min_cells == 0 {
            return Err(DetectError::InvalidOptions(
                "min_cells must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rule-based table detector (`line-grid`)
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    options: TableOptions,
}

impl TableDetector {
    /// Create a detector with the given options
    pub fn new(options: TableOptions) -> Self {
        Self { options }
    }

    /// Current options
    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Paper regions enclosed by the recovered rules
    fn grid_cells(&self, ink: &Pix) -> DetectResult<Vec<Block>> {
        let o = &self.options;
        let horizontal = open(ink, &Sel::create_horizontal(o.horizontal_len)?)?;
        let vertical = open(ink, &Sel::create_vertical(o.vertical_len)?)?;
        let grid = horizontal.or(&vertical)?;

        let paper = grid.invert()?;
        Ok(find_connected_components(&paper, ConnectivityType::FourWay)?
            .into_iter()
            .filter(|c| !c.touches_border)
            .map(|c| c.bounds)
            .filter(|b| b.w > o.min_cell_width && b.h > o.min_cell_height)
            .collect())
    }

    fn row_regions(&self, ink: &Pix) -> DetectResult<Vec<Block>> {
        let o = &self.options;
        Ok(external_bounding_boxes(ink)?
            .into_iter()
            .filter(|b| b.w > o.min_region_width && b.h > o.min_region_height)
            .collect())
    }
}

impl Detector for TableDetector {
    fn name(&self) -> &'static str {
        "table"
    }

    fn strategy(&self) -> Strategy {
        Strategy::LineGrid
    }

    fn detect(&self, page: &PageImage) -> DetectResult<DetectionResult> {
        let o = &self.options;
        o.validate()?;

        let gray = page.gray()?;
        let ink = adaptive_threshold_mean(&gray, o.block_size, o.threshold_c)?;
        let mut blocks = match o.variant {
            TableVariant::LineGrid => self.grid_cells(&ink)?,
            TableVariant::RowRegions => self.row_regions(&ink)?,
        };

        if blocks.len() < o.min_cells {
            debug!(
                page = page.name(),
                found = blocks.len(),
                required = o.min_cells,
                "table detector: not enough cells"
            );
            return Ok(DetectionResult::empty(Strategy::LineGrid));
        }

        sort_reading_order(&mut blocks);
        debug!(page = page.name(), cells = blocks.len(), variant = ?o.variant, "table detector");
        Ok(DetectionResult::new(Strategy::LineGrid, blocks))
    }
}
