//! Pluggable layout-model detector
//!
//! A pretrained document-layout model proposes semantic regions (table,
//! text, title, figure). Each table region is then decomposed by the same
//! model into row and column boxes, and the table's cells are the
//! row x column intersections.
//!
//! The model is optional. [`LayoutDetector::load`] fails once with
//! [`LayoutUnavailable`] when nothing usable is configured, and the caller
//! keeps an `Option<LayoutDetector>`.

mod command;

pub use command::CommandLayoutModel;

use crate::{DetectError, DetectResult, DetectionResult, Detector, PageImage, Strategy};
use catseg_core::{Block, BlockKind, sort_reading_order};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

/// Label used for row boxes in structure output
pub const ROW_LABEL: &str = "row";
/// Label used for column boxes in structure output
pub const COLUMN_LABEL: &str = "column";

/// One detection from a layout model
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRegion {
    /// Model label (`table`, `text`, `row`, ...)
    pub label: String,
    /// Region geometry
    pub bbox: Block,
    /// Confidence in `[0, 1]`
    pub score: f32,
}

impl LayoutRegion {
    /// Create a region
    pub fn new(label: impl Into<String>, bbox: Block, score: f32) -> Self {
        Self {
            label: label.into(),
            bbox,
            score,
        }
    }

    /// Semantic kind for the label, if it is one we know
    pub fn kind(&self) -> Option<BlockKind> {
        BlockKind::from_label(&self.label)
    }

    fn is(&self, label: &str) -> bool {
        self.label.eq_ignore_ascii_case(label)
    }
}

/// A document-layout model
pub trait LayoutModel: Send + Sync {
    /// Model name for logs
    fn name(&self) -> &str;

    /// Semantic regions of the whole page, in page coordinates
    fn detect_layout(&self, page: &PageImage) -> DetectResult<Vec<LayoutRegion>>;

    /// Row and column boxes of one table region
    ///
    /// Coordinates are relative to the top-left corner of `table`.
    fn recognize_structure(&self, page: &PageImage, table: &Block)
    -> DetectResult<Vec<LayoutRegion>>;
}

/// Why the layout model could not be loaded
#[derive(Debug, Error)]
pub enum LayoutUnavailable {
    /// No model program configured
    #[error("no layout model configured")]
    NotConfigured,

    /// Model program missing
    #[error("layout model program not found: {}", .0.display())]
    ProgramNotFound(PathBuf),

    /// Model weights missing
    #[error("layout model weights not found: {}", .0.display())]
    WeightsNotFound(PathBuf),
}

/// Layout model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutModelConfig {
    /// Inference program; `None` disables the layout strategy
    pub program: Option<PathBuf>,
    /// Arguments passed before the image path
    pub args: Vec<String>,
    /// Model weights, passed as `--weights <file>` when set
    pub weights: Option<PathBuf>,
    /// Detections below this score are dropped
    pub score_threshold: f32,
    /// Per-invocation deadline for the model process, in milliseconds
    pub timeout_ms: u64,
}

impl Default for LayoutModelConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: Vec::new(),
            weights: None,
            score_threshold: 0.5,
            timeout_ms: 30_000,
        }
    }
}

/// Semantic regions and derived cells of one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutAnalysis {
    /// Kind-tagged regions above the score threshold, sorted by `(y, x)`
    pub regions: Vec<Block>,
    /// Table cells in page coordinates, sorted by `(y, x)`
    pub cells: Vec<Block>,
}

/// Layout-model detector (`layout-model`)
pub struct LayoutDetector {
    model: Box<dyn LayoutModel>,
    score_threshold: f32,
}

impl fmt::Debug for LayoutDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutDetector")
            .field("model", &self.model.name())
            .field("score_threshold", &self.score_threshold)
            .finish()
    }
}

impl LayoutDetector {
    /// Load the command-backed model described by `config`
    pub fn load(config: &LayoutModelConfig) -> Result<Self, LayoutUnavailable> {
        let model = CommandLayoutModel::load(config)?;
        Ok(Self::with_model(model, config.score_threshold))
    }

    /// Wrap an already constructed model
    pub fn with_model(model: impl LayoutModel + 'static, score_threshold: f32) -> Self {
        Self {
            model: Box::new(model),
            score_threshold,
        }
    }

    /// Name of the wrapped model
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Run the model over `page` and derive table cells
    pub fn analyze(&self, page: &PageImage) -> DetectResult<LayoutAnalysis> {
        self.analyze_within(page, None)
    }

    /// Like [`analyze`](Self::analyze), but no model call is started once
    /// `deadline` has passed.
    pub fn analyze_until(
        &self,
        page: &PageImage,
        deadline: Instant,
    ) -> DetectResult<LayoutAnalysis> {
        self.analyze_within(page, Some(deadline))
    }

    fn analyze_within(
        &self,
        page: &PageImage,
        deadline: Option<Instant>,
    ) -> DetectResult<LayoutAnalysis> {
        let started = Instant::now();
        let (pw, ph) = (page.width() as i32, page.height() as i32);
        let mut analysis = LayoutAnalysis::default();

        for region in self.model.detect_layout(page)? {
            if region.score < self.score_threshold {
                continue;
            }
            let Some(kind) = region.kind() else {
                debug!(label = %region.label, "layout: ignoring unknown label");
                continue;
            };
            let Some(bbox) = region.bbox.clip(pw, ph).filter(|b| !b.is_empty()) else {
                continue;
            };
            let bbox = bbox.with_kind(kind);
            analysis.regions.push(bbox);

            if kind == BlockKind::Table {
                check_deadline(deadline, started)?;
                analysis.cells.extend(self.table_cells(page, &bbox));
            }
        }

        sort_reading_order(&mut analysis.regions);
        sort_reading_order(&mut analysis.cells);
        Ok(analysis)
    }

    fn cells_of(&self, page: &PageImage, analysis: LayoutAnalysis) -> DetectionResult {
        debug!(
            page = page.name(),
            model = self.model.name(),
            regions = analysis.regions.len(),
            cells = analysis.cells.len(),
            "layout detector"
        );
        DetectionResult::new(Strategy::LayoutModel, analysis.cells)
    }

    /// Row x column intersections of one table, or the table itself when
    /// no structure is recognized.
    fn table_cells(&self, page: &PageImage, table: &Block) -> Vec<Block> {
        let structure = match self.model.recognize_structure(page, table) {
            Ok(s) => s,
            Err(e) => {
                warn!(page = page.name(), error = %e, "layout: structure recognition failed");
                Vec::new()
            }
        };

        let pick = |label: &str| -> Vec<Block> {
            structure
                .iter()
                .filter(|r| r.is(label) && r.score >= self.score_threshold)
                .map(|r| r.bbox.translate(table.x, table.y))
                .collect()
        };
        let rows = pick(ROW_LABEL);
        let columns = pick(COLUMN_LABEL);

        if rows.is_empty() || columns.is_empty() {
            return vec![*table];
        }

        let mut cells = Vec::with_capacity(rows.len() * columns.len());
        for row in &rows {
            for col in &columns {
                let cell = row.intersect(col).and_then(|c| c.intersect(table));
                if let Some(cell) = cell.filter(|c| !c.is_empty()) {
                    cells.push(cell.with_kind(BlockKind::TableCell));
                }
            }
        }
        cells
    }
}

fn check_deadline(deadline: Option<Instant>, started: Instant) -> DetectResult<()> {
    match deadline {
        Some(d) if Instant::now() >= d => Err(DetectError::Timeout {
            what: "layout structure recognition".to_string(),
            after: started.elapsed(),
        }),
        _ => Ok(()),
    }
}

impl Detector for LayoutDetector {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn strategy(&self) -> Strategy {
        Strategy::LayoutModel
    }

    fn detect(&self, page: &PageImage) -> DetectResult<DetectionResult> {
        let analysis = self.analyze(page)?;
        Ok(self.cells_of(page, analysis))
    }

    fn detect_until(&self, page: &PageImage, deadline: Instant) -> DetectResult<DetectionResult> {
        let analysis = self.analyze_until(page, deadline)?;
        Ok(self.cells_of(page, analysis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catseg_core::{Pix, PixelDepth};

    struct Fixed {
        layout: Vec<LayoutRegion>,
        structure: Vec<LayoutRegion>,
    }

    impl LayoutModel for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn detect_layout(&self, _page: &PageImage) -> DetectResult<Vec<LayoutRegion>> {
            Ok(self.layout.clone())
        }

        fn recognize_structure(
            &self,
            _page: &PageImage,
            _table: &Block,
        ) -> DetectResult<Vec<LayoutRegion>> {
            Ok(self.structure.clone())
        }
    }

    fn page() -> PageImage {
        PageImage::from_pix(Pix::new(400, 400, PixelDepth::Bit8).unwrap(), "p")
    }

    #[test]
    fn test_table_decomposed_into_cells() {
        let model = Fixed {
            layout: vec![
                LayoutRegion::new("table", Block::new_unchecked(100, 100, 200, 100), 0.9),
                LayoutRegion::new("text", Block::new_unchecked(10, 10, 50, 20), 0.8),
                LayoutRegion::new("figure", Block::new_unchecked(10, 300, 50, 50), 0.3),
            ],
            structure: vec![
                LayoutRegion::new("row", Block::new_unchecked(0, 0, 200, 50), 0.9),
                LayoutRegion::new("row", Block::new_unchecked(0, 50, 200, 50), 0.9),
                LayoutRegion::new("column", Block::new_unchecked(0, 0, 120, 100), 0.9),
                LayoutRegion::new("column", Block::new_unchecked(120, 0, 80, 100), 0.9),
            ],
        };
        let detector = LayoutDetector::with_model(model, 0.5);
        let analysis = detector.analyze(&page()).unwrap();

        // low-score figure dropped
        assert_eq!(analysis.regions.len(), 2);
        assert_eq!(analysis.regions[0].kind, Some(BlockKind::Text));

        assert_eq!(analysis.cells.len(), 4);
        assert_eq!(
            analysis.cells[1],
            Block::new_unchecked(220, 100, 80, 50).with_kind(BlockKind::TableCell)
        );
        assert_eq!(analysis.cells[3].y, 150);
    }

    #[test]
    fn test_table_without_structure_is_one_cell() {
        let table = Block::new_unchecked(10, 10, 100, 100);
        let model = Fixed {
            layout: vec![LayoutRegion::new("Table", table, 0.7)],
            structure: Vec::new(),
        };
        let result = LayoutDetector::with_model(model, 0.5)
            .detect(&page())
            .unwrap();
        assert_eq!(result.strategy, Strategy::LayoutModel);
        assert_eq!(result.blocks, vec![table.with_kind(BlockKind::Table)]);
    }

    #[test]
    fn test_no_structure_call_after_deadline() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct Counting(Arc<AtomicUsize>);

        impl LayoutModel for Counting {
            fn name(&self) -> &str {
                "counting"
            }

            fn detect_layout(&self, _page: &PageImage) -> DetectResult<Vec<LayoutRegion>> {
                Ok((0..3)
                    .map(|i| {
                        let bbox = Block::new_unchecked(10, 10 + i * 100, 80, 80);
                        LayoutRegion::new("table", bbox, 0.9)
                    })
                    .collect())
            }

            fn recognize_structure(
                &self,
                _page: &PageImage,
                _table: &Block,
            ) -> DetectResult<Vec<LayoutRegion>> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(Vec::new())
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let detector = LayoutDetector::with_model(Counting(calls.clone()), 0.5);
        let err = detector.detect_until(&page(), Instant::now()).unwrap_err();
        assert!(matches!(err, DetectError::Timeout { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let later = Instant::now() + std::time::Duration::from_secs(60);
        let result = detector.detect_until(&page(), later).unwrap();
        assert_eq!(result.blocks.len(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unconfigured_is_unavailable() {
        let err = LayoutDetector::load(&LayoutModelConfig::default()).unwrap_err();
        assert!(matches!(err, LayoutUnavailable::NotConfigured));
    }
}
