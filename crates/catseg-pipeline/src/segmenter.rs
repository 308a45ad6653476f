//! Single-page orchestration
//!
//! A page moves through `Detecting -> Selecting -> Gridding -> Extracting
//! -> Persisted`. Detectors run concurrently, one thread each, and share
//! the decoded page by `Arc`. The page waits for them until a common
//! deadline; a detector that errors or misses the deadline counts as
//! having found nothing. Each detector also gets the deadline and stops at
//! its next checkpoint once it has passed; whatever it was doing at that
//! moment finishes in the background and its result is dropped.
//!
//! Anything that fails after detection aborts this page only.

use crate::config::SegmenterConfig;
use crate::extract::{CellExtractor, CropFailure, Extraction};
use crate::overlay::render_overlay;
use crate::record::SegmentationRecord;
use crate::{PipelineError, PipelineResult};
use catseg_core::{Block, GridCell};
use catseg_detect::{
    DetectResult, DetectionResult, Detector, FallbackDetector, ImageDetector, LayoutDetector,
    LayoutUnavailable, PageImage, Strategy, TableDetector, select,
};
use catseg_grid::{AssignPolicy, GridBuilder, ProductRow, ProductSegmenter, assign_images};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Subdirectory of the output directory that holds crops
pub const CELLS_DIR: &str = "cells";

/// Processing stage of one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Detectors running
    Detecting,
    /// Choosing one strategy
    Selecting,
    /// Building rows, columns, and product rows
    Gridding,
    /// Writing crops
    Extracting,
    /// Record written
    Persisted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Detecting => "detecting",
            Stage::Selecting => "selecting",
            Stage::Gridding => "gridding",
            Stage::Extracting => "extracting",
            Stage::Persisted => "persisted",
        };
        f.write_str(name)
    }
}

fn enter(page: &str, stage: Stage) {
    debug!(page, %stage, "page stage");
}

/// In-memory segmentation of one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageSegmentation {
    /// Page base name
    pub page: String,
    /// Winning strategy
    pub mode: Strategy,
    /// Selected detector output
    pub raw_cells: Vec<Block>,
    /// Grid built from `raw_cells`
    pub cells: Vec<GridCell>,
    /// Photo regions
    pub photos: Vec<Block>,
    /// Product rows
    pub products: Vec<ProductRow>,
    /// Photo index per product row
    pub assignments: Vec<Option<usize>>,
}

/// Summary of one persisted page
#[derive(Debug, Clone, PartialEq)]
pub struct PageOutcome {
    /// Page base name
    pub page: String,
    /// Winning strategy
    pub mode: Strategy,
    /// Number of grid cells
    pub cells: usize,
    /// Number of photo regions
    pub photos: usize,
    /// Crops that could not be written
    pub crop_failures: Vec<CropFailure>,
    /// Written JSON record
    pub record: PathBuf,
}

/// Result channel of one detector thread
struct Pending<T> {
    what: &'static str,
    rx: Option<mpsc::Receiver<DetectResult<T>>>,
}

fn spawn_bounded<T, F>(what: &'static str, page: &str, job: F) -> Pending<T>
where
    T: Send + 'static,
    F: FnOnce() -> DetectResult<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name(format!("catseg-{}", what))
        .spawn(move || {
            // receiver may be gone after a timeout
            let _ = tx.send(job());
        });
    match spawned {
        Ok(_) => Pending { what, rx: Some(rx) },
        Err(e) => {
            warn!(page, detector = what, error = %e, "cannot start detector thread");
            Pending { what, rx: None }
        }
    }
}

impl<T> Pending<T> {
    /// Wait until `deadline`; anything but a result is `None`.
    fn wait(self, deadline: Instant, page: &str) -> Option<T> {
        let rx = self.rx?;
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                warn!(page, detector = self.what, error = %e, "detector failed, using empty result");
                None
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(page, detector = self.what, "detector timed out, using empty result");
                None
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!(page, detector = self.what, "detector thread died, using empty result");
                None
            }
        }
    }
}

/// Runs every stage for one page
#[derive(Debug, Clone)]
pub struct PageSegmenter {
    table: Arc<TableDetector>,
    fallback: Arc<FallbackDetector>,
    layout: Option<Arc<LayoutDetector>>,
    photos: Arc<ImageDetector>,
    grid: GridBuilder,
    products: ProductSegmenter,
    assign_policy: AssignPolicy,
    min_table_cells: usize,
    margin: i32,
    timeout: Duration,
    crop_photos: bool,
    overlay: bool,
}

impl PageSegmenter {
    /// Build every component from `config`.
    ///
    /// The layout model is loaded here, once. When it is not configured or
    /// cannot be loaded, the layout strategy is disabled for the run.
    pub fn new(config: &SegmenterConfig) -> PipelineResult<Self> {
        config.validate()?;
        let layout = match LayoutDetector::load(&config.layout) {
            Ok(detector) => {
                info!(model = detector.model_name(), "layout model enabled");
                Some(Arc::new(detector))
            }
            Err(LayoutUnavailable::NotConfigured) => {
                debug!("no layout model configured");
                None
            }
            Err(e) => {
                warn!(error = %e, "layout model unavailable, strategy disabled");
                None
            }
        };

        Ok(Self {
            table: Arc::new(TableDetector::new(config.table)),
            fallback: Arc::new(FallbackDetector::new(config.fallback)),
            layout,
            photos: Arc::new(ImageDetector::new(config.image)),
            grid: GridBuilder::new(config.row_threshold),
            products: ProductSegmenter::new(config.product_threshold),
            assign_policy: config.assign_policy,
            min_table_cells: config.table.min_cells,
            margin: config.margin,
            timeout: config.detector_timeout(),
            crop_photos: config.crop_photos,
            overlay: config.overlay,
        })
    }

    /// Replace the layout strategy with an already built detector.
    pub fn with_layout_detector(mut self, detector: LayoutDetector) -> Self {
        self.layout = Some(Arc::new(detector));
        self
    }

    /// Whether the layout strategy takes part in selection
    pub fn layout_enabled(&self) -> bool {
        self.layout.is_some()
    }

    /// Per-detector deadline
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Detect, select, and grid one page without touching the disk.
    pub fn segment(&self, page: &PageImage) -> PageSegmentation {
        let name = page.name().to_string();
        enter(&name, Stage::Detecting);
        let shared = Arc::new(page.clone());
        let deadline = Instant::now() + self.timeout;

        let table = spawn_detector(self.table.clone(), &shared, deadline);
        let layout = self
            .layout
            .as_ref()
            .map(|d| spawn_detector(d.clone(), &shared, deadline));
        let fallback = spawn_detector(self.fallback.clone(), &shared, deadline);
        let photos = {
            let detector = self.photos.clone();
            let page = shared.clone();
            spawn_bounded("image", &name, move || detector.detect(&page))
        };

        let table = table
            .wait(deadline, &name)
            .unwrap_or_else(|| DetectionResult::empty(Strategy::LineGrid));
        let layout = layout.map(|p| {
            p.wait(deadline, &name)
                .unwrap_or_else(|| DetectionResult::empty(Strategy::LayoutModel))
        });
        let fallback = fallback
            .wait(deadline, &name)
            .unwrap_or_else(|| DetectionResult::empty(Strategy::Fallback));
        let photos = photos.wait(deadline, &name).unwrap_or_default();

        enter(&name, Stage::Selecting);
        let selection = select(table, layout, fallback, self.min_table_cells);

        enter(&name, Stage::Gridding);
        let cells = self.grid.build(&selection.cells);
        let products = self.product_rows(selection.mode, &selection.cells, &photos);
        let assignments = assign_images(&products, &photos, self.assign_policy);

        PageSegmentation {
            page: name,
            mode: selection.mode,
            raw_cells: selection.cells,
            cells,
            photos,
            products,
            assignments,
        }
    }

    /// Segment the page at `path` and persist crops and record under
    /// `out_dir`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::ImageLoad`] when the page cannot be decoded; any
    /// error writing the record. Individual crop failures are reported in
    /// [`PageOutcome::crop_failures`] instead.
    pub fn process_file(&self, path: &Path, out_dir: &Path) -> PipelineResult<PageOutcome> {
        let started = Instant::now();
        let page = PageImage::open(path).map_err(|source| PipelineError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let seg = self.segment(&page);

        enter(&seg.page, Stage::Extracting);
        let extractor = CellExtractor::new(out_dir.join(CELLS_DIR), self.margin);
        let cell_crops = extractor.extract_cells(&page, &seg.cells)?;
        let photo_crops = if self.crop_photos {
            extractor.extract_photos(&page, &seg.photos)?
        } else {
            Extraction::default()
        };
        if self.overlay {
            self.write_overlay(&page, &seg, out_dir);
        }

        let record = SegmentationRecord {
            page: seg.page.clone(),
            mode: seg.mode,
            cells: SegmentationRecord::cell_records(&seg.cells, &cell_crops),
            raw_cells: seg.raw_cells.clone(),
            photos: SegmentationRecord::photo_records(&seg.photos, &photo_crops),
            products: SegmentationRecord::product_records(&seg.products, &seg.assignments),
        };
        let record_path = SegmentationRecord::path_for(out_dir, &seg.page);
        record.write(&record_path)?;
        enter(&seg.page, Stage::Persisted);

        let mut crop_failures = cell_crops.failures;
        crop_failures.extend(photo_crops.failures);
        info!(
            page = %seg.page,
            mode = %seg.mode,
            cells = seg.cells.len(),
            photos = seg.photos.len(),
            crop_failures = crop_failures.len(),
            elapsed = ?started.elapsed(),
            "page segmented"
        );

        Ok(PageOutcome {
            page: seg.page,
            mode: seg.mode,
            cells: seg.cells.len(),
            photos: seg.photos.len(),
            crop_failures,
            record: record_path,
        })
    }

    /// Product rows for the chosen strategy.
    ///
    /// Table-like strategies already give rows; the fallback groups its
    /// loose blocks, leaving out the ones that are mostly photo.
    fn product_rows(&self, mode: Strategy, raw: &[Block], photos: &[Block]) -> Vec<ProductRow> {
        match mode {
            Strategy::Fallback => {
                let text: Vec<Block> = raw
                    .iter()
                    .filter(|b| !mostly_photo(b, photos))
                    .copied()
                    .collect();
                self.products.segment(&text)
            }
            Strategy::LineGrid | Strategy::LayoutModel => self
                .grid
                .rows(raw)
                .into_iter()
                .map(ProductRow::new)
                .collect(),
        }
    }

    fn write_overlay(&self, page: &PageImage, seg: &PageSegmentation, out_dir: &Path) {
        let path = out_dir.join(format!("{}_overlay.png", seg.page));
        let written = render_overlay(page.pix(), &seg.cells, &seg.photos, &seg.products)
            .and_then(|pix| {
                catseg_io::write_png(&pix, &path).map_err(|source| PipelineError::ImageWrite {
                    path: path.clone(),
                    source,
                })
            });
        if let Err(e) = written {
            warn!(page = %seg.page, error = %e, "overlay not written");
        }
    }
}

fn spawn_detector<D>(
    detector: Arc<D>,
    page: &Arc<PageImage>,
    deadline: Instant,
) -> Pending<DetectionResult>
where
    D: Detector + 'static,
{
    let job_page = Arc::clone(page);
    spawn_bounded(detector.name(), page.name(), move || {
        detector.detect_until(&job_page, deadline)
    })
}

/// At least half of `block` lies inside one photo.
fn mostly_photo(block: &Block, photos: &[Block]) -> bool {
    photos.iter().any(|p| {
        block
            .intersect(p)
            .is_some_and(|i| i.area() * 2 >= block.area())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mostly_photo() {
        let photo = Block::new_unchecked(0, 0, 100, 100);
        assert!(mostly_photo(&Block::new_unchecked(10, 10, 50, 50), &[photo]));
        assert!(!mostly_photo(&Block::new_unchecked(80, 0, 100, 50), &[photo]));
        assert!(!mostly_photo(&photo, &[]));
    }

    #[test]
    fn test_pending_timeout_is_none() {
        let pending: Pending<u32> = spawn_bounded("slow", "p", || {
            thread::sleep(Duration::from_millis(500));
            Ok(1)
        });
        let deadline = Instant::now() + Duration::from_millis(20);
        assert_eq!(pending.wait(deadline, "p"), None);

        let quick: Pending<u32> = spawn_bounded("quick", "p", || Ok(7));
        let deadline = Instant::now() + Duration::from_secs(5);
        assert_eq!(quick.wait(deadline, "p"), Some(7));
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Gridding.to_string(), "gridding");
    }
}
