//! Cell and photo cropping
//!
//! Each crop is the block grown by a margin on every side and clamped to
//! the page. Crops are written as PNG and never deleted by this crate.
//!
//! A failed write is reported for that crop alone; crops already written
//! stay on disk. There are no retries.

use crate::{PipelineError, PipelineResult};
use catseg_core::{Block, GridCell, Pix};
use catseg_detect::PageImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The page region covered by `block` grown by `margin`, clamped to a
/// `width` x `height` page.
///
/// Returns `None` when nothing of the grown block lies on the page.
pub fn crop_region(width: u32, height: u32, block: &Block, margin: i32) -> Option<Block> {
    block
        .expand(margin)
        .clip(width as i32, height as i32)
        .filter(|b| !b.is_empty())
}

/// Crop `block` plus `margin` out of `pix`.
pub fn crop(pix: &Pix, block: &Block, margin: i32) -> PipelineResult<Pix> {
    let region = crop_region(pix.width(), pix.height(), block, margin).ok_or_else(|| {
        catseg_core::Error::InvalidParameter(format!("block {:?} lies outside the page", block))
    })?;
    Ok(pix.clip_block(&region)?)
}

/// File name of a cell crop
pub fn cell_file_name(page: &str, row: usize, col: usize) -> String {
    format!("{}_row{}_col{}.png", page, row, col)
}

/// File name of a photo crop
pub fn photo_file_name(page: &str, index: usize) -> String {
    format!("{}_img{}.png", page, index)
}

/// A grid cell whose crop was written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedCell {
    /// Cell geometry and indices
    #[serde(flatten)]
    pub cell: GridCell,
    /// Written crop
    pub file: PathBuf,
}

/// A photo block whose crop was written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPhoto {
    /// Photo geometry
    #[serde(flatten)]
    pub block: Block,
    /// Position in the page's photo list
    pub index: usize,
    /// Written crop
    pub file: PathBuf,
}

/// One crop that could not be written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropFailure {
    /// Region that was being cropped
    pub block: Block,
    /// Intended output file
    pub file: PathBuf,
    /// What went wrong
    pub reason: String,
}

/// Outcome of cropping a list of regions
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction<T> {
    /// Crops written, in input order
    pub written: Vec<T>,
    /// Crops that failed, in input order
    pub failures: Vec<CropFailure>,
}

impl<T> Default for Extraction<T> {
    fn default() -> Self {
        Self {
            written: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Extraction<T> {
    /// Whether every crop was written
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes cell and photo crops into one directory
#[derive(Debug, Clone)]
pub struct CellExtractor {
    dir: PathBuf,
    margin: i32,
}

impl CellExtractor {
    /// Crop into `dir` with the given margin.
    ///
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>, margin: i32) -> Self {
        Self {
            dir: dir.into(),
            margin: margin.max(0),
        }
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Crop margin in pixels
    pub fn margin(&self) -> i32 {
        self.margin
    }

    /// Decode the page at `path`, then crop `cells` from it.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ImageLoad`] when the page cannot be decoded,
    /// so a load failure is never mistaken for a page with no cells.
    pub fn extract_file(
        &self,
        path: &Path,
        cells: &[GridCell],
    ) -> PipelineResult<Extraction<ExtractedCell>> {
        let page = PageImage::open(path).map_err(|source| PipelineError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        self.extract_cells(&page, cells)
    }

    /// Crop every cell of an already decoded page.
    ///
    /// # Errors
    ///
    /// Only fails when the output directory cannot be created; per-cell
    /// problems land in [`Extraction::failures`].
    pub fn extract_cells(
        &self,
        page: &PageImage,
        cells: &[GridCell],
    ) -> PipelineResult<Extraction<ExtractedCell>> {
        let mut out = Extraction::default();
        if cells.is_empty() {
            return Ok(out);
        }
        self.ensure_dir()?;

        for cell in cells {
            let file = self.dir.join(cell_file_name(page.name(), cell.row, cell.col));
            match self.write_crop(page.pix(), &cell.block, &file) {
                Ok(()) => out.written.push(ExtractedCell { cell: *cell, file }),
                Err(e) => out.failures.push(self.failure(page, cell.block, file, e)),
            }
        }
        debug!(
            page = page.name(),
            written = out.written.len(),
            failed = out.failures.len(),
            "cells cropped"
        );
        Ok(out)
    }

    /// Crop every photo block of an already decoded page.
    pub fn extract_photos(
        &self,
        page: &PageImage,
        photos: &[Block],
    ) -> PipelineResult<Extraction<ExtractedPhoto>> {
        let mut out = Extraction::default();
        if photos.is_empty() {
            return Ok(out);
        }
        self.ensure_dir()?;

        for (index, block) in photos.iter().enumerate() {
            let file = self.dir.join(photo_file_name(page.name(), index));
            match self.write_crop(page.pix(), block, &file) {
                Ok(()) => out.written.push(ExtractedPhoto {
                    block: *block,
                    index,
                    file,
                }),
                Err(e) => out.failures.push(self.failure(page, *block, file, e)),
            }
        }
        Ok(out)
    }

    fn ensure_dir(&self) -> PipelineResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|source| PipelineError::OutputDir {
            path: self.dir.clone(),
            source,
        })
    }

    fn write_crop(&self, pix: &Pix, block: &Block, file: &Path) -> PipelineResult<()> {
        let cropped = crop(pix, block, self.margin)?;
        catseg_io::write_png(&cropped, file).map_err(|source| PipelineError::ImageWrite {
            path: file.to_path_buf(),
            source,
        })
    }

    fn failure(
        &self,
        page: &PageImage,
        block: Block,
        file: PathBuf,
        err: PipelineError,
    ) -> CropFailure {
        warn!(page = page.name(), file = %file.display(), error = %err, "crop failed");
        CropFailure {
            block,
            file,
            reason: err.to_string(),
        }
    }
}
