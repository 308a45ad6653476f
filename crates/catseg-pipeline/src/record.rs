//! Per-page segmentation record
//!
//! The JSON written for each page is what downstream extraction reads:
//!
//! ```json
//! {
//!   "page": "catalog_p01",
//!   "mode": "line-grid",
//!   "cells": [{"x": 53, "y": 53, "w": 117, "h": 57, "row": 0, "col": 0,
//!              "file": "out/cells/catalog_p01_row0_col0.png"}],
//!   "raw_cells": [{"x": 53, "y": 53, "w": 117, "h": 57}],
//!   "photos": [],
//!   "products": []
//! }
//! ```
//!
//! A cell whose crop failed keeps `"file": null`.

use crate::extract::{ExtractedCell, ExtractedPhoto, Extraction};
use crate::PipelineResult;
use catseg_core::{Block, GridCell};
use catseg_detect::Strategy;
use catseg_grid::ProductRow;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A grid cell and its crop, if one was written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Cell geometry and indices
    #[serde(flatten)]
    pub cell: GridCell,
    /// Crop file
    pub file: Option<PathBuf>,
}

/// A detected photo and its crop, if one was written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Photo geometry
    #[serde(flatten)]
    pub block: Block,
    /// Crop file
    pub file: Option<PathBuf>,
}

/// A product row and the photo paired with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Member blocks
    pub blocks: Vec<Block>,
    /// Vertical center used for pairing
    pub representative_y: f64,
    /// Index into `photos`
    pub photo: Option<usize>,
}

/// Final artifact for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationRecord {
    /// Page base name
    pub page: String,
    /// Winning strategy
    pub mode: Strategy,
    /// Grid cells in row/column order
    pub cells: Vec<CellRecord>,
    /// Selected detector output before gridding
    pub raw_cells: Vec<Block>,
    /// Photo regions in `(y, x)` order
    #[serde(default)]
    pub photos: Vec<PhotoRecord>,
    /// Product rows with their assigned photo
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

impl SegmentationRecord {
    /// Pair every grid cell with its crop file.
    pub fn cell_records(cells: &[GridCell], crops: &Extraction<ExtractedCell>) -> Vec<CellRecord> {
        cells
            .iter()
            .map(|cell| CellRecord {
                cell: *cell,
                file: crops
                    .written
                    .iter()
                    .find(|c| c.cell == *cell)
                    .map(|c| c.file.clone()),
            })
            .collect()
    }

    /// Pair every photo with its crop file.
    pub fn photo_records(
        photos: &[Block],
        crops: &Extraction<ExtractedPhoto>,
    ) -> Vec<PhotoRecord> {
        photos
            .iter()
            .enumerate()
            .map(|(i, block)| PhotoRecord {
                block: *block,
                file: crops
                    .written
                    .iter()
                    .find(|p| p.index == i)
                    .map(|p| p.file.clone()),
            })
            .collect()
    }

    /// Attach assigned photo indices to product rows.
    pub fn product_records(rows: &[ProductRow], assigned: &[Option<usize>]) -> Vec<ProductRecord> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| ProductRecord {
                blocks: row.blocks.clone(),
                representative_y: row.representative_y,
                photo: assigned.get(i).copied().flatten(),
            })
            .collect()
    }

    /// Output path of the record for `page` under `dir`
    pub fn path_for(dir: &Path, page: &str) -> PathBuf {
        dir.join(format!("{}.json", page))
    }

    /// Write pretty-printed JSON, replacing any earlier record.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> PipelineResult<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Read a record back.
    pub fn read<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
