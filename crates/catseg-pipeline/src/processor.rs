//! Batch processing of a page directory
//!
//! Pages are independent, so they are spread over a bounded worker pool.
//! A page that fails is logged and counted; the batch carries on. Only a
//! missing input directory, a bad configuration, an output directory that
//! cannot be created, or a pool that cannot start stop the run.
//!
//! Outputs are keyed by page name (the file stem), so two inputs with the
//! same stem cannot both be processed. The first one in file-name order
//! keeps the name; the others are skipped.

use crate::config::SegmenterConfig;
use crate::extract::CropFailure;
use crate::segmenter::{PageOutcome, PageSegmenter};
use crate::{PipelineError, PipelineResult};
use catseg_io::is_page_image_path;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// A page that was skipped
#[derive(Debug, Clone, PartialEq)]
pub struct PageFailure {
    /// Input file
    pub path: PathBuf,
    /// Error message
    pub reason: String,
}

/// Counts and details of one batch run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Pages whose record was written
    pub processed: usize,
    /// Pages abandoned because of an error
    pub skipped: usize,
    /// Processed pages on which no cell was found
    pub zero_cells: usize,
    /// Per-page outcomes, in file-name order
    pub pages: Vec<PageOutcome>,
    /// Skipped pages, in file-name order
    pub failures: Vec<PageFailure>,
}

impl BatchReport {
    /// Pages seen
    pub fn total(&self) -> usize {
        self.processed + self.skipped
    }

    /// Every crop that failed across the batch
    pub fn crop_failures(&self) -> impl Iterator<Item = &CropFailure> {
        self.pages.iter().flat_map(|p| p.crop_failures.iter())
    }

    fn add(&mut self, path: &Path, result: PipelineResult<PageOutcome>) {
        match result {
            Ok(outcome) => {
                self.processed += 1;
                if outcome.cells == 0 {
                    self.zero_cells += 1;
                }
                self.pages.push(outcome);
            }
            Err(e) => {
                warn!(page = %path.display(), error = %e, "page skipped");
                self.skipped += 1;
                self.failures.push(PageFailure {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages: {} processed ({} with zero cells), {} skipped, {} crop failures",
            self.total(),
            self.processed,
            self.zero_cells,
            self.skipped,
            self.crop_failures().count()
        )
    }
}

/// Page image files in `dir`, sorted by file name.
///
/// # Errors
///
/// [`PipelineError::InputDirNotFound`] when `dir` is not a directory.
pub fn list_pages(dir: &Path) -> PipelineResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PipelineError::InputDirNotFound(dir.to_path_buf()));
    }
    let mut pages = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_page_image_path(&path) {
            pages.push(path);
        }
    }
    pages.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(pages)
}

/// Split `pages` into those that own their page name and those whose name
/// was already taken by an earlier page.
pub fn claim_page_names(
    pages: Vec<PathBuf>,
) -> (Vec<PathBuf>, Vec<(PathBuf, PipelineError)>) {
    let mut owners: HashMap<String, PathBuf> = HashMap::new();
    let mut unique = Vec::with_capacity(pages.len());
    let mut duplicates = Vec::new();
    for path in pages {
        let page = page_name(&path);
        match owners.get(&page) {
            Some(first) => {
                let err = PipelineError::DuplicatePage {
                    page,
                    path: path.clone(),
                    first: first.clone(),
                };
                duplicates.push((path, err));
            }
            None => {
                owners.insert(page, path.clone());
                unique.push(path);
            }
        }
    }
    (unique, duplicates)
}

fn page_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Runs the page segmenter over a directory
#[derive(Debug, Clone)]
pub struct PageProcessor {
    segmenter: PageSegmenter,
    workers: usize,
}

impl PageProcessor {
    /// Validate `config` and build the segmenter.
    pub fn new(config: &SegmenterConfig) -> PipelineResult<Self> {
        Ok(Self::with_segmenter(
            PageSegmenter::new(config)?,
            config.worker_count(),
        ))
    }

    /// Use an already built segmenter.
    pub fn with_segmenter(segmenter: PageSegmenter, workers: usize) -> Self {
        Self {
            segmenter,
            workers: workers.max(1),
        }
    }

    /// The per-page segmenter
    pub fn segmenter(&self) -> &PageSegmenter {
        &self.segmenter
    }

    /// Worker count
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Segment every page image in `input`, writing into `output`.
    pub fn process_dir(&self, input: &Path, output: &Path) -> PipelineResult<BatchReport> {
        let started = Instant::now();
        let (pages, duplicates) = claim_page_names(list_pages(input)?);
        std::fs::create_dir_all(output).map_err(|source| PipelineError::OutputDir {
            path: output.to_path_buf(),
            source,
        })?;
        info!(
            input = %input.display(),
            pages = pages.len(),
            duplicates = duplicates.len(),
            workers = self.workers,
            "batch started"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("catseg-page-{}", i))
            .build()?;
        let results: Vec<_> = pool.install(|| {
            pages
                .par_iter()
                .map(|path| self.segmenter.process_file(path, output))
                .collect()
        });

        let mut report = BatchReport::default();
        for (path, result) in pages.iter().zip(results) {
            report.add(path, result);
        }
        for (path, err) in duplicates {
            report.add(&path, Err(err));
        }
        report
            .failures
            .sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        info!(
            processed = report.processed,
            skipped = report.skipped,
            zero_cells = report.zero_cells,
            elapsed = ?started.elapsed(),
            "batch finished"
        );
        Ok(report)
    }
}
