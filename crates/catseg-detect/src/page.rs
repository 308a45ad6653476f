use crate::DetectResult;
use catseg_core::{Pix, PixelDepth};
use std::path::{Path, PathBuf};

/// A decoded page, shared read-only by every detector
#[derive(Debug, Clone)]
pub struct PageImage {
    pix: Pix,
    name: String,
    path: Option<PathBuf>,
}

impl PageImage {
    /// Decode the page at `path`
    ///
    /// The page name is the file stem (`catalog_p01.jpg` -> `catalog_p01`).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, catseg_io::IoError> {
        let path = path.as_ref();
        let pix = catseg_io::read_image(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            pix,
            name,
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an in-memory raster
    pub fn from_pix(pix: Pix, name: impl Into<String>) -> Self {
        Self {
            pix,
            name: name.into(),
            path: None,
        }
    }

    /// The decoded raster
    pub fn pix(&self) -> &Pix {
        &self.pix
    }

    /// Base name used for every artifact of this page
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source file, if the page was read from disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Page width in pixels
    pub fn width(&self) -> u32 {
        self.pix.width()
    }

    /// Page height in pixels
    pub fn height(&self) -> u32 {
        self.pix.height()
    }

    /// 8-bpp view of the page
    pub fn gray(&self) -> DetectResult<Pix> {
        match self.pix.depth() {
            PixelDepth::Bit8 => Ok(self.pix.clone()),
            _ => Ok(self.pix.convert_to_8()?),
        }
    }
}
