//! Raster masks usable as regions.
//!
//! A [`RasterMask`] marks which cells of a regular grid are admissible, for study
//! areas that come from classified rasters rather than vector polygons.
use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{BoundingBox, Region};

/// A boolean grid anchored at its lower-left corner.
///
/// `cells.len() == width * height` always holds, so lookups never go out of bounds.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RasterMaskData")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct RasterMask {
    origin: DVec2,
    cell_size: f64,
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

/// Unchecked wire form of [`RasterMask`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RasterMaskData {
    origin: DVec2,
    cell_size: f64,
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

#[cfg(feature = "serde")]
impl TryFrom<RasterMaskData> for RasterMask {
    type Error = Error;

    fn try_from(data: RasterMaskData) -> Result<Self> {
        RasterMask::from_cells(data.origin, data.cell_size, data.width, data.height, data.cells)
    }
}

impl RasterMask {
    /// Create a mask with every cell set to `fill`.
    pub fn new(origin: DVec2, cell_size: f64, width: usize, height: usize, fill: bool) -> Result<Self> {
        let len = width.checked_mul(height).ok_or_else(|| {
            Error::InvalidGeometry(format!("mask dimensions {width}x{height} overflow"))
        })?;
        Self::from_cells(origin, cell_size, width, height, vec![fill; len])
    }

    /// Create a mask from row-major cells, row 0 being the bottom row.
    pub fn from_cells(
        origin: DVec2,
        cell_size: f64,
        width: usize,
        height: usize,
        cells: Vec<bool>,
    ) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "mask cell_size must be finite and > 0, got {cell_size}"
            )));
        }
        if !origin.is_finite() {
            return Err(Error::InvalidGeometry(format!(
                "mask origin must be finite, got {origin}"
            )));
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            Error::InvalidGeometry(format!("mask dimensions {width}x{height} overflow"))
        })?;
        if cells.len() != expected {
            return Err(Error::InvalidGeometry(format!(
                "mask has {} cells, expected {width}x{height}",
                cells.len()
            )));
        }
        Ok(Self {
            origin,
            cell_size,
            width,
            height,
            cells,
        })
    }

    /// World-space lower-left corner.
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of cells in X.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells in Y.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Converts a world position to cell indices.
    pub fn world_to_index(&self, p: DVec2) -> (isize, isize) {
        let px = (p.x - self.origin.x) / self.cell_size;
        let py = (p.y - self.origin.y) / self.cell_size;
        (px.floor() as isize, py.floor() as isize)
    }

    /// Cell value at the given indices, `false` if out of bounds.
    pub fn get(&self, ix: isize, iy: isize) -> bool {
        if ix < 0 || iy < 0 || ix >= self.width as isize || iy >= self.height as isize {
            return false;
        }
        self.cells[(iy as usize) * self.width + (ix as usize)]
    }

    /// Set a cell; out-of-bounds indices are ignored.
    pub fn set(&mut self, ix: usize, iy: usize, value: bool) {
        if ix < self.width && iy < self.height {
            self.cells[iy * self.width + ix] = value;
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            self.origin,
            self.origin
                + DVec2::new(
                    self.width as f64 * self.cell_size,
                    self.height as f64 * self.cell_size,
                ),
        )
    }

    /// Number of admissible cells.
    pub fn count_set(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }
}

impl Region for RasterMask {
    fn contains(&self, point: DVec2) -> bool {
        // NaN casts to index 0.
        if !point.is_finite() {
            return false;
        }
        let (ix, iy) = self.world_to_index(point);
        self.get(ix, iy)
    }
}
