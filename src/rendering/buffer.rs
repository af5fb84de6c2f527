//! Pixel buffer holding one frame.
//!
//! A [`PixelBuffer`] is a fixed `width x height` grid of colors stored as a flat vector
//! in row-major order, so linear index `i` is row `i / width`, column `i % width`.
//! Cells that were never written read as opaque black.

use crate::error::{RenderError, Result};
use crate::rendering::color::Color;
use std::fmt;
use std::fmt::{Debug, Formatter};

/// A fixed-size grid of colors, built up between renders.
///
/// # Example
///
/// ```rust
/// use pixterm::rendering::buffer::PixelBuffer;
/// use pixterm::rendering::color::Color;
///
/// let mut buffer = PixelBuffer::new(4, 2).unwrap();
/// buffer.set(5, [0, 255, 0]).unwrap();
///
/// assert_eq!(buffer.geometry(), (4, 2));
/// assert_eq!(buffer.get(5).unwrap(), Color::rgb(0, 255, 0));
/// assert_eq!(buffer.get(0).unwrap(), Color::BLACK);
/// assert!(buffer.get(8).is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    /// `None` means the cell was never written since the last reset.
    cells: Vec<Option<Color>>,
}

impl Debug for PixelBuffer {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "PixelBuffer {{ width: {}, height: {}, set: {} }}",
            self.width,
            self.height,
            self.cells.iter().filter(|c| c.is_some()).count()
        )
    }
}

impl PixelBuffer {
    /// Creates a buffer with every cell unset.
    ///
    /// Fails with [`RenderError::InvalidGeometry`] if either dimension is zero, or if the
    /// cells cannot be allocated.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let len = width
            .checked_mul(height)
            .filter(|&len| width > 0 && height > 0 && len > 0)
            .ok_or(RenderError::InvalidGeometry { width, height })?;
        // a cell count can fit in usize while its bytes do not fit in memory
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| RenderError::InvalidGeometry { width, height })?;
        cells.resize(len, None);
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Returns a fresh buffer with the same geometry and every cell unset.
    pub(crate) fn blank_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cells: vec![None; self.cells.len()],
        }
    }

    /// Returns `(width, height)`.
    pub fn geometry(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Gets the width of the buffer (number of columns).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Gets the height of the buffer (number of rows).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells, `width * height`.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false, a buffer has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the color at a linear index, or black if it was never set.
    pub fn get(&self, position: usize) -> Result<Color> {
        self.cells
            .get(position)
            .map(|cell| cell.unwrap_or(Color::BLACK))
            .ok_or(RenderError::IndexOutOfRange {
                position,
                len: self.cells.len(),
            })
    }

    /// Stores a color at a linear index in canonical form.
    pub fn set(&mut self, position: usize, color: impl Into<Color>) -> Result<()> {
        let len = self.cells.len();
        let cell = self
            .cells
            .get_mut(position)
            .ok_or(RenderError::IndexOutOfRange { position, len })?;
        *cell = Some(color.into().canonical());
        Ok(())
    }

    /// Returns whether the cell at `position` was written since the last reset.
    pub fn is_set(&self, position: usize) -> Result<bool> {
        self.cells
            .get(position)
            .map(Option::is_some)
            .ok_or(RenderError::IndexOutOfRange {
                position,
                len: self.cells.len(),
            })
    }

    /// Gets the color at column `x` of row `y`.
    pub fn get_xy(&self, x: usize, y: usize) -> Result<Color> {
        self.get(self.index_of(x, y)?)
    }

    /// Sets the color at column `x` of row `y`.
    pub fn set_xy(&mut self, x: usize, y: usize, color: impl Into<Color>) -> Result<()> {
        let position = self.index_of(x, y)?;
        self.set(position, color)
    }

    /// Resets every cell to unset.
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = None;
        }
    }

    /// Sets every cell to `color`.
    pub fn fill(&mut self, color: impl Into<Color>) {
        let color = color.into().canonical();
        for cell in self.cells.iter_mut() {
            *cell = Some(color);
        }
    }

    /// Returns an iterator over `(x, y, color)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Color)> + '_ {
        self.cells.iter().enumerate().map(|(idx, cell)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, cell.unwrap_or(Color::BLACK))
        })
    }

    /// Returns one iterator of colors per row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = Color> + '_> + '_ {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|cell| cell.unwrap_or(Color::BLACK)))
    }

    /// Linear index of `(x, y)`. `x` must be inside the row, otherwise it would wrap into the next one.
    fn index_of(&self, x: usize, y: usize) -> Result<usize> {
        let position = y
            .checked_mul(self.width)
            .and_then(|row_start| row_start.checked_add(x))
            .unwrap_or(usize::MAX);
        if x >= self.width || position >= self.cells.len() {
            return Err(RenderError::IndexOutOfRange {
                position,
                len: self.cells.len(),
            });
        }
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_geometry_is_rejected() {
        for (w, h) in [(0, 1), (1, 0), (0, 0)] {
            assert!(matches!(
                PixelBuffer::new(w, h),
                Err(RenderError::InvalidGeometry { width, height }) if width == w && height == h
            ));
        }
        assert!(matches!(
            PixelBuffer::new(usize::MAX, 2),
            Err(RenderError::InvalidGeometry { .. })
        ));
        // the cell count fits in usize, the allocation does not
        assert!(matches!(
            PixelBuffer::new(1 << 61, 1),
            Err(RenderError::InvalidGeometry { width, height: 1 }) if width == 1 << 61
        ));
    }

    #[test]
    fn test_geometry_is_constant() {
        let mut buffer = PixelBuffer::new(7, 3).unwrap();
        assert_eq!(buffer.geometry(), (7, 3));
        assert_eq!(buffer.len(), 21);
        buffer.fill([9, 9, 9]);
        buffer.set(20, Color::WHITE).unwrap();
        buffer.clear();
        assert_eq!(buffer.geometry(), (7, 3));
    }

    #[test]
    fn test_unset_cells_read_black() {
        let buffer = PixelBuffer::new(3, 3).unwrap();
        for position in 0..9 {
            assert_eq!(buffer.get(position).unwrap(), Color::BLACK);
            assert!(!buffer.is_set(position).unwrap());
        }
    }

    #[test]
    fn test_set_stores_canonical_form() {
        let mut buffer = PixelBuffer::new(2, 2).unwrap();
        let raw = Color::rgba16(0x12ff, 0x3401, 0x56aa, 0xffff);
        buffer.set(3, raw).unwrap();
        let first = buffer.get(3).unwrap();
        assert_eq!(first, raw.canonical());
        assert_eq!(buffer.get(3).unwrap(), first);
        assert_eq!(first.to_rgb8(), [0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_out_of_range() {
        let mut buffer = PixelBuffer::new(2, 3).unwrap();
        assert!(matches!(
            buffer.get(6),
            Err(RenderError::IndexOutOfRange { position: 6, len: 6 })
        ));
        assert!(matches!(
            buffer.set(usize::MAX, Color::WHITE),
            Err(RenderError::IndexOutOfRange { .. })
        ));
        assert!(buffer.get_xy(2, 0).is_err());
        assert!(buffer.set_xy(0, 3, Color::WHITE).is_err());
    }

    #[test]
    fn test_xy_addressing_is_row_major() {
        let mut buffer = PixelBuffer::new(4, 3).unwrap();
        buffer.set_xy(1, 2, [10, 20, 30]).unwrap();
        assert_eq!(buffer.get(2 * 4 + 1).unwrap(), Color::rgb(10, 20, 30));

        let found: Vec<_> = buffer
            .iter()
            .filter(|&(_, _, c)| c != Color::BLACK)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(found, vec![(1, 2)]);

        let rows: Vec<Vec<Color>> = buffer.rows().map(|row| row.collect()).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == 4));
        assert_eq!(rows[2][1], Color::rgb(10, 20, 30));
    }

    #[test]
    fn test_blank_like_keeps_geometry() {
        let mut buffer = PixelBuffer::new(5, 2).unwrap();
        buffer.fill(Color::WHITE);
        let blank = buffer.blank_like();
        assert_eq!(blank.geometry(), (5, 2));
        assert!(blank.iter().all(|(_, _, c)| c == Color::BLACK));
    }
}
