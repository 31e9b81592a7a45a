use crate::color::Rgb;
use crate::error::CoreError;

/// Image décodée, immuable pour le cœur de conversion.
///
/// Stocke les pixels en RGBA row-major, 4 bytes par pixel.
///
/// # Example
/// ```
/// use ac_core::frame::DecodedImage;
/// let img = DecodedImage::new(10, 10);
/// assert_eq!(img.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl DecodedImage {
    /// Crée une image transparente noire aux dimensions données.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Wrap an existing RGBA buffer.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] when the buffer length does not
    /// match `width × height × 4` or when either side is zero.
    ///
    /// # Example
    /// ```
    /// use ac_core::frame::DecodedImage;
    /// let img = DecodedImage::from_rgba(1, 1, vec![1, 2, 3, 255]).unwrap();
    /// assert_eq!(img.pixel(0, 0), (1, 2, 3, 255));
    /// assert!(DecodedImage::from_rgba(2, 1, vec![0; 4]).is_err());
    /// ```
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        if width == 0 || height == 0 || data.len() != width as usize * height as usize * 4 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Image of a single solid color.
    ///
    /// # Example
    /// ```
    /// use ac_core::color::Rgb;
    /// use ac_core::frame::DecodedImage;
    /// let img = DecodedImage::filled(2, 2, Rgb::gray(128));
    /// assert_eq!(img.rgb(1, 1), Rgb(128, 128, 128));
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let mut img = Self::new(width, height);
        for px in img.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.0, color.1, color.2, 255]);
        }
        img
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Color of pixel (x, y), alpha dropped.
    #[inline(always)]
    #[must_use]
    pub fn rgb(&self, x: u32, y: u32) -> Rgb {
        let (r, g, b, _) = self.pixel(x, y);
        Rgb(r, g, b)
    }

    /// Set pixel (x, y) to an opaque color.
    #[inline]
    pub fn set_rgb(&mut self, x: u32, y: u32, color: Rgb) {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if let Some(px) = self.data.get_mut(idx..idx + 4) {
            px.copy_from_slice(&[color.0, color.1, color.2, 255]);
        }
    }

    /// Luma BT.601 du pixel (x, y).
    #[inline(always)]
    #[must_use]
    pub fn luminance(&self, x: u32, y: u32) -> u8 {
        self.rgb(x, y).luma()
    }

    /// `(width, height)`.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Séquence animée : frames, délais (centisecondes) et nombre de boucles.
///
/// `repeat == 0` means "loop forever". Frames are not checked for uniform
/// size here: the frame pipeline refuses mismatching frames before it starts.
///
/// # Example
/// ```
/// use ac_core::frame::{DecodedImage, FrameSequence};
/// let seq = FrameSequence::new(vec![DecodedImage::new(2, 2)], vec![10], 0).unwrap();
/// assert!(seq.loops_forever());
/// assert!(FrameSequence::new(vec![DecodedImage::new(2, 2)], vec![], 0).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSequence {
    frames: Vec<DecodedImage>,
    delays: Vec<u16>,
    repeat: u32,
}

impl FrameSequence {
    /// Build a sequence, enforcing one delay per frame.
    ///
    /// # Errors
    /// [`CoreError::EmptySequence`] for zero frames,
    /// [`CoreError::DelayCountMismatch`] when lengths differ.
    pub fn new(frames: Vec<DecodedImage>, delays: Vec<u16>, repeat: u32) -> Result<Self, CoreError> {
        if frames.is_empty() {
            return Err(CoreError::EmptySequence);
        }
        if frames.len() != delays.len() {
            return Err(CoreError::DelayCountMismatch {
                frames: frames.len(),
                delays: delays.len(),
            });
        }
        Ok(Self {
            frames,
            delays,
            repeat,
        })
    }

    /// Frames in display order.
    #[must_use]
    pub fn frames(&self) -> &[DecodedImage] {
        &self.frames
    }

    /// Per-frame delays in centiseconds.
    #[must_use]
    pub fn delays(&self) -> &[u16] {
        &self.delays
    }

    /// Number of passes; 0 = forever.
    #[must_use]
    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    /// `true` when the animation never stops by itself.
    #[must_use]
    pub fn loops_forever(&self) -> bool {
        self.repeat == 0
    }

    /// Number of frames (never zero).
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`; kept for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Check that every frame has the dimensions of the first one.
    ///
    /// # Errors
    /// [`CoreError::FrameSizeMismatch`] naming the first offending frame.
    pub fn check_uniform(&self) -> Result<(), CoreError> {
        let (expected_width, expected_height) = self.frames[0].dimensions();
        for (index, frame) in self.frames.iter().enumerate().skip(1) {
            if frame.dimensions() != (expected_width, expected_height) {
                return Err(CoreError::FrameSizeMismatch {
                    index,
                    width: frame.width,
                    height: frame.height,
                    expected_width,
                    expected_height,
                });
            }
        }
        Ok(())
    }
}

/// Grille row-major générique (échantillons, glyphes).
///
/// # Example
/// ```
/// use ac_core::frame::Grid;
/// let mut grid = Grid::new(3, 2, 0u8);
/// grid.set(2, 1, 7);
/// assert_eq!(*grid.get(2, 1), 7);
/// assert_eq!(grid.rows().count(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    /// Flat array of cells, row-major.
    pub cells: Vec<T>,
    /// Width in cells.
    pub width: usize,
    /// Height in cells.
    pub height: usize,
}

impl<T: Clone> Grid<T> {
    /// Grid filled with `fill`.
    #[must_use]
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            cells: vec![fill; width * height],
            width,
            height,
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid from row-major cells.
    ///
    /// # Errors
    /// [`CoreError::InvalidDimensions`] if `cells.len() != width × height`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<T>) -> Result<Self, CoreError> {
        if cells.len() != width * height {
            return Err(CoreError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            });
        }
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Set a cell at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, cell: T) {
        self.cells[y * self.width + x] = cell;
    }

    /// Get a cell reference at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.cells[y * self.width + x]
    }

    /// Rows, top to bottom.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, T> {
        self.cells.chunks_exact(self.width.max(1))
    }

    /// Mutable rows, top to bottom.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, T> {
        self.cells.chunks_exact_mut(self.width.max(1))
    }

    /// Apply `f` to every cell, keeping the layout.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Grid<U> {
        Grid {
            cells: self.cells.into_iter().map(f).collect(),
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sequence_passes() {
        let seq = FrameSequence::new(
            vec![DecodedImage::new(4, 3), DecodedImage::new(4, 3)],
            vec![5, 5],
            1,
        )
        .unwrap();
        assert!(seq.check_uniform().is_ok());
    }

    #[test]
    fn smaller_second_frame_is_reported() {
        let seq = FrameSequence::new(
            vec![
                DecodedImage::new(4, 3),
                DecodedImage::new(4, 3),
                DecodedImage::new(2, 3),
            ],
            vec![5, 5, 5],
            1,
        )
        .unwrap();
        let err = seq.check_uniform().unwrap_err();
        assert!(err.is_unsupported_input());
        assert!(matches!(err, CoreError::FrameSizeMismatch { index: 2, .. }));
    }

    #[test]
    fn empty_sequence_is_rejected() {
        assert_eq!(
            FrameSequence::new(vec![], vec![], 0),
            Err(CoreError::EmptySequence)
        );
    }

    #[test]
    fn grid_from_cells_checks_len() {
        assert!(Grid::from_cells(2, 2, vec![0; 3]).is_err());
        let grid = Grid::from_cells(2, 2, vec![1, 2, 3, 4]).unwrap();
        let rows: Vec<&[i32]> = grid.rows().collect();
        assert_eq!(rows, vec![&[1, 2][..], &[3, 4][..]]);
    }

    #[test]
    fn grid_map_keeps_shape() {
        let grid = Grid::from_cells(2, 1, vec![1, 2]).unwrap().map(|v| v * 10);
        assert_eq!(grid.cells, vec![10, 20]);
        assert_eq!((grid.width, grid.height), (2, 1));
    }

    #[test]
    fn set_rgb_is_opaque() {
        let mut img = DecodedImage::new(1, 1);
        img.set_rgb(0, 0, Rgb(1, 2, 3));
        assert_eq!(img.pixel(0, 0), (1, 2, 3, 255));
    }
}
