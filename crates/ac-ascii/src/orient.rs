use ac_core::frame::Grid;

use crate::sampler::{DotCell, SampleCell};

/// Contenu d'une cellule qui doit lui-même être retourné lors d'un miroir.
///
/// A plain sample has no inner layout. A Braille block carries a 2×4 dot
/// sub-grid that has to be mirrored with the grid, otherwise the output would
/// only be mirrored at cell granularity.
pub trait Mirror {
    /// Mirror left↔right inside the cell.
    fn mirror_x(&mut self) {}
    /// Mirror top↔bottom inside the cell.
    fn mirror_y(&mut self) {}
}

impl Mirror for SampleCell {}

impl Mirror for DotCell {
    fn mirror_x(&mut self) {
        for row in &mut self.dots {
            row.reverse();
        }
    }

    fn mirror_y(&mut self) {
        self.dots.reverse();
    }
}

/// Reverse every row of the grid (flip-X).
pub fn flip_x<T: Mirror>(grid: &mut Grid<T>) {
    for row in grid.rows_mut() {
        row.reverse();
        row.iter_mut().for_each(T::mirror_x);
    }
}

/// Reverse the order of the rows (flip-Y).
pub fn flip_y<T: Mirror>(grid: &mut Grid<T>) {
    let (w, h) = (grid.width, grid.height);
    for y in 0..h / 2 {
        let (top, bottom) = grid.cells.split_at_mut((h - 1 - y) * w);
        top[y * w..(y + 1) * w].swap_with_slice(&mut bottom[..w]);
    }
    grid.cells.iter_mut().for_each(T::mirror_y);
}

/// Apply the configured mirrors in place, before glyph mapping.
///
/// # Example
/// ```
/// use ac_ascii::orient::orient;
/// use ac_ascii::sampler::SampleCell;
/// use ac_core::frame::Grid;
/// let cells = (0..4).map(|l| SampleCell { luminance: l, ..Default::default() }).collect();
/// let mut grid = Grid::from_cells(2, 2, cells).unwrap();
/// orient(&mut grid, true, true);
/// let lums: Vec<u8> = grid.cells.iter().map(|c| c.luminance).collect();
/// assert_eq!(lums, vec![3, 2, 1, 0]);
/// ```
pub fn orient<T: Mirror>(grid: &mut Grid<T>, x: bool, y: bool) {
    if x {
        flip_x(grid);
    }
    if y {
        flip_y(grid);
    }
}
