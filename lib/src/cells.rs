use crate::grid::GRID;
use image::{GenericImageView, RgbImage};

/// Fraction of the shorter board side trimmed from every edge before
/// slicing, to keep frame remnants out of the cells.
const TRIM_FRACTION: f64 = 0.02;

/// Partition a rectified board into a GRID x GRID matrix of cell images.
///
/// Tile sizes come from integer division, so the ragged last few pixels
/// per axis are dropped rather than redistributed. The full matrix is
/// always returned; a degenerate input yields empty cells and the
/// segmenter reports those as unreadable.
pub fn slice_cells(board: &RgbImage) -> Vec<Vec<RgbImage>> {
    let (width, height) = board.dimensions();
    let trim = (TRIM_FRACTION * width.min(height) as f64) as u32;
    let inner_w = width.saturating_sub(2 * trim);
    let inner_h = height.saturating_sub(2 * trim);
    let cell_w = inner_w / GRID as u32;
    let cell_h = inner_h / GRID as u32;
    (0..GRID)
        .map(|r| {
            (0..GRID)
                .map(|c| {
                    if cell_w == 0 || cell_h == 0 {
                        return RgbImage::new(0, 0);
                    }
                    let x = trim + c as u32 * cell_w;
                    let y = trim + r as u32 * cell_h;
                    board.view(x, y, cell_w, cell_h).to_image()
                })
                .collect()
        })
        .collect()
}
