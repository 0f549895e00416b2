use image::imageops::{resize, FilterType};
use image::{GenericImage, GrayImage, ImageBuffer, SubImage};

/// Arrange equal-sized grayscale tiles into one mosaic image.
///
/// Handy for eyeballing the pipeline: board cells, glyph canvases and
/// digit templates all render well. Tiles are laid out row-major on a
/// roughly square grid, capped at `maxrows` rows when given. A straggler
/// of a different size is resized to match the first tile.
pub fn collage(tiles: &[GrayImage], maxrows: Option<u32>) -> GrayImage {
    if tiles.is_empty() {
        return GrayImage::new(0, 0);
    }
    let nimages = tiles.len();
    let mut nrows = (nimages as f64).sqrt().floor() as u32;
    if let Some(maxrows) = maxrows {
        nrows = std::cmp::min(nrows, maxrows);
    }
    let ncols = (nimages as f64 / nrows as f64).ceil() as u32;
    let (w, h) = tiles[0].dimensions();
    let mut collage: GrayImage = ImageBuffer::new(w * ncols, h * nrows);
    let filter = FilterType::Lanczos3;
    for (i, tile) in tiles.iter().enumerate() {
        let (row, col) = (i as u32 / ncols, i as u32 % ncols);
        let mut dest: SubImage<&mut GrayImage> = collage.sub_image(col * w, row * h, w, h);
        if tile.dimensions() != (w, h) {
            let resized = resize(tile, w, h, filter);
            dest.copy_from(&resized, 0, 0).unwrap();
        } else {
            dest.copy_from(tile, 0, 0).unwrap();
        }
    }
    collage
}
