use image::imageops::{self, FilterType};
use image::{GenericImageView, GrayImage, Luma, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::contrast::otsu_level;
use imageproc::distance_transform::Norm;
use imageproc::map::map_pixels;
use imageproc::morphology::open;
use imageproc::point::Point;

/// Side of the square canvas each glyph is normalized onto.
const CANVAS_SIZE: u32 = 28;
/// Longest dimension of a glyph after isotropic scaling.
const GLYPH_SPAN: u32 = 22;
/// Components whose bounding box covers less than this fraction of the
/// cropped cell are treated as speckle.
const NOISE_FLOOR: f64 = 0.01;

/// Isolate up to two digit glyphs in a cell image, left to right.
///
/// The cell is binarized with Otsu's method after a mild contrast
/// boost, cropped by a tenth per side to drop cell border ink, and
/// opened with a 3x3 kernel to remove speckle. Each surviving connected
/// component is scaled so its longer side spans [GLYPH_SPAN] pixels and
/// centered on a zeroed [CANVAS_SIZE] canvas. When more than two
/// components survive, the two with the most ink are kept. An empty
/// result means the cell holds nothing readable.
pub(crate) fn segment_digits(cell: &RgbImage) -> Vec<GrayImage> {
    let (width, height) = cell.dimensions();
    if width < 10 || height < 10 {
        return Vec::new();
    }
    let ink = binarize(cell);
    let (margin_x, margin_y) = (width / 10, height / 10);
    let (roi_w, roi_h) = (width - 2 * margin_x, height - 2 * margin_y);
    let roi = ink.view(margin_x, margin_y, roi_w, roi_h).to_image();
    let roi = open(&roi, Norm::LInf, 1);

    let floor = NOISE_FLOOR * roi_w as f64 * roi_h as f64;
    let mut boxes = Vec::new();
    for contour in find_contours::<i32>(&roi) {
        if contour.border_type != BorderType::Outer {
            continue;
        }
        let (x, y, w, h) = points_bbox(&contour.points);
        if (w as f64 * h as f64) < floor {
            continue;
        }
        boxes.push((x, y, w, h));
    }
    if boxes.is_empty() {
        return Vec::new();
    }
    boxes.sort_by_key(|&(x, _, _, _)| x);

    let mut glyphs: Vec<GrayImage> = boxes
        .iter()
        .map(|&(x, y, w, h)| normalize(&roi.view(x, y, w, h).to_image()))
        .collect();
    if glyphs.len() > 2 {
        glyphs = two_largest(glyphs);
    }
    glyphs
}

/// Training fallback for two digits that touch and segment as a single
/// component: split the canvas vertically in half and renormalize each
/// half onto its own canvas. Returns None when either half carries no
/// ink, which discards the sample instead of corrupting an average.
pub(crate) fn split_merged(canvas: &GrayImage) -> Option<(GrayImage, GrayImage)> {
    let (w, h) = canvas.dimensions();
    let half = w / 2;
    if half == 0 {
        return None;
    }
    let left = renormalize(&canvas.view(0, 0, half, h).to_image())?;
    let right = renormalize(&canvas.view(half, 0, w - half, h).to_image())?;
    Some((left, right))
}

/// Otsu binarization after a mild contrast boost, inverted so the dark
/// digit ink becomes foreground.
fn binarize(cell: &RgbImage) -> GrayImage {
    let gray = imageops::grayscale(cell);
    let boosted = map_pixels(&gray, |_x, _y, p| Luma([boost(p[0])]));
    let level = otsu_level(&boosted);
    map_pixels(&boosted, |_x, _y, p| {
        if p[0] <= level {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

fn boost(value: u8) -> u8 {
    (1.2 * value as f32 + 5.0).round().min(255.0) as u8
}

/// Scale a component so its longer side spans [GLYPH_SPAN] pixels and
/// center it on a zeroed canvas. Dimensions truncate, with a 1 pixel
/// floor for hairline components.
fn normalize(component: &GrayImage) -> GrayImage {
    let (w, h) = component.dimensions();
    let longer = w.max(h);
    let scaled_w = (w * GLYPH_SPAN / longer).max(1);
    let scaled_h = (h * GLYPH_SPAN / longer).max(1);
    let scaled = imageops::resize(component, scaled_w, scaled_h, FilterType::Triangle);
    let mut canvas = GrayImage::new(CANVAS_SIZE, CANVAS_SIZE);
    imageops::replace(
        &mut canvas,
        &scaled,
        (CANVAS_SIZE - scaled_w) / 2,
        (CANVAS_SIZE - scaled_h) / 2,
    );
    canvas
}

fn renormalize(half: &GrayImage) -> Option<GrayImage> {
    let (x, y, w, h) = foreground_bbox(half)?;
    Some(normalize(&half.view(x, y, w, h).to_image()))
}

fn points_bbox(points: &[Point<i32>]) -> (u32, u32, u32, u32) {
    let (mut x0, mut y0) = (i32::MAX, i32::MAX);
    let (mut x1, mut y1) = (0, 0);
    for p in points {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    (x0 as u32, y0 as u32, (x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32)
}

/// Bounding box of the nonzero pixels, if any.
fn foreground_bbox(img: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    let (mut x0, mut y0) = (u32::MAX, u32::MAX);
    let (mut x1, mut y1) = (0, 0);
    for (x, y, p) in img.enumerate_pixels() {
        if p[0] > 0 {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
    }
    if x0 == u32::MAX {
        return None;
    }
    Some((x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

/// Keep the two components with the most ink, preserving reading order.
fn two_largest(glyphs: Vec<GrayImage>) -> Vec<GrayImage> {
    let mut order: Vec<usize> = (0..glyphs.len()).collect();
    order.sort_by_key(|&i| ink_count(&glyphs[i]));
    let mut keep = [order[order.len() - 2], order[order.len() - 1]];
    keep.sort_unstable();
    glyphs
        .into_iter()
        .enumerate()
        .filter(|(i, _)| keep.contains(i))
        .map(|(_, glyph)| glyph)
        .collect()
}

fn ink_count(glyph: &GrayImage) -> u32 {
    glyph.pixels().filter(|p| p[0] > 0).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn cell_with_blocks(blocks: &[(u32, u32, u32, u32)]) -> RgbImage {
        let mut cell = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        for &(x, y, w, h) in blocks {
            for dy in 0..h {
                for dx in 0..w {
                    cell.put_pixel(x + dx, y + dy, Rgb([0, 0, 0]));
                }
            }
        }
        cell
    }

    #[test]
    fn single_component_is_normalized() {
        let glyphs = segment_digits(&cell_with_blocks(&[(40, 35, 20, 30)]));
        assert_eq!(glyphs.len(), 1);
        let glyph = &glyphs[0];
        assert_eq!(glyph.dimensions(), (CANVAS_SIZE, CANVAS_SIZE));
        // a 20x30 block scales to 14x22 and lands centered
        assert_eq!(foreground_bbox(glyph), Some((7, 3, 14, 22)));
    }

    #[test]
    fn two_components_read_left_to_right() {
        let glyphs = segment_digits(&cell_with_blocks(&[(20, 25, 10, 40), (60, 35, 30, 30)]));
        assert_eq!(glyphs.len(), 2);
        let (_, _, first_w, first_h) = foreground_bbox(&glyphs[0]).unwrap();
        let (_, _, second_w, second_h) = foreground_bbox(&glyphs[1]).unwrap();
        assert_eq!((first_w, first_h), (5, 22), "thin bar comes first");
        assert_eq!((second_w, second_h), (22, 22), "square comes second");
    }

    #[test]
    fn speckle_below_the_noise_floor_is_dropped() {
        // a 6x6 blot survives the opening but stays below 1% of the crop
        let glyphs = segment_digits(&cell_with_blocks(&[(40, 35, 20, 30), (70, 20, 6, 6)]));
        assert_eq!(glyphs.len(), 1);
    }

    #[test]
    fn opening_removes_tiny_specks() {
        let glyphs = segment_digits(&cell_with_blocks(&[(40, 35, 20, 30), (70, 20, 2, 2)]));
        assert_eq!(glyphs.len(), 1);
    }

    #[test]
    fn keeps_the_two_glyphs_with_the_most_ink() {
        let blocks = [(12, 30, 20, 20), (42, 22, 8, 36), (66, 30, 20, 20)];
        let glyphs = segment_digits(&cell_with_blocks(&blocks));
        assert_eq!(glyphs.len(), 2);
        for glyph in &glyphs {
            let (_, _, w, _) = foreground_bbox(glyph).unwrap();
            assert_eq!(w, 22, "the thin middle bar should be dropped");
        }
    }

    #[test]
    fn blank_cell_yields_no_glyphs() {
        let cell = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        assert!(segment_digits(&cell).is_empty());
    }

    #[test]
    fn degenerate_cell_yields_no_glyphs() {
        assert!(segment_digits(&RgbImage::new(4, 4)).is_empty());
        assert!(segment_digits(&RgbImage::new(0, 0)).is_empty());
    }

    #[test]
    fn merged_pair_splits_into_two_canvases() {
        let mut canvas = GrayImage::new(28, 28);
        for y in 3..25 {
            for x in 4..10 {
                canvas.put_pixel(x, y, Luma([255]));
            }
            for x in 16..22 {
                canvas.put_pixel(x, y, Luma([255]));
            }
        }
        let (left, right) = split_merged(&canvas).expect("both halves carry ink");
        assert_eq!(left.dimensions(), (CANVAS_SIZE, CANVAS_SIZE));
        assert_eq!(right.dimensions(), (CANVAS_SIZE, CANVAS_SIZE));
        assert!(foreground_bbox(&left).is_some());
        assert!(foreground_bbox(&right).is_some());
    }

    #[test]
    fn split_discards_a_blank_half() {
        let mut canvas = GrayImage::new(28, 28);
        for y in 3..25 {
            for x in 2..12 {
                canvas.put_pixel(x, y, Luma([255]));
            }
        }
        assert!(split_merged(&canvas).is_none());
    }
}
