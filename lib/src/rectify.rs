use image::{imageops, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::integral_image::{integral_image, sum_image_pixels};
use imageproc::point::Point;
use log::debug;

type IntegralImage = ImageBuffer<Luma<u64>, Vec<u64>>;

/// Half-width of the local mean window, giving a 31x31 neighborhood.
const BLOCK_RADIUS: u32 = 15;
/// How far below the local mean a pixel must fall to count as ink.
const BLOCK_OFFSET: i64 = 10;
/// Polygon simplification tolerance as a fraction of the contour length.
const APPROX_TOLERANCE: f64 = 0.02;

/// Find the board in a photo and warp it to a flat, top-down square.
///
/// The board boundary is the largest external ink contour that
/// simplifies to a quadrilateral. The output square's side is the
/// longest quad edge, so the sharpest dimension of the photo sets the
/// resolution. When no quadrilateral is found the input is returned
/// unchanged and the rest of the pipeline works on the full frame.
pub fn rectify_board(img: &RgbImage) -> RgbImage {
    let quad = match find_board_quad(img) {
        Some(quad) => quad,
        None => {
            debug!("no board quadrilateral found, keeping the image as is");
            return img.clone();
        }
    };
    let corners = order_corners(&quad);
    let side = longest_edge(&corners) as u32;
    if side < 2 {
        return img.clone();
    }
    let far = side as f32;
    let square = [(0.0, 0.0), (far, 0.0), (far, far), (0.0, far)];
    let projection = match Projection::from_control_points(corners, square) {
        Some(projection) => projection,
        None => {
            debug!("board quadrilateral {:?} is degenerate", corners);
            return img.clone();
        }
    };
    debug!("rectifying board {:?} to {}x{}", corners, side, side);
    let mut board = RgbImage::new(side, side);
    warp_into(
        img,
        &projection,
        Interpolation::Bilinear,
        Rgb([0, 0, 0]),
        &mut board,
    );
    board
}

/// Largest 4-vertex polygon among the external ink contours.
fn find_board_quad(img: &RgbImage) -> Option<[(f32, f32); 4]> {
    let gray = imageops::grayscale(img);
    let ink = threshold_ink(&gray);
    let mut best: Option<(f64, [(f32, f32); 4])> = None;
    for contour in find_contours::<i32>(&ink) {
        if contour.border_type != BorderType::Outer || contour.points.len() < 4 {
            continue;
        }
        let tolerance = APPROX_TOLERANCE * arc_length(&contour.points, true);
        let polygon = approximate_polygon_dp(&contour.points, tolerance, true);
        if polygon.len() != 4 {
            continue;
        }
        let area = shoelace_area(&polygon);
        if best.map_or(true, |(largest, _)| area > largest) {
            let mut quad = [(0.0, 0.0); 4];
            for (corner, point) in quad.iter_mut().zip(&polygon) {
                *corner = (point.x as f32, point.y as f32);
            }
            best = Some((area, quad));
        }
    }
    best.map(|(_, quad)| quad)
}

/// Mark pixels darker than the mean of their 31x31 neighborhood by more
/// than [BLOCK_OFFSET], inverted so ink is foreground. A local mean
/// keeps board lines detectable under uneven lighting, where a single
/// global level loses whole shadowed edges.
fn threshold_ink(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    let integral: IntegralImage = integral_image::<_, u64>(gray);
    let mut ink = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let left = x.saturating_sub(BLOCK_RADIUS);
            let top = y.saturating_sub(BLOCK_RADIUS);
            let right = (x + BLOCK_RADIUS).min(width - 1);
            let bottom = (y + BLOCK_RADIUS).min(height - 1);
            let sum = sum_image_pixels(&integral, left, top, right, bottom)[0] as i64;
            let count = ((right - left + 1) * (bottom - top + 1)) as i64;
            let pixel = gray.get_pixel(x, y)[0] as i64;
            if pixel * count < sum - BLOCK_OFFSET * count {
                ink.put_pixel(x, y, Luma([255]));
            }
        }
    }
    ink
}

fn shoelace_area(polygon: &[Point<i32>]) -> f64 {
    let mut area = 0.0;
    for (i, p) in polygon.iter().enumerate() {
        let q = &polygon[(i + 1) % polygon.len()];
        area += p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64;
    }
    area.abs() / 2.0
}

/// Order corners as top-left, top-right, bottom-right, bottom-left.
///
/// The top-left corner minimizes the coordinate sum and the bottom-right
/// maximizes it; the top-right minimizes `y - x` and the bottom-left
/// maximizes it. Stable for either contour winding.
fn order_corners(quad: &[(f32, f32); 4]) -> [(f32, f32); 4] {
    let mut top_left = quad[0];
    let mut top_right = quad[0];
    let mut bottom_right = quad[0];
    let mut bottom_left = quad[0];
    for &(x, y) in quad.iter() {
        if x + y < top_left.0 + top_left.1 {
            top_left = (x, y);
        }
        if x + y > bottom_right.0 + bottom_right.1 {
            bottom_right = (x, y);
        }
        if y - x < top_right.1 - top_right.0 {
            top_right = (x, y);
        }
        if y - x > bottom_left.1 - bottom_left.0 {
            bottom_left = (x, y);
        }
    }
    [top_left, top_right, bottom_right, bottom_left]
}

fn longest_edge(corners: &[(f32, f32); 4]) -> f64 {
    let mut longest = 0.0;
    for i in 0..4 {
        let (x0, y0) = corners[i];
        let (x1, y1) = corners[(i + 1) % 4];
        let length = ((x1 as f64 - x0 as f64).powi(2) + (y1 as f64 - y0 as f64).powi(2)).sqrt();
        if length > longest {
            longest = length;
        }
    }
    longest
}
