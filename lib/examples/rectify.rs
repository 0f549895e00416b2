use anyhow::{Context, Result};
use bingo_ocr::{rectify_board, GRID};
use image::Rgb;
use imageproc::drawing::draw_antialiased_line_segment_mut;
use imageproc::pixelops::interpolate;

fn run() -> Result<()> {
    let path = std::env::args().nth(1).expect("Usage: rectify IMAGE");
    let img = image::open(&path)
        .with_context(|| format!("Failed to open {}", path))?
        .into_rgb8();
    let mut board = rectify_board(&img);
    eprintln!("rectified board is {}x{}", board.width(), board.height());

    // overlay the lattice the cell slicer will use
    let red = Rgb([255u8, 0, 0]);
    let trim = (0.02 * board.width().min(board.height()) as f64) as i32;
    let inner_w = board.width() as i32 - 2 * trim;
    let inner_h = board.height() as i32 - 2 * trim;
    if inner_w > 0 && inner_h > 0 {
        let cell_w = inner_w / GRID as i32;
        let cell_h = inner_h / GRID as i32;
        let span_x = GRID as i32 * cell_w;
        let span_y = GRID as i32 * cell_h;
        for i in 0..=GRID as i32 {
            let x = trim + i * cell_w;
            let y = trim + i * cell_h;
            draw_antialiased_line_segment_mut(
                &mut board,
                (x, trim),
                (x, trim + span_y),
                red,
                interpolate,
            );
            draw_antialiased_line_segment_mut(
                &mut board,
                (trim, y),
                (trim + span_x, y),
                red,
                interpolate,
            );
        }
    }
    board.save("board.png")?;
    eprintln!("saved lattice overlay to board.png");
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{:?}", err);
    }
}
