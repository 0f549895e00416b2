use anyhow::{Context, Result};
use bingo_ocr::{collage, rectify_board, slice_cells};
use image::imageops;

fn run() -> Result<()> {
    let path = std::env::args().nth(1).expect("Usage: collage IMAGE");
    let img = image::open(&path)
        .with_context(|| format!("Failed to open {}", path))?
        .into_rgb8();
    let board = rectify_board(&img);
    let cells = slice_cells(&board);
    let tiles: Vec<_> = cells
        .iter()
        .flatten()
        .map(|cell| imageops::grayscale(cell))
        .collect();
    let mosaic = collage(&tiles, Some(5));
    mosaic.save("cells.png")?;
    eprintln!("saved cell mosaic to cells.png");
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{:?}", err);
    }
}
