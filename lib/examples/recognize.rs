use anyhow::{Context, Result};
use bingo_ocr::Recognizer;
use std::time::Instant;

fn run() -> Result<()> {
    let path = std::env::args().nth(1).expect("Usage: recognize IMAGE");
    let t0 = Instant::now();
    let img = image::open(&path)
        .with_context(|| format!("Failed to open {}", path))?
        .into_rgb8();
    let recognizer = Recognizer::from_env();
    let grid = recognizer.recognize(&img)?;
    println!("recognize board took {:?}", t0.elapsed());
    println!("{}", grid);
    if !grid.is_complete() {
        eprintln!("some cells were not recognized, try a clearer photo");
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{:?}", err);
    }
}
