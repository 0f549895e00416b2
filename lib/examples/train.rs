use anyhow::{Context, Result};
use bingo_ocr::Recognizer;

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .expect("Usage: train IMAGE LABEL1 .. LABEL25 (FREE for the center)");
    let labels: Vec<String> = args.collect();
    let recognizer = Recognizer::from_env();
    let complete = recognizer
        .train_from_file(&path, &labels)
        .with_context(|| format!("Failed to train from {}", path))?;
    println!(
        "templates stored in {}, bank complete: {}",
        recognizer.store().dir().display(),
        complete
    );
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{:?}", err);
    }
}
