//! Reads a photographed 5x5 bingo board into a grid of numbers.
//!
//! The pipeline finds the board outline in the photo, warps it to a
//! flat square, slices it into 25 cells, isolates the digit glyphs in
//! each cell and matches them against a trainable bank of digit
//! templates. Cells that cannot be read confidently are reported as
//! [Cell::Unrecognized] rather than guessed, and the center cell is
//! always [Cell::Free].
//!
//! # Basic usage
//!
//! ```no_run
//! # use bingo_ocr::{Recognizer, TemplateStore};
//! let recognizer = Recognizer::new(TemplateStore::new("storage/templates"));
//! let grid = recognizer.recognize_file("photos/board.jpg")?;
//! println!("{}", grid);
//! # Ok::<(), bingo_ocr::Error>(())
//! ```
//!
//! A recognized board prints with the fixed free center and `ERR` for
//! cells that need a better photo:
//!
//! ```text
//!    3   22   43   48   67
//!   12   18   34   55   71
//!    9   27 FREE   59   70
//!   14   16   40   51   64
//!    5   30   38   60   75
//! ```
//!
//! The bank is trained once from a clean reference board with known
//! labels, `FREE` marking the center:
//!
//! ```no_run
//! # use bingo_ocr::Recognizer;
//! # let labels: Vec<String> = Vec::new();
//! let recognizer = Recognizer::from_env();
//! let complete = recognizer.train_from_file("photos/reference.jpg", &labels)?;
//! # Ok::<(), bingo_ocr::Error>(())
//! ```

mod cells;
mod classify;
mod error;
mod grid;
mod rectify;
mod recognizer;
mod segment;
mod templates;
mod utils;

pub use cells::slice_cells;
pub use classify::{match_digit, MATCH_THRESHOLD};
pub use error::Error;
pub use grid::{check_bingo, Cell, Grid, HitMask, WinPattern, GRID};
pub use rectify::rectify_board;
pub use recognizer::Recognizer;
pub use templates::{TemplateBank, TemplateStore, TrainingSamples};
pub use utils::collage;
