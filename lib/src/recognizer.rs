use crate::cells::slice_cells;
use crate::classify::match_digit;
use crate::error::Error;
use crate::grid::{Cell, Grid, GRID};
use crate::rectify::rectify_board;
use crate::segment::{segment_digits, split_merged};
use crate::templates::{TemplateBank, TemplateStore, TrainingSamples};
use image::RgbImage;
use log::debug;
use std::path::Path;

/// Row and column of the free center cell.
const FREE_CELL: (usize, usize) = (GRID / 2, GRID / 2);
/// Digits in a complete template bank.
const BANK_SIZE: usize = 10;

/// Bingo board recognizer.
///
/// Holds the template store the pipeline classifies against. The bank
/// is read fresh on every call, so a retrain between two calls takes
/// effect immediately and concurrent calls never share mutable state.
pub struct Recognizer {
    store: TemplateStore,
}

impl Default for Recognizer {
    fn default() -> Self {
        Recognizer::from_env()
    }
}

impl Recognizer {
    pub fn new(store: TemplateStore) -> Recognizer {
        Recognizer { store }
    }

    /// Recognizer over the store configured through the environment,
    /// see [TemplateStore::from_env].
    pub fn from_env() -> Recognizer {
        Recognizer::new(TemplateStore::from_env())
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// True when all ten digits have a trained template.
    pub fn templates_available(&self) -> bool {
        self.store.available()
    }

    /// Read a photographed board into a grid of cell values.
    ///
    /// The board is located and rectified, sliced into 25 cells, and
    /// each cell's glyphs are matched against the template bank. Per
    /// cell problems never fail the call: an unreadable cell comes back
    /// as [Cell::Unrecognized] and the caller decides whether to ask
    /// for a better photo. Without a complete bank every non-center
    /// cell is unrecognized, whatever the cells contain.
    ///
    /// # Errors
    /// Only a broken template store fails the call; decode failures of
    /// the file and memory entry points are raised there.
    pub fn recognize(&self, img: &RgbImage) -> Result<Grid, Error> {
        let board = rectify_board(img);
        let cells = slice_cells(&board);
        let bank = self.store.load()?;
        let trained = bank.len() == BANK_SIZE;
        if !trained {
            debug!(
                "template bank has {} of {} digits, reporting every cell unrecognized",
                bank.len(),
                BANK_SIZE
            );
        }
        let mut rows = [[Cell::Unrecognized; GRID]; GRID];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                if (r, c) == FREE_CELL {
                    *cell = Cell::Free;
                } else if trained {
                    *cell = recognize_cell(&cells[r][c], &bank);
                }
            }
        }
        Ok(Grid::from_rows(rows))
    }

    /// Decode an image file and recognize it.
    pub fn recognize_file<P: AsRef<Path>>(&self, path: P) -> Result<Grid, Error> {
        let img = image::open(path)?.into_rgb8();
        self.recognize(&img)
    }

    /// Decode an in-memory image, as handed over by a chat upload, and
    /// recognize it.
    pub fn recognize_from_memory(&self, bytes: &[u8]) -> Result<Grid, Error> {
        let img = image::load_from_memory(bytes)?.into_rgb8();
        self.recognize(&img)
    }

    /// Build digit templates from a clean reference board.
    ///
    /// `labels` lists all 25 cell values row-major; each entry is a
    /// decimal number or the case-insensitive token `FREE`. The digits
    /// of a label pair positionally with the segmented glyphs of its
    /// cell and join that digit's average. A cell whose glyph count
    /// does not match its label is dropped, except for the common case
    /// of two touching digits segmented as one glyph, which is split in
    /// half. The center cell never contributes, whatever its label.
    ///
    /// Returns whether the bank is complete after training.
    ///
    /// # Errors
    /// [Error::LabelCount] unless exactly 25 labels are supplied, plus
    /// template store I/O failures.
    pub fn train_from_board<S: AsRef<str>>(
        &self,
        img: &RgbImage,
        labels: &[S],
    ) -> Result<bool, Error> {
        if labels.len() != GRID * GRID {
            return Err(Error::LabelCount(labels.len()));
        }
        let board = rectify_board(img);
        let cells = slice_cells(&board);
        let mut samples = TrainingSamples::new();
        for r in 0..GRID {
            for c in 0..GRID {
                if (r, c) == FREE_CELL {
                    continue;
                }
                let label = labels[r * GRID + c].as_ref().trim().to_uppercase();
                if label == "FREE"
                    || label.is_empty()
                    || !label.bytes().all(|b| b.is_ascii_digit())
                {
                    continue;
                }
                collect_samples(&cells[r][c], &label, &mut samples);
            }
        }
        self.store.train(&samples)?;
        Ok(self.store.available())
    }

    /// [Recognizer::train_from_board] for an image file.
    pub fn train_from_file<P, S>(&self, path: P, labels: &[S]) -> Result<bool, Error>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let img = image::open(path)?.into_rgb8();
        self.train_from_board(&img, labels)
    }
}

/// Classify one cell's glyphs and assemble them into a cell value.
///
/// Reading order gives the digit order. Any unmatched glyph fails the
/// whole cell, and so does a concatenation outside the game's number
/// range.
fn recognize_cell(cell: &RgbImage, bank: &TemplateBank) -> Cell {
    let glyphs = segment_digits(cell);
    if glyphs.is_empty() {
        return Cell::Unrecognized;
    }
    let mut value: u32 = 0;
    for glyph in &glyphs {
        match match_digit(glyph, bank) {
            Some((digit, _)) => value = value * 10 + digit as u32,
            None => return Cell::Unrecognized,
        }
    }
    Cell::from_value(value)
}

/// Pair a training label's digits with the segmented glyphs of its cell.
fn collect_samples(cell: &RgbImage, label: &str, samples: &mut TrainingSamples) {
    let mut glyphs = segment_digits(cell);
    if glyphs.is_empty() {
        return;
    }
    let digits: Vec<u8> = label.bytes().map(|b| b - b'0').collect();
    if digits.len() != glyphs.len() {
        if digits.len() == 2 && glyphs.len() == 1 {
            match split_merged(&glyphs[0]) {
                Some((left, right)) => glyphs = vec![left, right],
                None => return,
            }
        } else {
            // a mismatched pairing would poison the averages
            return;
        }
    }
    for (digit, glyph) in digits.into_iter().zip(glyphs) {
        samples.add(digit, glyph);
    }
}
