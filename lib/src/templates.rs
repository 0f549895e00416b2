use crate::error::Error;
use image::{GrayImage, Luma};
use log::debug;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Digits that currently have a reference glyph, in ascending digit
/// order so a scan over the bank breaks score ties toward the lowest
/// digit.
pub type TemplateBank = BTreeMap<u8, GrayImage>;

const TEMPLATE_DIR_VAR: &str = "TEMPL_DIR";
const DEFAULT_TEMPLATE_DIR: &str = "storage/templates";

/// Glyph canvases collected per digit during one training call,
/// reduced to one averaged template per digit by [TemplateStore::train].
#[derive(Debug, Default)]
pub struct TrainingSamples {
    samples: BTreeMap<u8, Vec<GrayImage>>,
}

impl TrainingSamples {
    pub fn new() -> TrainingSamples {
        TrainingSamples::default()
    }

    pub fn add(&mut self, digit: u8, canvas: GrayImage) {
        self.samples.entry(digit).or_insert_with(Vec::new).push(canvas);
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Element-wise mean per digit, rounded to the nearest pixel value.
    /// Averaging over the stack evens out stroke differences between the
    /// sample cells.
    fn averaged(&self) -> TemplateBank {
        let mut bank = TemplateBank::new();
        for (&digit, canvases) in &self.samples {
            let first = match canvases.first() {
                Some(first) => first,
                None => continue,
            };
            let (width, height) = first.dimensions();
            let mut sums = vec![0u32; (width * height) as usize];
            for canvas in canvases {
                for (i, p) in canvas.pixels().enumerate() {
                    sums[i] += p[0] as u32;
                }
            }
            let count = canvases.len() as u32;
            let template = GrayImage::from_fn(width, height, |x, y| {
                Luma([((sums[(y * width + x) as usize] + count / 2) / count) as u8])
            });
            bank.insert(digit, template);
        }
        bank
    }
}

/// On-disk bank of digit templates, one PNG per digit.
///
/// Template files are named `d0.png` through `d9.png` inside the store
/// directory, so the bank needs no index file. Writes go through a
/// temporary file and a rename, and a reader that loses the race sees
/// either the old or the new template, never a torn file.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> TemplateStore {
        TemplateStore { dir: dir.into() }
    }

    /// Store rooted at the directory named by the `TEMPL_DIR`
    /// environment variable, or `storage/templates` when unset.
    pub fn from_env() -> TemplateStore {
        let dir = env::var(TEMPLATE_DIR_VAR).unwrap_or_else(|_| DEFAULT_TEMPLATE_DIR.to_string());
        TemplateStore::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn template_path(&self, digit: u8) -> PathBuf {
        self.dir.join(format!("d{}.png", digit))
    }

    /// True iff every digit 0-9 has a template file.
    pub fn available(&self) -> bool {
        (0..10).all(|digit| self.template_path(digit).exists())
    }

    /// Load the templates that currently exist on disk.
    ///
    /// Missing digits are skipped so a partial bank loads cleanly; a
    /// file that exists but does not decode is an error, so a broken
    /// store gets noticed instead of passing for untrained.
    pub fn load(&self) -> Result<TemplateBank, Error> {
        let mut bank = TemplateBank::new();
        for digit in 0..10 {
            let path = self.template_path(digit);
            if !path.exists() {
                continue;
            }
            let image = image::open(&path).map_err(|source| Error::TemplateRead {
                path: path.display().to_string(),
                source,
            })?;
            bank.insert(digit, image.into_luma8());
        }
        Ok(bank)
    }

    /// Average the samples and persist one template per digit that has
    /// any, leaving every other digit's file untouched. The directory is
    /// created on the first write.
    pub fn train(&self, samples: &TrainingSamples) -> Result<(), Error> {
        if samples.is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir)?;
        for (digit, template) in samples.averaged() {
            let staged = self.dir.join(format!("d{}.tmp.png", digit));
            template.save(&staged)?;
            let path = self.template_path(digit);
            fs::rename(&staged, &path)?;
            debug!("saved template {}", path.display());
        }
        Ok(())
    }
}
