use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Error decoding an input image
    #[error("Image could not be decoded")]
    Image(#[from] image::error::ImageError),
    /// Error reading or writing the template directory
    #[error("Template store I/O failed")]
    Io(#[from] io::Error),
    /// A template file exists but is not a readable image
    #[error("Template {path} could not be decoded")]
    TemplateRead {
        path: String,
        source: image::error::ImageError,
    },
    #[error("Expected 25 labels, got {0}")]
    LabelCount(usize),
}
