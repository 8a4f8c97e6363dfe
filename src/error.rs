//! Error types for the PDF branding library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF branding library
#[derive(Error, Debug)]
pub enum Error {
    /// Input bytes could not be loaded as a PDF document
    #[error("Failed to load PDF: {0}")]
    Load(#[source] lopdf::Error),

    /// No supported raster codec accepted an image buffer
    #[error("Could not decode {asset} image ({})", .failures.join("; "))]
    ImageDecode {
        /// Which asset failed ("logo", "footer", or a file name)
        asset: String,
        /// One entry per codec tried, in order
        failures: Vec<String>,
    },

    /// Serializing the stamped document failed
    #[error("Failed to save PDF: {0}")]
    Save(#[source] std::io::Error),

    /// PDF structure error while editing pages
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// No files matched pattern
    #[error("No PDF files found matching pattern: {0}")]
    NoFilesMatched(String),

    /// File name rejected by the mock drive
    #[error("Invalid file name: {0:?}")]
    InvalidFilename(String),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
