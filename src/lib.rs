//! PDF Branding Library
//!
//! Stamps a logo and a footer onto every page of a PDF report.
//! This library provides functionality to:
//! - Decode PNG or JPEG branding assets
//! - Place a logo in the header band and a footer image or text at the bottom
//! - Inspect page counts and sizes
//! - Hand stamped reports to a mock drive or a share link
//!
//! # Example
//!
//! ```no_run
//! use pdf_branding::branding::{Branding, DirAssetSource};
//! use pdf_branding::layout::TextCentering;
//! use pdf_branding::pdf::stamp_bytes;
//!
//! let branding = Branding::load(&DirAssetSource::new("assets")).expect("bad branding asset");
//! let options = branding.stamp_options(None, TextCentering::default());
//!
//! let pdf = std::fs::read("report.pdf").unwrap();
//! let stamped = stamp_bytes(&pdf, &options).expect("Failed to stamp PDF");
//! std::fs::write("processed/report.pdf", stamped).unwrap();
//! ```

pub mod branding;
pub mod drive;
pub mod error;
pub mod layout;
pub mod pdf;
pub mod share;
pub mod source;

// Re-export commonly used items
pub use error::{Error, Result};
