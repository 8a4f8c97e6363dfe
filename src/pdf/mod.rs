//! PDF manipulation module

pub mod raster;
pub mod metadata;
pub mod stamp;
pub mod text;

// Re-export commonly used items
pub use raster::{BrandingImage, RasterFormat, DECODE_ORDER};
pub use metadata::{count_pages, extract_metadata, extract_metadata_from_bytes, PdfMetadata};
pub use stamp::{
    load_document, plan_page, save_document, stamp_bytes, stamp_document, write_document, Asset,
    DrawOp, StampOptions,
};
