//! Raster decoding for branding assets and embedding as PDF image XObjects

use std::fmt;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::{ColorType, DynamicImage, ImageFormat};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::error::{Error, Result};
use crate::layout::ImageSize;

/// Raster formats accepted for logo and footer assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    /// Lossless, possibly indexed or with alpha
    Png,
    /// Lossy photographic
    Jpeg,
}

/// Codecs are tried in this order; the first one that decodes wins
pub const DECODE_ORDER: [RasterFormat; 2] = [RasterFormat::Png, RasterFormat::Jpeg];

impl RasterFormat {
    fn image_format(self) -> ImageFormat {
        match self {
            RasterFormat::Png => ImageFormat::Png,
            RasterFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterFormat::Png => write!(f, "PNG"),
            RasterFormat::Jpeg => write!(f, "JPEG"),
        }
    }
}

/// A decoded logo or footer image
#[derive(Debug, Clone)]
pub struct BrandingImage {
    format: RasterFormat,
    size: ImageSize,
    encoded: Vec<u8>,
    pixels: DynamicImage,
}

impl BrandingImage {
    /// Decode an image buffer, trying each codec in `DECODE_ORDER`
    ///
    /// `asset` names the buffer in the error if no codec accepts it.
    pub fn decode(bytes: &[u8], asset: &str) -> Result<Self> {
        let mut failures = Vec::with_capacity(DECODE_ORDER.len());

        for format in DECODE_ORDER {
            match image::load_from_memory_with_format(bytes, format.image_format()) {
                Ok(pixels) => {
                    let size = ImageSize {
                        width: pixels.width(),
                        height: pixels.height(),
                    };
                    debug!(asset, %format, width = size.width, height = size.height, "decoded image");
                    return Ok(Self {
                        format,
                        size,
                        encoded: bytes.to_vec(),
                        pixels,
                    });
                }
                Err(e) => failures.push(format!("{}: {}", format, e)),
            }
        }

        Err(Error::ImageDecode {
            asset: asset.to_string(),
            failures,
        })
    }

    /// The codec that accepted the buffer
    pub fn format(&self) -> RasterFormat {
        self.format
    }

    /// Intrinsic size in pixels
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Add this image to `doc` as an image XObject and return its object ID
    pub fn embed(&self, doc: &mut Document) -> Result<ObjectId> {
        if self.format == RasterFormat::Jpeg {
            if let Some(color_space) = jpeg_passthrough_color_space(&self.encoded, self.pixels.color()) {
                let dict = image_dictionary(self.size, color_space, "DCTDecode");
                return Ok(doc.add_object(Stream::new(dict, self.encoded.clone())));
            }
        }

        let smask_id = if self.pixels.color().has_alpha() {
            let alpha: Vec<u8> = self.pixels.to_rgba8().pixels().map(|p| p.0[3]).collect();
            let dict = image_dictionary(self.size, "DeviceGray", "FlateDecode");
            Some(doc.add_object(Stream::new(dict, zlib_compress(&alpha)?)))
        } else {
            None
        };

        let rgb = self.pixels.to_rgb8();
        let mut dict = image_dictionary(self.size, "DeviceRGB", "FlateDecode");
        if let Some(id) = smask_id {
            dict.set("SMask", Object::Reference(id));
        }

        let mut stream = Stream::new(dict, zlib_compress(rgb.as_raw())?);
        // Already Flate-encoded
        stream.allows_compression = false;
        Ok(doc.add_object(stream))
    }
}

fn image_dictionary(size: ImageSize, color_space: &str, filter: &str) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(size.width as i64));
    dict.set("Height", Object::Integer(size.height as i64));
    dict.set("ColorSpace", Object::Name(color_space.as_bytes().to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(filter.as_bytes().to_vec()));
    dict
}

/// Color space for embedding a JPEG as-is, or `None` if it must be re-encoded
///
/// CMYK JPEGs are decoded to RGB by the image crate, so their raw data would
/// not match a DeviceRGB declaration.
fn jpeg_passthrough_color_space(data: &[u8], color: ColorType) -> Option<&'static str> {
    match jpeg_component_count(data)? {
        1 if color == ColorType::L8 => Some("DeviceGray"),
        3 => Some("DeviceRGB"),
        _ => None,
    }
}

/// Read the number of color components from the first JPEG frame header
fn jpeg_component_count(data: &[u8]) -> Option<u8> {
    let mut i = 2; // skip SOI
    while i + 9 < data.len() {
        if data[i] != 0xFF {
            return None;
        }
        let marker = data[i + 1];
        // SOF0..SOF15, except DHT (C4), JPG (C8) and DAC (CC)
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            return Some(data[i + 9]);
        }
        let len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + len;
    }
    None
}

fn zlib_compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
