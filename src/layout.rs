//! Page layout calculations for the branding overlay
//!
//! All coordinates are PDF user-space points with the origin at the
//! bottom-left corner of the page.

use crate::pdf::text::helvetica_text_width;

/// Height of the header band reserved for the logo, measured from the top
pub const HEADER_HEIGHT: f32 = 150.0;
/// Largest width a logo may be scaled to
pub const LOGO_MAX_WIDTH: f32 = 300.0;
/// Largest height a logo may be scaled to
pub const LOGO_MAX_HEIGHT: f32 = 280.0;
/// Gap between the logo and the right edge of the page
pub const LOGO_MARGIN: f32 = 1.0;
/// Downward shift applied after centering the logo in the header band
pub const HEADER_TOP_PADDING: f32 = 5.0;
/// Target height of the footer image
pub const FOOTER_HEIGHT: f32 = 850.0;
/// Distance of the footer image from the bottom edge
pub const FOOTER_BOTTOM_MARGIN: f32 = 20.0;
/// Baseline of the fallback footer text
pub const FOOTER_TEXT_BASELINE: f32 = 30.0;
/// Font size of the fallback footer text
pub const FOOTER_FONT_SIZE: f32 = 10.0;
/// Points per character used by the legacy centering estimate
pub const CHAR_WIDTH_ESTIMATE: f32 = 3.0;

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// US Letter size (8.5" × 11")
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// A4 size (210mm × 297mm)
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }
}

/// Intrinsic pixel dimensions of a raster image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// A rectangle to draw an image into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Baseline origin for a run of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextOrigin {
    pub x: f32,
    pub y: f32,
}

/// How the fallback footer text is centered horizontally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextCentering {
    /// `W / 2 - chars * 3`, the historical estimate. Kept as the default so
    /// existing output does not move.
    #[default]
    CharEstimate,
    /// Center on the real Helvetica advance width of the text
    Measured,
}

/// Place the logo in the top-right corner of the header band
///
/// The image is scaled uniformly so that it fits inside
/// `LOGO_MAX_WIDTH × LOGO_MAX_HEIGHT`, then right-aligned and vertically
/// centered in the band.
pub fn logo_placement(page: PageSize, image: ImageSize) -> Placement {
    let img_w = image.width as f32;
    let img_h = image.height as f32;

    let scale = (LOGO_MAX_WIDTH / img_w).min(LOGO_MAX_HEIGHT / img_h);
    let width = img_w * scale;
    let height = img_h * scale;

    let header_bottom = page.height - HEADER_HEIGHT;

    Placement {
        x: page.width - width - LOGO_MARGIN,
        y: header_bottom + (HEADER_HEIGHT - height) / 2.0 + HEADER_TOP_PADDING,
        width,
        height,
    }
}

/// Place the footer image centered at the bottom of the page
///
/// The height is fixed at `FOOTER_HEIGHT` and the vertical position does not
/// depend on the page height, so tall footers can cover page content.
pub fn footer_image_placement(page: PageSize, image: ImageSize) -> Placement {
    let scale = FOOTER_HEIGHT / image.height as f32;
    let width = image.width as f32 * scale;

    Placement {
        x: (page.width - width) / 2.0,
        y: FOOTER_BOTTOM_MARGIN,
        width,
        height: FOOTER_HEIGHT,
    }
}

/// Origin of the fallback footer text
pub fn footer_text_origin(page: PageSize, text: &str, centering: TextCentering) -> TextOrigin {
    let x = match centering {
        TextCentering::CharEstimate => {
            page.width / 2.0 - text.encode_utf16().count() as f32 * CHAR_WIDTH_ESTIMATE
        }
        TextCentering::Measured => {
            (page.width - helvetica_text_width(text, FOOTER_FONT_SIZE)) / 2.0
        }
    };

    TextOrigin {
        x,
        y: FOOTER_TEXT_BASELINE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn test_logo_width_bound() {
        // 600×400: min(0.5, 0.7) = 0.5
        let p = logo_placement(PageSize::letter(), ImageSize { width: 600, height: 400 });
        assert!(approx(p.width, 300.0));
        assert!(approx(p.height, 200.0));
        assert!(approx(p.x, 612.0 - 300.0 - 1.0));
        // 642 + (150 - 200) / 2 + 5
        assert!(approx(p.y, 622.0));
    }

    #[test]
    fn test_logo_height_bound() {
        // 100×400: min(3.0, 0.7) = 0.7
        let p = logo_placement(PageSize::letter(), ImageSize { width: 100, height: 400 });
        assert!(approx(p.width, 70.0));
        assert!(approx(p.height, 280.0));
        assert!(approx(p.x, 541.0));
        assert!(approx(p.y, 642.0 - 65.0 + 5.0));
    }

    #[test]
    fn test_small_logo_is_scaled_up() {
        let p = logo_placement(PageSize::letter(), ImageSize { width: 30, height: 28 });
        assert!(approx(p.width, 300.0));
        assert!(approx(p.height, 280.0));
    }

    #[test]
    fn test_logo_keeps_aspect_ratio() {
        let image = ImageSize { width: 1234, height: 567 };
        let p = logo_placement(PageSize::a4(), image);
        assert!(approx(p.width / p.height, 1234.0 / 567.0));
    }

    #[test]
    fn test_footer_image_placement() {
        let image = ImageSize { width: 500, height: 400 };
        for page in [PageSize::letter(), PageSize::a4(), PageSize::new(612.0, 200.0)] {
            let p = footer_image_placement(page, image);
            assert!(approx(p.width, 1062.5));
            assert!(approx(p.height, 850.0));
            assert!(approx(p.x, (page.width - 1062.5) / 2.0));
            assert!(approx(p.y, 20.0));
        }
    }

    #[test]
    fn test_footer_text_char_estimate() {
        let origin = footer_text_origin(PageSize::letter(), "Page 1 of 3", TextCentering::CharEstimate);
        assert!(approx(origin.x, 273.0));
        assert!(approx(origin.y, 30.0));
    }

    #[test]
    fn test_footer_text_counts_chars_not_bytes() {
        let origin = footer_text_origin(PageSize::letter(), "Café", TextCentering::CharEstimate);
        assert!(approx(origin.x, 306.0 - 12.0));
    }

    #[test]
    fn test_footer_text_counts_utf16_units() {
        // U+1F600 is a surrogate pair: two units, one char
        let origin = footer_text_origin(PageSize::letter(), "Hi \u{1F600}", TextCentering::CharEstimate);
        assert!(approx(origin.x, 306.0 - 5.0 * 3.0));
    }

    #[test]
    fn test_footer_text_measured() {
        let text = "Page 1 of 3";
        let origin = footer_text_origin(PageSize::letter(), text, TextCentering::Measured);
        let width = helvetica_text_width(text, FOOTER_FONT_SIZE);
        assert!(approx(origin.x * 2.0 + width, 612.0));
        assert!(approx(origin.y, 30.0));
    }
}
