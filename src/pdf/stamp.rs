//! Stamp a logo and footer onto every page of a PDF using lopdf
//!
//! The overlay is written as a new content stream appended to each page. The
//! page's original streams are wrapped in `q`/`Q` first, so whatever graphics
//! state they leave behind cannot move or scale the overlay. Nothing in the
//! original content is removed or rewritten.

use std::io::Write;
use std::sync::Arc;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::layout::{
    footer_image_placement, footer_text_origin, logo_placement, PageSize, Placement,
    TextCentering, TextOrigin, FOOTER_FONT_SIZE,
};
use crate::pdf::raster::BrandingImage;
use crate::pdf::text::{add_helvetica_font, encode_win_ansi, hex_string};

/// Fill color of the fallback footer text (30% grey)
const FOOTER_TEXT_GRAY: f32 = 0.3;

/// Depth limit when walking `/Parent` links for inherited attributes
const MAX_INHERITANCE_DEPTH: usize = 64;

/// What to stamp onto each page
///
/// Every field is independent; a default value stamps nothing.
#[derive(Debug, Clone, Default)]
pub struct StampOptions {
    /// Logo drawn in the top-right header band
    pub logo: Option<Arc<BrandingImage>>,
    /// Image drawn centered at the bottom of the page
    pub footer_image: Option<Arc<BrandingImage>>,
    /// Text drawn at the bottom when there is no footer image
    pub footer_text: Option<String>,
    /// Horizontal centering rule for `footer_text`
    pub text_centering: TextCentering,
}

impl StampOptions {
    /// Build options from raw image buffers
    ///
    /// Each present buffer is decoded up front, so an undecodable asset fails
    /// here before any page is touched.
    pub fn from_bytes(
        logo: Option<&[u8]>,
        footer_image: Option<&[u8]>,
        footer_text: Option<String>,
    ) -> Result<Self> {
        let logo = logo
            .map(|bytes| BrandingImage::decode(bytes, "logo"))
            .transpose()?
            .map(Arc::new);
        let footer_image = footer_image
            .map(|bytes| BrandingImage::decode(bytes, "footer"))
            .transpose()?
            .map(Arc::new);

        Ok(Self {
            logo,
            footer_image,
            footer_text,
            text_centering: TextCentering::default(),
        })
    }

    /// Footer text that will actually be drawn, if any
    fn effective_footer_text(&self) -> Option<&str> {
        if self.footer_image.is_some() {
            return None;
        }
        self.footer_text.as_deref().filter(|t| !t.is_empty())
    }
}

/// Which branding image a draw refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    Logo,
    Footer,
}

/// One drawing operation planned for a page
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Image { asset: Asset, placement: Placement },
    Text { text: String, origin: TextOrigin, font_size: f32 },
}

/// Work out what to draw on a page of the given size
pub fn plan_page(page: PageSize, options: &StampOptions) -> Vec<DrawOp> {
    let mut ops = Vec::new();

    if let Some(logo) = &options.logo {
        ops.push(DrawOp::Image {
            asset: Asset::Logo,
            placement: logo_placement(page, logo.size()),
        });
    }

    if let Some(footer) = &options.footer_image {
        ops.push(DrawOp::Image {
            asset: Asset::Footer,
            placement: footer_image_placement(page, footer.size()),
        });
    } else if let Some(text) = options.effective_footer_text() {
        ops.push(DrawOp::Text {
            text: text.to_string(),
            origin: footer_text_origin(page, text, options.text_centering),
            font_size: FOOTER_FONT_SIZE,
        });
    }

    ops
}

/// Load a PDF from memory
pub fn load_document(pdf: &[u8]) -> Result<Document> {
    Document::load_mem(pdf).map_err(Error::Load)
}

/// Serialize a document to bytes
pub fn save_document(doc: &mut Document) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_document(doc, &mut out)?;
    Ok(out)
}

/// Serialize a document into any writer
pub fn write_document<W: Write>(doc: &mut Document, target: &mut W) -> Result<()> {
    doc.save_to(target).map_err(Error::Save)
}

/// Load, stamp and serialize a PDF in one call
///
/// # Example
///
/// ```no_run
/// use pdf_branding::pdf::{stamp_bytes, StampOptions};
///
/// let pdf = std::fs::read("report.pdf").unwrap();
/// let logo = std::fs::read("assets/logo.png").unwrap();
///
/// let options = StampOptions::from_bytes(Some(&logo), None, Some("Confidential".into()))
///     .expect("logo should decode");
/// let stamped = stamp_bytes(&pdf, &options).expect("stamping failed");
/// std::fs::write("branded.pdf", stamped).unwrap();
/// ```
pub fn stamp_bytes(pdf: &[u8], options: &StampOptions) -> Result<Vec<u8>> {
    let mut doc = load_document(pdf)?;
    stamp_document(&mut doc, options)?;
    save_document(&mut doc)
}

/// Stamp every page of a loaded document in place
///
/// Returns the number of pages visited.
pub fn stamp_document(doc: &mut Document, options: &StampOptions) -> Result<usize> {
    // Collect page IDs first (to avoid borrow issues)
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();

    let logo_id = options.logo.as_ref().map(|img| img.embed(doc)).transpose()?;
    let footer_id = options.footer_image.as_ref().map(|img| img.embed(doc)).transpose()?;
    let font_id = options.effective_footer_text().map(|_| add_helvetica_font(doc));

    for page_id in &pages {
        let size = page_size(doc, *page_id)?;
        let ops = plan_page(size, options);
        if ops.is_empty() {
            continue;
        }
        debug!(?page_id, width = size.width, height = size.height, ops = ops.len(), "stamping page");

        let mut resources = page_resources(doc, *page_id)?;
        let mut xobjects = resolve_subdictionary(doc, &resources, b"XObject");
        let mut fonts = resolve_subdictionary(doc, &resources, b"Font");

        let logo_name = logo_id.map(|id| register(&mut xobjects, "BrandLogo", id));
        let footer_name = footer_id.map(|id| register(&mut xobjects, "BrandFooter", id));
        let font_name = font_id.map(|id| register(&mut fonts, "BrandFont", id));

        if logo_name.is_some() || footer_name.is_some() {
            resources.set("XObject", Object::Dictionary(xobjects));
        }
        if font_name.is_some() {
            resources.set("Font", Object::Dictionary(fonts));
        }
        set_page_entry(doc, *page_id, "Resources", Object::Dictionary(resources))?;

        let names = ResourceNames {
            logo: logo_name.as_deref(),
            footer: footer_name.as_deref(),
            font: font_name.as_deref(),
        };
        let overlay = overlay_content(&ops, &names);

        let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let overlay_id = doc.add_object(Stream::new(Dictionary::new(), overlay.into_bytes()));
        prepend_content_to_page(doc, *page_id, save_id)?;
        append_content_to_page(doc, *page_id, overlay_id)?;
    }

    info!("Stamped {} page(s)", pages.len());
    Ok(pages.len())
}

/// Resource names the overlay refers to on one page
struct ResourceNames<'a> {
    logo: Option<&'a str>,
    footer: Option<&'a str>,
    font: Option<&'a str>,
}

/// Generate the overlay content stream for one page
///
/// Starts with `Q` to close the `q` prepended in front of the original content.
/// The leading newline keeps `Q` from fusing with the last token of the
/// preceding stream.
fn overlay_content(ops: &[DrawOp], names: &ResourceNames<'_>) -> String {
    let mut content = String::from("\nQ\n");

    for op in ops {
        match op {
            DrawOp::Image { asset, placement } => {
                let name = match asset {
                    Asset::Logo => names.logo,
                    Asset::Footer => names.footer,
                };
                let Some(name) = name else { continue };

                content.push_str("q\n");
                content.push_str(&format!(
                    "{} 0 0 {} {} {} cm\n",
                    placement.width, placement.height, placement.x, placement.y
                ));
                content.push_str(&format!("/{} Do\n", name));
                content.push_str("Q\n");
            }
            DrawOp::Text { text, origin, font_size } => {
                let Some(font) = names.font else { continue };

                content.push_str("q\n");
                content.push_str("BT\n");
                content.push_str(&format!(
                    "{g} {g} {g} rg\n",
                    g = FOOTER_TEXT_GRAY
                ));
                content.push_str(&format!("/{} {} Tf\n", font, font_size));
                content.push_str(&format!("{} {} Td\n", origin.x, origin.y));
                content.push_str(&format!("{} Tj\n", hex_string(&encode_win_ansi(text))));
                content.push_str("ET\n");
                content.push_str("Q\n");
            }
        }
    }

    content
}

/// Page width and height from `/MediaBox`, following inheritance
///
/// Falls back to US Letter when no box is found anywhere in the tree.
pub fn page_size(doc: &Document, page_id: ObjectId) -> Result<PageSize> {
    match inherited_attribute(doc, page_id, b"MediaBox")? {
        Some(media_box) => {
            let media_box = resolve(doc, &media_box);
            let values: Vec<f32> = media_box
                .as_array()?
                .iter()
                .map(|o| resolve(doc, o).as_float())
                .collect::<std::result::Result<_, _>>()?;
            if values.len() != 4 {
                warn!(?page_id, "MediaBox has {} entries, assuming Letter", values.len());
                return Ok(PageSize::letter());
            }
            Ok(PageSize::new(
                (values[2] - values[0]).abs(),
                (values[3] - values[1]).abs(),
            ))
        }
        None => {
            warn!(?page_id, "page has no MediaBox, assuming Letter");
            Ok(PageSize::letter())
        }
    }
}

/// Look up a page attribute on the page or its ancestors
fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Result<Option<Object>> {
    let mut node = doc.get_dictionary(page_id)?;

    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Ok(Some(value.clone()));
        }
        match node.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent_id) => node = doc.get_dictionary(parent_id)?,
            Err(_) => return Ok(None),
        }
    }

    Ok(None)
}

/// Follow a reference one level, leaving direct objects as they are
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// The page's effective Resources dictionary as an owned copy
///
/// The copy is later written directly onto the page, so inherited or
/// shared resources are never modified for other pages.
fn page_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let resources = match inherited_attribute(doc, page_id, b"Resources")? {
        Some(obj) => match resolve(doc, &obj) {
            Object::Dictionary(dict) => dict.clone(),
            _ => Dictionary::new(),
        },
        None => Dictionary::new(),
    };
    Ok(resources)
}

/// Copy a sub-dictionary (e.g. `/XObject`) out of a Resources dictionary
fn resolve_subdictionary(doc: &Document, resources: &Dictionary, key: &[u8]) -> Dictionary {
    match resources.get(key).map(|obj| resolve(doc, obj)) {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    }
}

/// Add `id` under a name starting with `prefix` that is not already taken
fn register(dict: &mut Dictionary, prefix: &str, id: ObjectId) -> String {
    let name = unique_name(dict, prefix);
    dict.set(name.clone(), Object::Reference(id));
    name
}

fn unique_name(dict: &Dictionary, prefix: &str) -> String {
    if !dict.has(prefix.as_bytes()) {
        return prefix.to_string();
    }
    (1..)
        .map(|n| format!("{}{}", prefix, n))
        .find(|name| !dict.has(name.as_bytes()))
        .unwrap_or_else(|| prefix.to_string())
}

fn set_page_entry(doc: &mut Document, page_id: ObjectId, key: &str, value: Object) -> Result<()> {
    let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page_dict.set(key, value);
    Ok(())
}

/// The page's `/Contents` as a list of stream references
fn content_references(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page_dict = doc.get_dictionary(page_id)?;

    let refs = match page_dict.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            // Indirect array of streams
            Ok(Object::Array(arr)) => arr.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(arr)) => arr.clone(),
        _ => Vec::new(),
    };

    Ok(refs)
}

/// Prepend a content stream to a page's Contents
fn prepend_content_to_page(doc: &mut Document, page_id: ObjectId, new_content_id: ObjectId) -> Result<()> {
    let mut contents = content_references(doc, page_id)?;
    contents.insert(0, Object::Reference(new_content_id));
    set_page_entry(doc, page_id, "Contents", Object::Array(contents))
}

/// Append a content stream to a page's Contents
///
/// Appended content is drawn after the original, so it sits on top.
fn append_content_to_page(doc: &mut Document, page_id: ObjectId, new_content_id: ObjectId) -> Result<()> {
    let mut contents = content_references(doc, page_id)?;
    contents.push(Object::Reference(new_content_id));
    set_page_entry(doc, page_id, "Contents", Object::Array(contents))
}
