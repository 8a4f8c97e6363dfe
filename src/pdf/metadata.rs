//! PDF metadata extraction

use std::path::Path;
use lopdf::{Document, Object};
use crate::error::{Error, Result};
use crate::layout::PageSize;
use crate::pdf::stamp::{load_document, page_size};

/// PDF metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Size of each page, in document order
    pub page_sizes: Vec<PageSize>,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
}

/// Extract metadata from an in-memory PDF
pub fn extract_metadata_from_bytes(pdf: &[u8]) -> Result<PdfMetadata> {
    let doc = load_document(pdf)?;
    document_metadata(&doc)
}

/// Extract metadata from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    extract_metadata_from_bytes(&bytes)
}

/// Metadata of an already loaded document
pub fn document_metadata(doc: &Document) -> Result<PdfMetadata> {
    let page_sizes = doc
        .get_pages()
        .into_values()
        .map(|page_id| page_size(doc, page_id))
        .collect::<Result<Vec<_>>>()?;

    Ok(PdfMetadata {
        page_count: page_sizes.len(),
        page_sizes,
        title: info_string(doc, b"Title"),
        author: info_string(doc, b"Author"),
    })
}

/// Count the number of pages in a PDF file
pub fn count_pages(path: &Path) -> Result<usize> {
    Ok(extract_metadata(path)?.page_count)
}

/// Read a text entry from the trailer's Info dictionary
fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info = match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };

    let bytes = info.get(key).ok()?.as_str().ok()?;
    String::from_utf8(bytes.to_vec()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_pages_nonexistent_file() {
        let result = count_pages(Path::new("nonexistent.pdf"));
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_extract_metadata_nonexistent_file() {
        let result = extract_metadata(Path::new("nonexistent.pdf"));
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_extract_metadata_rejects_garbage() {
        let result = extract_metadata_from_bytes(b"not a pdf at all");
        assert!(matches!(result.unwrap_err(), Error::Load(_)));
    }

    // Metadata of real documents is covered in tests/integration.rs
}
