//! Helpers for PDFs referenced by URL
//!
//! Fetching is left to the caller; these only rewrite and name URLs.

/// Name used when a URL has no usable last path segment
pub const DEFAULT_FILENAME: &str = "document.pdf";

/// Rewrite a Google Drive "view" link into a direct download link
///
/// `https://drive.google.com/file/d/<id>/view?...` becomes
/// `https://drive.google.com/uc?export=download&id=<id>`. Any other URL is
/// returned unchanged.
pub fn normalize_drive_url(url: &str) -> String {
    if url.contains("drive.google.com/file/d/") && url.contains("/view") {
        if let Some(file_id) = url
            .split_once("/d/")
            .and_then(|(_, rest)| rest.split('/').next())
            .filter(|id| !id.is_empty())
        {
            return format!("https://drive.google.com/uc?export=download&id={}", file_id);
        }
    }
    url.to_string()
}

/// File name for a PDF fetched from `url`
///
/// The last path segment with any query string removed.
pub fn filename_from_url(url: &str) -> String {
    let last = url.rsplit('/').next().unwrap_or("");
    let name = last.split(['?', '#']).next().unwrap_or("");
    if name.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drive_view_link() {
        assert_eq!(
            normalize_drive_url("https://drive.google.com/file/d/abc123XYZ/view?usp=sharing"),
            "https://drive.google.com/uc?export=download&id=abc123XYZ"
        );
    }

    #[test]
    fn test_normalize_leaves_other_urls() {
        let url = "https://example.com/reports/q3.pdf";
        assert_eq!(normalize_drive_url(url), url);
        // Not a view link
        let edit = "https://drive.google.com/file/d/abc/edit";
        assert_eq!(normalize_drive_url(edit), edit);
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(filename_from_url("https://example.com/a/report.pdf?token=1"), "report.pdf");
        assert_eq!(filename_from_url("https://example.com/a/"), DEFAULT_FILENAME);
        assert_eq!(filename_from_url("https://example.com/x.pdf#page=2"), "x.pdf");
    }
}
