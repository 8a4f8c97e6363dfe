//! Branding assets: where logo and footer images come from
//!
//! Assets are fetched by name from an [`AssetSource`] and decoded once into a
//! [`Branding`] bundle. The bundle is a plain value owned by the caller and
//! can be reused for any number of documents.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::layout::TextCentering;
use crate::pdf::raster::BrandingImage;
use crate::pdf::stamp::StampOptions;

/// Conventional file name of the logo asset
pub const LOGO_ASSET: &str = "logo.png";
/// Conventional file name of the footer asset
pub const FOOTER_ASSET: &str = "Footer.png";

/// Supplies raw asset bytes by name
pub trait AssetSource {
    /// Bytes of the named asset, or `None` if the source does not have it
    fn fetch(&self, name: &str) -> Result<Option<Vec<u8>>>;
}

/// Assets stored as files in one directory
#[derive(Debug, Clone)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssetSource {
    fn fetch(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.root.join(name);
        match std::fs::read(&path) {
            Ok(bytes) => {
                debug!("Loaded asset {} ({} bytes)", path.display(), bytes.len());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No asset at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// Decoded logo and footer images
#[derive(Debug, Clone, Default)]
pub struct Branding {
    pub logo: Option<Arc<BrandingImage>>,
    pub footer: Option<Arc<BrandingImage>>,
}

impl Branding {
    /// Fetch and decode the conventional assets from a source
    ///
    /// Missing assets are simply absent. An asset that exists but cannot be
    /// decoded is an error.
    pub fn load(source: &dyn AssetSource) -> Result<Self> {
        let branding = Self {
            logo: decode_asset(source.fetch(LOGO_ASSET)?, "logo")?,
            footer: decode_asset(source.fetch(FOOTER_ASSET)?, "footer")?,
        };
        info!(
            "Branding loaded: logo {}, footer {}",
            if branding.logo.is_some() { "present" } else { "absent" },
            if branding.footer.is_some() { "present" } else { "absent" },
        );
        Ok(branding)
    }

    /// Decode assets from explicit file paths
    ///
    /// Unlike [`Branding::load`], a path that was asked for but does not
    /// exist is an error.
    pub fn from_paths(logo: Option<&Path>, footer: Option<&Path>) -> Result<Self> {
        Ok(Self {
            logo: decode_asset(logo.map(read_required).transpose()?, "logo")?,
            footer: decode_asset(footer.map(read_required).transpose()?, "footer")?,
        })
    }

    /// Explicit paths where given, conventional assets for the rest
    ///
    /// An overridden asset is never fetched from the source, so a broken
    /// conventional file cannot fail a run that does not use it.
    pub fn load_with_overrides(
        source: &dyn AssetSource,
        logo: Option<&Path>,
        footer: Option<&Path>,
    ) -> Result<Self> {
        let logo_bytes = match logo {
            Some(path) => Some(read_required(path)?),
            None => source.fetch(LOGO_ASSET)?,
        };
        let footer_bytes = match footer {
            Some(path) => Some(read_required(path)?),
            None => source.fetch(FOOTER_ASSET)?,
        };
        Ok(Self {
            logo: decode_asset(logo_bytes, "logo")?,
            footer: decode_asset(footer_bytes, "footer")?,
        })
    }

    /// Options that stamp this branding, sharing the decoded images
    pub fn stamp_options(&self, footer_text: Option<String>, text_centering: TextCentering) -> StampOptions {
        StampOptions {
            logo: self.logo.clone(),
            footer_image: self.footer.clone(),
            footer_text,
            text_centering,
        }
    }
}

fn decode_asset(bytes: Option<Vec<u8>>, asset: &str) -> Result<Option<Arc<BrandingImage>>> {
    bytes
        .map(|b| BrandingImage::decode(&b, asset).map(Arc::new))
        .transpose()
}

fn read_required(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::collections::HashMap;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// In-memory source for tests
    struct MapSource(HashMap<&'static str, Vec<u8>>);

    impl AssetSource for MapSource {
        fn fetch(&self, name: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.0.get(name).cloned())
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([0, 128, 255])))
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_load_from_empty_source() {
        let branding = Branding::load(&MapSource(HashMap::new())).unwrap();
        assert!(branding.logo.is_none());
        assert!(branding.footer.is_none());
    }

    #[test]
    fn test_load_logo_only() {
        let source = MapSource(HashMap::from([(LOGO_ASSET, png(600, 400))]));
        let branding = Branding::load(&source).unwrap();
        assert_eq!(branding.logo.unwrap().size().width, 600);
        assert!(branding.footer.is_none());
    }

    #[test]
    fn test_load_fails_on_bad_asset() {
        let source = MapSource(HashMap::from([
            (LOGO_ASSET, png(10, 10)),
            (FOOTER_ASSET, b"garbage".to_vec()),
        ]));
        let err = Branding::load(&source).unwrap_err();
        assert!(matches!(err, Error::ImageDecode { ref asset, .. } if asset == "footer"));
    }

    #[test]
    fn test_dir_source_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let source = DirAssetSource::new(dir.path());
        assert!(source.fetch(LOGO_ASSET).unwrap().is_none());
    }

    #[test]
    fn test_dir_source_reads_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(FOOTER_ASSET), png(500, 400)).unwrap();

        let branding = Branding::load(&DirAssetSource::new(dir.path())).unwrap();
        assert!(branding.logo.is_none());
        assert_eq!(branding.footer.unwrap().size().height, 400);
    }

    #[test]
    fn test_from_paths_missing_is_error() {
        let err = Branding::from_paths(Some(Path::new("no/such/logo.png")), None).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_override_skips_broken_conventional_asset() {
        let dir = TempDir::new().unwrap();
        let logo_path = dir.path().join("brand.png");
        std::fs::write(&logo_path, png(40, 20)).unwrap();

        let source = MapSource(HashMap::from([
            (LOGO_ASSET, b"not an image".to_vec()),
            (FOOTER_ASSET, png(500, 400)),
        ]));
        let branding = Branding::load_with_overrides(&source, Some(&logo_path), None).unwrap();
        assert_eq!(branding.logo.unwrap().size().width, 40);
        assert_eq!(branding.footer.unwrap().size().width, 500);
    }

    #[test]
    fn test_override_still_decodes_the_rest() {
        let dir = TempDir::new().unwrap();
        let logo_path = dir.path().join("brand.png");
        std::fs::write(&logo_path, png(40, 20)).unwrap();

        let source = MapSource(HashMap::from([(FOOTER_ASSET, b"garbage".to_vec())]));
        let err = Branding::load_with_overrides(&source, Some(&logo_path), None).unwrap_err();
        assert!(matches!(err, Error::ImageDecode { ref asset, .. } if asset == "footer"));
    }

    #[test]
    fn test_stamp_options_share_images() {
        let source = MapSource(HashMap::from([(LOGO_ASSET, png(30, 30))]));
        let branding = Branding::load(&source).unwrap();

        let a = branding.stamp_options(None, TextCentering::CharEstimate);
        let b = branding.stamp_options(Some("x".into()), TextCentering::Measured);
        assert!(Arc::ptr_eq(a.logo.as_ref().unwrap(), b.logo.as_ref().unwrap()));
        assert_eq!(b.footer_text.as_deref(), Some("x"));
    }
}
