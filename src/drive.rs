//! Mock remote storage for stamped reports
//!
//! Stands in for a cloud drive upload: files land in a local directory and
//! the receipt carries a fake drive link. Nothing here talks to a network.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};

/// Response of a mock upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub id: String,
    pub drive_link: String,
}

/// Local directory pretending to be a drive
#[derive(Debug, Clone)]
pub struct MockDrive {
    root: PathBuf,
}

impl MockDrive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `bytes` as `filename` and return the receipt
    pub fn upload(&self, filename: &str, bytes: &[u8]) -> Result<UploadReceipt> {
        validate_filename(filename)?;

        std::fs::create_dir_all(&self.root)?;
        let path = self.root.join(filename);
        std::fs::write(&path, bytes)?;
        info!("Mock upload of {} bytes to {}", bytes.len(), path.display());

        Ok(UploadReceipt {
            id: format!("mock_drive_id_{}", filename),
            drive_link: format!("https://drive.google.com/mock/{}", filename),
        })
    }
}

/// Only bare file names are accepted; anything that could escape the root is rejected
fn validate_filename(filename: &str) -> Result<()> {
    let bad = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0']);
    if bad {
        return Err(Error::InvalidFilename(filename.to_string()));
    }
    Ok(())
}
