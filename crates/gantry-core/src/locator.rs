//! Image locator parsing.
//!
//! The shim only reads images from the local filesystem. Locators are
//! either bare paths or empty-authority `file:///` URIs; a network
//! scheme or a `file://host/...` authority is rejected up front rather
//! than half-supported.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GantryError;

/// A resolved location of a module image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ImageLocator {
    /// Local file: `file:///path/to/module.wasm` or `./relative/path.wasm`
    File { path: PathBuf },
}

impl ImageLocator {
    pub fn parse(uri: &str) -> Result<Self, GantryError> {
        if let Some(rest) = uri.strip_prefix("file://") {
            // Only the empty-authority form `file:///abs/path` is accepted;
            // `file://host/path` would otherwise be misread as a relative path.
            if rest.is_empty() || !rest.starts_with('/') {
                return Err(GantryError::InvalidLocator(uri.to_string()));
            }
            Ok(ImageLocator::File { path: PathBuf::from(rest) })
        } else if let Some((scheme, _)) = uri.split_once("://") {
            Err(GantryError::UnsupportedScheme(scheme.to_string()))
        } else {
            Ok(ImageLocator::File { path: PathBuf::from(uri) })
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ImageLocator::File { path } => path,
        }
    }

    /// Human-readable image name: the file stem, or the full path if the
    /// stem cannot be extracted.
    pub fn image_name(&self) -> String {
        self.path()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path().display().to_string())
    }
}
