//! Module image — the raw bytes of a guest module.
//!
//! The shim never interprets the image's internal structure; it carries
//! the bytes opaquely to instantiation. A SHA-256 digest is computed at
//! load time so logs can identify exactly which artifact ran.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::GantryError;
use crate::locator::ImageLocator;

/// An immutable module image, read once and passed opaquely to the runtime.
#[derive(Debug, Clone)]
pub struct ModuleImage {
    name: String,
    bytes: Vec<u8>,
    digest: String,
}

impl ModuleImage {
    /// Read an image from a parsed locator.
    pub fn from_locator(locator: &ImageLocator) -> Result<Self, GantryError> {
        Self::from_file(locator.path())
    }

    /// Read an image from a filesystem path.
    ///
    /// A missing file or a permission denial is reported as [`GantryError::Io`];
    /// it is never retried.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GantryError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_bytes(&name, bytes))
    }

    /// Wrap already-loaded bytes as an image.
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Self {
        let digest = hex::encode(Sha256::digest(&bytes));
        Self {
            name: name.to_string(),
            bytes,
            digest,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex-encoded SHA-256 of the image bytes.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
