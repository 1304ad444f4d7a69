//! Error taxonomy shared across Gantry crates.
//!
//! Every stage of the load → link → instantiate → invoke pipeline fails
//! closed: an error aborts the remaining stages and propagates to the
//! top-level driver, which reports it and exits non-zero. There is no
//! retry and no degraded mode.

use thiserror::Error;

/// All the ways a single run of the shim can fail.
#[derive(Debug, Error)]
pub enum GantryError {
    /// The module image could not be read from its locator.
    #[error("failed to read module image: {0}")]
    Io(#[from] std::io::Error),

    /// The locator names a scheme the shim does not serve (no network).
    #[error("unsupported image locator scheme: {0}")]
    UnsupportedScheme(String),

    /// The locator is malformed, e.g. a `file://` URI with an authority.
    #[error("invalid image locator: {0}")]
    InvalidLocator(String),

    /// The image failed structural validation, or a declared import was
    /// missing from the import table or had an incompatible signature.
    #[error("instantiation failed: {0}")]
    Instantiation(String),

    /// The requested entry point is not among the instance's exports.
    #[error("export not found: {0}")]
    ExportNotFound(String),

    /// A host callable received an (offset, len) pair outside the
    /// instance's linear memory. No bytes were read.
    #[error("guest memory read out of bounds: offset {offset} + len {len} exceeds memory size {size}")]
    Bounds { offset: u64, len: u64, size: u64 },

    /// Guest-supplied bytes were not valid UTF-8.
    #[error("guest string is not valid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The guest trapped or otherwise faulted during execution.
    #[error("module raised a runtime fault: {0}")]
    Runtime(String),
}

impl GantryError {
    /// Short stable label for logging and the `inspect`/`run` diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            GantryError::Io(_) => "io",
            GantryError::UnsupportedScheme(_) => "unsupported-scheme",
            GantryError::InvalidLocator(_) => "invalid-locator",
            GantryError::Instantiation(_) => "instantiation",
            GantryError::ExportNotFound(_) => "export-not-found",
            GantryError::Bounds { .. } => "bounds",
            GantryError::Utf8(_) => "utf8",
            GantryError::Runtime(_) => "runtime-fault",
        }
    }
}
