//! Template sources.
//!
//! A [`TemplateSource`] turns a storage path computed by a resolver into raw
//! template bytes. The renderer does not care where the bytes come from:
//!
//! - [`DirSource`]: files below a root directory
//! - [`EmbeddedSource`]: content compiled into the binary
//! - [`MemorySource`]: an in-memory map, handy in tests
//!
//! Decoding the bytes is the renderer's job, driven by the resolver's
//! encoding.

mod dir;
mod embedded;
mod memory;

pub use dir::DirSource;
pub use embedded::EmbeddedSource;
pub use memory::MemorySource;

use std::io;

/// Errors a template source can report.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Nothing is stored at the path.
    #[error("no template stored at \"{path}\"")]
    NotFound { path: String },

    /// The path is not acceptable to this source (e.g. escapes the root).
    #[error("invalid template path \"{path}\": {reason}")]
    InvalidPath { path: String, reason: String },

    /// The backing store failed while reading.
    #[error("failed to read \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    /// Whether retrying the same load could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Io { source, .. } => source.kind() != io::ErrorKind::NotFound,
            SourceError::NotFound { .. } | SourceError::InvalidPath { .. } => false,
        }
    }
}

/// Provides raw template content by storage path.
///
/// Implementations must be shareable across threads; the renderer may load
/// from several threads at once.
pub trait TemplateSource: Send + Sync {
    /// Short description used in logs.
    fn name(&self) -> &'static str;

    /// Returns the raw bytes stored at `path`.
    fn load(&self, path: &str) -> Result<Vec<u8>, SourceError>;
}

impl<S: TemplateSource + ?Sized> TemplateSource for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn load(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        (**self).load(path)
    }
}

impl<S: TemplateSource + ?Sized> TemplateSource for std::sync::Arc<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn load(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        (**self).load(path)
    }
}
