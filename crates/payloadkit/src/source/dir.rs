//! Filesystem template source.

use std::io;
use std::path::{Component, Path, PathBuf};

use super::{SourceError, TemplateSource};

/// Reads templates from files below a root directory.
///
/// Storage paths are relative to the root and use `/` separators, e.g.
/// `xml/currency_conversion_request.xml`. Files are read on every load;
/// caching is decided per resolver by the renderer.
///
/// Paths that are absolute or contain `..` are rejected so a logical name can
/// never reach outside the root.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Creates a source rooted at `root`. The directory is not checked until
    /// the first load.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, SourceError> {
        let relative = Path::new(path);
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(SourceError::InvalidPath {
                        path: path.to_string(),
                        reason: "parent directory references are not allowed".to_string(),
                    })
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(SourceError::InvalidPath {
                        path: path.to_string(),
                        reason: "absolute paths are not allowed".to_string(),
                    })
                }
            }
        }
        Ok(self.root.join(relative))
    }
}

impl TemplateSource for DirSource {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn load(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        let full = self.resolve(path)?;
        std::fs::read(&full).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound {
                path: path.to_string(),
            },
            _ => SourceError::Io {
                path: full.display().to_string(),
                source: e,
            },
        })
    }
}
