//! In-memory template source.

use std::collections::HashMap;

use super::{SourceError, TemplateSource};

/// Templates held in a map keyed by storage path.
///
/// # Example
///
/// ```rust
/// use payloadkit::source::{MemorySource, TemplateSource};
///
/// let source = MemorySource::new()
///     .with_template("text/greeting.txt", "Hello {{ name }}");
///
/// assert_eq!(source.load("text/greeting.txt").unwrap(), b"Hello {{ name }}");
/// assert!(source.load("text/missing.txt").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    templates: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template at `path`, replacing any previous content.
    pub fn with_template(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Adds raw bytes at `path`, which need not be valid text.
    pub fn with_bytes(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.templates.insert(path.into(), bytes.into());
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.templates
            .insert(path.into(), content.into().into_bytes());
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateSource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        self.templates
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                path: path.to_string(),
            })
    }
}
