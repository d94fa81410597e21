//! Templates compiled into the binary.

use std::collections::HashMap;

use super::{SourceError, TemplateSource};

/// Currency conversion request templates shipped with the crate.
const BUNDLED: &[(&str, &str)] = &[
    (
        "xml/currency_conversion_request.xml",
        include_str!("../../templates/xml/currency_conversion_request.xml"),
    ),
    (
        "json/currency_conversion_request.json",
        include_str!("../../templates/json/currency_conversion_request.json"),
    ),
    (
        "text/currency_conversion_request.txt",
        include_str!("../../templates/text/currency_conversion_request.txt"),
    ),
];

/// A source over `(path, content)` pairs fixed at compile time.
///
/// Entries are typically produced with `include_str!`, so a binary can ship
/// its templates without a directory next to it.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedSource {
    entries: HashMap<&'static str, &'static str>,
}

impl EmbeddedSource {
    /// Builds a source from `(path, content)` pairs. Later duplicates win.
    pub fn from_entries(entries: &[(&'static str, &'static str)]) -> Self {
        Self {
            entries: entries.iter().copied().collect(),
        }
    }

    /// The currency conversion request templates for XML, JSON and text.
    pub fn bundled() -> Self {
        Self::from_entries(BUNDLED)
    }

    /// Storage paths available in this source, sorted.
    pub fn paths(&self) -> Vec<&'static str> {
        let mut paths: Vec<_> = self.entries.keys().copied().collect();
        paths.sort_unstable();
        paths
    }
}

impl TemplateSource for EmbeddedSource {
    fn name(&self) -> &'static str {
        "embedded"
    }

    fn load(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        self.entries
            .get(path)
            .map(|content| content.as_bytes().to_vec())
            .ok_or_else(|| SourceError::NotFound {
                path: path.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_has_one_template_per_format() {
        assert_eq!(
            EmbeddedSource::bundled().paths(),
            vec![
                "json/currency_conversion_request.json",
                "text/currency_conversion_request.txt",
                "xml/currency_conversion_request.xml",
            ]
        );
    }

    #[test]
    fn bundled_templates_reference_both_parameters() {
        let source = EmbeddedSource::bundled();
        for path in source.paths() {
            let content = String::from_utf8(source.load(path).unwrap()).unwrap();
            assert!(content.contains("{{ from_currency }}"), "{path}");
            assert!(content.contains("{{ to_currency }}"), "{path}");
        }
    }

    #[test]
    fn later_entries_win() {
        let source = EmbeddedSource::from_entries(&[("a.txt", "one"), ("a.txt", "two")]);
        assert_eq!(source.load("a.txt").unwrap(), b"two");
    }

    #[test]
    fn unknown_path_is_not_found() {
        let source = EmbeddedSource::bundled();
        assert!(matches!(
            source.load("xml/unknown.xml"),
            Err(SourceError::NotFound { .. })
        ));
    }
}
