//! Template registry.
//!
//! [`TemplateRegistry`] holds the [`ResolverConfig`]s a renderer dispatches
//! over and answers one question: which resolver claims a logical name?
//!
//! # Resolution
//!
//! Resolvers are kept sorted by ascending priority. [`TemplateRegistry::resolve`]
//! returns the first one whose patterns match, so when two resolvers overlap
//! the lower priority number always wins.
//!
//! # Registration Rules
//!
//! Registration happens once, at startup, before the registry is handed to a
//! [`MessageRenderer`](crate::MessageRenderer). A resolver is rejected when:
//!
//! - another resolver already uses its priority (ordering would be ambiguous)
//! - another resolver already uses its name
//! - its encoding is not UTF-8
//! - one of its patterns is empty
//!
//! # Example
//!
//! ```rust
//! use payloadkit::{ContentFormat, TemplateRegistry};
//!
//! let registry = TemplateRegistry::with_defaults();
//! let resolver = registry.resolve("json/currency_conversion_request").unwrap();
//! assert_eq!(resolver.format(), ContentFormat::Json);
//! ```

use crate::format::{ContentFormat, UnsupportedFormat};
use crate::resolver::{ResolverConfig, DEFAULT_ENCODING};

/// Error type for registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No registered resolver claims the name.
    #[error("no resolver matches template \"{name}\"")]
    NotFound { name: String },

    /// Two resolvers would share a priority.
    #[error("resolver \"{rejected}\" uses priority {priority}, already taken by \"{existing}\"")]
    DuplicatePriority {
        priority: i32,
        existing: String,
        rejected: String,
    },

    /// Two resolvers would share a name.
    #[error("a resolver named \"{name}\" is already registered")]
    DuplicateResolver { name: String },

    /// The resolver declares a format tag the renderer cannot escape for.
    #[error("resolver \"{resolver}\": {source}")]
    UnsupportedFormat {
        resolver: String,
        #[source]
        source: UnsupportedFormat,
    },

    /// The resolver declares an encoding other than UTF-8.
    #[error("resolver \"{resolver}\" uses unsupported encoding \"{encoding}\"")]
    UnsupportedEncoding { resolver: String, encoding: String },

    /// A pattern can never match anything useful.
    #[error("resolver \"{resolver}\" has an empty name pattern")]
    InvalidPattern { resolver: String },
}

/// Whether `encoding` names UTF-8, in any of its usual spellings.
pub(crate) fn is_utf8(encoding: &str) -> bool {
    let normalized: String = encoding
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();
    normalized == "utf8"
}

/// Ordered collection of resolver configurations.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    /// Sorted by ascending priority.
    resolvers: Vec<ResolverConfig>,
}

impl TemplateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `xml`, `json` and `text` resolvers.
    ///
    /// | Resolver | Pattern  | Suffix  | Priority |
    /// |----------|----------|---------|----------|
    /// | `xml`    | `xml/*`  | `.xml`  | 1 |
    /// | `json`   | `json/*` | `.json` | 2 |
    /// | `text`   | `text/*` | `.txt`  | 3 |
    ///
    /// All use UTF-8, an empty prefix and are not cacheable.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for config in default_resolvers() {
            registry.insert_sorted(config);
        }
        registry
    }

    /// Adds a resolver.
    ///
    /// # Errors
    ///
    /// See the module documentation for the rejection rules. A rejected
    /// resolver leaves the registry unchanged.
    pub fn register(&mut self, config: ResolverConfig) -> Result<(), RegistryError> {
        if let Some(existing) = self
            .resolvers
            .iter()
            .find(|r| r.priority() == config.priority())
        {
            return Err(RegistryError::DuplicatePriority {
                priority: config.priority(),
                existing: existing.name().to_string(),
                rejected: config.name().to_string(),
            });
        }

        if self.resolvers.iter().any(|r| r.name() == config.name()) {
            return Err(RegistryError::DuplicateResolver {
                name: config.name().to_string(),
            });
        }

        if !is_utf8(config.encoding()) {
            return Err(RegistryError::UnsupportedEncoding {
                resolver: config.name().to_string(),
                encoding: config.encoding().to_string(),
            });
        }

        if config.patterns().iter().any(|p| p.as_str().is_empty()) {
            return Err(RegistryError::InvalidPattern {
                resolver: config.name().to_string(),
            });
        }

        tracing::debug!(
            resolver = config.name(),
            priority = config.priority(),
            format = %config.format(),
            "registered template resolver"
        );
        self.insert_sorted(config);
        Ok(())
    }

    fn insert_sorted(&mut self, config: ResolverConfig) {
        let index = self
            .resolvers
            .partition_point(|r| r.priority() < config.priority());
        self.resolvers.insert(index, config);
    }

    /// Returns the first resolver, by ascending priority, that claims `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no resolver matches.
    pub fn resolve(&self, name: &str) -> Result<&ResolverConfig, RegistryError> {
        self.resolvers
            .iter()
            .find(|r| r.matches(name))
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })
    }

    /// Registered resolvers in ascending priority order.
    pub fn resolvers(&self) -> &[ResolverConfig] {
        &self.resolvers
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

fn default_resolvers() -> [ResolverConfig; 3] {
    let resolver = |name: &str, suffix: &str, format: ContentFormat, priority: i32| {
        ResolverConfig::builder(name)
            .pattern(format!("{name}/*"))
            .suffix(suffix)
            .format(format)
            .encoding(DEFAULT_ENCODING)
            .priority(priority)
            .cacheable(false)
            .build()
    };

    [
        resolver("xml", ".xml", ContentFormat::Xml, 1),
        resolver("json", ".json", ContentFormat::Json, 2),
        resolver("text", ".txt", ContentFormat::Text, 3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(name: &str, pattern: &str, priority: i32) -> ResolverConfig {
        ResolverConfig::builder(name)
            .pattern(pattern)
            .priority(priority)
            .build()
    }

    #[test]
    fn defaults_resolve_each_format() {
        let registry = TemplateRegistry::with_defaults();
        assert_eq!(registry.len(), 3);

        let cases = [
            ("xml/currency_conversion_request", "xml", ".xml"),
            ("json/currency_conversion_request", "json", ".json"),
            ("text/currency_conversion_request", "text", ".txt"),
        ];
        for (name, expected, suffix) in cases {
            let config = registry.resolve(name).unwrap();
            assert_eq!(config.name(), expected);
            assert_eq!(config.suffix(), suffix);
            assert!(!config.cacheable());
        }
    }

    #[test]
    fn unknown_name_is_not_found() {
        let registry = TemplateRegistry::with_defaults();
        assert_eq!(
            registry.resolve("does/not/exist").unwrap_err(),
            RegistryError::NotFound {
                name: "does/not/exist".into()
            }
        );
    }

    #[test]
    fn lower_priority_number_wins_on_overlap() {
        let mut registry = TemplateRegistry::new();
        registry.register(resolver("broad", "*", 10)).unwrap();
        registry.register(resolver("narrow", "xml/*", 5)).unwrap();

        assert_eq!(registry.resolve("xml/a").unwrap().name(), "narrow");
        assert_eq!(registry.resolve("json/a").unwrap().name(), "broad");
    }

    #[test]
    fn registration_order_does_not_matter() {
        let mut forward = TemplateRegistry::new();
        forward.register(resolver("a", "*", 1)).unwrap();
        forward.register(resolver("b", "*", 2)).unwrap();

        let mut backward = TemplateRegistry::new();
        backward.register(resolver("b", "*", 2)).unwrap();
        backward.register(resolver("a", "*", 1)).unwrap();

        assert_eq!(forward.resolve("x").unwrap().name(), "a");
        assert_eq!(backward.resolve("x").unwrap().name(), "a");
        let order: Vec<_> = backward.resolvers().iter().map(|r| r.name()).collect();
        assert_eq!(order, ["a", "b"]);
    }

    #[test]
    fn negative_priorities_sort_first() {
        let mut registry = TemplateRegistry::with_defaults();
        registry.register(resolver("override", "xml/*", -1)).unwrap();
        assert_eq!(registry.resolvers()[0].name(), "override");
        assert_eq!(registry.resolve("xml/a").unwrap().name(), "override");
    }

    #[test]
    fn duplicate_priority_is_rejected() {
        let mut registry = TemplateRegistry::new();
        registry.register(resolver("first", "a/*", 1)).unwrap();
        let err = registry.register(resolver("second", "b/*", 1)).unwrap_err();

        assert_eq!(
            err,
            RegistryError::DuplicatePriority {
                priority: 1,
                existing: "first".into(),
                rejected: "second".into(),
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = TemplateRegistry::new();
        registry.register(resolver("same", "a/*", 1)).unwrap();
        assert!(matches!(
            registry.register(resolver("same", "b/*", 2)),
            Err(RegistryError::DuplicateResolver { .. })
        ));
    }

    #[test]
    fn non_utf8_encoding_is_rejected() {
        let mut registry = TemplateRegistry::new();
        let config = ResolverConfig::builder("latin")
            .encoding("ISO-8859-1")
            .build();
        assert!(matches!(
            registry.register(config),
            Err(RegistryError::UnsupportedEncoding { encoding, .. }) if encoding == "ISO-8859-1"
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn empty_pattern_is_rejected() {
        let mut registry = TemplateRegistry::new();
        assert!(matches!(
            registry.register(resolver("blank", "", 1)),
            Err(RegistryError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn utf8_spellings() {
        assert!(is_utf8("UTF-8"));
        assert!(is_utf8("utf8"));
        assert!(is_utf8("Utf_8"));
        assert!(!is_utf8("UTF-16"));
        assert!(!is_utf8("ascii"));
    }
}
