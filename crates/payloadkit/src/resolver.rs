//! Resolver configurations.
//!
//! A [`ResolverConfig`] maps a class of logical template names to a storage
//! path and a [`ContentFormat`]. The three resolvers used for currency
//! payloads differ only in their field values, so there is one struct and no
//! per-format types.
//!
//! # Storage Paths
//!
//! The path handed to the [`TemplateSource`](crate::source::TemplateSource) is
//! `prefix + logical name + suffix`:
//!
//! | Logical name | Prefix | Suffix | Path |
//! |--------------|--------|--------|------|
//! | `xml/currency_conversion_request` | `""` | `.xml` | `xml/currency_conversion_request.xml` |
//! | `report` | `mail/` | `.txt` | `mail/report.txt` |

use std::fmt;

use crate::format::ContentFormat;

/// The only character encoding templates may be stored in.
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// A glob over logical template names.
///
/// `*` matches any run of characters, including `/`. `?` matches exactly one
/// character. Everything else matches literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    raw: String,
}

impl NamePattern {
    /// Creates a pattern from its glob text.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The glob text as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `name` is matched by this pattern.
    pub fn matches(&self, name: &str) -> bool {
        let pattern: Vec<char> = self.raw.chars().collect();
        let name: Vec<char> = name.chars().collect();

        let (mut p, mut n) = (0, 0);
        // Position of the last `*` seen and the name index it was tried at.
        let mut backtrack: Option<(usize, usize)> = None;

        while n < name.len() {
            match pattern.get(p) {
                Some('*') => {
                    backtrack = Some((p, n));
                    p += 1;
                }
                Some('?') => {
                    p += 1;
                    n += 1;
                }
                Some(&c) if c == name[n] => {
                    p += 1;
                    n += 1;
                }
                _ => match backtrack {
                    Some((star, tried)) => {
                        p = star + 1;
                        n = tried + 1;
                        backtrack = Some((star, tried + 1));
                    }
                    None => return false,
                },
            }
        }

        pattern[p..].iter().all(|&c| c == '*')
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for NamePattern {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for NamePattern {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

/// Maps logical template names to a storage path and a content format.
///
/// Built with [`ResolverConfig::builder`] and immutable afterwards.
///
/// # Example
///
/// ```rust
/// use payloadkit::{ContentFormat, ResolverConfig};
///
/// let xml = ResolverConfig::builder("xml")
///     .pattern("xml/*")
///     .suffix(".xml")
///     .format(ContentFormat::Xml)
///     .priority(1)
///     .build();
///
/// assert!(xml.matches("xml/currency_conversion_request"));
/// assert_eq!(
///     xml.source_path("xml/currency_conversion_request"),
///     "xml/currency_conversion_request.xml"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    name: String,
    patterns: Vec<NamePattern>,
    prefix: String,
    suffix: String,
    format: ContentFormat,
    encoding: String,
    priority: i32,
    cacheable: bool,
}

impl ResolverConfig {
    /// Starts building a resolver identified by `name`.
    pub fn builder(name: impl Into<String>) -> ResolverConfigBuilder {
        ResolverConfigBuilder::new(name)
    }

    /// Identifier used in logs and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Patterns this resolver claims. Empty means every name.
    pub fn patterns(&self) -> &[NamePattern] {
        &self.patterns
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn format(&self) -> ContentFormat {
        self.format
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Lower values are tried first.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether raw template text may be kept for the process lifetime.
    pub fn cacheable(&self) -> bool {
        self.cacheable
    }

    /// Whether this resolver claims the logical name.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(name))
    }

    /// The path the template source is asked for.
    pub fn source_path(&self, name: &str) -> String {
        format!("{}{}{}", self.prefix, name, self.suffix)
    }
}

/// Builder for [`ResolverConfig`].
///
/// Defaults: no patterns, empty prefix and suffix, `Text` format, UTF-8,
/// priority 0, not cacheable.
#[derive(Debug, Clone)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            config: ResolverConfig {
                name: name.into(),
                patterns: Vec::new(),
                prefix: String::new(),
                suffix: String::new(),
                format: ContentFormat::Text,
                encoding: DEFAULT_ENCODING.to_string(),
                priority: 0,
                cacheable: false,
            },
        }
    }

    /// Adds a name pattern. May be called repeatedly.
    pub fn pattern(mut self, pattern: impl Into<NamePattern>) -> Self {
        self.config.patterns.push(pattern.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.suffix = suffix.into();
        self
    }

    pub fn format(mut self, format: ContentFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.config.encoding = encoding.into();
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.config.priority = priority;
        self
    }

    pub fn cacheable(mut self, cacheable: bool) -> Self {
        self.config.cacheable = cacheable;
        self
    }

    pub fn build(self) -> ResolverConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_literal() {
        let p = NamePattern::new("xml/request");
        assert!(p.matches("xml/request"));
        assert!(!p.matches("xml/request2"));
        assert!(!p.matches("xml/reques"));
    }

    #[test]
    fn pattern_star_spans_segments() {
        let p = NamePattern::new("xml/*");
        assert!(p.matches("xml/currency_conversion_request"));
        assert!(p.matches("xml/nested/deeper"));
        assert!(p.matches("xml/"));
        assert!(!p.matches("json/currency_conversion_request"));
        assert!(!p.matches("xml"));
    }

    #[test]
    fn pattern_star_in_the_middle() {
        let p = NamePattern::new("*/currency_*_request");
        assert!(p.matches("xml/currency_conversion_request"));
        assert!(p.matches("a/b/currency__request"));
        assert!(!p.matches("xml/currency_conversion_reply"));
    }

    #[test]
    fn pattern_question_mark() {
        let p = NamePattern::new("v?/send");
        assert!(p.matches("v1/send"));
        assert!(!p.matches("v10/send"));
        assert!(!p.matches("v/send"));
    }

    #[test]
    fn pattern_lone_star_matches_everything() {
        let p = NamePattern::new("*");
        assert!(p.matches(""));
        assert!(p.matches("anything/at/all"));
    }

    #[test]
    fn builder_defaults() {
        let config = ResolverConfig::builder("plain").build();
        assert_eq!(config.name(), "plain");
        assert_eq!(config.format(), ContentFormat::Text);
        assert_eq!(config.encoding(), DEFAULT_ENCODING);
        assert_eq!(config.priority(), 0);
        assert!(!config.cacheable());
        assert!(config.patterns().is_empty());
    }

    #[test]
    fn empty_pattern_set_matches_all_names() {
        let config = ResolverConfig::builder("catch-all").build();
        assert!(config.matches("xml/anything"));
        assert!(config.matches("whatever"));
    }

    #[test]
    fn any_of_several_patterns_matches() {
        let config = ResolverConfig::builder("mixed")
            .pattern("a/*")
            .pattern("b/*")
            .build();
        assert!(config.matches("a/x"));
        assert!(config.matches("b/y"));
        assert!(!config.matches("c/z"));
    }

    #[test]
    fn source_path_joins_prefix_name_and_suffix() {
        let config = ResolverConfig::builder("mail")
            .prefix("mail/")
            .suffix(".txt")
            .build();
        assert_eq!(config.source_path("report"), "mail/report.txt");
    }
}
