//! The message renderer.
//!
//! [`MessageRenderer`] ties the pieces together. For each call it:
//!
//! 1. asks the [`TemplateRegistry`] which resolver claims the logical name
//! 2. loads `prefix + name + suffix` from the [`TemplateSource`], or takes the
//!    text from the cache when the resolver is cacheable
//! 3. decodes the bytes as UTF-8
//! 4. substitutes the context with the resolver's escaping rule
//!
//! # Caching
//!
//! Resolvers marked cacheable keep their decoded template text for the life
//! of the renderer. Non-cacheable resolvers re-read the source on every call,
//! so edits to template files are picked up immediately. Concurrent first
//! renders of the same name may both load; the last one stored wins, which is
//! harmless because they load identical content.
//!
//! # Example
//!
//! ```rust
//! use payloadkit::{MessageRenderer, RenderContext};
//!
//! let renderer = MessageRenderer::bundled();
//! let context = RenderContext::new()
//!     .with("from_currency", "SEK")
//!     .with("to_currency", "NTD");
//!
//! let text = renderer.render("text/currency_conversion_request", &context).unwrap();
//! assert!(text.contains("SEK") && text.contains("NTD"));
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;

use crate::context::RenderContext;
use crate::engine::render_template;
use crate::error::RenderError;
use crate::registry::TemplateRegistry;
use crate::resolver::ResolverConfig;
use crate::source::{DirSource, EmbeddedSource, TemplateSource};

/// Renders logical template names into message payloads.
///
/// `MessageRenderer` is `Send + Sync`; share it behind an `Arc` and call
/// [`render`](Self::render) from as many threads as needed. The registry is
/// fixed once the renderer is built.
pub struct MessageRenderer {
    registry: TemplateRegistry,
    source: Box<dyn TemplateSource>,
    /// Decoded template text by logical name, for cacheable resolvers only.
    cache: DashMap<String, Arc<str>>,
}

impl MessageRenderer {
    /// Creates a renderer over a registry and a template source.
    pub fn new(registry: TemplateRegistry, source: impl TemplateSource + 'static) -> Self {
        Self {
            registry,
            source: Box::new(source),
            cache: DashMap::new(),
        }
    }

    /// Default resolvers over the templates compiled into the crate.
    pub fn bundled() -> Self {
        Self::new(TemplateRegistry::with_defaults(), EmbeddedSource::bundled())
    }

    /// Default resolvers over the `xml/`, `json/` and `text/` directories
    /// below `root`.
    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        Self::new(TemplateRegistry::with_defaults(), DirSource::new(root))
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Name of the template source, as used in logs.
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Renders the template `name` with `context`.
    ///
    /// # Errors
    ///
    /// - [`RenderError::TemplateNotFound`]: no resolver claims `name`
    /// - [`RenderError::TemplateSourceUnavailable`]: the source failed to
    ///   produce the content
    /// - [`RenderError::Encoding`]: the content is not valid UTF-8
    /// - [`RenderError::MissingParameter`]: the template references a
    ///   parameter absent from `context`
    /// - [`RenderError::InvalidValue`]: a referenced value holds a character
    ///   the resolver's format cannot represent
    /// - [`RenderError::Template`]: the template does not compile or fails
    ///   while rendering
    pub fn render(&self, name: &str, context: &RenderContext) -> Result<String, RenderError> {
        let config = self.registry.resolve(name)?;
        tracing::debug!(
            template = name,
            resolver = config.name(),
            format = %config.format(),
            "resolved template"
        );

        let text = self.template_text(name, config)?;
        match render_template(name, &text, config.format(), context) {
            Ok(output) => {
                tracing::debug!(template = name, bytes = output.len(), "rendered template");
                Ok(output)
            }
            Err(err) => {
                if let RenderError::MissingParameter { parameter, .. } = &err {
                    tracing::warn!(template = name, parameter = %parameter, "missing render parameter");
                }
                Err(err)
            }
        }
    }

    /// Whether decoded text for `name` is currently cached.
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// Drops all cached template text.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn template_text(&self, name: &str, config: &ResolverConfig) -> Result<Arc<str>, RenderError> {
        if config.cacheable() {
            if let Some(cached) = self.cache.get(name) {
                tracing::debug!(template = name, "template cache hit");
                return Ok(Arc::clone(cached.value()));
            }
        }

        let path = config.source_path(name);
        let bytes = self.source.load(&path).map_err(|source| {
            tracing::warn!(
                template = name,
                path = %path,
                source_kind = self.source.name(),
                error = %source,
                "template source unavailable"
            );
            RenderError::TemplateSourceUnavailable {
                template: name.to_string(),
                path: path.clone(),
                source,
            }
        })?;

        let text: Arc<str> = String::from_utf8(bytes)
            .map_err(|e| RenderError::Encoding {
                template: name.to_string(),
                message: e.to_string(),
            })?
            .into();

        if config.cacheable() {
            tracing::debug!(template = name, "caching template text");
            self.cache.insert(name.to_string(), Arc::clone(&text));
        }
        Ok(text)
    }
}

impl std::fmt::Debug for MessageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRenderer")
            .field("registry", &self.registry)
            .field("source", &self.source.name())
            .field("cached", &self.cache.len())
            .finish()
    }
}
