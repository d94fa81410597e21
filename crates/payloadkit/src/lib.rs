//! # payloadkit - Multi-Format Message Payload Rendering
//!
//! `payloadkit` renders XML, JSON and plain-text message payloads from named
//! templates. A caller asks for a logical name such as
//! `"xml/currency_conversion_request"` together with a set of string
//! parameters and gets back the finished payload.
//!
//! ## Core Concepts
//!
//! - [`ResolverConfig`]: maps a class of logical names (a glob like `xml/*`)
//!   to a storage suffix, a [`ContentFormat`] and a priority
//! - [`TemplateRegistry`]: the ordered set of resolvers; the lowest priority
//!   number that matches a name wins
//! - [`TemplateSource`](source::TemplateSource): where template text is read
//!   from (a directory, compiled-in content, memory)
//! - [`MessageRenderer`]: resolves, loads, escapes and substitutes
//! - [`RenderContext`]: the parameters of one render call
//!
//! Placeholders use Jinja syntax (`{{ from_currency }}`), rendered by
//! MiniJinja. Substituted values are escaped for the resolver's format: XML
//! entities for XML, string escaping for JSON, nothing for text. A template
//! that references a parameter the context lacks fails with
//! [`RenderError::MissingParameter`] instead of rendering a blank.
//!
//! ## Quick Start
//!
//! ```rust
//! use payloadkit::{MessageRenderer, RenderContext};
//!
//! let renderer = MessageRenderer::bundled();
//! let context = RenderContext::new()
//!     .with("from_currency", "SEK")
//!     .with("to_currency", "NTD");
//!
//! let json = renderer.render("json/currency_conversion_request", &context).unwrap();
//! let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
//! assert_eq!(parsed["conversion_rate"]["from_currency"], "SEK");
//! ```
//!
//! ## Custom Resolvers
//!
//! ```rust
//! use payloadkit::{ContentFormat, MessageRenderer, RenderContext, ResolverConfig, TemplateRegistry};
//! use payloadkit::source::MemorySource;
//!
//! let mut registry = TemplateRegistry::new();
//! registry.register(
//!     ResolverConfig::builder("soap")
//!         .pattern("soap/*")
//!         .suffix(".xml")
//!         .format(ContentFormat::Xml)
//!         .priority(1)
//!         .cacheable(true)
//!         .build(),
//! ).unwrap();
//!
//! let source = MemorySource::new()
//!     .with_template("soap/ping.xml", "<Ping>{{ who }}</Ping>");
//! let renderer = MessageRenderer::new(registry, source);
//!
//! let xml = renderer.render("soap/ping", &RenderContext::new().with("who", "A&B")).unwrap();
//! assert_eq!(xml, "<Ping>A&amp;B</Ping>");
//! ```
//!
//! Resolvers can also be loaded from YAML, see [`RendererConfig`].

pub mod config;
mod context;
mod engine;
mod error;
pub mod format;
pub mod registry;
mod renderer;
pub mod resolver;
pub mod source;

pub use config::{ConfigError, RendererConfig, ResolverEntry};
pub use context::RenderContext;
pub use engine::render_template;
pub use error::RenderError;
pub use format::{ContentFormat, UnsupportedFormat};
pub use registry::{RegistryError, TemplateRegistry};
pub use renderer::MessageRenderer;
pub use resolver::{NamePattern, ResolverConfig, ResolverConfigBuilder, DEFAULT_ENCODING};

/// Parameter name for the source currency in the bundled templates.
pub const FROM_CURRENCY_PARAM: &str = "from_currency";

/// Parameter name for the target currency in the bundled templates.
pub const TO_CURRENCY_PARAM: &str = "to_currency";
