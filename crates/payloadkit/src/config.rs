//! YAML configuration.
//!
//! A [`RendererConfig`] describes where templates live and which resolvers
//! dispatch over them:
//!
//! ```yaml
//! templates_dir: ./templates   # omit to use the bundled templates
//! resolvers:
//!   - name: xml
//!     patterns: ["xml/*"]
//!     suffix: .xml
//!     format: xml
//!     priority: 1
//!   - name: json
//!     patterns: ["json/*"]
//!     suffix: .json
//!     format: json
//!     encoding: UTF-8
//!     cacheable: true
//!     priority: 2
//! ```
//!
//! Omitted resolver fields default to an empty prefix and suffix, UTF-8,
//! not cacheable and no patterns (matches every name). Format tags are
//! checked when the registry is built, so an unknown tag fails at startup
//! rather than on the first render.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::format::ContentFormat;
use crate::registry::{RegistryError, TemplateRegistry};
use crate::renderer::MessageRenderer;
use crate::resolver::{ResolverConfig, DEFAULT_ENCODING};
use crate::source::{DirSource, EmbeddedSource};

/// Error type for loading and applying configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// One resolver as written in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverEntry {
    pub name: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    /// Format tag, checked when the registry is built.
    pub format: String,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    pub priority: i32,
    #[serde(default)]
    pub cacheable: bool,
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

impl ResolverEntry {
    /// Validates the format tag and builds the resolver.
    pub fn to_resolver(&self) -> Result<ResolverConfig, RegistryError> {
        let format: ContentFormat = self.format.parse().map_err(|source| {
            RegistryError::UnsupportedFormat {
                resolver: self.name.clone(),
                source,
            }
        })?;

        let mut builder = ResolverConfig::builder(&self.name);
        for pattern in &self.patterns {
            builder = builder.pattern(pattern.as_str());
        }

        Ok(builder
            .prefix(&self.prefix)
            .suffix(&self.suffix)
            .format(format)
            .encoding(&self.encoding)
            .priority(self.priority)
            .cacheable(self.cacheable)
            .build())
    }
}

impl From<&ResolverConfig> for ResolverEntry {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            name: config.name().to_string(),
            patterns: config
                .patterns()
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            prefix: config.prefix().to_string(),
            suffix: config.suffix().to_string(),
            format: config.format().to_string(),
            encoding: config.encoding().to_string(),
            priority: config.priority(),
            cacheable: config.cacheable(),
        }
    }
}

/// Renderer configuration: template location plus resolvers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Directory holding the templates. `None` selects the bundled templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,

    #[serde(default = "default_resolver_entries")]
    pub resolvers: Vec<ResolverEntry>,
}

fn default_resolver_entries() -> Vec<ResolverEntry> {
    TemplateRegistry::with_defaults()
        .resolvers()
        .iter()
        .map(ResolverEntry::from)
        .collect()
}

impl Default for RendererConfig {
    /// Bundled templates with the `xml`, `json` and `text` resolvers.
    fn default() -> Self {
        Self {
            templates_dir: None,
            resolvers: default_resolver_entries(),
        }
    }
}

impl RendererConfig {
    /// Parses a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML file.
    ///
    /// A relative `templates_dir` is resolved against the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_yaml(&content)?;
        if let (Some(dir), Some(base)) = (&config.templates_dir, path.parent()) {
            if dir.is_relative() {
                config.templates_dir = Some(base.join(dir));
            }
        }
        Ok(config)
    }

    /// Serializes back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validates every resolver entry and registers it.
    pub fn registry(&self) -> Result<TemplateRegistry, RegistryError> {
        let mut registry = TemplateRegistry::new();
        for entry in &self.resolvers {
            registry.register(entry.to_resolver()?)?;
        }
        Ok(registry)
    }

    /// Builds a renderer from this configuration.
    pub fn build(&self) -> Result<MessageRenderer, ConfigError> {
        let registry = self.registry()?;
        let renderer = match &self.templates_dir {
            Some(dir) => {
                tracing::debug!(dir = %dir.display(), "using template directory");
                MessageRenderer::new(registry, DirSource::new(dir))
            }
            None => MessageRenderer::new(registry, EmbeddedSource::bundled()),
        };
        Ok(renderer)
    }
}
