//! Error types for rendering.
//!
//! [`RenderError`] is returned by every render call. A failed render never
//! affects the renderer; the next call starts from a clean slate.

use crate::format::ContentFormat;
use crate::registry::RegistryError;
use crate::source::SourceError;

/// Error type for [`MessageRenderer::render`](crate::MessageRenderer::render).
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No registered resolver claims the logical name.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// A resolver matched, but its source could not produce the content.
    #[error("template \"{template}\" unavailable at \"{path}\": {source}")]
    TemplateSourceUnavailable {
        template: String,
        path: String,
        #[source]
        source: SourceError,
    },

    /// The template references a parameter the context does not supply.
    #[error("template \"{template}\" requires parameter \"{parameter}\"")]
    MissingParameter { template: String, parameter: String },

    /// A referenced parameter value holds a character the format cannot carry.
    #[error("parameter \"{parameter}\" of template \"{template}\" contains {character:?}, which {format} cannot represent")]
    InvalidValue {
        template: String,
        parameter: String,
        format: ContentFormat,
        character: char,
    },

    /// The raw template bytes are not valid in the resolver's encoding.
    #[error("template \"{template}\" is not valid UTF-8: {message}")]
    Encoding { template: String, message: String },

    /// Template syntax error or other failure inside the template engine.
    #[error("template error: {0}")]
    Template(String),
}

impl RenderError {
    /// Whether the same call could succeed if retried unchanged.
    ///
    /// Only transient source failures qualify. Everything else needs a
    /// different name, context or template to succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            RenderError::TemplateSourceUnavailable { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}

impl From<RegistryError> for RenderError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound { name } => RenderError::TemplateNotFound(name),
            other => RenderError::Template(other.to_string()),
        }
    }
}

/// Every engine failure, including a missing `{% include %}` target, is a
/// template error. [`RenderError::TemplateNotFound`] is reserved for logical
/// names no resolver claims.
impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        RenderError::Template(err.to_string())
    }
}
