//! Content formats and their escaping rules.
//!
//! Every resolver declares a [`ContentFormat`]. The format never changes how
//! placeholders are found or substituted; it only decides how a substituted
//! value is escaped before it lands in the output:
//!
//! | Format | Escaping |
//! |--------|----------|
//! | `Xml`  | Entity escaping of `&`, `<`, `>`, `"` and `'` |
//! | `Json` | String-content escaping, without surrounding quotes |
//! | `Text` | None |
//!
//! XML 1.0 has no way to carry most control characters, escaped or not.
//! [`ContentFormat::unrepresentable_char`] finds them so a render can fail
//! instead of producing a document no parser accepts.
//!
//! JSON templates therefore put placeholders inside string literals:
//!
//! ```text
//! { "from_currency": "{{ from_currency }}" }
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A format tag that no resolver can be registered with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported content format \"{0}\" (expected xml, json or text)")]
pub struct UnsupportedFormat(pub String);

/// Output format of a template, selecting the escaping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Xml,
    Json,
    Text,
}

impl ContentFormat {
    /// All formats the renderer knows how to escape for.
    pub const ALL: [ContentFormat; 3] = [ContentFormat::Xml, ContentFormat::Json, ContentFormat::Text];

    /// The lowercase tag used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFormat::Xml => "xml",
            ContentFormat::Json => "json",
            ContentFormat::Text => "text",
        }
    }

    /// Escapes a substituted value for this format.
    ///
    /// Returns the input unchanged (borrowed) when nothing needs escaping.
    pub fn escape<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        match self {
            ContentFormat::Xml => quick_xml::escape::escape(raw),
            ContentFormat::Json => escape_json_content(raw),
            ContentFormat::Text => Cow::Borrowed(raw),
        }
    }

    /// First character of `raw` that this format cannot carry at all.
    ///
    /// For XML that is every C0 control except tab, newline and carriage
    /// return, plus U+FFFE and U+FFFF. JSON and text accept everything.
    pub fn unrepresentable_char(&self, raw: &str) -> Option<char> {
        match self {
            ContentFormat::Xml => raw.chars().find(|&c| !is_xml_char(c)),
            ContentFormat::Json | ContentFormat::Text => None,
        }
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xml" => Ok(ContentFormat::Xml),
            "json" => Ok(ContentFormat::Json),
            "text" | "txt" => Ok(ContentFormat::Text),
            _ => Err(UnsupportedFormat(s.to_string())),
        }
    }
}

/// Escapes `raw` as the inside of a JSON string literal.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

fn escape_json_content(raw: &str) -> Cow<'_, str> {
    let needs_escape = raw
        .chars()
        .any(|c| matches!(c, '"' | '\\') || c.is_control());
    if !needs_escape {
        return Cow::Borrowed(raw);
    }

    // Display of a JSON string value is the quoted, escaped literal.
    let quoted = serde_json::Value::String(raw.to_owned()).to_string();
    Cow::Owned(quoted[1..quoted.len() - 1].to_owned())
}
