//! MiniJinja-backed substitution.
//!
//! Templates use Jinja placeholders (`{{ from_currency }}`). Each render gets
//! an environment configured for the template's [`ContentFormat`]:
//!
//! - every emitted value goes through the format's escaping rule
//! - undefined values are errors (strict mode)
//! - parameters the template references but the context lacks are reported as
//!   [`RenderError::MissingParameter`] before anything is rendered
//! - a referenced value the format cannot carry (a control character in XML)
//!   is reported as [`RenderError::InvalidValue`]
//! - builtin globals such as `range` are not parameters
//!
//! Values marked safe inside a template (`{{ x | safe }}`) are emitted as-is.

use std::borrow::Cow;
use std::collections::HashSet;

use minijinja::{AutoEscape, Environment, ErrorKind, Output, UndefinedBehavior, Value};

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::format::ContentFormat;

/// Renders template text against a context.
///
/// `name` only labels errors; the template is not looked up anywhere.
///
/// # Example
///
/// ```rust
/// use payloadkit::{render_template, ContentFormat, RenderContext};
///
/// let context = RenderContext::new().with("from_currency", "R&D");
/// let xml = render_template(
///     "inline",
///     "<From>{{ from_currency }}</From>",
///     ContentFormat::Xml,
///     &context,
/// ).unwrap();
/// assert_eq!(xml, "<From>R&amp;D</From>");
/// ```
pub fn render_template(
    name: &str,
    source: &str,
    format: ContentFormat,
    context: &RenderContext,
) -> Result<String, RenderError> {
    let env = environment(format);
    let template = env.template_from_named_str(name, source)?;

    let undeclared: HashSet<String> = template
        .undeclared_variables(false)
        .into_iter()
        .filter(|variable| !env.globals().any(|(key, _)| key == variable.as_str()))
        .collect();
    if let Some(parameter) = first_missing(&undeclared, source, context) {
        return Err(RenderError::MissingParameter {
            template: name.to_string(),
            parameter,
        });
    }

    for (parameter, value) in context.iter() {
        if !undeclared.contains(parameter) {
            continue;
        }
        if let Some(character) = format.unrepresentable_char(value) {
            return Err(RenderError::InvalidValue {
                template: name.to_string(),
                parameter: parameter.to_string(),
                format,
                character,
            });
        }
    }

    Ok(template.render(context)?)
}

/// Builds an environment whose output is escaped for `format`.
fn environment<'source>(format: ContentFormat) -> Environment<'source> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_formatter(move |out, _state, value| write_escaped(out, format, value));
    env
}

fn write_escaped(
    out: &mut Output<'_>,
    format: ContentFormat,
    value: &Value,
) -> Result<(), minijinja::Error> {
    let raw = value.to_string();
    let escaped = if value.is_safe() {
        Cow::Borrowed(raw.as_str())
    } else {
        format.escape(&raw)
    };
    out.write_str(&escaped).map_err(|_| {
        minijinja::Error::new(ErrorKind::WriteFailure, "failed to write rendered output")
    })
}

/// The referenced-but-missing parameter that appears first in the template
/// text. Ties (and names not found in any tag) fall back to name order.
fn first_missing(
    undeclared: &HashSet<String>,
    source: &str,
    context: &RenderContext,
) -> Option<String> {
    let position = |name: &str| first_use(source, name).unwrap_or(usize::MAX);
    undeclared
        .iter()
        .filter(|name| !context.contains(name))
        .min_by(|a, b| {
            position(a.as_str())
                .cmp(&position(b.as_str()))
                .then_with(|| a.cmp(b))
        })
        .cloned()
}

/// Offset of the first whole-identifier `name` inside a `{{ }}` or `{% %}`
/// tag. Static text, comments and attribute accesses (`x.name`) are skipped.
fn first_use(source: &str, name: &str) -> Option<usize> {
    let mut rest = 0;
    while let Some(open) = next_tag_open(&source[rest..]) {
        let body_start = rest + open + 2;
        let close_marker = if source[rest + open..].starts_with("{{") {
            "}}"
        } else {
            "%}"
        };
        let body_end = source[body_start..]
            .find(close_marker)
            .map_or(source.len(), |i| body_start + i);

        if let Some(found) = find_identifier(&source[body_start..body_end], name) {
            return Some(body_start + found);
        }
        rest = (body_end + close_marker.len()).min(source.len());
    }
    None
}

fn next_tag_open(text: &str) -> Option<usize> {
    match (text.find("{{"), text.find("{%")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn find_identifier(body: &str, name: &str) -> Option<usize> {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    body.match_indices(name).map(|(i, _)| i).find(|&i| {
        let before = body[..i].chars().next_back();
        let after = body[i + name.len()..].chars().next();
        !before.is_some_and(|c| is_ident(c) || c == '.') && !after.is_some_and(is_ident)
    })
}
