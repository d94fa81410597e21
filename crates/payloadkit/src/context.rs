//! Render parameters.

use std::collections::BTreeMap;

use serde::Serialize;

/// Named string parameters for one render call.
///
/// Keys are unique; inserting an existing key replaces its value. Order is
/// irrelevant to rendering, but iteration is sorted by key.
///
/// # Example
///
/// ```rust
/// use payloadkit::RenderContext;
///
/// let context = RenderContext::new()
///     .with("from_currency", "SEK")
///     .with("to_currency", "NTD");
///
/// assert_eq!(context.get("from_currency"), Some("SEK"));
/// assert_eq!(context.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenderContext {
    params: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a parameter, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.params.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RenderContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Self::new();
        context.extend(iter);
        context
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for RenderContext {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_insert_replaces() {
        let mut context = RenderContext::new().with("a", "1");
        assert_eq!(context.insert("a", "2"), Some("1".to_string()));
        assert_eq!(context.get("a"), Some("2"));
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn collects_from_pairs() {
        let context: RenderContext = [("to_currency", "NTD"), ("from_currency", "SEK")]
            .into_iter()
            .collect();
        let keys: Vec<_> = context.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["from_currency", "to_currency"]);
        assert!(context.contains("to_currency"));
        assert!(!context.contains("amount"));
    }

    #[test]
    fn serializes_as_flat_map() {
        let context = RenderContext::new().with("from_currency", "SEK");
        assert_eq!(
            serde_json::to_value(&context).unwrap(),
            serde_json::json!({"from_currency": "SEK"})
        );
    }

    #[test]
    fn empty_context() {
        let context = RenderContext::new();
        assert!(context.is_empty());
        assert_eq!(context.get("anything"), None);
    }
}
