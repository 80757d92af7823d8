//! Chunk types produced by the parser.

use serde::Serialize;
use serde::ser::SerializeMap;

/// Structured frontmatter of a document. Empty when the document has none.
pub type Frontmatter = serde_yaml::Mapping;

/// One unit of a document: a markdown span or a fenced directive block.
///
/// Chunks are immutable once discovered; `index` is the discovery position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Position in discovery order
    pub index: usize,

    /// Chunk type as written in the header (`md`, `html`, `js`, `imports`, ...)
    #[serde(rename = "type")]
    pub chunk_type: String,

    /// Exported cell name, including any `hidden`/`viewof` modifiers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Declared dependency identifiers, in declaration order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<String>,

    /// Renderer plugin name from a `[renderer(args)]` directive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renderer: Option<String>,

    /// Renderer arguments
    #[serde(skip_serializing_if = "RenderArgs::is_empty")]
    pub render_args: RenderArgs,

    /// Raw chunk content
    pub content: String,
}

impl Chunk {
    /// Create a markdown chunk holding a span of prose.
    pub fn markdown(index: usize, content: impl Into<String>) -> Self {
        Self {
            index,
            chunk_type: "md".to_string(),
            name: None,
            inputs: Vec::new(),
            renderer: None,
            render_args: RenderArgs::default(),
            content: content.into(),
        }
    }
}

/// Ordered `key=value` arguments passed to a renderer.
///
/// A key written without `=value` maps to no value; it is kept for lookup but
/// left out of the serialized object, the way an `undefined` property is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderArgs {
    entries: Vec<(String, Option<String>)>,
}

impl RenderArgs {
    /// Parse a comma-separated `key=value` list. Empty keys are skipped.
    pub fn parse(list: &str) -> Self {
        let mut args = Self::default();
        for pair in list.split(',') {
            let mut parts = pair.trim().split('=');
            let key = parts.next().unwrap_or_default().trim();
            if key.is_empty() {
                continue;
            }
            let value = parts.next().map(|v| v.trim().to_string());
            args.insert(key, value);
        }
        args
    }

    /// Insert or replace a value, keeping the position of the first occurrence.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a key. `Some(None)` means the key is present without a value.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as a JavaScript object literal.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Serialize for RenderArgs {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: Vec<_> = self
            .entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k, v)))
            .collect();
        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (key, value) in present {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_args_parse() {
        let args = RenderArgs::parse("width=400, theme = dark,inline");
        assert_eq!(args.len(), 3);
        assert_eq!(args.get("width"), Some(Some("400")));
        assert_eq!(args.get("theme"), Some(Some("dark")));
        assert_eq!(args.get("inline"), Some(None));
        assert_eq!(args.get("missing"), None);
    }

    #[test]
    fn test_render_args_json_omits_valueless_keys() {
        let args = RenderArgs::parse("b=2,a=1,flag");
        assert_eq!(args.to_json(), r#"{"b":"2","a":"1"}"#);
        assert_eq!(RenderArgs::default().to_json(), "{}");
    }

    #[test]
    fn test_render_args_duplicate_key_keeps_position() {
        let args = RenderArgs::parse("a=1,b=2,a=3");
        assert_eq!(args.to_json(), r#"{"a":"3","b":"2"}"#);
    }

    #[test]
    fn test_render_args_skips_empty_keys() {
        let args = RenderArgs::parse(" , =5, x=1");
        assert_eq!(args.len(), 1);
    }
}
