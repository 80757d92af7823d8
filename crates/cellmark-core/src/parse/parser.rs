//! Splits a document into frontmatter and an ordered chunk sequence.

use std::sync::LazyLock;

use regex::Regex;

use super::chunk::{Chunk, Frontmatter, RenderArgs};
use crate::error::{Error, Result};

/// Fenced directive block: ```` ```{type#name(inputs)}(inputs)[renderer(args)] content ``` ````.
static CHUNK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)```\{([\w# ]+)(?:\((.*?)\))?\}(?:\(([^)\n]*)\))?(?:[ \t]*\[([\w/]+)(?:\(([^)\n]*)\))?\])?(.*?)```",
    )
    .expect("chunk pattern is valid")
});

/// A parsed document.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Frontmatter mapping (empty if the document has none)
    pub config: Frontmatter,

    /// Chunks in source order
    pub chunks: Vec<Chunk>,
}

/// Parser for annotated markdown documents.
pub struct ChunkParser {
    // Reserved for future configuration
}

impl ChunkParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self {}
    }

    /// Parse document text into frontmatter and chunks.
    pub fn parse(&self, source: &str) -> Result<ParsedDocument> {
        let normalized = source.replace('\r', "");
        let (frontmatter, markdown) = split_frontmatter(&normalized);
        let config = parse_frontmatter(frontmatter)?;
        let chunks = self.discover_chunks(markdown);

        tracing::debug!("Discovered {} chunks", chunks.len());

        Ok(ParsedDocument { config, chunks })
    }

    /// Scan for fenced blocks; the non-blank text around them becomes `md` chunks.
    pub fn discover_chunks(&self, content: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut cursor = 0;

        for caps in CHUNK_RE.captures_iter(content) {
            let Some(whole) = caps.get(0) else {
                continue;
            };

            push_markdown(&mut chunks, &content[cursor..whole.start()]);

            let header = caps.get(1).map_or("", |m| m.as_str());
            let (chunk_type, name) = match header.split_once('#') {
                Some((chunk_type, name)) => (chunk_type.trim(), non_empty(name)),
                None => (header.trim(), None),
            };

            let mut inputs = Vec::new();
            for group in [2, 3] {
                if let Some(list) = caps.get(group) {
                    inputs.extend(split_inputs(list.as_str()));
                }
            }

            let renderer = caps.get(4).map(|m| m.as_str().to_string());
            let render_args = caps
                .get(5)
                .map(|m| RenderArgs::parse(m.as_str()))
                .unwrap_or_default();
            let body = caps.get(6).map_or("", |m| m.as_str());

            chunks.push(Chunk {
                index: chunks.len(),
                chunk_type: chunk_type.to_string(),
                name,
                inputs,
                renderer,
                render_args,
                content: body.trim().to_string(),
            });

            cursor = whole.end();
        }

        push_markdown(&mut chunks, &content[cursor..]);
        chunks
    }
}

impl Default for ChunkParser {
    fn default() -> Self {
        Self::new()
    }
}

fn push_markdown(chunks: &mut Vec<Chunk>, span: &str) {
    let trimmed = span.trim();
    if !trimmed.is_empty() {
        chunks.push(Chunk::markdown(chunks.len(), trimmed));
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn split_inputs(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Split a leading `---` block off the document.
///
/// Returns the frontmatter body (if the block is opened and closed) and the rest.
fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    let Some(rest) = text.strip_prefix("---\n") else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches('\n') == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, text)
}

fn parse_frontmatter(body: Option<&str>) -> Result<Frontmatter> {
    let Some(body) = body.filter(|b| !b.trim().is_empty()) else {
        return Ok(Frontmatter::new());
    };

    match serde_yaml::from_str::<serde_yaml::Value>(body)? {
        serde_yaml::Value::Null => Ok(Frontmatter::new()),
        serde_yaml::Value::Mapping(mapping) => Ok(mapping),
        other => Err(Error::InvalidFrontmatter(yaml_kind(&other).to_string())),
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}
