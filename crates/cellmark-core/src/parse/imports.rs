//! Import directive grammar for `imports` chunks.
//!
//! Two line forms are recognised:
//!
//! ```text
//! { [viewof] name [as [viewof] alias] } from <module>
//! <alias> load <origin>
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static MODULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(.*?)\}\s+from\s+(.*)").expect("module import pattern is valid"));

static SYMBOL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s?(viewof\s+)?(.+?)(?:\s+as\s+(?:viewof\s+)?(\w+)|$)")
        .expect("import symbol pattern is valid")
});

static LOAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*?)\s+load\s+(.*)").expect("load import pattern is valid"));

/// One parsed line of an `imports` chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportLine {
    /// Symbol imported from another document.
    Module(ModuleImport),
    /// Raw content fetched from a path relative to the current document.
    Fetch(FetchImport),
}

/// `{ [viewof] name [as alias] } from module`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleImport {
    /// Symbol name in the imported module
    pub name: String,
    /// Local name, if renamed
    pub alias: Option<String>,
    /// Module specifier, resolved later
    pub module: String,
    /// Whether the symbol is an interactive view
    pub view_of: bool,
}

impl ModuleImport {
    /// The name the symbol is bound to locally.
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// `alias load origin`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchImport {
    /// Cell name the fetched content is bound to
    pub alias: String,
    /// Path relative to the current document
    pub origin: String,
}

/// Parse a single import line.
pub fn parse_import_line(line: &str) -> Result<ImportLine> {
    if let Some(caps) = MODULE_RE.captures(line) {
        let symbol = caps.get(1).map_or("", |m| m.as_str());
        let module = caps.get(2).map_or("", |m| m.as_str()).trim();
        let parts = SYMBOL_RE.captures(symbol).ok_or_else(|| syntax_error(line))?;

        let name = parts.get(2).map_or("", |m| m.as_str()).trim();
        if name.is_empty() || module.is_empty() {
            return Err(syntax_error(line));
        }

        return Ok(ImportLine::Module(ModuleImport {
            name: name.to_string(),
            alias: parts.get(3).map(|m| m.as_str().to_string()),
            module: module.to_string(),
            view_of: parts.get(1).is_some(),
        }));
    }

    if let Some(caps) = LOAD_RE.captures(line) {
        let alias = caps.get(1).map_or("", |m| m.as_str()).trim();
        let origin = caps.get(2).map_or("", |m| m.as_str()).trim();
        if alias.is_empty() || origin.is_empty() {
            return Err(syntax_error(line));
        }
        return Ok(ImportLine::Fetch(FetchImport {
            alias: alias.to_string(),
            origin: origin.to_string(),
        }));
    }

    Err(syntax_error(line))
}

/// Parse every line of an `imports` chunk. A blank line is malformed.
pub fn parse_imports(content: &str) -> Result<Vec<ImportLine>> {
    content.lines().map(parse_import_line).collect()
}

fn syntax_error(line: &str) -> Error {
    Error::ImportSyntax {
        line: line.trim().to_string(),
    }
}
