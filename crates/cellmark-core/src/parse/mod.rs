//! Document parsing.
//!
//! This module provides:
//! - Frontmatter extraction (YAML mapping between leading `---` lines)
//! - Chunk discovery (fenced `{type#name}` blocks interleaved with markdown)
//! - The import directive grammar used inside `imports` chunks

mod chunk;
pub mod imports;
mod parser;

pub use chunk::{Chunk, Frontmatter, RenderArgs};
pub use imports::{FetchImport, ImportLine, ModuleImport, parse_import_line, parse_imports};
pub use parser::{ChunkParser, ParsedDocument};
