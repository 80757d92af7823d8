//! Core engine for cellmark, a compiler from annotated markdown to reactive modules.
//!
//! This crate provides:
//! - Chunk parsing (frontmatter, fenced `{type#name}` blocks, markdown spans)
//! - The import directive grammar
//! - Cell code generation for `md`, `html`, `js` and `imports` chunks
//! - Module assembly with concurrent, recursive import resolution

pub mod codegen;
pub mod compile;
pub mod config;
pub mod error;
pub mod parse;
pub mod resource;

pub use codegen::{CellDefinition, ChunkKind, Fragment, ImportBinding};
pub use compile::{
    ChildModule, Compiler, ContentSource, Document, GeneratedModule, ModuleRegistry,
    ModuleResolver, RelativeResolver,
};
pub use config::CompilerConfig;
pub use error::{Error, Result, SourceError};
pub use parse::{Chunk, ChunkParser, Frontmatter, ImportLine, ParsedDocument, RenderArgs};
pub use resource::Resource;
