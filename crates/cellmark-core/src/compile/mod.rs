//! Module assembly for cellmark documents.
//!
//! # Architecture
//!
//! ```text
//! Document ──► ChunkParser ──► generate_body ──► body fragments
//!                                    │
//!                                    ▼
//!                             ModuleRegistry ──► resolve + fetch + compile (per entry, concurrently)
//!                                                         │
//!                                                         ▼
//!                         preamble (children, define fn) + body + postamble ──► module source
//! ```

mod assembler;
mod registry;
mod source;

pub use assembler::{ChildModule, Compiler, Document, GeneratedModule};
pub use registry::{ModuleEntry, ModuleRegistry};
pub use source::{ContentSource, ModuleResolver, RelativeResolver};
