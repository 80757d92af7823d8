//! Code generation for reactive modules.
//!
//! Each chunk becomes one or more [`Fragment`]s: cell definitions
//! (`main.variable(...).define(...)`) or import bindings (`main.import(...)`).
//! Fragments are built as records and serialized through `Display`, so all
//! quoting happens in one place.

mod cell;
mod generator;
mod script;

pub use cell::{CellBody, CellDefinition, CellName, Fragment, ImportBinding, js_string};
pub use generator::{ChunkKind, GenerationState, child_binding, generate_body, generate_chunk};
pub use script::{RenderCall, ScriptTraits, tagged_template, wrap_body};
