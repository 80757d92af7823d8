//! Chunk-to-fragment generation, dispatched over the closed set of chunk kinds.

use std::str::FromStr;

use super::cell::{CellBody, CellDefinition, CellName, Fragment, ImportBinding, js_string};
use super::script::{RenderCall, ScriptTraits, tagged_template, wrap_body};
use crate::compile::ModuleRegistry;
use crate::config::CompilerConfig;
use crate::error::{Error, Result};
use crate::parse::{Chunk, ImportLine, parse_imports};
use crate::resource::Resource;

/// Chunk types with a code generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// `md`: markdown tagged template
    Markdown,
    /// `html`: html tagged template
    Html,
    /// `js` / `javascript`: script cell
    Script,
    /// `imports`: module and fetch imports
    Imports,
}

impl FromStr for ChunkKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "js" | "javascript" => Ok(Self::Script),
            "imports" => Ok(Self::Imports),
            other => Err(Error::UnknownChunkType(other.to_string())),
        }
    }
}

/// Per-document generation state.
///
/// The registry is owned by one document's compile and filled as `imports`
/// chunks are generated.
#[derive(Debug)]
pub struct GenerationState<'a> {
    /// Resource of the document being generated
    pub resource: &'a Resource,
    /// Namespace level of the document (`""` at the root)
    pub level: String,
    pub config: &'a CompilerConfig,
    pub registry: ModuleRegistry,
}

impl<'a> GenerationState<'a> {
    pub fn new(resource: &'a Resource, level: impl Into<String>, config: &'a CompilerConfig) -> Self {
        Self {
            resource,
            level: level.into(),
            config,
            registry: ModuleRegistry::new(),
        }
    }

    /// Register `specifier` and return the binding of its child module.
    fn child_binding(&mut self, specifier: &str) -> String {
        let alias = self.registry.register(specifier).alias.clone();
        child_binding(&self.level, &alias)
    }
}

/// Binding name of the child module instantiated for `alias` at `level`.
pub fn child_binding(level: &str, alias: &str) -> String {
    format!("child{}{}", level, alias)
}

/// Generate the body fragments of a document, in chunk order.
pub fn generate_body(chunks: &[Chunk], state: &mut GenerationState<'_>) -> Result<Vec<Fragment>> {
    let mut fragments = Vec::new();
    for chunk in chunks {
        fragments.extend(generate_chunk(chunk, state)?);
    }
    Ok(fragments)
}

/// Generate the fragments for one chunk.
pub fn generate_chunk(chunk: &Chunk, state: &mut GenerationState<'_>) -> Result<Vec<Fragment>> {
    match chunk.chunk_type.parse::<ChunkKind>()? {
        ChunkKind::Markdown => Ok(generate_template(chunk, "md")),
        ChunkKind::Html => Ok(generate_template(chunk, "html")),
        ChunkKind::Script => Ok(generate_script(chunk)),
        ChunkKind::Imports => generate_imports(chunk, state),
    }
}

fn generate_template(chunk: &Chunk, tag: &str) -> Vec<Fragment> {
    let cell_name = CellName::parse(chunk.name.as_deref());
    let mut inputs = vec![tag.to_string()];
    inputs.extend(chunk.inputs.iter().cloned());

    let body = CellBody::Function {
        is_async: false,
        is_generator: false,
        code: wrap_body(&tagged_template(tag, &chunk.content), ScriptTraits::default(), None),
    };
    vec![Fragment::Variable(
        CellDefinition::new(cell_name.name, inputs, body).hidden(cell_name.hidden),
    )]
}

/// Dependencies a script uses without declaring them. Declared inputs only, for now.
fn infer_inputs(_chunk: &Chunk) -> Vec<String> {
    Vec::new()
}

fn generate_script(chunk: &Chunk) -> Vec<Fragment> {
    let cell_name = CellName::parse(chunk.name.as_deref());
    let traits = ScriptTraits::analyze(&chunk.content);

    let mut inputs = infer_inputs(chunk);
    inputs.extend(chunk.inputs.iter().cloned());

    let render = chunk.renderer.as_deref().map(|renderer| RenderCall {
        renderer,
        args: &chunk.render_args,
    });
    if render.is_some() && !inputs.iter().any(|i| i == "render") {
        inputs.push("render".to_string());
    }

    let body = CellBody::Function {
        is_async: traits.is_async,
        is_generator: traits.is_generator,
        code: wrap_body(&chunk.content, traits, render),
    };

    let mut fragments = vec![Fragment::Variable(
        CellDefinition::new(cell_name.name.clone(), inputs, body).hidden(cell_name.hidden),
    )];
    if let (Some(view), Some(value)) = (cell_name.name.as_deref(), cell_name.view_value_name()) {
        fragments.push(Fragment::Variable(CellDefinition::view_value(
            view,
            value,
            cell_name.hidden,
        )));
    }
    fragments
}

fn generate_imports(chunk: &Chunk, state: &mut GenerationState<'_>) -> Result<Vec<Fragment>> {
    let hidden = CellName::parse(chunk.name.as_deref()).hidden;
    let mut fragments = Vec::new();

    for line in parse_imports(&chunk.content)? {
        match line {
            ImportLine::Module(import) => {
                let module_binding = state.child_binding(&import.module);
                if import.view_of {
                    let view = format!("viewof {}", import.local_name());
                    fragments.push(Fragment::Import(ImportBinding {
                        name: format!("viewof {}", import.name),
                        alias: import.alias.as_ref().map(|a| format!("viewof {}", a)),
                        module_binding,
                    }));
                    fragments.push(Fragment::Variable(CellDefinition::view_value(
                        &view,
                        import.local_name(),
                        hidden,
                    )));
                } else {
                    fragments.push(Fragment::Import(ImportBinding {
                        name: import.name,
                        alias: import.alias,
                        module_binding,
                    }));
                }
            }
            ImportLine::Fetch(fetch) => {
                let url = state.resource.raw_url(&fetch.origin, state.config);
                let body = CellBody::Function {
                    is_async: false,
                    is_generator: false,
                    code: format!("\n  return fetch({})\n", js_string(&url)),
                };
                fragments.push(Fragment::Variable(
                    CellDefinition::new(Some(fetch.alias), Vec::new(), body).hidden(hidden),
                ));
            }
        }
    }

    tracing::debug!(
        "Generated {} import fragments; {} modules registered",
        fragments.len(),
        state.registry.len()
    );
    Ok(fragments)
}
