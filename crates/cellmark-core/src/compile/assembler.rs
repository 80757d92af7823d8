//! Module assembly: parse, generate, resolve imports recursively, emit.

use futures::future::{BoxFuture, FutureExt, try_join_all};
use rustc_hash::FxHashSet;

use super::registry::ModuleEntry;
use super::source::{ContentSource, ModuleResolver};
use crate::codegen::{Fragment, GenerationState, child_binding, generate_body};
use crate::config::CompilerConfig;
use crate::error::{Error, Result};
use crate::parse::{ChunkParser, Frontmatter};
use crate::resource::Resource;

const POSTAMBLE: &str = "\n  return main\n}";

/// A document to compile: its text and where it came from.
#[derive(Debug, Clone)]
pub struct Document {
    pub text: String,
    pub resource: Resource,
}

impl Document {
    pub fn new(text: impl Into<String>, resource: Resource) -> Self {
        Self {
            text: text.into(),
            resource,
        }
    }
}

/// A compiled imported module, ready to be inlined into its parent.
#[derive(Debug, Clone)]
pub struct ChildModule {
    /// Specifier the module was imported by
    pub specifier: String,
    /// Resource the specifier resolved to
    pub resource: Resource,
    /// Namespace level the module was compiled at
    pub namespace: String,
    /// Binding of the instantiated module in the parent (`child0`)
    pub binding: String,
    /// Name of the module's defining function (`define0`)
    pub define_name: String,
    /// Generated source of the module and its own imports
    pub source: String,
    /// Defining functions in `source`, innermost first
    pub definitions: Vec<String>,
}

/// The generated module for one document.
#[derive(Debug, Clone)]
pub struct GeneratedModule {
    /// Namespace level (`""` at the root)
    pub namespace: String,
    /// Name of the defining function
    pub define_name: String,
    /// Frontmatter of the document
    pub config: Frontmatter,
    /// Compiled imports, in registry order
    pub children: Vec<ChildModule>,
    /// Body fragments, in chunk order
    pub body: Vec<Fragment>,
    /// Defining functions of the inlined modules and this one, in emission order
    pub definitions: Vec<String>,
}

impl GeneratedModule {
    /// Only the root module is the default export.
    pub fn is_root(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Defining functions emitted more than once in this module's source.
    ///
    /// Namespaces are plain concatenations of level and alias, so a document
    /// with more than ten imports can give two modules the same name.
    pub fn duplicate_definitions(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        let mut duplicates = Vec::new();
        for name in &self.definitions {
            if !seen.insert(name.as_str()) && !duplicates.contains(&name.as_str()) {
                duplicates.push(name.as_str());
            }
        }
        duplicates
    }

    fn preamble(&self) -> String {
        let imported: Vec<&str> = self.children.iter().map(|c| c.source.trim()).collect();
        let instances: Vec<String> = self
            .children
            .iter()
            .map(|c| format!("  const {} = runtime.module({})", c.binding, c.define_name))
            .collect();

        format!(
            "\n// Imported modules\n{}\n\n// Transpiled user markdown to JavaScript\nexport{}function {}(runtime, observer) {{\n  const main = runtime.module()\n{}\n",
            imported.join("\n").trim(),
            if self.is_root() { " default " } else { " " },
            self.define_name,
            instances.join("\n"),
        )
    }

    /// Join preamble, body and postamble into module source.
    pub fn to_source(&self) -> String {
        let body = self.body.iter().map(|f| f.to_string());
        std::iter::once(self.preamble())
            .chain(body)
            .chain(std::iter::once(POSTAMBLE.to_string()))
            .filter_map(|part| {
                let trimmed = part.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Compiles documents into reactive modules.
///
/// The collaborators are shared read-only by every nested compile. Each
/// document gets its own registry; sibling imports compile concurrently and
/// the first failure aborts the whole tree.
///
/// Import graphs are not checked for cycles: a document that imports itself,
/// directly or transitively, does not terminate.
pub struct Compiler<'a> {
    source: &'a dyn ContentSource,
    resolver: &'a dyn ModuleResolver,
    config: CompilerConfig,
}

impl<'a> Compiler<'a> {
    pub fn new(source: &'a dyn ContentSource, resolver: &'a dyn ModuleResolver) -> Self {
        Self {
            source,
            resolver,
            config: CompilerConfig::default(),
        }
    }

    /// Use `config` for every module this compiler emits.
    ///
    /// Fails with [`Error::Config`] if the configuration does not validate.
    pub fn with_config(mut self, config: CompilerConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Fetch the document at `resource` and compile it as the root module.
    pub async fn compile_resource(&self, resource: &Resource) -> Result<String> {
        let text = self.fetch(resource).await?;
        self.compile(&Document::new(text, resource.clone())).await
    }

    /// Compile a document as the root module and return its source.
    pub async fn compile(&self, document: &Document) -> Result<String> {
        let module = self.compile_module(document, String::new()).await?;
        for name in module.duplicate_definitions() {
            tracing::warn!(
                "`{}` is defined more than once in {}; import namespaces collide",
                name,
                document.resource
            );
        }
        Ok(module.to_source())
    }

    /// Compile a document at a namespace level, recursing into its imports.
    pub fn compile_module<'s>(
        &'s self,
        document: &'s Document,
        level: String,
    ) -> BoxFuture<'s, Result<GeneratedModule>> {
        async move {
            tracing::debug!("Compiling {} at level {:?}", document.resource, level);

            let parsed = ChunkParser::new().parse(&document.text)?;
            let mut state = GenerationState::new(&document.resource, level, &self.config);
            let body = generate_body(&parsed.chunks, &mut state)?;
            let GenerationState {
                registry, level, ..
            } = state;

            let children = try_join_all(
                registry
                    .entries()
                    .iter()
                    .map(|entry| self.compile_child(entry, &document.resource, &level)),
            )
            .await?;

            tracing::info!(
                "Compiled {} ({} chunks, {} fragments, {} imported modules)",
                document.resource,
                parsed.chunks.len(),
                body.len(),
                children.len()
            );

            let define_name = format!("{}{}", self.config.define_prefix, level);
            let definitions = children
                .iter()
                .flat_map(|child| child.definitions.iter().cloned())
                .chain(std::iter::once(define_name.clone()))
                .collect();

            Ok(GeneratedModule {
                define_name,
                namespace: level,
                config: parsed.config,
                children,
                body,
                definitions,
            })
        }
        .boxed()
    }

    async fn compile_child(
        &self,
        entry: &ModuleEntry,
        parent: &Resource,
        parent_level: &str,
    ) -> Result<ChildModule> {
        let resource = self
            .resolver
            .resolve(&entry.specifier, parent)
            .await
            .map_err(|source| Error::Resolution {
                specifier: entry.specifier.clone(),
                source,
            })?;
        tracing::debug!("Resolved `{}` to {}", entry.specifier, resource);

        let text = self.fetch(&resource).await?;
        let document = Document::new(text, resource);
        let namespace = entry.namespace(parent_level);
        let module = self.compile_module(&document, namespace.clone()).await?;

        Ok(ChildModule {
            specifier: entry.specifier.clone(),
            binding: child_binding(parent_level, &entry.alias),
            define_name: module.define_name.clone(),
            source: module.to_source(),
            definitions: module.definitions,
            resource: document.resource,
            namespace,
        })
    }

    async fn fetch(&self, resource: &Resource) -> Result<String> {
        self.source
            .get_content(resource)
            .await
            .map_err(|source| Error::Fetch {
                resource: resource.clone(),
                source,
            })
    }
}
