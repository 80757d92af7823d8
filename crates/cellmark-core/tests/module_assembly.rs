//! End-to-end module assembly over in-memory collaborators.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cellmark_core::{
    Compiler, CompilerConfig, ContentSource, Document, Error, ModuleResolver, RelativeResolver,
    Resource, SourceError,
};

// =============================================================================
// Test Helpers
// =============================================================================

/// Documents keyed by path.
#[derive(Default)]
struct MemorySource {
    docs: HashMap<String, String>,
    fetches: AtomicUsize,
    barrier: Option<Arc<tokio::sync::Barrier>>,
}

impl MemorySource {
    fn with(mut self, path: &str, text: &str) -> Self {
        self.docs.insert(path.to_string(), text.to_string());
        self
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn get_content(&self, resource: &Resource) -> Result<String, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        self.docs
            .get(&resource.path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(resource.path.clone()))
    }
}

struct FailingResolver;

#[async_trait]
impl ModuleResolver for FailingResolver {
    async fn resolve(&self, specifier: &str, _current: &Resource) -> Result<Resource, SourceError> {
        Err(SourceError::Other(format!("no registry entry for {}", specifier)))
    }
}

fn root() -> Resource {
    Resource::new("app-extensions", "test", "simple.md")
}

async fn compile(source: &MemorySource, text: &str) -> cellmark_core::Result<String> {
    let compiler = Compiler::new(source, &RelativeResolver);
    compiler.compile(&Document::new(text, root())).await
}

// =============================================================================
// Single documents
// =============================================================================

#[tokio::test]
async fn test_single_script_cell() {
    let output = compile(&MemorySource::default(), "```{js#x}\n1+1\n```").await.unwrap();
    assert_eq!(
        output,
        "// Imported modules\n\n\n// Transpiled user markdown to JavaScript\n\
         export default function define(runtime, observer) {\n  const main = runtime.module()\n\
         main.variable(observer(\"x\")).define(\"x\", [], function() { return (\n  1+1\n)})\n\
         return main\n}"
    );
}

#[tokio::test]
async fn test_body_follows_chunk_order() {
    let text = "# Title\n\n```{js#a}\n1\n```\n\nBetween\n\n```{html#b}\n<p/>\n```\n";
    let output = compile(&MemorySource::default(), text).await.unwrap();

    let title = output.find("md`# Title`").unwrap();
    let a = output.find("define(\"a\"").unwrap();
    let between = output.find("md`Between`").unwrap();
    let b = output.find("define(\"b\"").unwrap();
    assert!(title < a && a < between && between < b);
}

#[tokio::test]
async fn test_compilation_is_deterministic() {
    let source = MemorySource::default()
        .with("plots.md", "```{js#chart}\n'chart'\n```")
        .with("data.md", "```{js#rows}\n[1, 2]\n```");
    let text = "```{imports}\n{chart} from ./plots.md\n{rows} from ./data.md\n```\n```{js#view(chart, rows)}\nchart + rows\n```";

    let first = compile(&source, text).await.unwrap();
    let second = compile(&source, text).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unknown_chunk_type_yields_no_output() {
    let err = compile(&MemorySource::default(), "```{sql}\nselect 1\n```")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnknownChunkType(t) if t == "sql"));
}

#[tokio::test]
async fn test_frontmatter_is_informational() {
    let with = compile(&MemorySource::default(), "---\ntitle: Demo\n---\n```{js#x}\n1\n```")
        .await
        .unwrap();
    let without = compile(&MemorySource::default(), "```{js#x}\n1\n```").await.unwrap();
    assert_eq!(with, without);
}

#[tokio::test]
async fn test_custom_define_prefix() {
    let source = MemorySource::default().with("m.md", "```{js#a}\n1\n```");
    let config = CompilerConfig::default().with_define_prefix("notebook");
    let compiler = Compiler::new(&source, &RelativeResolver)
        .with_config(config)
        .unwrap();
    let output = compiler
        .compile(&Document::new("```{imports}\n{a} from m.md\n```", root()))
        .await
        .unwrap();
    assert!(output.contains("export function notebook0(runtime, observer)"));
    assert!(output.contains("export default function notebook(runtime, observer)"));
    assert!(output.contains("const child0 = runtime.module(notebook0)"));
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let source = MemorySource::default();
    let config = CompilerConfig::default().with_define_prefix("not a name");
    let result = Compiler::new(&source, &RelativeResolver).with_config(config);
    assert!(matches!(result, Err(Error::Config(_))));
}

// =============================================================================
// Imports
// =============================================================================

#[tokio::test]
async fn test_same_module_is_instantiated_once() {
    let source = MemorySource::default().with("m", "```{js#a}\n1\n```\n```{js#b}\n2\n```");
    let output = compile(&source, "```{imports}\n{a} from m\n{b} from m\n```")
        .await
        .unwrap();

    assert_eq!(output.matches("const child0 = runtime.module(define0)").count(), 1);
    assert_eq!(output.matches("export function define0(").count(), 1);
    assert!(!output.contains("child1"));
    assert!(output.contains("main.import(\"a\", child0)\nmain.import(\"b\", child0)"));
    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_nested_imports_get_distinct_namespaces() {
    let source = MemorySource::default()
        .with("a.md", "```{imports}\n{leaf} from ./b.md\n```\n```{js#mid(leaf)}\nleaf + 1\n```")
        .with("b.md", "```{js#leaf}\n41\n```");
    let output = compile(&source, "```{imports}\n{mid} from ./a.md\n```").await.unwrap();

    // Innermost module first, then its parent, then the root.
    let define00 = output.find("export function define00(").unwrap();
    let define0 = output.find("export function define0(").unwrap();
    let root = output.find("export default function define(").unwrap();
    assert!(define00 < define0 && define0 < root);

    assert!(output.contains("const child00 = runtime.module(define00)"));
    assert!(output.contains("main.import(\"leaf\", child00)"));
    assert!(output.contains("const child0 = runtime.module(define0)"));
    assert!(output.contains("main.import(\"mid\", child0)"));
}

#[tokio::test]
async fn test_colliding_namespaces_are_reported() {
    // Import 10 of the root and import 0 of its second child share namespace "10".
    let mut source = MemorySource::default().with("leaf.md", "```{js#leaf}\n0\n```");
    let mut imports = String::from("```{imports}\n");
    for i in 0..11 {
        let text = if i == 1 {
            "```{imports}\n{leaf} from ./leaf.md\n```"
        } else {
            "```{js#v}\n1\n```"
        };
        source = source.with(&format!("m{}.md", i), text);
        imports.push_str(&format!("{{v}} from ./m{}.md\n", i));
    }
    imports.push_str("```");

    let compiler = Compiler::new(&source, &RelativeResolver);
    let document = Document::new(imports, root());
    let module = compiler.compile_module(&document, String::new()).await.unwrap();

    assert_eq!(module.duplicate_definitions(), ["define10"]);
    assert_eq!(module.to_source().matches("export function define10(").count(), 2);
}

#[tokio::test]
async fn test_blank_import_line_fails_compile() {
    let source = MemorySource::default().with("m0.md", "```{js#a}\n1\n```");
    let err = compile(&source, "```{imports}\n{a} from m0.md\n\n{b} from m0.md\n```")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ImportSyntax { .. }));
    assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_siblings_are_instantiated_in_registry_order() {
    let source = MemorySource::default()
        .with("one.md", "```{js#x}\n1\n```")
        .with("two.md", "```{js#y}\n2\n```");
    let output = compile(&source, "```{imports}\n{y} from two.md\n{x} from one.md\n```")
        .await
        .unwrap();

    let first = output.find("export function define0(").unwrap();
    let second = output.find("export function define1(").unwrap();
    assert!(first < second);
    assert!(output[first..second].contains("define(\"y\""));
    assert!(output.contains("  const child0 = runtime.module(define0)\n  const child1 = runtime.module(define1)"));
}

#[tokio::test]
async fn test_siblings_compile_concurrently() {
    let mut source = MemorySource::default()
        .with("one.md", "```{js#x}\n1\n```")
        .with("two.md", "```{js#y}\n2\n```");
    source.barrier = Some(Arc::new(tokio::sync::Barrier::new(2)));

    // Both fetches must be in flight at once for the barrier to release.
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        compile(&source, "```{imports}\n{x} from one.md\n{y} from two.md\n```"),
    )
    .await;
    assert!(result.expect("sibling imports were fetched sequentially").is_ok());
}

#[tokio::test]
async fn test_view_of_import_through_assembly() {
    let source = MemorySource::default().with("controls.md", "```{js#viewof slider}\n42\n```");
    let output = compile(&source, "```{imports}\n{viewof slider} from controls.md\n```")
        .await
        .unwrap();
    assert!(output.contains("main.import(\"viewof slider\", child0)"));
    assert!(output.contains(
        "main.variable(observer(\"slider\")).define(\"slider\", [\"Generators\", \"viewof slider\"], (G, _) => G.input(_))"
    ));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_missing_child_aborts_compile() {
    let source = MemorySource::default().with("ok.md", "```{js#a}\n1\n```");
    let err = compile(&source, "```{imports}\n{a} from ok.md\n{b} from missing.md\n```")
        .await
        .unwrap_err();
    match err {
        Error::Fetch { resource, source } => {
            assert_eq!(resource.path, "missing.md");
            assert!(matches!(source, SourceError::NotFound(_)));
        }
        other => panic!("expected fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_resolution_failure() {
    let source = MemorySource::default();
    let compiler = Compiler::new(&source, &FailingResolver);
    let err = compiler
        .compile(&Document::new("```{imports}\n{a} from @acme/lib\n```", root()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Resolution { specifier, .. } if specifier == "@acme/lib"));
}

#[tokio::test]
async fn test_error_in_grandchild_propagates() {
    let source = MemorySource::default()
        .with("a.md", "```{imports}\n{b} from b.md\n```")
        .with("b.md", "```{imports}\nthis is not an import\n```");
    let err = compile(&source, "```{imports}\n{a} from a.md\n```").await.unwrap_err();
    assert!(matches!(err, Error::ImportSyntax { .. }));
}

#[tokio::test]
async fn test_compile_resource_fetches_root() {
    let source = MemorySource::default().with("simple.md", "Hello **world**");
    let compiler = Compiler::new(&source, &RelativeResolver);
    let output = compiler.compile_resource(&root()).await.unwrap();
    assert!(output.contains("main.variable().define([\"md\"], function(md) { return (\n  md`Hello **world**`\n)})"));

    let missing = compiler
        .compile_resource(&Resource::new("app-extensions", "test", "nope.md"))
        .await;
    assert!(matches!(missing, Err(Error::Fetch { .. })));
}
