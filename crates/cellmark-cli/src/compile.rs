//! Compile command implementation for the cellmark CLI.
//!
//! Compiles a document from the local filesystem, resolving imports relative
//! to each importing document.

use std::path::{Path, PathBuf};
use std::time::Instant;

use cellmark_core::{Compiler, CompilerConfig, RelativeResolver, Resource};

use crate::colors;
use crate::local::{LocalSource, relative_path};

/// Options for the compile command.
#[derive(Debug, Default)]
pub struct CompileOptions {
    pub root: Option<String>,
    pub owner: String,
    pub repo: String,
    pub git_ref: Option<String>,
    pub output: Option<String>,
    pub config: Option<String>,
    pub define_prefix: Option<String>,
    pub base_url: Option<String>,
}

/// Execute the compile command.
pub async fn execute(document_path: &str, options: CompileOptions) -> anyhow::Result<()> {
    let start = Instant::now();

    let path = Path::new(document_path);
    if !path.is_file() {
        anyhow::bail!("Document not found: {}", document_path);
    }
    let abs_path = path.canonicalize()?;

    let root = match &options.root {
        Some(root) => PathBuf::from(root).canonicalize()?,
        None => abs_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let Some(relative) = relative_path(&root, &abs_path) else {
        anyhow::bail!(
            "Document {} is not inside root {}",
            abs_path.display(),
            root.display()
        );
    };

    let config = load_config(&options)?;

    let mut resource = Resource::new(options.owner.clone(), options.repo.clone(), relative);
    if let Some(git_ref) = &options.git_ref {
        resource = resource.with_ref(git_ref.clone());
    }

    let source = LocalSource::new(&root);
    let compiler = Compiler::new(&source, &RelativeResolver).with_config(config)?;
    let module = compiler.compile_resource(&resource).await?;

    match &options.output {
        Some(output) => {
            tokio::fs::write(output, &module).await?;
            eprintln!(
                "{}Compiled{} {} → {} {}({} bytes, {:.2}ms){}",
                colors::GREEN,
                colors::RESET,
                resource,
                output,
                colors::DIM,
                module.len(),
                start.elapsed().as_secs_f64() * 1000.0,
                colors::RESET
            );
        }
        None => println!("{}", module),
    }

    Ok(())
}

/// Build the compiler configuration: file first, then command-line overrides.
fn load_config(options: &CompileOptions) -> anyhow::Result<CompilerConfig> {
    let mut config = match &options.config {
        Some(path) => CompilerConfig::from_file(path)?,
        None => CompilerConfig::default(),
    };
    if let Some(prefix) = &options.define_prefix {
        config = config.with_define_prefix(prefix.clone());
    }
    if let Some(url) = &options.base_url {
        config = config.with_raw_base_url(url.clone());
    }
    config.validate()?;
    Ok(config)
}
