//! Chunks command: dump the parse of a document as JSON.

use std::path::Path;

use cellmark_core::{Chunk, ChunkParser, Frontmatter};
use serde::Serialize;

use crate::colors;

#[derive(Serialize)]
struct ChunkListing<'a> {
    config: &'a Frontmatter,
    chunks: &'a [Chunk],
}

/// Execute the chunks command.
pub fn execute(document_path: &str) -> anyhow::Result<()> {
    let path = Path::new(document_path);
    if !path.is_file() {
        anyhow::bail!("Document not found: {}", document_path);
    }

    let text = std::fs::read_to_string(path)?;
    let parsed = ChunkParser::new().parse(&text)?;

    let listing = ChunkListing {
        config: &parsed.config,
        chunks: &parsed.chunks,
    };
    println!("{}", serde_json::to_string_pretty(&listing)?);
    eprintln!(
        "{}{} chunks{} in {}",
        colors::BOLD,
        parsed.chunks.len(),
        colors::RESET,
        path.display()
    );

    Ok(())
}
