//! Collaborators the assembler reads documents through.
//!
//! Both traits are shared read-only by every recursive compile, so
//! implementations must be `Send + Sync`.

use async_trait::async_trait;

use crate::error::SourceError;
use crate::resource::Resource;

/// Fetches document text.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Return the text of the document at `resource`.
    async fn get_content(&self, resource: &Resource) -> Result<String, SourceError>;
}

/// Resolves module specifiers to concrete resources.
#[async_trait]
pub trait ModuleResolver: Send + Sync {
    /// Resolve `specifier`, as written in a document at `current`.
    async fn resolve(&self, specifier: &str, current: &Resource) -> Result<Resource, SourceError>;
}

/// Resolves every specifier as a path relative to the importing document.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativeResolver;

#[async_trait]
impl ModuleResolver for RelativeResolver {
    async fn resolve(&self, specifier: &str, current: &Resource) -> Result<Resource, SourceError> {
        let specifier = specifier.trim().trim_matches(|c: char| c == '"' || c == '\'');
        if specifier.is_empty() {
            return Err(SourceError::NotFound("empty module specifier".to_string()));
        }
        Ok(current.join(specifier))
    }
}
