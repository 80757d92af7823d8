//! Error types for cellmark-core.

use thiserror::Error;

use crate::resource::Resource;

/// Result type for cellmark-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compiling a document.
///
/// Every variant is terminal for the compile call that produced it: the
/// error propagates to the top-level caller and no module text is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// A fenced chunk declared a type with no code generator.
    #[error("unknown chunk type `{0}`")]
    UnknownChunkType(String),

    /// A line inside an `imports` chunk matched neither import grammar.
    #[error("malformed import line `{line}`")]
    ImportSyntax { line: String },

    /// A module specifier could not be resolved to a resource.
    #[error("failed to resolve module `{specifier}`: {source}")]
    Resolution {
        specifier: String,
        #[source]
        source: SourceError,
    },

    /// Content for a resource could not be fetched.
    #[error("failed to fetch {resource}: {source}")]
    Fetch {
        resource: Resource,
        #[source]
        source: SourceError,
    },

    /// The frontmatter block is not valid YAML.
    #[error("frontmatter error: {0}")]
    Frontmatter(#[from] serde_yaml::Error),

    /// The frontmatter block parsed, but not to a mapping.
    #[error("frontmatter must be a mapping, found {0}")]
    InvalidFrontmatter(String),

    /// Invalid compiler configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Render the error with a short recovery hint for command-line output.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Error::UnknownChunkType(_) => {
                "supported chunk types are md, html, js (or javascript) and imports"
            }
            Error::ImportSyntax { .. } => {
                "use `{ name [as alias] } from <module>` or `<alias> load <path>`"
            }
            Error::Resolution { .. } => "check that the imported module exists relative to the document",
            Error::Fetch { .. } => "check that the document is readable from the content source",
            Error::Frontmatter(_) | Error::InvalidFrontmatter(_) => {
                "the block between the leading `---` lines must be a YAML mapping"
            }
            Error::Config(_) => "check the configuration file and command-line overrides",
        };
        format!("{}\n  hint: {}", self, hint)
    }
}

/// Failure reported by a content or resolution collaborator.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The requested resource or specifier does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// I/O failure while reading content.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other collaborator failure.
    #[error("{0}")]
    Other(String),
}
