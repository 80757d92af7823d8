//! Resource locators for documents.
//!
//! A [`Resource`] is opaque to the compiler except for two operations: joining
//! a relative path against it (fetch imports, local resolution) and building
//! the raw-content URL for a fetch import.

use serde::{Deserialize, Serialize};

use crate::config::CompilerConfig;

/// Location of a document, in `owner/repo/path@ref` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Resource {
    /// Repository owner
    #[serde(default)]
    pub owner: String,

    /// Repository name
    #[serde(default)]
    pub repo: String,

    /// Path of the document inside the repository
    pub path: String,

    /// Branch, tag or commit (defaults to the configured ref when absent)
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
}

impl Resource {
    /// Create a resource without an explicit ref.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            path: path.into(),
            git_ref: None,
        }
    }

    /// Set the ref.
    pub fn with_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.git_ref = Some(git_ref.into());
        self
    }

    /// Resolve `relative` against the directory containing this resource.
    ///
    /// A leading `/` is taken relative to the repository root. `.` and `..`
    /// segments are normalised; `..` never climbs above the root.
    pub fn join(&self, relative: &str) -> Resource {
        let mut segments: Vec<&str> = if relative.starts_with('/') {
            Vec::new()
        } else {
            let mut dir: Vec<&str> = self.path.split('/').filter(|s| !s.is_empty()).collect();
            dir.pop();
            dir
        };

        for segment in relative.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }

        Resource {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            path: segments.join("/"),
            git_ref: self.git_ref.clone(),
        }
    }

    /// URL of the raw content of `origin`, relative to this resource.
    pub fn raw_url(&self, origin: &str, config: &CompilerConfig) -> String {
        let target = self.join(origin);
        let git_ref = target.git_ref.as_deref().unwrap_or(&config.default_ref);
        format!(
            "{}/{}/{}/blob/{}/{}?raw=true",
            config.raw_base_url.trim_end_matches('/'),
            target.owner,
            target.repo,
            git_ref,
            target.path
        )
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.owner.is_empty() || !self.repo.is_empty() {
            write!(f, "{}/{}/", self.owner, self.repo)?;
        }
        write!(f, "{}", self.path)?;
        if let Some(git_ref) = &self.git_ref {
            write!(f, "@{}", git_ref)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Resource {
        Resource::new("app-extensions", "test", "notes/simple.md")
    }

    #[test]
    fn test_join_sibling() {
        assert_eq!(doc().join("./scatter.md").path, "notes/scatter.md");
        assert_eq!(doc().join("scatter.md").path, "notes/scatter.md");
    }

    #[test]
    fn test_join_parent_and_root() {
        assert_eq!(doc().join("../data/cars.csv").path, "data/cars.csv");
        assert_eq!(doc().join("../../../x.md").path, "x.md");
        assert_eq!(doc().join("/top.md").path, "top.md");
    }

    #[test]
    fn test_join_keeps_repository() {
        let joined = doc().with_ref("v1").join("a.md");
        assert_eq!(joined.owner, "app-extensions");
        assert_eq!(joined.repo, "test");
        assert_eq!(joined.git_ref.as_deref(), Some("v1"));
    }

    #[test]
    fn test_raw_url_defaults_ref() {
        let config = CompilerConfig::default();
        assert_eq!(
            doc().raw_url("./cars.csv", &config),
            "https://github.com/app-extensions/test/blob/main/notes/cars.csv?raw=true"
        );
        assert_eq!(
            doc().with_ref("dev").raw_url("cars.csv", &config),
            "https://github.com/app-extensions/test/blob/dev/notes/cars.csv?raw=true"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(doc().to_string(), "app-extensions/test/notes/simple.md");
        assert_eq!(
            doc().with_ref("main").to_string(),
            "app-extensions/test/notes/simple.md@main"
        );
        assert_eq!(Resource::new("", "", "local.md").to_string(), "local.md");
    }
}
