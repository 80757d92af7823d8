//! Per-document registry of imported modules.

use rustc_hash::FxHashMap;

/// An imported module and the alias its child instantiation is keyed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    /// Module specifier as written in the import line
    pub specifier: String,
    /// Sequential alias (`"0"`, `"1"`, ...)
    pub alias: String,
}

impl ModuleEntry {
    /// Namespace level of the child module compiled for this entry.
    pub fn namespace(&self, parent_level: &str) -> String {
        format!("{}{}", parent_level, self.alias)
    }
}

/// Maps module specifiers to aliases in first-seen order.
///
/// One specifier always maps to one alias, and so to one child module.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    entries: Vec<ModuleEntry>,
    by_specifier: FxHashMap<String, usize>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the entry for `specifier`, creating the next alias if it is new.
    pub fn register(&mut self, specifier: &str) -> &ModuleEntry {
        let index = match self.by_specifier.get(specifier) {
            Some(&index) => index,
            None => {
                let index = self.entries.len();
                self.entries.push(ModuleEntry {
                    specifier: specifier.to_string(),
                    alias: index.to_string(),
                });
                self.by_specifier.insert(specifier.to_string(), index);
                index
            }
        };
        &self.entries[index]
    }

    pub fn get(&self, specifier: &str) -> Option<&ModuleEntry> {
        self.by_specifier.get(specifier).map(|&i| &self.entries[i])
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[ModuleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
