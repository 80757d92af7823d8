//! Structured cell and import fragments, and their serialization.

use std::fmt;

/// One emitted definition in a module body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// `main.variable(...).define(...)`
    Variable(CellDefinition),
    /// `main.import(...)`
    Import(ImportBinding),
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Variable(cell) => cell.fmt(f),
            Fragment::Import(binding) => binding.fmt(f),
        }
    }
}

/// Name of a chunk's cell, with its modifiers split off.
///
/// A chunk name may start with `hidden` (no observer is registered) and may
/// name a view (`viewof slider`), which adds a companion value cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellName {
    pub name: Option<String>,
    pub hidden: bool,
}

impl CellName {
    pub fn parse(raw: Option<&str>) -> Self {
        let mut words = raw.unwrap_or_default().split_whitespace().peekable();
        let mut hidden = false;
        while words.peek() == Some(&"hidden") {
            hidden = true;
            words.next();
        }
        let name = words.collect::<Vec<_>>().join(" ");
        Self {
            name: (!name.is_empty()).then_some(name),
            hidden,
        }
    }

    /// For `viewof x`, the name of the unwrapped value cell (`x`).
    pub fn view_value_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .and_then(|n| n.strip_prefix("viewof "))
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// Body of a cell definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellBody {
    /// `[async] function[*](params) { code}`
    Function {
        is_async: bool,
        is_generator: bool,
        code: String,
    },
    /// `(params) => expression`
    Arrow {
        params: Vec<String>,
        expression: String,
    },
}

/// A reactive cell definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellDefinition {
    /// Cell name; anonymous cells have none
    pub name: Option<String>,
    /// Whether an observer keyed by the name is registered
    pub observed: bool,
    /// Declared input identifiers
    pub inputs: Vec<String>,
    pub body: CellBody,
}

impl CellDefinition {
    /// Named cells are observed; anonymous cells are not.
    pub fn new(name: Option<String>, inputs: Vec<String>, body: CellBody) -> Self {
        Self {
            observed: name.is_some(),
            name,
            inputs,
            body,
        }
    }

    /// Drop the observer when `hidden` is set.
    pub fn hidden(mut self, hidden: bool) -> Self {
        if hidden {
            self.observed = false;
        }
        self
    }

    /// Companion cell exposing the current value of the view `view_name` as `value_name`.
    pub fn view_value(view_name: &str, value_name: &str, hidden: bool) -> Self {
        Self::new(
            Some(value_name.to_string()),
            vec!["Generators".to_string(), view_name.to_string()],
            CellBody::Arrow {
                params: vec!["G".to_string(), "_".to_string()],
                expression: "G.input(_)".to_string(),
            },
        )
        .hidden(hidden)
    }

    /// Parameter bindings for the inputs; spaces become underscores.
    pub fn params(&self) -> Vec<String> {
        self.inputs.iter().map(|i| i.replace(' ', "_")).collect()
    }
}

impl fmt::Display for CellDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("main.variable(")?;
        if let (true, Some(name)) = (self.observed, &self.name) {
            write!(f, "observer({})", js_string(name))?;
        }
        f.write_str(").define(")?;
        if let Some(name) = &self.name {
            write!(f, "{}, ", js_string(name))?;
        }
        let declarations: Vec<String> = self.inputs.iter().map(|i| js_string(i)).collect();
        write!(f, "[{}], ", declarations.join(", "))?;

        match &self.body {
            CellBody::Function {
                is_async,
                is_generator,
                code,
            } => write!(
                f,
                "{}function{}({}) {{ {}}}",
                if *is_async { "async " } else { "" },
                if *is_generator { "*" } else { "" },
                self.params().join(", "),
                code
            )?,
            CellBody::Arrow { params, expression } => {
                write!(f, "({}) => {}", params.join(", "), expression)?
            }
        }

        f.write_str(")")
    }
}

/// `main.import("name", ["alias", ]childN)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// Symbol name in the child module
    pub name: String,
    /// Local name, if renamed
    pub alias: Option<String>,
    /// Binding of the instantiated child module (`child0`, `child01`, ...)
    pub module_binding: String,
}

impl fmt::Display for ImportBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "main.import({}, ", js_string(&self.name))?;
        if let Some(alias) = &self.alias {
            write!(f, "{}, ", js_string(alias))?;
        }
        write!(f, "{})", self.module_binding)
    }
}

/// Quote a string as a JavaScript string literal.
pub fn js_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(code: &str) -> CellBody {
        CellBody::Function {
            is_async: false,
            is_generator: false,
            code: code.to_string(),
        }
    }

    #[test]
    fn test_named_cell() {
        let cell = CellDefinition::new(Some("x".to_string()), vec![], function("return (\n  1+1\n)"));
        assert_eq!(
            cell.to_string(),
            "main.variable(observer(\"x\")).define(\"x\", [], function() { return (\n  1+1\n)})"
        );
    }

    #[test]
    fn test_anonymous_cell_is_not_observed() {
        let cell = CellDefinition::new(None, vec!["md".to_string()], function("return 1"));
        assert_eq!(
            cell.to_string(),
            "main.variable().define([\"md\"], function(md) { return 1})"
        );
    }

    #[test]
    fn test_hidden_cell() {
        let cell = CellDefinition::new(Some("h".to_string()), vec![], function("return 1")).hidden(true);
        assert!(cell.to_string().starts_with("main.variable().define(\"h\", "));
    }

    #[test]
    fn test_params_replace_spaces() {
        let body = CellBody::Function {
            is_async: true,
            is_generator: true,
            code: "yield 1".to_string(),
        };
        let cell = CellDefinition::new(None, vec!["viewof slider".to_string()], body);
        assert_eq!(
            cell.to_string(),
            "main.variable().define([\"viewof slider\"], async function*(viewof_slider) { yield 1})"
        );
    }

    #[test]
    fn test_view_value_cell() {
        let cell = CellDefinition::view_value("viewof s", "s", false);
        assert_eq!(
            cell.to_string(),
            "main.variable(observer(\"s\")).define(\"s\", [\"Generators\", \"viewof s\"], (G, _) => G.input(_))"
        );
    }

    #[test]
    fn test_import_binding() {
        let plain = ImportBinding {
            name: "a".to_string(),
            alias: None,
            module_binding: "child0".to_string(),
        };
        assert_eq!(plain.to_string(), "main.import(\"a\", child0)");

        let renamed = ImportBinding {
            name: "viewof a".to_string(),
            alias: Some("viewof b".to_string()),
            module_binding: "child01".to_string(),
        };
        assert_eq!(renamed.to_string(), "main.import(\"viewof a\", \"viewof b\", child01)");
    }

    #[test]
    fn test_cell_name_modifiers() {
        let name = CellName::parse(Some("hidden viewof slider"));
        assert!(name.hidden);
        assert_eq!(name.name.as_deref(), Some("viewof slider"));
        assert_eq!(name.view_value_name(), Some("slider"));

        let bare = CellName::parse(Some("hidden"));
        assert!(bare.hidden);
        assert_eq!(bare.name, None);

        assert_eq!(CellName::parse(None), CellName::default());
        assert_eq!(CellName::parse(Some("x")).view_value_name(), None);
    }

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("a\"b\n"), "\"a\\\"b\\n\"");
    }
}
