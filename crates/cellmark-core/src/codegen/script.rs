//! Textual analysis and wrapping of cell source.
//!
//! The checks below are pattern matches over raw text, not a JavaScript
//! parse. A `return`, `await` or `yield` inside a string or comment is
//! detected like a real one.

use std::sync::LazyLock;

use regex::Regex;

use super::cell::js_string;
use crate::parse::RenderArgs;

static RETURN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)+return(?:$|\s)+").expect("return pattern is valid"));
static AWAIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w])+await\s+").expect("await pattern is valid"));
static YIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w])+yield\s+").expect("yield pattern is valid"));

/// Markers found in a script body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptTraits {
    /// Contains a `return` statement; emitted without an implicit return
    pub has_return: bool,
    /// Contains `await`; the definition is `async`
    pub is_async: bool,
    /// Contains `yield`; the definition is a generator
    pub is_generator: bool,
}

impl ScriptTraits {
    pub fn analyze(source: &str) -> Self {
        Self {
            has_return: RETURN_RE.is_match(source),
            is_async: AWAIT_RE.is_match(source),
            is_generator: YIELD_RE.is_match(source),
        }
    }

    fn verbatim(&self) -> bool {
        self.has_return || self.is_generator
    }
}

/// Renderer directive attached to a script chunk.
#[derive(Debug, Clone, Copy)]
pub struct RenderCall<'a> {
    pub renderer: &'a str,
    pub args: &'a RenderArgs,
}

/// Wrap prose in a tagged template literal (`md`, `html`).
///
/// Backslashes and backticks are escaped; `${...}` interpolation is kept.
pub fn tagged_template(tag: &str, content: &str) -> String {
    let escaped = content.trim().replace('\\', "\\\\").replace('`', "\\`");
    format!("{}`{}`", tag, escaped)
}

/// Build a function body from cell source.
///
/// Source with a `return` (or a generator) is used verbatim; anything else
/// becomes an implicit return of the expression. With a renderer, the value
/// is computed in an immediately-invoked wrapper and handed to `render`. The
/// wrapper keeps the cell's flavour: a generator body runs in a generator
/// function and `render` receives the iterator, an awaiting body is awaited.
pub fn wrap_body(content: &str, traits: ScriptTraits, render: Option<RenderCall<'_>>) -> String {
    let content = content.trim();
    let wrapped = if traits.verbatim() {
        format!("\n  {}\n", content)
    } else {
        format!("return (\n  {}\n)", content)
    };

    let Some(call) = render else {
        return wrapped;
    };

    let invoked = match (traits.is_generator, traits.is_async) {
        (true, true) => "(async function*() {",
        (true, false) => "(function*() {",
        (false, true) => "await (async () => {",
        (false, false) => "(() => {",
    };
    format!(
        "\n    const _content = {invoked}\n      {wrapped}\n    }})()\n    const _renderOptions = {options}\n    return render(_content, {renderer}, _renderOptions)\n",
        options = call.args.to_json(),
        renderer = js_string(call.renderer),
    )
}
