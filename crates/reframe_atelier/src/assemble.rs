//! Script assembly.
//!
//! Turns the `<script setup>` draft into a component factory call. Every
//! step is a text rewrite returning a [`Rewrite`]; a step whose pattern is
//! absent leaves the text untouched and is reported as unmatched.

use compact_str::CompactString;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::props::PropsTable;

static VUE_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\s*\{([^}]*)\}\s*from\s*['"]vue['"]"#).unwrap());

static SETUP_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(<script\b[^>]*?)\s+setup\b").unwrap());

static SETUP_PARAMS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bsetup\((?:props)?\)").unwrap());

static EMIT_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$emit\b").unwrap());

/// Where the component factory is imported from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssembleOptions {
    /// Module the factory and reactivity APIs are imported from
    pub composition_module: String,
    /// Name of the component factory function
    pub factory: String,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            composition_module: "@vue/composition-api".to_string(),
            factory: "defineComponent".to_string(),
        }
    }
}

/// Output of a single rewrite step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    /// Whether the step's pattern was found
    pub matched: bool,
}

impl Rewrite {
    fn matched(text: String) -> Self {
        Self {
            text,
            matched: true,
        }
    }

    fn unmatched(text: &str) -> Self {
        Self {
            text: text.to_string(),
            matched: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    pub name: &'static str,
    pub matched: bool,
}

/// Assembled component source and what each step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub code: String,
    pub reports: Vec<RewriteReport>,
}

impl Assembly {
    /// Names of the steps whose pattern was not found.
    pub fn unmatched(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.reports
            .iter()
            .filter(|report| !report.matched)
            .map(|report| report.name)
    }
}

struct Steps {
    text: String,
    reports: Vec<RewriteReport>,
}

impl Steps {
    fn run(&mut self, name: &'static str, step: impl FnOnce(&str) -> Rewrite) {
        let rewrite = step(&self.text);
        if rewrite.matched {
            tracing::debug!(rewrite = name, "applied");
        } else {
            tracing::warn!(rewrite = name, "pattern not found, text left unchanged");
        }
        self.text = rewrite.text;
        self.reports.push(RewriteReport {
            name,
            matched: rewrite.matched,
        });
    }
}

/// Rewrite a `<script setup>` draft into a component factory call exposing
/// `bindings` to the template.
pub fn assemble(
    draft: &str,
    bindings: &[CompactString],
    props: &PropsTable,
    uses_emit: bool,
    options: &AssembleOptions,
) -> Assembly {
    let mut steps = Steps {
        text: draft.to_string(),
        reports: Vec::new(),
    };

    steps.run("inject_return", |text| inject_return(text, bindings));
    steps.run("normalize_vue_import", |text| normalize_vue_import(text, options));
    steps.run("strip_setup_attribute", strip_setup_attribute);
    steps.run("wrap_component", |text| wrap_component(text, props, options));
    if !props.is_empty() {
        steps.run("strip_props_macros", strip_props_macros);
    }
    if uses_emit {
        steps.run("strip_emits_macro", |text| {
            strip_call(text, "defineEmits", "const $emit = ")
        });
        steps.run("emit_setup_signature", emit_setup_signature);
        steps.run("replace_emit", replace_emit);
    }

    Assembly {
        code: steps.text,
        reports: steps.reports,
    }
}

/// Insert `return { ... }` with one binding per line before the first `</script>`.
pub fn inject_return(text: &str, bindings: &[CompactString]) -> Rewrite {
    let Some(close) = text.find("</script>") else {
        return Rewrite::unmatched(text);
    };
    let statement = if bindings.is_empty() {
        "\nreturn {}\n".to_string()
    } else {
        let names: Vec<&str> = bindings.iter().map(CompactString::as_str).collect();
        format!("\nreturn {{\n    {}\n}}\n", names.join(",\n    "))
    };

    let mut out = String::with_capacity(text.len() + statement.len());
    out.push_str(&text[..close]);
    out.push_str(&statement);
    out.push_str(&text[close..]);
    Rewrite::matched(out)
}

/// Point the `vue` import at the composition module and add the factory.
///
/// Without a `vue` import, one importing only the factory is inserted after
/// the opening `<script>` line and the step is reported as unmatched.
pub fn normalize_vue_import(text: &str, options: &AssembleOptions) -> Rewrite {
    let factory = options.factory.as_str();
    if let Some(caps) = VUE_IMPORT.captures(text) {
        let mut names: Vec<&str> = caps[1]
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty() && *name != factory)
            .collect();
        names.push(factory);
        let import = format!(
            "import {{ {} }} from '{}'",
            names.join(", "),
            options.composition_module
        );
        let range = caps.get(0).map_or(0..0, |m| m.range());

        let mut out = String::with_capacity(text.len() + 32);
        out.push_str(&text[..range.start]);
        out.push_str(&import);
        out.push_str(&text[range.end..]);
        return Rewrite::matched(out);
    }

    let import = format!(
        "import {{ {factory} }} from '{}'",
        options.composition_module
    );
    Rewrite {
        text: insert_after_script_open(text, &import).unwrap_or_else(|| text.to_string()),
        matched: false,
    }
}

/// `<script setup lang="ts">` to `<script lang="ts">`.
pub fn strip_setup_attribute(text: &str) -> Rewrite {
    if !SETUP_ATTRIBUTE.is_match(text) {
        return Rewrite::unmatched(text);
    }
    Rewrite::matched(SETUP_ATTRIBUTE.replacen(text, 1, "$1").into_owned())
}

/// Move everything between the composition module import and the last
/// `</script>` into `export default factory({ props, setup() { ... } })`.
pub fn wrap_component(text: &str, props: &PropsTable, options: &AssembleOptions) -> Rewrite {
    let module = options.composition_module.as_str();
    let Some(body_start) = [format!("'{module}'"), format!("\"{module}\"")]
        .iter()
        .filter_map(|quoted| text.find(quoted.as_str()).map(|at| at + quoted.len()))
        .min()
    else {
        return Rewrite::unmatched(text);
    };
    let Some(body_end) = text.rfind("</script>").filter(|end| *end >= body_start) else {
        return Rewrite::unmatched(text);
    };

    let body = &text[body_start..body_end];
    let factory = &options.factory;
    let wrapped = if props.is_empty() {
        format!("\n\nexport default {factory}({{\nsetup() {{{body}\n}}\n}})\n")
    } else {
        format!(
            "\n\nexport default {factory}({{\nprops:{},setup(props) {{{body}\n}}\n}})\n",
            props.stringify()
        )
    };

    let mut out = String::with_capacity(text.len() + wrapped.len());
    out.push_str(&text[..body_start]);
    out.push_str(&wrapped);
    out.push_str(&text[body_end..]);
    Rewrite::matched(out)
}

/// Remove `withDefaults(...)` and `defineProps(...)`, with any `const props = `.
pub fn strip_props_macros(text: &str) -> Rewrite {
    let with_defaults = strip_call(text, "withDefaults", "const props = ");
    let define_props = strip_call(&with_defaults.text, "defineProps", "const props = ");
    Rewrite {
        matched: with_defaults.matched || define_props.matched,
        text: define_props.text,
    }
}

/// `setup()` or `setup(props)` to `setup(props, { emit })`.
pub fn emit_setup_signature(text: &str) -> Rewrite {
    if !SETUP_PARAMS.is_match(text) {
        return Rewrite::unmatched(text);
    }
    Rewrite::matched(
        SETUP_PARAMS
            .replacen(text, 1, "setup(props, { emit })")
            .into_owned(),
    )
}

/// Replace `$emit` with `emit` inside `<script>` blocks.
pub fn replace_emit(text: &str) -> Rewrite {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut matched = false;

    for block in script_blocks(text) {
        let inner = &text[block.clone()];
        matched |= EMIT_TOKEN.is_match(inner);
        out.push_str(&text[cursor..block.start]);
        out.push_str(&EMIT_TOKEN.replace_all(inner, "emit"));
        cursor = block.end;
    }
    out.push_str(&text[cursor..]);

    Rewrite { text: out, matched }
}

/// Remove the first call to `callee` including its arguments, along with a
/// directly preceding `prefix`.
pub fn strip_call(text: &str, callee: &str, prefix: &str) -> Rewrite {
    let Some((start, end)) = find_call(text, callee) else {
        return Rewrite::unmatched(text);
    };
    let start = if text[..start].ends_with(prefix) {
        start - prefix.len()
    } else {
        start
    };

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..start]);
    out.push_str(&text[end..]);
    Rewrite::matched(out)
}

/// Byte range of the first `callee<...>(...)` call, with balanced parentheses.
fn find_call(text: &str, callee: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut search = 0;

    while let Some(found) = text[search..].find(callee) {
        let start = search + found;
        search = start + callee.len();

        let preceded_by_ident = start > 0 && is_ident_byte(bytes[start - 1]);
        if preceded_by_ident || bytes.get(search).copied().is_some_and(is_ident_byte) {
            continue;
        }

        let mut pos = skip_whitespace(bytes, search);
        if bytes.get(pos) == Some(&b'<') {
            pos = skip_type_arguments(bytes, pos)?;
            pos = skip_whitespace(bytes, pos);
        }
        if bytes.get(pos) != Some(&b'(') {
            continue;
        }
        return matching_paren(bytes, pos).map(|close| (start, close + 1));
    }
    None
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    pos
}

/// Position after the `>` closing the type arguments opened at `open`.
fn skip_type_arguments(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = open;
    while pos < bytes.len() {
        match bytes[pos] {
            b'<' => depth += 1,
            // `=>` inside a function type
            b'>' if pos > 0 && bytes[pos - 1] == b'=' => {}
            b'>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos + 1);
                }
            }
            b'\'' | b'"' | b'`' => pos = skip_string(bytes, pos),
            _ => {}
        }
        pos += 1;
    }
    None
}

/// Index of the `)` matching the `(` at `open`.
fn matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = open;
    while pos < bytes.len() {
        match bytes[pos] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            b'\'' | b'"' | b'`' => pos = skip_string(bytes, pos),
            _ => {}
        }
        pos += 1;
    }
    None
}

/// Index of the quote closing the string opened at `open`.
fn skip_string(bytes: &[u8], open: usize) -> usize {
    let quote = bytes[open];
    let mut pos = open + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 1,
            b if b == quote => return pos,
            _ => {}
        }
        pos += 1;
    }
    bytes.len()
}

#[inline]
fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Content ranges of every `<script ...>` block.
fn script_blocks(text: &str) -> Vec<std::ops::Range<usize>> {
    let mut blocks = Vec::new();
    let mut search = 0;
    while let Some(found) = text[search..].find("<script") {
        let open = search + found;
        let Some(tag_end) = text[open..].find('>').map(|at| open + at + 1) else {
            break;
        };
        let close = text[tag_end..]
            .find("</script>")
            .map_or(text.len(), |at| tag_end + at);
        blocks.push(tag_end..close);
        search = close;
    }
    blocks
}

/// Insert `line` on its own line after the first line containing `<script`.
pub(crate) fn insert_after_script_open(text: &str, line: &str) -> Option<String> {
    let open = text.find("<script")?;
    let eol = line_ending(text);

    let mut out = String::with_capacity(text.len() + line.len() + 2 * eol.len());
    match text[open..].find('\n') {
        Some(at) => {
            let next_line = open + at + 1;
            out.push_str(&text[..next_line]);
            out.push_str(line);
            out.push_str(eol);
            out.push_str(&text[next_line..]);
        }
        None => {
            out.push_str(text);
            out.push_str(eol);
            out.push_str(line);
            out.push_str(eol);
        }
    }
    Some(out)
}

/// `"\r\n"` when `text` already uses CRLF line endings.
pub(crate) fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}
