//! Format options for reframe_glyph.
//!
//! Field names and defaults follow Prettier so a `.prettierrc`-shaped JSON
//! object deserializes directly into [`FormatOptions`].

use glob::Pattern;
use serde::{Deserialize, Serialize};

/// Formatting options for Vue SFC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    /// Maximum line width (default: 80)
    #[serde(default = "default_print_width")]
    pub print_width: u32,

    /// Number of spaces per indentation level (default: 2)
    #[serde(default = "default_tab_width")]
    pub tab_width: u8,

    /// Use tabs instead of spaces (default: false)
    #[serde(default)]
    pub use_tabs: bool,

    /// Print semicolons at the ends of statements (default: true)
    #[serde(default = "default_true")]
    pub semi: bool,

    /// Use single quotes instead of double quotes (default: false)
    #[serde(default)]
    pub single_quote: bool,

    /// Print trailing commas wherever possible (default: All)
    #[serde(default)]
    pub trailing_comma: TrailingComma,

    /// Print spaces between brackets in object literals (default: true)
    #[serde(default = "default_true")]
    pub bracket_spacing: bool,

    /// Include parentheses around a sole arrow function parameter (default: Always)
    #[serde(default)]
    pub arrow_parens: ArrowParens,

    /// End of line style (default: Lf)
    #[serde(default)]
    pub end_of_line: EndOfLine,

    /// Put each HTML attribute on its own line (default: false)
    #[serde(default)]
    pub single_attribute_per_line: bool,

    /// Indent script and style tags in Vue files (default: false)
    #[serde(default)]
    pub vue_indent_script_and_style: bool,

    /// Whether code embedded in other languages is formatted (default: Auto)
    #[serde(default)]
    pub embedded_language_formatting: EmbeddedLanguageFormatting,

    /// Dialect of the input (default: Vue)
    #[serde(default)]
    pub parser: FormatParser,

    /// Per-file option overrides, applied in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<FormatOverride>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            print_width: default_print_width(),
            tab_width: default_tab_width(),
            use_tabs: false,
            semi: true,
            single_quote: false,
            trailing_comma: TrailingComma::default(),
            bracket_spacing: true,
            arrow_parens: ArrowParens::default(),
            end_of_line: EndOfLine::default(),
            single_attribute_per_line: false,
            vue_indent_script_and_style: false,
            embedded_language_formatting: EmbeddedLanguageFormatting::default(),
            parser: FormatParser::default(),
            overrides: Vec::new(),
        }
    }
}

fn default_print_width() -> u32 {
    80
}

fn default_tab_width() -> u8 {
    2
}

fn default_true() -> bool {
    true
}

/// Trailing comma options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingComma {
    /// No trailing commas
    None,
    /// Trailing commas where valid in ES5 (objects, arrays, etc.)
    Es5,
    /// Trailing commas wherever possible
    #[default]
    All,
}

/// Arrow function parentheses options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowParens {
    /// Always include parentheses
    #[default]
    Always,
    /// Omit parentheses when possible
    Avoid,
}

/// End of line options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndOfLine {
    #[default]
    Lf,
    Crlf,
    Cr,
    /// Maintain existing line endings
    Auto,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddedLanguageFormatting {
    #[default]
    Auto,
    Off,
}

/// Input dialect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatParser {
    #[default]
    Vue,
    Babel,
    Typescript,
}

/// Options applied to files whose name matches one of `files`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatOverride {
    pub files: Vec<String>,
    #[serde(default)]
    pub options: PartialFormatOptions,
}

impl FormatOverride {
    /// Glob match against the whole path or its base name. A single
    /// `{a,b}` group is expanded first since `glob` has no brace syntax.
    pub fn matches(&self, filename: &str) -> bool {
        let path = filename.replace('\\', "/");
        let base = path.rsplit('/').next().unwrap_or(&path);
        self.files
            .iter()
            .flat_map(|pattern| expand_braces(pattern))
            .filter_map(|pattern| match Pattern::new(&pattern) {
                Ok(compiled) => Some(compiled),
                Err(error) => {
                    tracing::warn!(%pattern, %error, "ignoring invalid override pattern");
                    None
                }
            })
            .any(|pattern| pattern.matches(&path) || pattern.matches(base))
    }
}

fn expand_braces(pattern: &str) -> Vec<String> {
    let group = pattern
        .find('{')
        .and_then(|open| Some((open, open + pattern[open..].find('}')?)));
    match group {
        Some((open, close)) => pattern[open + 1..close]
            .split(',')
            .map(|alt| format!("{}{}{}", &pattern[..open], alt, &pattern[close + 1..]))
            .collect(),
        None => vec![pattern.to_string()],
    }
}

/// A sparse set of options layered over a full [`FormatOptions`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialFormatOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_width: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_tabs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semi: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_quote: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_comma: Option<TrailingComma>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bracket_spacing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_parens: Option<ArrowParens>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_of_line: Option<EndOfLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedded_language_formatting: Option<EmbeddedLanguageFormatting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<FormatParser>,
}

impl PartialFormatOptions {
    /// Overwrite every field of `target` that is set here.
    pub fn apply(&self, target: &mut FormatOptions) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field { target.$field = value; })*
            };
        }
        take!(
            print_width,
            tab_width,
            use_tabs,
            semi,
            single_quote,
            trailing_comma,
            bracket_spacing,
            arrow_parens,
            end_of_line,
            embedded_language_formatting,
            parser,
        );
    }
}

impl FormatOptions {
    /// Fixed profile used when emitting Composition-style components.
    pub fn composition_profile() -> Self {
        Self {
            print_width: 9999,
            tab_width: 4,
            semi: false,
            single_quote: true,
            trailing_comma: TrailingComma::None,
            arrow_parens: ArrowParens::Avoid,
            parser: FormatParser::Vue,
            overrides: vec![FormatOverride {
                files: vec!["*.md".into()],
                options: PartialFormatOptions {
                    embedded_language_formatting: Some(EmbeddedLanguageFormatting::Off),
                    ..Default::default()
                },
            }],
            ..Default::default()
        }
    }

    /// Resolve the effective options for `filename` by applying matching overrides.
    pub fn for_file(&self, filename: &str) -> FormatOptions {
        let mut resolved = self.clone();
        for over in self.overrides.iter().filter(|o| o.matches(filename)) {
            over.options.apply(&mut resolved);
        }
        resolved
    }

    /// Get the indent string based on options
    #[inline]
    pub fn indent_string(&self) -> String {
        if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.tab_width as usize)
        }
    }

    /// Get the newline string based on options
    #[inline]
    pub fn newline_string(&self) -> &'static str {
        match self.end_of_line {
            EndOfLine::Lf | EndOfLine::Auto => "\n",
            EndOfLine::Crlf => "\r\n",
            EndOfLine::Cr => "\r",
        }
    }
}
