//! # reframe_glyph
//!
//! Glyph - The letterforms for Reframe code formatting.
//! A Prettier-compatible formatter for Vue Single File Components.
//!
//! ## Name Origin
//!
//! **Glyph** (/ɡlɪf/) is the visual shape of a character. The same symbol
//! can be drawn many ways; a glyph fixes one. `reframe_glyph` fixes one
//! printed shape for every converted component.
//!
//! ## Example
//!
//! ```ignore
//! use reframe_glyph::{format_sfc, FormatOptions};
//!
//! let source = r#"
//! <script>
//! import {ref} from 'vue'
//! const count=ref(0)
//! </script>
//! "#;
//!
//! let result = format_sfc(source, &FormatOptions::composition_profile()).unwrap();
//! println!("{}", result.code);
//! ```

mod error;
mod formatter;
mod options;
mod script;
mod template;

pub use error::*;
pub use formatter::*;
pub use options::*;

/// Format a source string according to `options.parser`.
///
/// Script dialects return the formatted code with `changed` set by comparison.
pub fn format(source: &str, options: &FormatOptions) -> Result<FormatResult, FormatError> {
    match options.parser {
        FormatParser::Vue => format_sfc(source, options),
        FormatParser::Babel | FormatParser::Typescript => {
            let lang = (options.parser == FormatParser::Typescript).then_some("ts");
            let code = script::format_script_content(source, lang, options)?;
            let changed = code != source;
            Ok(FormatResult { code, changed })
        }
    }
}

/// Format a file, applying any overrides that match `filename`.
pub fn format_file(
    source: &str,
    filename: &str,
    options: &FormatOptions,
) -> Result<FormatResult, FormatError> {
    format(source, &options.for_file(filename))
}

/// Format a Vue SFC source string
#[inline]
pub fn format_sfc(source: &str, options: &FormatOptions) -> Result<FormatResult, FormatError> {
    GlyphFormatter::new(options).format(source)
}

/// Format only the script/TypeScript content
#[inline]
pub fn format_script(
    source: &str,
    lang: Option<&str>,
    options: &FormatOptions,
) -> Result<String, FormatError> {
    script::format_script_content(source, lang, options)
}

/// Format only the template content
#[inline]
pub fn format_template(source: &str, options: &FormatOptions) -> String {
    template::format_template_content(source, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_component() {
        let source = r#"<template>
<div @click="inc">{{ count }}</div>
</template>

<script>
import {ref,defineComponent} from "@vue/composition-api";
export default defineComponent({setup(props) {
const count = ref(0);
const inc = () => { count.value++; };
return {count, inc};
}});
</script>
"#;
        let options = FormatOptions::composition_profile();
        let result = format_sfc(source, &options).unwrap();

        assert!(result.changed);
        assert!(result.code.contains("    <div @click=\"inc\">{{ count }}</div>"));
        assert!(result
            .code
            .contains("import { ref, defineComponent } from '@vue/composition-api'"));
        assert!(result.code.contains("const count = ref(0)\n"));
        assert!(!result.code.contains(';'));
    }

    #[test]
    fn test_format_dispatches_on_parser() {
        let options = FormatOptions {
            parser: FormatParser::Typescript,
            ..Default::default()
        };
        let result = format("let a:string='x'", &options).unwrap();
        assert!(result.code.starts_with("let a: string = "));
        assert!(result.code.ends_with(";\n"));
    }

    #[test]
    fn test_format_file_applies_override() {
        let options = FormatOptions::composition_profile();
        let source = "<docs>\n  keep   me\n</docs>\n";
        let result = format_file(source, "notes.md", &options).unwrap();
        assert_eq!(result.code, source);

        let result = format_file(source, "App.vue", &options).unwrap();
        assert_eq!(result.code, "<docs>\nkeep   me\n</docs>\n");
    }

    #[test]
    fn test_invalid_script_is_an_error() {
        let source = "<script>\nconst = 1\n</script>\n";
        let result = format_sfc(source, &FormatOptions::default());
        assert!(matches!(result, Err(FormatError::ScriptParseError(_))));
    }
}
