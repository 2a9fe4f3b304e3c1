//! SFC formatter: formats each top-level block and reassembles the file.

use reframe_relief::{parse_sfc, SfcBlock};

use crate::error::FormatError;
use crate::options::{EmbeddedLanguageFormatting, FormatOptions};
use crate::script;
use crate::template;

/// Result of formatting a Vue SFC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    /// The formatted code
    pub code: String,

    /// Whether the code was changed
    pub changed: bool,
}

/// Formatter for Vue Single File Components
pub struct GlyphFormatter<'a> {
    options: &'a FormatOptions,
}

impl<'a> GlyphFormatter<'a> {
    #[inline]
    pub fn new(options: &'a FormatOptions) -> Self {
        Self { options }
    }

    /// Format a Vue SFC source string. Blocks keep their source order and
    /// are separated by one blank line.
    pub fn format(&self, source: &str) -> Result<FormatResult, FormatError> {
        let descriptor = parse_sfc(source)?;
        let newline = self.options.newline_string();
        let mut output = String::with_capacity(source.len() + 256);

        for block in &descriptor.blocks {
            if !output.is_empty() {
                output.push_str(newline);
                output.push_str(newline);
            }

            if block.is_script() {
                self.format_script_block(&mut output, block)?;
            } else if block.is_template() {
                self.format_template_block(&mut output, block);
            } else {
                self.format_raw_block(&mut output, block);
            }
            tracing::trace!(tag = block.tag, line = block.start_line, "formatted block");
        }

        if !output.is_empty() {
            output.push_str(newline);
        }

        let changed = output != source;
        Ok(FormatResult {
            code: output,
            changed,
        })
    }

    fn format_script_block(
        &self,
        output: &mut String,
        block: &SfcBlock<'_>,
    ) -> Result<(), FormatError> {
        let formatted = script::format_script_content(block.content, block.lang(), self.options)?;
        self.write_opening_tag(output, block);
        self.write_body(output, &formatted, self.options.vue_indent_script_and_style);
        write_closing_tag(output, block);
        Ok(())
    }

    /// Template content is always indented by one level from the template tag
    fn format_template_block(&self, output: &mut String, block: &SfcBlock<'_>) {
        let formatted = match block.lang() {
            Some(lang) if lang != "html" => block.content.trim().to_string(),
            _ => template::format_template_content(block.content, self.options),
        };
        self.write_opening_tag(output, block);
        self.write_body(output, &formatted, true);
        write_closing_tag(output, block);
    }

    /// Styles are trimmed, custom blocks are left alone when embedded
    /// formatting is off.
    fn format_raw_block(&self, output: &mut String, block: &SfcBlock<'_>) {
        self.write_opening_tag(output, block);
        let verbatim = !block.is_style()
            && self.options.embedded_language_formatting == EmbeddedLanguageFormatting::Off;
        if verbatim {
            output.push_str(block.content);
        } else {
            let indent = block.is_style() && self.options.vue_indent_script_and_style;
            self.write_body(output, block.content.trim(), indent);
        }
        write_closing_tag(output, block);
    }

    fn write_opening_tag(&self, output: &mut String, block: &SfcBlock<'_>) {
        output.push('<');
        output.push_str(block.tag);
        for attr in block.raw_attrs.split_ascii_whitespace() {
            output.push(' ');
            output.push_str(attr);
        }
        output.push('>');
    }

    fn write_body(&self, output: &mut String, content: &str, indent: bool) {
        let newline = self.options.newline_string();
        output.push_str(newline);
        if content.is_empty() {
            return;
        }
        let prefix = self.options.indent_string();
        for line in content.lines() {
            if indent && !line.trim().is_empty() {
                output.push_str(&prefix);
            }
            output.push_str(line);
            output.push_str(newline);
        }
    }
}

fn write_closing_tag(output: &mut String, block: &SfcBlock<'_>) {
    output.push_str("</");
    output.push_str(block.tag);
    output.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_keep_source_order() {
        let source = "<template>\n<div>{{ msg }}</div>\n</template>\n<script>\nexport default {}\n</script>\n";
        let options = FormatOptions::default();
        let result = GlyphFormatter::new(&options).format(source).unwrap();

        let template_at = result.code.find("<template>").unwrap();
        let script_at = result.code.find("<script>").unwrap();
        assert!(template_at < script_at);
        assert!(result.code.contains("  <div>{{ msg }}</div>"));
    }

    #[test]
    fn test_attributes_preserved() {
        let source = "<script setup lang=\"ts\">\nconst a: number = 1\n</script>\n<style scoped>\n.a { color: red; }\n</style>\n";
        let options = FormatOptions::default();
        let result = GlyphFormatter::new(&options).format(source).unwrap();

        assert!(result.code.starts_with("<script setup lang=\"ts\">\n"));
        assert!(result.code.contains("<style scoped>\n.a { color: red; }\n</style>\n"));
    }

    #[test]
    fn test_changed_flag() {
        let options = FormatOptions::default();
        let formatter = GlyphFormatter::new(&options);
        let first = formatter.format("<template><p>hi</p></template>").unwrap();
        assert!(first.changed);

        let second = formatter.format(&first.code).unwrap();
        assert!(!second.changed);
        assert_eq!(second.code, first.code);
    }

    #[test]
    fn test_custom_block_verbatim_when_embedded_off() {
        let source = "<docs>\n  # Title\n</docs>\n";
        let mut options = FormatOptions::default();
        options.embedded_language_formatting = EmbeddedLanguageFormatting::Off;
        let result = GlyphFormatter::new(&options).format(source).unwrap();

        assert_eq!(result.code, source);
    }
}
