//! Single File Component block splitting.
//!
//! Borrowing, byte-level scan over the source. Blocks are kept in source
//! order so callers can rebuild the file around a rewritten block without
//! disturbing the others.

use std::ops::Range;

use memchr::{memchr, memchr_iter, memmem};

use crate::errors::SfcError;

const CLOSING_TEMPLATE: &[u8] = b"</template>";
const CLOSING_SCRIPT: &[u8] = b"</script>";
const CLOSING_STYLE: &[u8] = b"</style>";

const TAG_TEMPLATE: &[u8] = b"template";
const TAG_SCRIPT: &[u8] = b"script";
const TAG_STYLE: &[u8] = b"style";

/// A top-level block of an SFC (`<template>`, `<script>`, `<style>` or custom)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfcBlock<'a> {
    pub tag: &'a str,
    /// Attribute text between the tag name and `>`, verbatim
    pub raw_attrs: &'a str,
    pub attrs: Vec<(&'a str, &'a str)>,
    pub content: &'a str,
    /// Byte range from `<tag` through the closing tag
    pub range: Range<usize>,
    pub content_range: Range<usize>,
    /// 1-indexed line of the opening tag
    pub start_line: usize,
}

impl<'a> SfcBlock<'a> {
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn lang(&self) -> Option<&'a str> {
        self.attr("lang").filter(|lang| !lang.is_empty())
    }

    pub fn is_template(&self) -> bool {
        self.tag.eq_ignore_ascii_case("template")
    }

    pub fn is_script(&self) -> bool {
        self.tag.eq_ignore_ascii_case("script")
    }

    pub fn is_style(&self) -> bool {
        self.tag.eq_ignore_ascii_case("style")
    }

    pub fn is_script_setup(&self) -> bool {
        self.is_script() && self.has_attr("setup")
    }
}

/// SFC split into its top-level blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SfcDescriptor<'a> {
    pub source: &'a str,
    pub blocks: Vec<SfcBlock<'a>>,
}

impl<'a> SfcDescriptor<'a> {
    pub fn template(&self) -> Option<&SfcBlock<'a>> {
        self.blocks.iter().find(|b| b.is_template())
    }

    /// The first `<script>` without `setup`
    pub fn script(&self) -> Option<&SfcBlock<'a>> {
        self.blocks
            .iter()
            .find(|b| b.is_script() && !b.is_script_setup())
    }

    pub fn script_setup(&self) -> Option<&SfcBlock<'a>> {
        self.blocks.iter().find(|b| b.is_script_setup())
    }

    pub fn styles(&self) -> impl Iterator<Item = &SfcBlock<'a>> {
        self.blocks.iter().filter(|b| b.is_style())
    }

    pub fn custom_blocks(&self) -> impl Iterator<Item = &SfcBlock<'a>> {
        self.blocks
            .iter()
            .filter(|b| !b.is_template() && !b.is_script() && !b.is_style())
    }
}

/// Split an SFC source into its top-level blocks.
pub fn parse_sfc(source: &str) -> Result<SfcDescriptor<'_>, SfcError> {
    let mut descriptor = SfcDescriptor {
        source,
        blocks: Vec::new(),
    };

    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut pos = 0;

    while pos < len {
        let Some(lt) = memchr(b'<', &bytes[pos..]) else {
            break;
        };
        pos += lt;

        // Top-level comments
        if bytes[pos..].starts_with(b"<!--") {
            match memmem::find(&bytes[pos + 4..], b"-->") {
                Some(end) => {
                    pos += 4 + end + 3;
                    continue;
                }
                None => break,
            }
        }

        match parse_block(source, pos)? {
            Some(block) => {
                if block.is_template() && descriptor.template().is_some() {
                    return Err(SfcError::DuplicateTemplate { offset: pos });
                }
                pos = block.range.end;
                descriptor.blocks.push(block);
            }
            None => pos += 1,
        }
    }

    Ok(descriptor)
}

fn parse_block(source: &str, start: usize) -> Result<Option<SfcBlock<'_>>, SfcError> {
    let bytes = source.as_bytes();
    let len = bytes.len();

    let mut pos = start + 1;
    let tag_start = pos;
    while pos < len && is_tag_name_char(bytes[pos]) {
        pos += 1;
    }
    if pos == tag_start || !bytes[tag_start].is_ascii_alphabetic() {
        return Ok(None);
    }
    let tag = &source[tag_start..pos];
    let attrs_start = pos;

    let mut attrs = Vec::new();
    while pos < len && bytes[pos] != b'>' {
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= len || bytes[pos] == b'>' {
            break;
        }
        if bytes[pos] == b'/' {
            pos += 1;
            continue;
        }

        let name_start = pos;
        while pos < len && !matches!(bytes[pos], b'=' | b'>' | b'/') && !bytes[pos].is_ascii_whitespace()
        {
            pos += 1;
        }
        let name = &source[name_start..pos];

        while pos < len && matches!(bytes[pos], b' ' | b'\t') {
            pos += 1;
        }

        let value = if pos < len && bytes[pos] == b'=' {
            pos += 1;
            while pos < len && matches!(bytes[pos], b' ' | b'\t') {
                pos += 1;
            }
            if pos < len && matches!(bytes[pos], b'"' | b'\'') {
                let quote = bytes[pos];
                pos += 1;
                let value_start = pos;
                pos = memchr(quote, &bytes[pos..]).map_or(len, |i| pos + i);
                let value = &source[value_start..pos];
                if pos < len {
                    pos += 1;
                }
                value
            } else {
                let value_start = pos;
                while pos < len && bytes[pos] != b'>' && !bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                &source[value_start..pos]
            }
        } else {
            ""
        };

        if !name.is_empty() {
            attrs.push((name, value));
        }
    }

    if pos >= len {
        return Ok(None);
    }

    let is_self_closing = bytes[pos - 1] == b'/';
    let raw_attrs = source[attrs_start..if is_self_closing { pos - 1 } else { pos }].trim();
    // Skip '>'
    pos += 1;
    let content_start = pos;
    let start_line = memchr_iter(b'\n', &bytes[..start]).count() + 1;

    if is_self_closing {
        return Ok(Some(SfcBlock {
            tag,
            raw_attrs,
            attrs,
            content: "",
            range: start..pos,
            content_range: pos..pos,
            start_line,
        }));
    }

    let tag_bytes = tag.as_bytes();
    let close = if tag_bytes.eq_ignore_ascii_case(TAG_TEMPLATE) {
        find_template_end(bytes, content_start)
    } else {
        let closing = if tag_bytes.eq_ignore_ascii_case(TAG_SCRIPT) {
            CLOSING_SCRIPT
        } else if tag_bytes.eq_ignore_ascii_case(TAG_STYLE) {
            CLOSING_STYLE
        } else {
            return Ok(find_custom_end(bytes, tag_bytes, content_start).map(|(end, after)| {
                SfcBlock {
                    tag,
                    raw_attrs,
                    attrs,
                    content: &source[content_start..end],
                    range: start..after,
                    content_range: content_start..end,
                    start_line,
                }
            }));
        };
        find_closing(bytes, closing, content_start).map(|end| (end, end + closing.len()))
    };

    match close {
        Some((end, after)) => Ok(Some(SfcBlock {
            tag,
            raw_attrs,
            attrs,
            content: &source[content_start..end],
            range: start..after,
            content_range: content_start..end,
            start_line,
        })),
        None => Err(SfcError::UnclosedBlock {
            tag: tag.to_string(),
            offset: start,
        }),
    }
}

/// Find the `</template>` that balances the opening tag, skipping nested ones.
fn find_template_end(bytes: &[u8], mut pos: usize) -> Option<(usize, usize)> {
    let len = bytes.len();
    let mut depth = 1;

    while let Some(lt) = memchr(b'<', &bytes[pos..]) {
        pos += lt;
        if starts_with_ignore_case(&bytes[pos..], CLOSING_TEMPLATE) {
            depth -= 1;
            if depth == 0 {
                return Some((pos, pos + CLOSING_TEMPLATE.len()));
            }
            pos += CLOSING_TEMPLATE.len();
            continue;
        }

        if starts_with_ignore_case(&bytes[pos + 1..], TAG_TEMPLATE) {
            let after = pos + 1 + TAG_TEMPLATE.len();
            if after < len && (bytes[after] == b'>' || bytes[after].is_ascii_whitespace()) {
                let tag_end = memchr(b'>', &bytes[after..]).map_or(len, |i| after + i);
                if bytes[tag_end - 1] != b'/' {
                    depth += 1;
                }
            }
        }
        pos += 1;
    }

    None
}

fn find_closing(bytes: &[u8], closing: &[u8], mut pos: usize) -> Option<usize> {
    while let Some(lt) = memchr(b'<', &bytes[pos..]) {
        pos += lt;
        if starts_with_ignore_case(&bytes[pos..], closing) {
            return Some(pos);
        }
        pos += 1;
    }
    None
}

fn find_custom_end(bytes: &[u8], tag: &[u8], mut pos: usize) -> Option<(usize, usize)> {
    let len = bytes.len();
    while let Some(lt) = memchr(b'<', &bytes[pos..]) {
        pos += lt;
        let name_start = pos + 2;
        let name_end = name_start + tag.len();
        if bytes.get(pos + 1) == Some(&b'/')
            && name_end < len
            && bytes[name_start..name_end].eq_ignore_ascii_case(tag)
            && bytes[name_end] == b'>'
        {
            return Some((pos, name_end + 1));
        }
        pos += 1;
    }
    None
}

#[inline]
fn starts_with_ignore_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

#[inline]
fn is_tag_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_in_source_order() {
        let source = r#"<template>
  <div>{{ msg }}</div>
</template>

<script lang="ts">
export default {}
</script>

<style scoped>
.a { color: red; }
</style>
"#;
        let desc = parse_sfc(source).unwrap();
        let tags: Vec<_> = desc.blocks.iter().map(|b| b.tag).collect();
        assert_eq!(tags, vec!["template", "script", "style"]);

        let script = desc.script().unwrap();
        assert_eq!(script.lang(), Some("ts"));
        assert_eq!(script.raw_attrs, r#"lang="ts""#);
        assert_eq!(script.content.trim(), "export default {}");
        assert_eq!(script.start_line, 5);
        assert_eq!(&source[script.range.clone()], script_outer(source));

        let style = desc.styles().next().unwrap();
        assert!(style.has_attr("scoped"));
    }

    fn script_outer(source: &str) -> String {
        let start = source.find("<script").unwrap();
        let end = source.find("</script>").unwrap() + "</script>".len();
        source[start..end].to_string()
    }

    #[test]
    fn test_nested_template() {
        let source = r#"<template>
  <template v-if="ok"><span /></template>
  <template #foot />
</template>"#;
        let desc = parse_sfc(source).unwrap();
        let template = desc.template().unwrap();
        assert!(template.content.contains(r#"<template #foot />"#));
        assert!(template.content.trim_end().ends_with("/>"));
    }

    #[test]
    fn test_script_setup_detection() {
        let source = "<script setup>\nconst a = 1\n</script>\n<script>\nexport default {}\n</script>";
        let desc = parse_sfc(source).unwrap();
        assert!(desc.script_setup().unwrap().content.contains("const a"));
        assert!(desc.script().unwrap().content.contains("export default"));
    }

    #[test]
    fn test_custom_block_and_comment() {
        let source = "<!-- <template>ignored</template> -->\n<i18n lang=\"json\">{}</i18n>\n<template><p/></template>";
        let desc = parse_sfc(source).unwrap();
        assert_eq!(desc.blocks.len(), 2);
        assert_eq!(desc.custom_blocks().next().unwrap().tag, "i18n");
        assert_eq!(desc.template().unwrap().content, "<p/>");
    }

    #[test]
    fn test_duplicate_template() {
        let source = "<template><a/></template>\n<template><b/></template>";
        assert!(matches!(
            parse_sfc(source),
            Err(SfcError::DuplicateTemplate { .. })
        ));
    }

    #[test]
    fn test_unclosed_script() {
        let source = "<script>\nexport default {}\n";
        assert!(matches!(
            parse_sfc(source),
            Err(SfcError::UnclosedBlock { .. })
        ));
    }
}
