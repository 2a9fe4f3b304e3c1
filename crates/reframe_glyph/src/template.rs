//! Template formatting for Vue SFC.
//!
//! A byte-level re-indenter: every tag and text run is written on its own
//! line at its nesting depth. It does not build a tree, so unbalanced markup
//! is printed as-is rather than rejected.

use memchr::memmem;

use crate::options::FormatOptions;

/// Result type for parsing opening tags: (tag_name, attributes, is_self_closing, end_pos)
type OpeningTag<'a> = (&'a str, Vec<&'a str>, bool, usize);

/// Elements whose content is printed verbatim.
const RAW_TEXT_TAGS: [&str; 2] = ["pre", "textarea"];

/// Format Vue template content
pub fn format_template_content(source: &str, options: &FormatOptions) -> String {
    if source.trim().is_empty() {
        return String::new();
    }
    TemplateFormatter::new(options).format(source)
}

struct TemplateFormatter<'a> {
    options: &'a FormatOptions,
    indent: String,
    newline: &'static str,
}

impl<'a> TemplateFormatter<'a> {
    fn new(options: &'a FormatOptions) -> Self {
        Self {
            options,
            indent: options.indent_string(),
            newline: options.newline_string(),
        }
    }

    fn format(&self, source: &str) -> String {
        let bytes = source.as_bytes();
        let len = bytes.len();
        let mut output = String::with_capacity(len + len / 4);
        let mut depth: usize = 0;
        let mut pos = 0;

        while pos < len {
            while pos < len && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos >= len {
                break;
            }

            if bytes[pos..].starts_with(b"<!--") {
                let end = memmem::find(&bytes[pos + 4..], b"-->").map_or(len, |p| pos + 4 + p + 3);
                self.write_line(&mut output, &source[pos..end], depth);
                pos = end;
                continue;
            }

            if bytes[pos..].starts_with(b"</") {
                if let Some((tag_name, end_pos)) = parse_closing_tag(source, pos) {
                    depth = depth.saturating_sub(1);
                    self.write_line(&mut output, &format!("</{tag_name}>"), depth);
                    pos = end_pos;
                    continue;
                }
            }

            if bytes[pos] == b'<' {
                if let Some((tag_name, attrs, is_self_closing, end_pos)) =
                    parse_opening_tag(source, pos)
                {
                    pos = self.write_element(
                        &mut output,
                        source,
                        (tag_name, attrs, is_self_closing, end_pos),
                        &mut depth,
                    );
                    continue;
                }
            }

            let end = scan_text(source, pos);
            let text = collapse_whitespace(&source[pos..end]);
            if !text.is_empty() {
                self.write_line(&mut output, &text, depth);
            }
            pos = end.max(pos + 1);
        }

        let keep = output.trim_end().len();
        output.truncate(keep);
        output
    }

    /// Write an element's opening tag, returning the position to resume from.
    fn write_element(
        &self,
        output: &mut String,
        source: &str,
        tag: OpeningTag<'_>,
        depth: &mut usize,
    ) -> usize {
        let (tag_name, attrs, is_self_closing, end_pos) = tag;
        let opening = self.render_opening_tag(tag_name, &attrs, is_self_closing, *depth);

        if is_self_closing || is_void_element(tag_name) {
            self.write_line(output, &opening, *depth);
            return end_pos;
        }

        let closing = format!("</{tag_name}>");
        let rest = &source[end_pos..];

        if RAW_TEXT_TAGS.iter().any(|raw| tag_name.eq_ignore_ascii_case(raw)) {
            if let Some(close) = find_ignore_ascii_case(rest, &closing) {
                let raw = format!("{opening}{}{closing}", &rest[..close]);
                self.write_line(output, &raw, *depth);
                return end_pos + close + closing.len();
            }
        }

        // Short text children stay on the opening line.
        let close = if rest.starts_with('<') { 0 } else { scan_text(rest, 0) };
        if close < rest.len() {
            let inner = &rest[..close];
            if !opening.contains('\n')
                && !inner.contains('\n')
                && rest[close..].starts_with(closing.as_str())
            {
                let line = format!("{opening}{}{closing}", inner.trim());
                if self.fits(&line, *depth) {
                    self.write_line(output, &line, *depth);
                    return end_pos + close + closing.len();
                }
            }
        }

        self.write_line(output, &opening, *depth);
        *depth += 1;
        end_pos
    }

    fn render_opening_tag(
        &self,
        tag_name: &str,
        attrs: &[&str],
        is_self_closing: bool,
        depth: usize,
    ) -> String {
        let close = if is_self_closing { " />" } else { ">" };
        let single_line = {
            let mut line = format!("<{tag_name}");
            for attr in attrs {
                line.push(' ');
                line.push_str(attr);
            }
            line.push_str(close);
            line
        };

        let break_attrs = attrs.len() > 1
            && (self.options.single_attribute_per_line || !self.fits(&single_line, depth));
        if !break_attrs {
            return single_line;
        }

        let mut tag = format!("<{tag_name}");
        for attr in attrs {
            tag.push_str(self.newline);
            self.push_indent(&mut tag, depth + 1);
            tag.push_str(attr);
        }
        tag.push_str(self.newline);
        self.push_indent(&mut tag, depth);
        tag.push_str(close.trim_start());
        tag
    }

    fn fits(&self, line: &str, depth: usize) -> bool {
        depth * self.indent.len() + line.len() <= self.options.print_width as usize
    }

    fn push_indent(&self, output: &mut String, depth: usize) {
        for _ in 0..depth {
            output.push_str(&self.indent);
        }
    }

    /// Write `content` at `depth`. Continuation lines are already indented.
    fn write_line(&self, output: &mut String, content: &str, depth: usize) {
        self.push_indent(output, depth);
        output.push_str(content);
        output.push_str(self.newline);
    }
}

/// Parse an opening tag at `start` (which points at `<`).
fn parse_opening_tag(source: &str, start: usize) -> Option<OpeningTag<'_>> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut pos = start + 1;

    let tag_start = pos;
    while pos < len && is_tag_name_char(bytes[pos]) {
        pos += 1;
    }
    if pos == tag_start || !bytes[tag_start].is_ascii_alphabetic() {
        return None;
    }
    let tag_name = &source[tag_start..pos];

    let mut attrs = Vec::new();
    let mut is_self_closing = false;

    while pos < len && bytes[pos] != b'>' {
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= len {
            break;
        }
        if bytes[pos] == b'/' {
            is_self_closing = true;
            pos += 1;
            continue;
        }
        if bytes[pos] == b'>' {
            break;
        }

        let attr_start = pos;
        let mut quote: Option<u8> = None;
        while pos < len {
            let b = bytes[pos];
            match quote {
                Some(q) if b == q => quote = None,
                Some(_) => {}
                None if b == b'"' || b == b'\'' => quote = Some(b),
                None if b.is_ascii_whitespace() || b == b'>' => break,
                None if b == b'/' && bytes.get(pos + 1) == Some(&b'>') => break,
                None => {}
            }
            pos += 1;
        }
        if pos > attr_start {
            attrs.push(&source[attr_start..pos]);
            is_self_closing = false;
        }
    }

    if pos < len && bytes[pos] == b'>' {
        pos += 1;
    }

    Some((tag_name, attrs, is_self_closing, pos))
}

/// Parse a closing tag at `start` (which points at `</`).
fn parse_closing_tag(source: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut pos = start + 2;

    let tag_start = pos;
    while pos < len && is_tag_name_char(bytes[pos]) {
        pos += 1;
    }
    if pos == tag_start {
        return None;
    }
    let tag_name = &source[tag_start..pos];

    while pos < len && bytes[pos] != b'>' {
        pos += 1;
    }
    if pos < len {
        pos += 1;
    }

    Some((tag_name, pos))
}

/// End of the text run at `start`: the next tag or comment, skipping over
/// `{{ }}` interpolations so a `<` inside an expression is kept.
fn scan_text(source: &str, start: usize) -> usize {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut pos = start;

    while pos < len {
        if bytes[pos..].starts_with(b"{{") {
            pos = memmem::find(&bytes[pos + 2..], b"}}").map_or(len, |p| pos + 2 + p + 2);
            continue;
        }
        if bytes[pos] == b'<' && pos > start {
            let next = bytes.get(pos + 1).copied().unwrap_or(b' ');
            if next == b'/' || next == b'!' || next.is_ascii_alphabetic() {
                break;
            }
        }
        pos += 1;
    }

    pos
}

fn collapse_whitespace(text: &str) -> String {
    text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

#[inline(always)]
fn is_tag_name_char(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b':' | b'.')
}

/// Check if an element is a void element (self-closing in HTML)
#[inline]
fn is_void_element(tag: &str) -> bool {
    reframe_relief::is_void_tag(&tag.to_ascii_lowercase())
}
