//! Script formatting using oxc_codegen.
//!
//! The program is parsed with `oxc_parser` and printed back with
//! `oxc_codegen`. The printer has a single fixed style, so a chain of byte
//! passes then adapts its output to the requested [`FormatOptions`]. Every
//! pass works on a [`Region`] map so string, template and comment contents
//! are never touched.

use std::ops::Range;

use memchr::memchr;
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::error::FormatError;
use crate::options::{ArrowParens, FormatOptions, TrailingComma};

/// Format JavaScript/TypeScript content.
///
/// `lang` is the `lang` attribute of the owning `<script>` block, if any.
pub fn format_script_content(
    source: &str,
    lang: Option<&str>,
    options: &FormatOptions,
) -> Result<String, FormatError> {
    if source.trim().is_empty() {
        return Ok(String::new());
    }

    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, source_type_for(lang)).parse();
    if !parsed.errors.is_empty() {
        let messages: Vec<String> = parsed.errors.iter().map(|e| e.to_string()).collect();
        return Err(FormatError::ScriptParseError(messages.join("; ")));
    }

    let printed = Codegen::new()
        .with_options(CodegenOptions {
            single_quote: options.single_quote,
            ..Default::default()
        })
        .build(&parsed.program)
        .code;

    Ok(post_process(&printed, options))
}

pub(crate) fn source_type_for(lang: Option<&str>) -> SourceType {
    match lang {
        Some("ts") => SourceType::ts(),
        Some("tsx") => SourceType::tsx(),
        Some("jsx") => SourceType::jsx(),
        _ => SourceType::mjs(),
    }
}

fn post_process(printed: &str, options: &FormatOptions) -> String {
    let mut code = normalize_indentation(printed, options);
    if !options.semi {
        code = remove_optional_semicolons(&code);
    }
    if options.bracket_spacing {
        code = ensure_bracket_spacing(&code);
    }
    if options.trailing_comma == TrailingComma::None {
        code = remove_trailing_commas(&code);
    }
    if options.arrow_parens == ArrowParens::Avoid {
        code = avoid_arrow_parens(&code);
    }
    finish_lines(&code, options.newline_string())
}

/// Lexical class of a byte in printed script output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Code,
    Literal,
    Comment,
}

fn classify(bytes: &[u8]) -> Vec<Region> {
    #[derive(Clone, Copy)]
    enum State {
        Code,
        Quote(u8),
        Template,
        Regex { in_class: bool },
        LineComment,
        BlockComment,
    }

    let len = bytes.len();
    let mut regions = vec![Region::Code; len];
    let mut state = State::Code;
    // Brace depth inside each open `${` substitution.
    let mut substitutions: Vec<u32> = Vec::new();
    let mut last_significant: Option<u8> = None;
    let mut i = 0;

    while i < len {
        let b = bytes[i];
        match state {
            State::Code => match b {
                b'\'' | b'"' => {
                    regions[i] = Region::Literal;
                    state = State::Quote(b);
                }
                b'`' => {
                    regions[i] = Region::Literal;
                    state = State::Template;
                }
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    regions[i] = Region::Comment;
                    state = State::LineComment;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    regions[i] = Region::Comment;
                    regions[i + 1] = Region::Comment;
                    i += 1;
                    state = State::BlockComment;
                }
                b'/' if starts_regex(last_significant) => {
                    regions[i] = Region::Literal;
                    state = State::Regex { in_class: false };
                }
                b'{' => {
                    if let Some(depth) = substitutions.last_mut() {
                        *depth += 1;
                    }
                    last_significant = Some(b);
                }
                b'}' => match substitutions.last().copied() {
                    Some(0) => {
                        substitutions.pop();
                        regions[i] = Region::Literal;
                        state = State::Template;
                    }
                    Some(_) => {
                        if let Some(depth) = substitutions.last_mut() {
                            *depth -= 1;
                        }
                        last_significant = Some(b);
                    }
                    None => last_significant = Some(b),
                },
                b' ' | b'\t' | b'\n' | b'\r' => {}
                _ => last_significant = Some(b),
            },
            State::Quote(quote) => {
                if b == b'\n' {
                    state = State::Code;
                } else {
                    regions[i] = Region::Literal;
                    if b == b'\\' && i + 1 < len {
                        regions[i + 1] = Region::Literal;
                        i += 1;
                    } else if b == quote {
                        state = State::Code;
                        last_significant = Some(b);
                    }
                }
            }
            State::Template => {
                regions[i] = Region::Literal;
                if b == b'\\' && i + 1 < len {
                    regions[i + 1] = Region::Literal;
                    i += 1;
                } else if b == b'`' {
                    state = State::Code;
                    last_significant = Some(b);
                } else if b == b'$' && bytes.get(i + 1) == Some(&b'{') {
                    regions[i + 1] = Region::Literal;
                    i += 1;
                    substitutions.push(0);
                    state = State::Code;
                    last_significant = Some(b'{');
                }
            }
            State::Regex { in_class } => {
                if b == b'\n' {
                    state = State::Code;
                } else {
                    regions[i] = Region::Literal;
                    match b {
                        b'\\' if i + 1 < len => {
                            regions[i + 1] = Region::Literal;
                            i += 1;
                        }
                        b'[' => state = State::Regex { in_class: true },
                        b']' => state = State::Regex { in_class: false },
                        b'/' if !in_class => {
                            state = State::Code;
                            // A closed regex is an operand.
                            last_significant = Some(b')');
                        }
                        _ => {}
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Code;
                } else {
                    regions[i] = Region::Comment;
                }
            }
            State::BlockComment => {
                regions[i] = Region::Comment;
                if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    regions[i + 1] = Region::Comment;
                    i += 1;
                    state = State::Code;
                }
            }
        }
        i += 1;
    }

    regions
}

/// A `/` opens a regex literal unless it follows an operand.
fn starts_regex(previous: Option<u8>) -> bool {
    match previous {
        None => true,
        Some(b) => !(is_ident_byte(b) || matches!(b, b')' | b']' | b'}' | b'\'' | b'"' | b'`')),
    }
}

#[inline(always)]
fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

/// Replace each range with its text. Ranges must be sorted and disjoint.
fn apply_edits(text: &str, edits: &[(Range<usize>, &str)]) -> String {
    let mut out = String::with_capacity(text.len() + edits.len());
    let mut cursor = 0;
    for (range, replacement) in edits {
        out.push_str(&text[cursor..range.start]);
        out.push_str(replacement);
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Iterate `(start, line)` pairs without the trailing newline.
fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let bytes = text.as_bytes();
    let mut start = 0;
    std::iter::from_fn(move || {
        if start >= bytes.len() {
            return None;
        }
        let end = memchr(b'\n', &bytes[start..]).map_or(bytes.len(), |p| start + p);
        let item = (start, &text[start..end]);
        start = end + 1;
        Some(item)
    })
}

/// oxc_codegen indents with one tab per level.
fn normalize_indentation(text: &str, options: &FormatOptions) -> String {
    let regions = classify(text.as_bytes());
    let indent = options.indent_string();
    let mut out = String::with_capacity(text.len() + text.len() / 4);

    for (start, line) in lines_with_offsets(text) {
        let inside_literal = start > 0 && regions[start - 1] == Region::Literal;
        if inside_literal {
            out.push_str(line);
        } else {
            let levels = line.bytes().take_while(|&b| b == b'\t').count();
            for _ in 0..levels {
                out.push_str(&indent);
            }
            out.push_str(&line[levels..]);
        }
        out.push('\n');
    }

    out
}

/// Drop statement-ending semicolons. A following line that starts with
/// `(`, `[` or a backtick gets a leading `;` instead.
fn remove_optional_semicolons(text: &str) -> String {
    let bytes = text.as_bytes();
    let regions = classify(bytes);
    let lines: Vec<(usize, &str)> = lines_with_offsets(text).collect();
    let mut edits: Vec<(Range<usize>, &str)> = Vec::new();
    let mut pending_guard = false;

    for (start, line) in &lines {
        let trimmed_start = line.len() - line.trim_start().len();
        let trimmed_end = line.trim_end().len();
        if trimmed_start >= trimmed_end {
            continue;
        }

        let first = start + trimmed_start;
        if pending_guard {
            if regions[first] == Region::Code && matches!(bytes[first], b'(' | b'[' | b'`') {
                edits.push((first..first, ";"));
            }
            pending_guard = false;
        }

        let last = start + trimmed_end - 1;
        if bytes[last] == b';' && regions[last] == Region::Code && !is_for_header(line) {
            edits.push((last..last + 1, ""));
            pending_guard = true;
        }
    }

    apply_edits(text, &edits)
}

/// `for (;;)` headers that were split across lines keep their semicolons.
fn is_for_header(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("for (") || trimmed.starts_with("for(")
}

/// Ensure proper spacing inside object braces
fn ensure_bracket_spacing(text: &str) -> String {
    let bytes = text.as_bytes();
    let regions = classify(bytes);
    let mut edits: Vec<(Range<usize>, &str)> = Vec::new();

    for (i, &b) in bytes.iter().enumerate() {
        if regions[i] != Region::Code {
            continue;
        }
        match b {
            b'{' => {
                if let Some(&next) = bytes.get(i + 1) {
                    if !matches!(next, b'}' | b' ' | b'\n' | b'\r') {
                        edits.push((i + 1..i + 1, " "));
                    }
                }
            }
            b'}' if i > 0 => {
                if !matches!(bytes[i - 1], b'{' | b' ' | b'\n' | b'\r' | b'\t') {
                    edits.push((i..i, " "));
                }
            }
            _ => {}
        }
    }

    apply_edits(text, &edits)
}

/// Remove a comma that is only followed by whitespace and a closing bracket.
fn remove_trailing_commas(text: &str) -> String {
    let bytes = text.as_bytes();
    let regions = classify(bytes);
    let mut edits: Vec<(Range<usize>, &str)> = Vec::new();

    for (i, &b) in bytes.iter().enumerate() {
        if b != b',' || regions[i] != Region::Code {
            continue;
        }
        let next = bytes[i + 1..]
            .iter()
            .position(|c| !c.is_ascii_whitespace())
            .map(|offset| bytes[i + 1 + offset]);
        if matches!(next, Some(b'}' | b']' | b')')) {
            edits.push((i..i + 1, ""));
        }
    }

    apply_edits(text, &edits)
}

/// `(value) => ...` becomes `value => ...`.
fn avoid_arrow_parens(text: &str) -> String {
    let bytes = text.as_bytes();
    let regions = classify(bytes);
    let mut edits: Vec<(Range<usize>, &str)> = Vec::new();
    let len = bytes.len();
    let mut i = 0;

    while i < len {
        if bytes[i] != b'(' || regions[i] != Region::Code {
            i += 1;
            continue;
        }

        let ident_start = i + 1;
        let mut j = ident_start;
        while j < len && is_ident_byte(bytes[j]) {
            j += 1;
        }
        let is_single_ident =
            j > ident_start && !bytes[ident_start].is_ascii_digit() && j < len && bytes[j] == b')';
        if !is_single_ident {
            i += 1;
            continue;
        }

        let mut k = j + 1;
        while k < len && bytes[k] == b' ' {
            k += 1;
        }
        if bytes[k..].starts_with(b"=>") && opens_arrow_params(bytes, i) {
            edits.push((i..i + 1, ""));
            edits.push((j..j + 1, ""));
        }
        i = j + 1;
    }

    apply_edits(text, &edits)
}

/// A `(` starts arrow parameters unless it is a call, except after `async`.
fn opens_arrow_params(bytes: &[u8], paren: usize) -> bool {
    let before = &bytes[..paren];
    let trimmed_len = before
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |p| p + 1);
    let before = &before[..trimmed_len];
    match before.last() {
        None => true,
        Some(&b) if is_ident_byte(b) => {
            before.ends_with(b"async")
                && (before.len() == 5 || !is_ident_byte(before[before.len() - 6]))
        }
        Some(b')' | b']') => false,
        Some(_) => true,
    }
}

/// Trim trailing whitespace, end with exactly one newline.
fn finish_lines(text: &str, newline: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (_, line) in lines_with_offsets(text) {
        out.push_str(line.trim_end());
        out.push_str(newline);
    }
    let keep = out.trim_end().len();
    out.truncate(keep);
    if !out.is_empty() {
        out.push_str(newline);
    }
    out
}
