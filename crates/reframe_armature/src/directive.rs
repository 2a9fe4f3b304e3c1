//! Directive attribute decoding.
//!
//! Splits `v-on:click.stop`, `@click.stop`, `:[key]` and friends into a
//! normalized name, an optional argument and modifiers. All offsets are
//! relative to the start of the text they were cut from.

/// One piece of a directive name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Piece<'s> {
    pub text: &'s str,
    pub start: usize,
    pub end: usize,
    /// `[...]` argument
    pub dynamic: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DirectiveName<'s> {
    pub name: &'s str,
    pub arg: Option<Piece<'s>>,
    pub modifiers: Vec<Piece<'s>>,
}

/// `None` for a plain attribute.
pub(crate) fn parse_name(raw: &str) -> Option<DirectiveName<'_>> {
    let (name, arg_at, mut cursor) = match raw.strip_prefix("v-") {
        Some(body) => {
            let len = body.find([':', '.']).unwrap_or(body.len());
            if len == 0 {
                return None;
            }
            let after = 2 + len;
            let arg_at = raw[after..].starts_with(':').then_some(after + 1);
            (&body[..len], arg_at, after)
        }
        None => {
            let name = match raw.as_bytes().first()? {
                b':' | b'.' => "bind",
                b'@' => "on",
                b'#' => "slot",
                _ => return None,
            };
            (name, Some(1), 1)
        }
    };

    let mut parsed = DirectiveName {
        name,
        arg: None,
        modifiers: Vec::new(),
    };

    if let Some(start) = arg_at {
        let arg = scan_arg(raw, start);
        cursor = if arg.dynamic { arg.end + 1 } else { arg.end };
        if !arg.text.is_empty() {
            parsed.arg = Some(arg);
        }
    }

    let mut offset = cursor;
    for part in raw[cursor..].split('.') {
        if !part.is_empty() {
            parsed.modifiers.push(Piece {
                text: part,
                start: offset,
                end: offset + part.len(),
                dynamic: false,
            });
        }
        offset += part.len() + 1;
    }

    // `.foo` is shorthand for `v-bind:foo.prop`
    if raw.starts_with('.') {
        parsed.modifiers.push(Piece {
            text: "prop",
            start: 0,
            end: 1,
            dynamic: false,
        });
    }

    Some(parsed)
}

fn scan_arg(raw: &str, start: usize) -> Piece<'_> {
    if raw[start..].starts_with('[') {
        if let Some(len) = raw[start..].find(']') {
            return Piece {
                text: &raw[start + 1..start + len],
                start: start + 1,
                end: start + len,
                dynamic: true,
            };
        }
    }
    let end = raw[start..].find('.').map_or(raw.len(), |len| start + len);
    Piece {
        text: &raw[start..end],
        start,
        end,
        dynamic: false,
    }
}

/// Byte ranges of `(value, key, index) in source`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ForParts {
    pub source: (usize, usize),
    pub value: Option<(usize, usize)>,
    pub key: Option<(usize, usize)>,
    pub index: Option<(usize, usize)>,
}

/// `None` unless the expression has an `in`/`of` keyword and a source.
pub(crate) fn split_for_expression(exp: &str) -> Option<ForParts> {
    let (lhs_end, source_start) = find_iteration_keyword(exp)?;
    let source = trim_range(exp, source_start, exp.len());
    if source.0 == source.1 {
        return None;
    }

    let (mut start, mut end) = trim_range(exp, 0, lhs_end);
    if exp[start..end].starts_with('(') && exp[start..end].ends_with(')') {
        start += 1;
        end -= 1;
    }

    let mut aliases = [None; 3];
    for (slot, (s, e)) in aliases.iter_mut().zip(split_top_level(exp, start, end)) {
        let range = trim_range(exp, s, e);
        if range.0 < range.1 {
            *slot = Some(range);
        }
    }

    Some(ForParts {
        source,
        value: aliases[0],
        key: aliases[1],
        index: aliases[2],
    })
}

/// End of the alias list and start of the source around the first
/// whitespace-delimited `in` or `of`.
fn find_iteration_keyword(exp: &str) -> Option<(usize, usize)> {
    let bytes = exp.as_bytes();
    for (at, b) in bytes.iter().enumerate() {
        if !b.is_ascii_whitespace() {
            continue;
        }
        let mut kw = at;
        while kw < bytes.len() && bytes[kw].is_ascii_whitespace() {
            kw += 1;
        }
        let rest = &bytes[kw..];
        let keyword = rest.starts_with(b"in") || rest.starts_with(b"of");
        if keyword && rest.get(2).is_some_and(u8::is_ascii_whitespace) {
            return Some((at, kw + 2));
        }
    }
    None
}

/// Comma-separated ranges of `exp[start..end]`, ignoring nested commas.
fn split_top_level(exp: &str, start: usize, end: usize) -> Vec<(usize, usize)> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut from = start;
    for (at, b) in exp.as_bytes()[start..end].iter().enumerate() {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push((from, start + at));
                from = start + at + 1;
            }
            _ => {}
        }
    }
    parts.push((from, end));
    parts
}

fn trim_range(text: &str, start: usize, end: usize) -> (usize, usize) {
    let slice = &text[start..end];
    if slice.trim().is_empty() {
        return (start, start);
    }
    let lead = slice.len() - slice.trim_start().len();
    let trail = slice.len() - slice.trim_end().len();
    (start + lead, end - trail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'s>(pieces: &[Piece<'s>]) -> Vec<&'s str> {
        pieces.iter().map(|p| p.text).collect()
    }

    #[test]
    fn test_plain_attribute() {
        assert!(parse_name("class").is_none());
        assert!(parse_name("v-").is_none());
    }

    #[test]
    fn test_long_form() {
        let parsed = parse_name("v-on:click.stop.prevent").unwrap();
        assert_eq!(parsed.name, "on");
        let arg = parsed.arg.unwrap();
        assert_eq!((arg.text, arg.start, arg.end, arg.dynamic), ("click", 5, 10, false));
        assert_eq!(texts(&parsed.modifiers), ["stop", "prevent"]);
        assert_eq!(parsed.modifiers[0].start, 11);
    }

    #[test]
    fn test_shorthands() {
        let bind = parse_name(":class").unwrap();
        assert_eq!((bind.name, bind.arg.unwrap().text), ("bind", "class"));

        let on = parse_name("@submit.prevent").unwrap();
        assert_eq!(on.name, "on");
        assert_eq!(texts(&on.modifiers), ["prevent"]);

        let slot = parse_name("#default").unwrap();
        assert_eq!((slot.name, slot.arg.unwrap().text), ("slot", "default"));

        let prop = parse_name(".inner-html").unwrap();
        assert_eq!(prop.name, "bind");
        assert_eq!(prop.arg.unwrap().text, "inner-html");
        assert_eq!(texts(&prop.modifiers), ["prop"]);
    }

    #[test]
    fn test_no_argument() {
        let parsed = parse_name("v-model.trim").unwrap();
        assert_eq!(parsed.name, "model");
        assert!(parsed.arg.is_none());
        assert_eq!(texts(&parsed.modifiers), ["trim"]);

        let bare = parse_name("v-if").unwrap();
        assert!(bare.arg.is_none() && bare.modifiers.is_empty());
    }

    #[test]
    fn test_dynamic_argument() {
        let parsed = parse_name("v-bind:[key.name].camel").unwrap();
        let arg = parsed.arg.unwrap();
        assert_eq!((arg.text, arg.dynamic), ("key.name", true));
        assert_eq!(texts(&parsed.modifiers), ["camel"]);

        let short = parse_name("@[event]").unwrap();
        assert_eq!(short.arg.unwrap().text, "event");
    }

    #[test]
    fn test_split_for_expression_variants() {
        let parts = split_for_expression("item of items").unwrap();
        assert_eq!(parts.value, Some((0, 4)));
        assert_eq!(parts.source, (8, 13));
        assert!(parts.key.is_none());

        let exp = "(row, key, index) in list.rows";
        let parts = split_for_expression(exp).unwrap();
        let slice = |r: Option<(usize, usize)>| r.map(|(s, e)| &exp[s..e]);
        assert_eq!(slice(parts.value), Some("row"));
        assert_eq!(slice(parts.key), Some("key"));
        assert_eq!(slice(parts.index), Some("index"));
        assert_eq!(&exp[parts.source.0..parts.source.1], "list.rows");

        let parts = split_for_expression("{ a, b } in rows").unwrap();
        assert_eq!(parts.value, Some((0, 8)));
        assert!(parts.key.is_none());

        let parts = split_for_expression("index in indexes").unwrap();
        assert_eq!(parts.value, Some((0, 5)));

        assert!(split_for_expression("items").is_none());
        assert!(split_for_expression("item in  ").is_none());
    }
}
