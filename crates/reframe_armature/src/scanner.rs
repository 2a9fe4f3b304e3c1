//! Pull-based template scanner.
//!
//! [`Scanner`] walks the template once, front to back, and yields flat
//! [`Token`]s. It knows nothing about nesting; pairing open and close tags
//! is the parser's job.

use compact_str::CompactString;
use memchr::{memchr, memmem};
use reframe_relief::{ErrorCode, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'s> {
    Text(Span),
    /// `inner` excludes the delimiters
    Interpolation { inner: Span, span: Span },
    /// `<!-- -->`, or a bogus `<!...>` / `<?...>` comment
    Comment { inner: Span, span: Span },
    OpenTag(OpenTag<'s>),
    CloseTag { name: &'s str, span: Span },
    Error { code: ErrorCode, offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag<'s> {
    pub name: &'s str,
    pub attrs: Vec<RawAttr<'s>>,
    pub self_closing: bool,
    pub span: Span,
}

/// An attribute exactly as written, before directive decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttr<'s> {
    pub name: &'s str,
    /// Unquoted value text
    pub value: Option<&'s str>,
    /// Source offset of the first byte of `value`
    pub value_start: usize,
    pub span: Span,
}

pub struct Scanner<'s> {
    source: &'s str,
    pos: usize,
    open: CompactString,
    close: CompactString,
    interpolation: bool,
    /// Second token produced by a scan that also reported an error
    pending: Option<Token<'s>>,
}

impl<'s> Scanner<'s> {
    pub fn new(source: &'s str, delimiters: &(CompactString, CompactString)) -> Self {
        Self {
            source,
            pos: 0,
            open: delimiters.0.clone(),
            close: delimiters.1.clone(),
            interpolation: true,
            pending: None,
        }
    }

    /// Stop or resume recognising interpolations, as `v-pre` requires.
    pub fn set_interpolation(&mut self, enabled: bool) {
        self.interpolation = enabled;
    }

    fn bytes(&self) -> &'s [u8] {
        self.source.as_bytes()
    }

    fn at_interpolation(&self) -> bool {
        self.interpolation
            && !self.open.is_empty()
            && self.source[self.pos..].starts_with(self.open.as_str())
    }

    fn scan_text(&mut self) -> Token<'s> {
        let start = self.pos;
        let first = self.source[start..].chars().next().map_or(1, char::len_utf8);
        let from = start + first;
        let tail = &self.bytes()[from..];

        let lt = memchr(b'<', tail);
        let delim = if self.interpolation && !self.open.is_empty() {
            memmem::find(tail, self.open.as_bytes())
        } else {
            None
        };
        let end = match (lt, delim) {
            (Some(a), Some(b)) => from + a.min(b),
            (Some(a), None) | (None, Some(a)) => from + a,
            (None, None) => self.source.len(),
        };
        self.pos = end;
        Token::Text(Span::new(start, end))
    }

    fn scan_interpolation(&mut self) -> Token<'s> {
        let start = self.pos;
        let inner_start = start + self.open.len();
        match memmem::find(&self.bytes()[inner_start..], self.close.as_bytes()) {
            Some(len) => {
                let inner_end = inner_start + len;
                self.pos = inner_end + self.close.len();
                Token::Interpolation {
                    inner: Span::new(inner_start, inner_end),
                    span: Span::new(start, self.pos),
                }
            }
            None => {
                self.pos = self.source.len();
                self.pending = Some(Token::Text(Span::new(start, self.pos)));
                Token::Error {
                    code: ErrorCode::MissingInterpolationEnd,
                    offset: start,
                }
            }
        }
    }

    /// `None` when the `<` does not start markup and should be read as text.
    fn scan_markup(&mut self) -> Option<Token<'s>> {
        let rest = &self.bytes()[self.pos..];
        if rest.starts_with(b"<!--") {
            return Some(self.scan_comment());
        }
        match *rest.get(1)? {
            b'!' | b'?' => Some(self.scan_bogus_comment()),
            b'/' => Some(self.scan_close_tag()),
            b if b.is_ascii_alphabetic() => Some(self.scan_open_tag()),
            _ => None,
        }
    }

    fn scan_comment(&mut self) -> Token<'s> {
        let start = self.pos;
        let inner_start = start + 4;
        match memmem::find(&self.bytes()[inner_start..], b"-->") {
            Some(len) => {
                self.pos = inner_start + len + 3;
                Token::Comment {
                    inner: Span::new(inner_start, inner_start + len),
                    span: Span::new(start, self.pos),
                }
            }
            None => {
                self.pos = self.source.len();
                self.pending = Some(Token::Comment {
                    inner: Span::new(inner_start, self.pos),
                    span: Span::new(start, self.pos),
                });
                Token::Error {
                    code: ErrorCode::EofInComment,
                    offset: start,
                }
            }
        }
    }

    fn scan_bogus_comment(&mut self) -> Token<'s> {
        let start = self.pos;
        let inner_start = start + 2;
        let inner_end = memchr(b'>', &self.bytes()[inner_start..])
            .map_or(self.source.len(), |len| inner_start + len);
        self.pos = (inner_end + 1).min(self.source.len());
        Token::Comment {
            inner: Span::new(inner_start, inner_end),
            span: Span::new(start, self.pos),
        }
    }

    fn scan_close_tag(&mut self) -> Token<'s> {
        let start = self.pos;
        let name_start = start + 2;
        let name_end = scan_name(self.bytes(), name_start);
        match memchr(b'>', &self.bytes()[name_end..]) {
            Some(len) => {
                self.pos = name_end + len + 1;
                Token::CloseTag {
                    name: &self.source[name_start..name_end],
                    span: Span::new(start, self.pos),
                }
            }
            None => self.eof_in_tag(start),
        }
    }

    fn scan_open_tag(&mut self) -> Token<'s> {
        let start = self.pos;
        let bytes = self.bytes();
        let name_end = scan_name(bytes, start + 1);
        let mut tag = OpenTag {
            name: &self.source[start + 1..name_end],
            attrs: Vec::new(),
            self_closing: false,
            span: Span::default(),
        };

        let mut at = name_end;
        loop {
            at = skip_whitespace(bytes, at);
            match bytes.get(at) {
                None => return self.eof_in_tag(start),
                Some(b'>') => {
                    at += 1;
                    break;
                }
                Some(b'/') if bytes.get(at + 1) == Some(&b'>') => {
                    tag.self_closing = true;
                    at += 2;
                    break;
                }
                Some(b'/') => at += 1,
                Some(_) => match self.scan_attr(at) {
                    Some(attr) => {
                        at = attr.span.end as usize;
                        tag.attrs.push(attr);
                    }
                    None => return self.eof_in_tag(start),
                },
            }
        }

        tag.span = Span::new(start, at);
        self.pos = at;
        Token::OpenTag(tag)
    }

    /// `None` when a quoted value runs off the end of the source.
    fn scan_attr(&self, from: usize) -> Option<RawAttr<'s>> {
        let bytes = self.bytes();
        let mut name_end = from;
        while name_end < bytes.len() && !is_name_end(bytes[name_end]) && bytes[name_end] != b'=' {
            name_end += 1;
        }
        if name_end == from {
            // a stray `=` becomes its own attribute name
            name_end += 1;
        }
        let name = &self.source[from..name_end];

        let eq = skip_whitespace(bytes, name_end);
        if bytes.get(eq) != Some(&b'=') {
            return Some(RawAttr {
                name,
                value: None,
                value_start: name_end,
                span: Span::new(from, name_end),
            });
        }

        let value_at = skip_whitespace(bytes, eq + 1);
        let (value_start, value_end, end) = match *bytes.get(value_at)? {
            quote @ (b'"' | b'\'') => {
                let len = memchr(quote, &bytes[value_at + 1..])?;
                (value_at + 1, value_at + 1 + len, value_at + 2 + len)
            }
            _ => {
                let mut end = value_at;
                while end < bytes.len() && !bytes[end].is_ascii_whitespace() && bytes[end] != b'>' {
                    end += 1;
                }
                (value_at, end, end)
            }
        };

        Some(RawAttr {
            name,
            value: Some(&self.source[value_start..value_end]),
            value_start,
            span: Span::new(from, end),
        })
    }

    fn eof_in_tag(&mut self, start: usize) -> Token<'s> {
        self.pos = self.source.len();
        Token::Error {
            code: ErrorCode::EofInTag,
            offset: start,
        }
    }
}

impl<'s> Iterator for Scanner<'s> {
    type Item = Token<'s>;

    fn next(&mut self) -> Option<Token<'s>> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }
        if self.pos >= self.source.len() {
            return None;
        }
        if self.bytes()[self.pos] == b'<' {
            if let Some(token) = self.scan_markup() {
                return Some(token);
            }
        } else if self.at_interpolation() {
            return Some(self.scan_interpolation());
        }
        Some(self.scan_text())
    }
}

#[inline]
fn is_name_end(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'/' || b == b'>'
}

fn scan_name(bytes: &[u8], from: usize) -> usize {
    let mut at = from;
    while at < bytes.len() && !is_name_end(bytes[at]) {
        at += 1;
    }
    at
}

fn skip_whitespace(bytes: &[u8], from: usize) -> usize {
    let mut at = from;
    while at < bytes.len() && bytes[at].is_ascii_whitespace() {
        at += 1;
    }
    at
}
