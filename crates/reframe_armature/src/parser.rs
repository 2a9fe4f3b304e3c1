//! Template tree builder.
//!
//! Pulls tokens from a [`Scanner`] and nests them with a stack of open
//! elements. Parsing never fails outright; problems are collected as
//! [`CompilerError`]s next to a best-effort tree.

use reframe_relief::ast::*;
use reframe_relief::errors::{CompilerError, ErrorCode};
use reframe_relief::options::{is_void_tag, ParserOptions};
use reframe_relief::{Box, Bump, Vec};

use crate::directive::{parse_name, split_for_expression};
use crate::scanner::{OpenTag, RawAttr, Scanner, Token};

pub struct Parser<'a> {
    allocator: &'a Bump,
    source: &'a str,
    options: ParserOptions,
    open: std::vec::Vec<Frame<'a>>,
    root: RootNode<'a>,
    errors: Vec<'a, CompilerError>,
}

struct Frame<'a> {
    element: ElementNode<'a>,
    /// This element carries `v-pre`
    v_pre: bool,
}

impl<'a> Parser<'a> {
    pub fn new(allocator: &'a Bump, source: &'a str) -> Self {
        Self::with_options(allocator, source, ParserOptions::default())
    }

    pub fn with_options(allocator: &'a Bump, source: &'a str, options: ParserOptions) -> Self {
        Self {
            allocator,
            source,
            options,
            open: std::vec::Vec::new(),
            root: RootNode::new(allocator),
            errors: Vec::new_in(allocator),
        }
    }

    pub fn parse(mut self) -> (RootNode<'a>, Vec<'a, CompilerError>) {
        let mut scanner = Scanner::new(self.source, &self.options.delimiters);
        while let Some(token) = scanner.next() {
            match token {
                Token::Text(span) => self.push_text(span),
                Token::Interpolation { inner, span } => {
                    let content = expression(inner.source_text(self.source), inner.start as usize, false);
                    self.push_child(TemplateChildNode::Interpolation(InterpolationNode { content, span }));
                }
                Token::Comment { inner, span } => {
                    if self.options.comments {
                        self.push_child(TemplateChildNode::Comment(CommentNode {
                            content: inner.source_text(self.source).into(),
                            span,
                        }));
                    }
                }
                Token::OpenTag(tag) => {
                    if self.open_element(tag) {
                        scanner.set_interpolation(false);
                    }
                }
                Token::CloseTag { name, span } => {
                    if self.close_element(name, span) {
                        scanner.set_interpolation(!self.in_v_pre());
                    }
                }
                Token::Error { code, offset } => self.errors.push(CompilerError::new(code, offset)),
            }
        }

        while let Some(frame) = self.open.pop() {
            self.error(ErrorCode::MissingEndTag, frame.element.span.start);
            self.attach(frame.element);
        }
        (self.root, self.errors)
    }

    fn in_v_pre(&self) -> bool {
        self.open.iter().any(|frame| frame.v_pre)
    }

    fn error(&mut self, code: ErrorCode, offset: u32) {
        self.errors.push(CompilerError::new(code, offset as usize));
    }

    fn children_mut(&mut self) -> &mut Vec<'a, TemplateChildNode<'a>> {
        match self.open.last_mut() {
            Some(frame) => &mut frame.element.children,
            None => &mut self.root.children,
        }
    }

    fn push_child(&mut self, child: TemplateChildNode<'a>) {
        self.children_mut().push(child);
    }

    fn attach(&mut self, element: ElementNode<'a>) {
        let boxed = Box::new_in(element, self.allocator);
        self.push_child(TemplateChildNode::Element(boxed));
    }

    /// Adjacent text runs merge; whitespace-only runs between nodes are dropped.
    fn push_text(&mut self, span: Span) {
        let source = self.source;
        if let Some(TemplateChildNode::Text(prev)) = self.children_mut().last_mut() {
            if prev.span.end == span.start {
                prev.span.end = span.end;
                prev.content = prev.span.source_text(source).into();
                return;
            }
        }
        let text = span.source_text(source);
        if text.trim().is_empty() {
            return;
        }
        self.push_child(TemplateChildNode::Text(TextNode {
            content: text.into(),
            span,
        }));
    }

    /// Returns `true` when the element switches `v-pre` on.
    fn open_element(&mut self, tag: OpenTag<'a>) -> bool {
        let raw = self.in_v_pre();
        let starts_v_pre = !raw && tag.attrs.iter().any(|attr| attr.name == "v-pre");

        let mut element = ElementNode::new(self.allocator, tag.name, tag.span);
        element.is_self_closing = tag.self_closing;
        for attr in tag.attrs {
            if starts_v_pre && attr.name == "v-pre" {
                continue;
            }
            let prop = self.build_prop(attr, raw || starts_v_pre);
            element.props.push(prop);
        }

        if tag.self_closing || is_void_tag(&tag.name.to_ascii_lowercase()) {
            self.attach(element);
            return false;
        }
        self.open.push(Frame {
            element,
            v_pre: starts_v_pre,
        });
        starts_v_pre
    }

    /// Returns `true` when a `v-pre` element was closed.
    fn close_element(&mut self, name: &str, span: Span) -> bool {
        let Some(depth) = self
            .open
            .iter()
            .rposition(|frame| frame.element.tag.eq_ignore_ascii_case(name))
        else {
            self.error(ErrorCode::InvalidEndTag, span.start);
            return false;
        };

        let mut closed_v_pre = false;
        while self.open.len() > depth {
            let Some(mut frame) = self.open.pop() else {
                break;
            };
            if self.open.len() == depth {
                frame.element.span.end = span.end;
            } else {
                self.error(ErrorCode::MissingEndTag, frame.element.span.start);
            }
            closed_v_pre |= frame.v_pre;
            self.attach(frame.element);
        }
        closed_v_pre
    }

    fn build_prop(&mut self, attr: RawAttr<'a>, raw: bool) -> PropNode<'a> {
        let decoded = if raw { None } else { parse_name(attr.name) };
        let Some(decoded) = decoded else {
            return PropNode::Attribute(AttributeNode {
                name: attr.name.into(),
                value: attr.value.map(Into::into),
                span: attr.span,
            });
        };

        let name_start = attr.span.start as usize;
        let mut dir = DirectiveNode::new(self.allocator, decoded.name, attr.span);
        dir.raw_name = attr.name.into();
        dir.arg = decoded.arg.map(|arg| {
            SimpleExpressionNode::new(
                arg.text,
                !arg.dynamic,
                Span::new(name_start + arg.start, name_start + arg.end),
            )
        });
        for modifier in decoded.modifiers {
            dir.modifiers.push(SimpleExpressionNode::new(
                modifier.text,
                true,
                Span::new(name_start + modifier.start, name_start + modifier.end),
            ));
        }

        if let Some(value) = attr.value {
            let exp = expression(value, attr.value_start, false);
            if !exp.content.is_empty() {
                dir.exp = Some(exp);
            }
        }

        if dir.name == "for" {
            dir.for_parse_result = dir.exp.as_ref().and_then(for_parse_result);
            if dir.for_parse_result.is_none() {
                self.error(ErrorCode::VForMalformedExpression, attr.span.start);
            }
        }

        PropNode::Directive(dir)
    }
}

/// Trimmed expression text at its position in the source.
fn expression(text: &str, offset: usize, is_static: bool) -> SimpleExpressionNode {
    let lead = text.len() - text.trim_start().len();
    let content = text.trim();
    let start = offset + lead;
    SimpleExpressionNode::new(content, is_static, Span::new(start, start + content.len()))
}

fn for_parse_result(exp: &SimpleExpressionNode) -> Option<ForParseResult> {
    let parts = split_for_expression(&exp.content)?;
    let base = exp.span.start as usize;
    let piece = |(start, end): (usize, usize)| {
        SimpleExpressionNode::new(&exp.content[start..end], false, Span::new(base + start, base + end))
    };
    Some(ForParseResult {
        source: piece(parts.source),
        value: parts.value.map(piece),
        key: parts.key.map(piece),
        index: parts.index.map(piece),
    })
}

/// Parse a Vue template
pub fn parse<'a>(allocator: &'a Bump, source: &'a str) -> (RootNode<'a>, Vec<'a, CompilerError>) {
    Parser::new(allocator, source).parse()
}

/// Parse a Vue template with custom options
pub fn parse_with_options<'a>(
    allocator: &'a Bump,
    source: &'a str,
    options: ParserOptions,
) -> (RootNode<'a>, Vec<'a, CompilerError>) {
    Parser::with_options(allocator, source, options).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element<'a, 'b>(node: &'b TemplateChildNode<'a>) -> &'b ElementNode<'a> {
        match node {
            TemplateChildNode::Element(el) => el,
            other => panic!("Expected element, got {:?}", other.node_type()),
        }
    }

    fn directive<'a, 'b>(el: &'b ElementNode<'a>, index: usize) -> &'b DirectiveNode<'a> {
        match &el.props[index] {
            PropNode::Directive(dir) => dir,
            PropNode::Attribute(attr) => panic!("Expected directive, got attribute {}", attr.name),
        }
    }

    #[test]
    fn test_parse_nested_elements() {
        let allocator = Bump::new();
        let source = "<div>\n  <p>hi</p>\n</div>";
        let (root, errors) = parse(&allocator, source);

        assert!(errors.is_empty());
        assert_eq!(root.children.len(), 1);
        let div = element(&root.children[0]);
        assert_eq!(div.tag.as_str(), "div");
        assert_eq!(div.span.source_text(source), source);
        assert_eq!(div.children.len(), 1);
        let p = element(&div.children[0]);
        assert!(matches!(&p.children[0], TemplateChildNode::Text(t) if t.content == "hi"));
    }

    #[test]
    fn test_parse_interpolation_is_dynamic() {
        let allocator = Bump::new();
        let source = "<p>{{  msg.length }}</p>";
        let (root, errors) = parse(&allocator, source);

        assert!(errors.is_empty());
        let p = element(&root.children[0]);
        let TemplateChildNode::Interpolation(interp) = &p.children[0] else {
            panic!("Expected interpolation");
        };
        assert_eq!(interp.content.content.as_str(), "msg.length");
        assert!(!interp.content.is_static);
        assert_eq!(interp.content.span.source_text(source), "msg.length");
        assert_eq!(interp.content.node_type().as_u8(), 4);
    }

    #[test]
    fn test_parse_directives() {
        let allocator = Bump::new();
        let source = r#"<comp v-if="ok" :class="cls" @click.stop="handler" v-bind:[attr]="val"></comp>"#;
        let (root, errors) = parse(&allocator, source);

        assert!(errors.is_empty());
        let comp = element(&root.children[0]);
        let names: std::vec::Vec<_> = (0..4).map(|i| directive(comp, i).name.as_str()).collect();
        assert_eq!(names, ["if", "bind", "on", "bind"]);

        let on = directive(comp, 2);
        assert_eq!(on.raw_name.as_str(), "@click.stop");
        let arg = on.arg.as_ref().unwrap();
        assert!(arg.is_static);
        assert_eq!(arg.span.source_text(source), "click");
        assert_eq!(on.modifiers[0].span.source_text(source), "stop");
        assert_eq!(on.exp.as_ref().unwrap().span.source_text(source), "handler");

        let dynamic = directive(comp, 3).arg.as_ref().unwrap();
        assert_eq!(dynamic.content.as_str(), "attr");
        assert!(!dynamic.is_static);
    }

    #[test]
    fn test_parse_v_for_result() {
        let allocator = Bump::new();
        let source = r#"<li v-for="(item, key) in list.items"></li>"#;
        let (root, errors) = parse(&allocator, source);
        assert!(errors.is_empty());

        let dir = directive(element(&root.children[0]), 0);
        let result = dir.for_parse_result.as_ref().unwrap();
        assert_eq!(result.source.span.source_text(source), "list.items");
        assert_eq!(result.value.as_ref().unwrap().span.source_text(source), "item");
        assert_eq!(result.key.as_ref().unwrap().content.as_str(), "key");
        assert!(result.index.is_none());
    }

    #[test]
    fn test_parse_v_for_malformed() {
        let allocator = Bump::new();
        let (root, errors) = parse(&allocator, r#"<li v-for="items"></li>"#);
        assert!(errors
            .iter()
            .any(|e| e.code == ErrorCode::VForMalformedExpression));
        let dir = directive(element(&root.children[0]), 0);
        assert!(dir.for_parse_result.is_none());
        assert!(dir.exp.is_some());
    }

    #[test]
    fn test_parse_v_pre_keeps_markup_raw() {
        let allocator = Bump::new();
        let (root, errors) =
            parse(&allocator, r#"<div v-pre :a="b"><span @c="d">{{ raw }}</span></div><p>{{ live }}</p>"#);
        assert!(errors.is_empty());

        let div = element(&root.children[0]);
        assert_eq!(div.props.len(), 1);
        assert!(matches!(div.props[0], PropNode::Attribute(_)));
        let span = element(&div.children[0]);
        assert!(matches!(span.props[0], PropNode::Attribute(_)));
        assert!(matches!(span.children[0], TemplateChildNode::Text(_)));

        let p = element(&root.children[1]);
        assert!(matches!(p.children[0], TemplateChildNode::Interpolation(_)));
    }

    #[test]
    fn test_parse_custom_delimiters() {
        let allocator = Bump::new();
        let options = ParserOptions {
            delimiters: ("${".into(), "}".into()),
            ..Default::default()
        };
        let (root, errors) = parse_with_options(&allocator, "<p>${ total } {{ plain }}</p>", options);
        assert!(errors.is_empty());
        let p = element(&root.children[0]);
        assert!(matches!(p.children[0], TemplateChildNode::Interpolation(_)));
        assert!(matches!(&p.children[1], TemplateChildNode::Text(t) if t.content == " {{ plain }}"));
    }

    #[test]
    fn test_parse_comments_option() {
        let allocator = Bump::new();
        let (root, _) = parse(&allocator, "<!-- hello -->");
        assert!(matches!(&root.children[0], TemplateChildNode::Comment(c) if c.content == " hello "));

        let options = ParserOptions {
            comments: false,
            ..Default::default()
        };
        let (root, _) = parse_with_options(&allocator, "<!-- hello --><br>", options);
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_parse_void_and_self_closing() {
        let allocator = Bump::new();
        let (root, errors) = parse(&allocator, "<input disabled><BR><img alt='' /><i>x</i>");
        assert!(errors.is_empty());
        assert_eq!(root.children.len(), 4);

        let input = element(&root.children[0]);
        assert!(matches!(&input.props[0], PropNode::Attribute(a) if a.value.is_none()));
        let img = element(&root.children[2]);
        assert!(img.is_self_closing);
        assert!(matches!(&img.props[0], PropNode::Attribute(a) if a.value.as_deref() == Some("")));
    }

    #[test]
    fn test_parse_nested_unclosed() {
        let allocator = Bump::new();
        let (root, errors) = parse(&allocator, "<div><span><em>x</div>");
        let missing = errors
            .iter()
            .filter(|e| e.code == ErrorCode::MissingEndTag)
            .count();
        assert_eq!(missing, 2);

        let div = element(&root.children[0]);
        let span = element(&div.children[0]);
        assert_eq!(span.tag.as_str(), "span");
        assert_eq!(element(&span.children[0]).tag.as_str(), "em");
    }

    #[test]
    fn test_parse_invalid_and_missing_end_tags() {
        let allocator = Bump::new();
        let (_, errors) = parse(&allocator, "<div></p></div>");
        assert_eq!(errors[0].code, ErrorCode::InvalidEndTag);
        assert_eq!(errors[0].offset, 5);

        let (root, errors) = parse(&allocator, "<div><p>{{ a }}");
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.code == ErrorCode::MissingEndTag));
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_parse_text_merges_around_lone_lt() {
        let allocator = Bump::new();
        let (root, errors) = parse(&allocator, "<p>a < b</p>");
        assert!(errors.is_empty());
        let p = element(&root.children[0]);
        assert_eq!(p.children.len(), 1);
        assert!(matches!(&p.children[0], TemplateChildNode::Text(t) if t.content == "a < b"));
    }
}
