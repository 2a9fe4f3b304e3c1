//! Template node kinds.
//!
//! Only what a reference scan needs survives parsing: elements with their
//! attributes and directives, text, comments and `{{ }}` interpolations.
//! Children live in the caller's bumpalo arena.

use serde::{Deserialize, Serialize};

use crate::{Box, Bump, String, Vec};

/// Node discriminants, numbered the way Vue's own compiler numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Root = 0,
    Element = 1,
    Text = 2,
    Comment = 3,
    SimpleExpression = 4,
    Interpolation = 5,
    Attribute = 6,
    Directive = 7,
}

impl NodeType {
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Byte range `[start, end)` into the template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    pub fn source_text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start as usize..self.end as usize]
    }
}

#[derive(Debug)]
pub struct RootNode<'a> {
    pub children: Vec<'a, TemplateChildNode<'a>>,
}

impl<'a> RootNode<'a> {
    pub fn new(allocator: &'a Bump) -> Self {
        Self {
            children: Vec::new_in(allocator),
        }
    }
}

#[derive(Debug)]
pub enum TemplateChildNode<'a> {
    Element(Box<'a, ElementNode<'a>>),
    Text(TextNode),
    Comment(CommentNode),
    Interpolation(InterpolationNode),
}

impl TemplateChildNode<'_> {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Element(_) => NodeType::Element,
            Self::Text(_) => NodeType::Text,
            Self::Comment(_) => NodeType::Comment,
            Self::Interpolation(_) => NodeType::Interpolation,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Element(n) => n.span,
            Self::Text(n) => n.span,
            Self::Comment(n) => n.span,
            Self::Interpolation(n) => n.span,
        }
    }
}

#[derive(Debug)]
pub struct ElementNode<'a> {
    pub tag: String,
    pub props: Vec<'a, PropNode<'a>>,
    pub children: Vec<'a, TemplateChildNode<'a>>,
    pub is_self_closing: bool,
    pub span: Span,
}

impl<'a> ElementNode<'a> {
    pub fn new(allocator: &'a Bump, tag: impl Into<String>, span: Span) -> Self {
        Self {
            tag: tag.into(),
            props: Vec::new_in(allocator),
            children: Vec::new_in(allocator),
            is_self_closing: false,
            span,
        }
    }

    /// Find a directive by its normalized name (`"for"`, `"bind"`, ...).
    pub fn find_directive(&self, name: &str) -> Option<&DirectiveNode<'a>> {
        self.props.iter().find_map(|prop| match prop {
            PropNode::Directive(dir) if dir.name == name => Some(dir),
            _ => None,
        })
    }
}

#[derive(Debug)]
pub enum PropNode<'a> {
    Attribute(AttributeNode),
    Directive(DirectiveNode<'a>),
}

impl PropNode<'_> {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Attribute(_) => NodeType::Attribute,
            Self::Directive(_) => NodeType::Directive,
        }
    }
}

/// A plain `name="value"` attribute.
#[derive(Debug)]
pub struct AttributeNode {
    pub name: String,
    /// `None` for a bare attribute such as `disabled`
    pub value: Option<String>,
    pub span: Span,
}

#[derive(Debug)]
pub struct DirectiveNode<'a> {
    /// Name without prefix or shorthand: `"on"` for `@click`
    pub name: String,
    /// Attribute name as written
    pub raw_name: String,
    pub exp: Option<SimpleExpressionNode>,
    /// Static for `@click`, dynamic for `v-bind:[key]`
    pub arg: Option<SimpleExpressionNode>,
    pub modifiers: Vec<'a, SimpleExpressionNode>,
    /// Set on `v-for` when its expression splits cleanly
    pub for_parse_result: Option<ForParseResult>,
    pub span: Span,
}

impl<'a> DirectiveNode<'a> {
    pub fn new(allocator: &'a Bump, name: impl Into<String>, span: Span) -> Self {
        let name = name.into();
        Self {
            raw_name: name.clone(),
            name,
            exp: None,
            arg: None,
            modifiers: Vec::new_in(allocator),
            for_parse_result: None,
            span,
        }
    }
}

#[derive(Debug)]
pub struct TextNode {
    pub content: String,
    pub span: Span,
}

#[derive(Debug)]
pub struct CommentNode {
    pub content: String,
    pub span: Span,
}

/// `{{ content }}`
#[derive(Debug)]
pub struct InterpolationNode {
    pub content: SimpleExpressionNode,
    pub span: Span,
}

/// A single expression or literal; the only node a reference scan reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleExpressionNode {
    pub content: String,
    pub is_static: bool,
    pub span: Span,
}

impl SimpleExpressionNode {
    pub fn new(content: impl Into<String>, is_static: bool, span: Span) -> Self {
        Self {
            content: content.into(),
            is_static,
            span,
        }
    }

    pub fn node_type(&self) -> NodeType {
        NodeType::SimpleExpression
    }
}

/// The pieces of `(value, key, index) in source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForParseResult {
    pub source: SimpleExpressionNode,
    pub value: Option<SimpleExpressionNode>,
    pub key: Option<SimpleExpressionNode>,
    pub index: Option<SimpleExpressionNode>,
}

impl ForParseResult {
    /// Source first, then whichever aliases are present.
    pub fn expressions(&self) -> impl Iterator<Item = &SimpleExpressionNode> {
        std::iter::once(&self.source).chain(
            [&self.value, &self.key, &self.index]
                .into_iter()
                .flatten(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_expression_discriminant() {
        let exp = SimpleExpressionNode::new("foo.bar", false, Span::default());
        assert_eq!(exp.node_type().as_u8(), 4);
        assert!(!exp.is_static);
    }

    #[test]
    fn test_find_directive() {
        let allocator = Bump::new();
        let mut el = ElementNode::new(&allocator, "li", Span::default());
        el.props.push(PropNode::Attribute(AttributeNode {
            name: "class".into(),
            value: None,
            span: Span::default(),
        }));
        el.props.push(PropNode::Directive(DirectiveNode::new(
            &allocator,
            "for",
            Span::default(),
        )));

        assert!(el.find_directive("for").is_some());
        assert!(el.find_directive("if").is_none());
        assert_eq!(el.props[0].node_type(), NodeType::Attribute);
    }

    #[test]
    fn test_for_expressions_order() {
        let exp = |s: &str| SimpleExpressionNode::new(s, false, Span::default());
        let result = ForParseResult {
            source: exp("rows"),
            value: Some(exp("row")),
            key: None,
            index: Some(exp("i")),
        };
        let names: std::vec::Vec<_> = result.expressions().map(|e| e.content.as_str()).collect();
        assert_eq!(names, ["rows", "row", "i"]);
    }

    #[test]
    fn test_span_source_text() {
        assert_eq!(Span::new(5, 8).source_text("<div>abc</div>"), "abc");
    }
}
