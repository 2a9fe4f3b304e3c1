//! Template AST visitor.
//!
//! Every `visit_*` method defaults to the matching `walk_*` function, which
//! recurses into the node's declared child collections. Implementors override
//! only the hooks they care about and call `walk_*` to keep descending.

use crate::ast::*;

pub trait Visit<'a>: Sized {
    fn visit_root(&mut self, root: &RootNode<'a>) {
        walk_children(self, &root.children);
    }

    fn visit_element(&mut self, element: &ElementNode<'a>) {
        walk_element(self, element);
    }

    fn visit_attribute(&mut self, _attribute: &AttributeNode) {}

    fn visit_directive(&mut self, directive: &DirectiveNode<'a>) {
        walk_directive(self, directive);
    }

    fn visit_interpolation(&mut self, interpolation: &InterpolationNode) {
        self.visit_simple_expression(&interpolation.content);
    }

    fn visit_simple_expression(&mut self, _expression: &SimpleExpressionNode) {}

    fn visit_text(&mut self, _text: &TextNode) {}

    fn visit_comment(&mut self, _comment: &CommentNode) {}
}

pub fn walk_children<'a, V: Visit<'a>>(visitor: &mut V, children: &[TemplateChildNode<'a>]) {
    for child in children {
        match child {
            TemplateChildNode::Element(el) => visitor.visit_element(el),
            TemplateChildNode::Text(text) => visitor.visit_text(text),
            TemplateChildNode::Comment(comment) => visitor.visit_comment(comment),
            TemplateChildNode::Interpolation(interp) => visitor.visit_interpolation(interp),
        }
    }
}

pub fn walk_element<'a, V: Visit<'a>>(visitor: &mut V, element: &ElementNode<'a>) {
    for prop in element.props.iter() {
        match prop {
            PropNode::Attribute(attr) => visitor.visit_attribute(attr),
            PropNode::Directive(dir) => visitor.visit_directive(dir),
        }
    }
    walk_children(visitor, &element.children);
}

/// Expression, argument, modifiers, then the `v-for` pieces.
pub fn walk_directive<'a, V: Visit<'a>>(visitor: &mut V, directive: &DirectiveNode<'a>) {
    let parts = directive
        .exp
        .iter()
        .chain(directive.arg.iter())
        .chain(directive.modifiers.iter());
    for expression in parts {
        visitor.visit_simple_expression(expression);
    }
    if let Some(result) = &directive.for_parse_result {
        for expression in result.expressions() {
            visitor.visit_simple_expression(expression);
        }
    }
}
