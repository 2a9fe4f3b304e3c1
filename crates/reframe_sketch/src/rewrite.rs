//! `this.x` rewriting.
//!
//! Inside a `<script setup>` there is no component instance, so every
//! `this.x` access is replaced by the binding that now holds `x`. The
//! rewriter only collects span edits; [`Rewriter::render`] applies them to a
//! slice of the script source.

use std::ops::Range;

use compact_str::CompactString;
use oxc_ast::ast::{
    Argument, CallExpression, Expression, Function, StaticMemberExpression,
};
use oxc_ast_visit::{walk, Visit};
use oxc_syntax::scope::ScopeFlags;
use rustc_hash::FxHashMap;

use crate::draft::Using;

/// What an instance property name refers to after the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Prop,
    Ref,
    Computed,
    Method,
}

impl Binding {
    fn access(self, name: &str) -> String {
        match self {
            Self::Prop => format!("props.{name}"),
            Self::Ref | Self::Computed => format!("{name}.value"),
            Self::Method => name.to_string(),
        }
    }
}

pub type Edit = (Range<usize>, String);

/// Collects `this` rewrites for one subtree.
pub struct ThisCollector<'b> {
    bindings: &'b FxHashMap<CompactString, Binding>,
    edits: Vec<Edit>,
    using: Using,
    events: Vec<CompactString>,
    /// Depth of nested non-arrow functions, which rebind `this`
    function_depth: u32,
}

impl<'a> Visit<'a> for ThisCollector<'_> {
    fn visit_static_member_expression(&mut self, it: &StaticMemberExpression<'a>) {
        if self.function_depth == 0 {
            if let Expression::ThisExpression(this) = &it.object {
                let name = it.property.name.as_str();
                let range = this.span.start as usize..it.property.span.end as usize;
                match name {
                    "$emit" => {
                        self.using.emit = true;
                        self.edits.push((range, "$emit".to_string()));
                    }
                    "$nextTick" => {
                        self.using.next_tick = true;
                        self.edits.push((range, "nextTick".to_string()));
                    }
                    _ => match self.bindings.get(name) {
                        Some(binding) => self.edits.push((range, binding.access(name))),
                        None => tracing::warn!(property = name, "unresolved `this` property kept"),
                    },
                }
                return;
            }
        }
        walk::walk_static_member_expression(self, it);
    }

    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        if let Expression::StaticMemberExpression(member) = &it.callee {
            if self.function_depth == 0
                && matches!(member.object, Expression::ThisExpression(_))
                && member.property.name.as_str() == "$emit"
            {
                if let Some(Argument::StringLiteral(event)) = it.arguments.first() {
                    let event = CompactString::new(event.value.as_str());
                    if !self.events.contains(&event) {
                        self.events.push(event);
                    }
                }
            }
        }
        walk::walk_call_expression(self, it);
    }

    fn visit_function(&mut self, it: &Function<'a>, flags: ScopeFlags) {
        self.function_depth += 1;
        walk::walk_function(self, it, flags);
        self.function_depth -= 1;
    }
}

/// Renders rewritten slices of one script.
pub struct Rewriter<'s> {
    source: &'s str,
    bindings: FxHashMap<CompactString, Binding>,
    using: Using,
    events: Vec<CompactString>,
}

impl<'s> Rewriter<'s> {
    pub fn new(source: &'s str, bindings: FxHashMap<CompactString, Binding>) -> Self {
        Self {
            source,
            bindings,
            using: Using::default(),
            events: Vec::new(),
        }
    }

    pub fn binding(&self, name: &str) -> Option<Binding> {
        self.bindings.get(name).copied()
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    /// The source text of `range` with `this` accesses rewritten.
    ///
    /// `visit` drives the collector over the AST node that covers `range`.
    pub fn render(
        &mut self,
        range: Range<usize>,
        visit: impl FnOnce(&mut ThisCollector<'_>),
    ) -> String {
        let mut collector = ThisCollector {
            bindings: &self.bindings,
            edits: Vec::new(),
            using: Using::default(),
            events: Vec::new(),
            function_depth: 0,
        };
        visit(&mut collector);

        self.using.emit |= collector.using.emit;
        self.using.next_tick |= collector.using.next_tick;
        for event in collector.events {
            if !self.events.contains(&event) {
                self.events.push(event);
            }
        }

        let mut edits = collector.edits;
        edits.retain(|(edit, _)| edit.start >= range.start && edit.end <= range.end);
        edits.sort_by_key(|(edit, _)| edit.start);
        apply_edits(&self.source[range.clone()], range.start, &edits)
    }

    pub fn using(&self) -> Using {
        self.using
    }

    /// Event names passed to `this.$emit` as string literals, in first-use order.
    pub fn emitted_events(&self) -> &[CompactString] {
        &self.events
    }
}

/// Apply sorted, disjoint edits whose ranges are absolute offsets into the
/// file `text` was sliced from at `base`.
fn apply_edits(text: &str, base: usize, edits: &[Edit]) -> String {
    let mut out = String::with_capacity(text.len() + edits.len() * 8);
    let mut cursor = 0;
    for (range, replacement) in edits {
        let start = range.start - base;
        if start < cursor {
            continue;
        }
        out.push_str(&text[cursor..start]);
        out.push_str(replacement);
        cursor = range.end - base;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Remove the indentation shared by every line after the first.
///
/// A slice taken from the middle of a file starts at its first token, so the
/// first line carries no indentation of its own.
pub fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = String::with_capacity(text.len());
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(line.get(indent..).unwrap_or_else(|| line.trim_start()));
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Indent every line after the first by `prefix`.
pub fn indent_tail(text: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(prefix);
            }
        }
        out.push_str(line);
    }
    out
}
