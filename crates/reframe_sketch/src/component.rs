//! Component options analysis.
//!
//! Reads the options object of `export default { ... }` and renders every
//! option it understands into `<script setup>` source pieces. Names are
//! collected in a first pass so `this.x` can be rewritten in the second one
//! regardless of declaration order.

use std::collections::BTreeSet;
use std::ops::Range;

use compact_str::CompactString;
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Argument, ArrayExpressionElement, ArrowFunctionExpression, ExportDefaultDeclarationKind,
    Expression, Function, ImportDeclaration, ImportDeclarationSpecifier, ObjectExpression,
    ObjectProperty, ObjectPropertyKind, Statement,
};
use oxc_ast_visit::Visit;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use rustc_hash::FxHashMap;

use crate::draft::{Declaration, DeclarationKind, PropDeclaration, SymbolTable, Using};
use crate::error::SketchError;
use crate::rewrite::{dedent, indent_tail, Binding, Rewriter};

/// Lifecycle options and the composition hook each one becomes.
const LIFECYCLE_HOOKS: [(&str, &str); 11] = [
    ("beforeMount", "onBeforeMount"),
    ("mounted", "onMounted"),
    ("beforeUpdate", "onBeforeUpdate"),
    ("updated", "onUpdated"),
    ("beforeUnmount", "onBeforeUnmount"),
    ("beforeDestroy", "onBeforeUnmount"),
    ("unmounted", "onUnmounted"),
    ("destroyed", "onUnmounted"),
    ("activated", "onActivated"),
    ("deactivated", "onDeactivated"),
    ("errorCaptured", "onErrorCaptured"),
];

/// Rendered pieces of one component, in the order they are emitted.
#[derive(Debug, Default)]
pub(crate) struct Component {
    /// Top-level comments whose statement is not carried over verbatim
    pub comments: Vec<String>,
    /// Import statements other than those from `vue`, verbatim
    pub imports: Vec<String>,
    /// Specifiers imported from `vue` by the original script
    pub vue_imports: BTreeSet<String>,
    /// Other top-level statements, verbatim
    pub statements: Vec<String>,
    pub props: Vec<PropDeclaration>,
    /// Source of the `props` option value
    pub props_source: Option<String>,
    pub prop_defaults: FxHashMap<CompactString, String>,
    pub emits: Vec<CompactString>,
    /// Statements of `data()` that precede its `return`
    pub data_setup: Vec<String>,
    /// `(name, initial value)`
    pub refs: Vec<(CompactString, String)>,
    /// `(name, argument to computed())`
    pub computeds: Vec<(CompactString, String)>,
    /// `(name, declaration)`
    pub methods: Vec<(CompactString, String)>,
    pub watchers: Vec<String>,
    /// `(hook, callback)`
    pub hooks: Vec<(&'static str, String)>,
    /// Bodies of `beforeCreate` and `created`
    pub created: Vec<String>,
    pub symbols: SymbolTable,
    pub using: Using,
}

pub(crate) fn source_type_for(lang: Option<&str>) -> SourceType {
    match lang {
        Some("ts") => SourceType::ts(),
        Some("tsx") => SourceType::tsx(),
        Some("jsx") => SourceType::jsx(),
        _ => SourceType::mjs(),
    }
}

/// Analyze the content of a `<script>` block.
///
/// `first_line` is the 1-indexed line of the file on which `script` starts.
pub(crate) fn analyze(
    script: &str,
    lang: Option<&str>,
    first_line: usize,
) -> Result<Component, SketchError> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, script, source_type_for(lang)).parse();
    if !parsed.errors.is_empty() {
        let messages: Vec<String> = parsed.errors.iter().map(|e| e.to_string()).collect();
        return Err(SketchError::ScriptParse(messages.join("; ")));
    }

    let mut component = Component::default();
    let mut options = None;

    let mut previous_end = 0;
    for stmt in &parsed.program.body {
        let span = stmt.span();
        let leading: Vec<Span> = parsed
            .program
            .comments
            .iter()
            .map(|comment| comment.span)
            .filter(|c| c.start >= previous_end && c.end <= span.start)
            .collect();
        previous_end = span.end;
        // verbatim statements keep their comments attached
        let with_comments = match leading.first() {
            Some(first) => Span::new(first.start, span.end),
            None => span,
        };
        match stmt {
            Statement::ExportDefaultDeclaration(decl) => {
                component.comments.extend(leading.iter().map(|c| slice(script, *c)));
                options = default_export_object(&decl.declaration);
            }
            Statement::ImportDeclaration(import) if import.source.value.as_str() == "vue" => {
                component.comments.extend(leading.iter().map(|c| slice(script, *c)));
                collect_vue_imports(script, import, &mut component.vue_imports);
            }
            Statement::ImportDeclaration(_) => component.imports.push(slice(script, with_comments)),
            _ => component.statements.push(slice(script, with_comments)),
        }
    }

    let options = options.ok_or(SketchError::NoDefaultExport)?;
    let lines = LineIndex::new(script, first_line);
    let bindings = collect_bindings(options, &lines, &mut component.symbols);
    let mut rewriter = Rewriter::new(script, bindings);

    for property in object_properties(options) {
        let Some(key) = property.key.static_name() else {
            continue;
        };
        let value = &property.value;
        match &*key {
            "props" => render_props(&mut component, &mut rewriter, value),
            "emits" => component.emits = string_keys(value),
            "data" => render_data(&mut component, &mut rewriter, value),
            "computed" => render_computeds(&mut component, &mut rewriter, value),
            "methods" => render_methods(&mut component, &mut rewriter, value),
            "watch" => render_watchers(&mut component, &mut rewriter, value),
            "beforeCreate" | "created" => match Callable::from_expression(value) {
                Some(callable) => component.created.push(callable.inline_body(&mut rewriter)),
                None => tracing::warn!(option = &*key, "hook is not a function, skipped"),
            },
            name => match LIFECYCLE_HOOKS.iter().find(|(option, _)| *option == name) {
                Some((_, hook)) => match Callable::from_expression(value) {
                    Some(callable) => component.hooks.push((*hook, callable.as_arrow(&mut rewriter))),
                    None => tracing::warn!(option = name, "hook is not a function, skipped"),
                },
                None if matches!(name, "name" | "components") => {
                    tracing::debug!(option = name, "option has no setup counterpart")
                }
                None => tracing::warn!(option = name, "unsupported component option skipped"),
            },
        }
    }

    component.using = rewriter.using();
    if component.emits.is_empty() {
        component.emits = rewriter.emitted_events().to_vec();
    }

    Ok(component)
}

fn default_export_object<'b, 'a>(
    kind: &'b ExportDefaultDeclarationKind<'a>,
) -> Option<&'b ObjectExpression<'a>> {
    match kind {
        ExportDefaultDeclarationKind::ObjectExpression(obj) => Some(&**obj),
        // `defineComponent({ ... })`, `Vue.extend({ ... })`
        ExportDefaultDeclarationKind::CallExpression(call) => match call.arguments.first() {
            Some(Argument::ObjectExpression(obj)) => Some(&**obj),
            _ => None,
        },
        _ => None,
    }
}

fn collect_vue_imports(script: &str, import: &ImportDeclaration<'_>, names: &mut BTreeSet<String>) {
    let Some(specifiers) = &import.specifiers else {
        return;
    };
    for specifier in specifiers {
        if let ImportDeclarationSpecifier::ImportSpecifier(spec) = specifier {
            if spec.local.name.as_str() == "defineComponent" {
                continue;
            }
            names.insert(slice(script, spec.span));
        }
    }
}

fn collect_bindings(
    options: &ObjectExpression<'_>,
    lines: &LineIndex,
    symbols: &mut SymbolTable,
) -> FxHashMap<CompactString, Binding> {
    let mut bindings = FxHashMap::default();

    for property in object_properties(options) {
        let Some(key) = property.key.static_name() else {
            continue;
        };
        let (binding, kind, names) = match &*key {
            "props" => {
                for name in string_keys(&property.value) {
                    bindings.insert(name, Binding::Prop);
                }
                continue;
            }
            "data" => (
                Binding::Ref,
                DeclarationKind::Ref,
                data_object(&property.value).map(|(_, obj)| obj),
            ),
            "computed" => (
                Binding::Computed,
                DeclarationKind::Computed,
                as_object(&property.value),
            ),
            "methods" => (
                Binding::Method,
                DeclarationKind::Method,
                as_object(&property.value),
            ),
            _ => continue,
        };

        for entry in names.into_iter().flat_map(object_properties) {
            if let Some(name) = entry.key.static_name() {
                let name = CompactString::new(&*name);
                let line = lines.line_of(entry.span.start);
                symbols.insert(name.clone(), Declaration { kind, line });
                bindings.insert(name, binding);
            }
        }
    }

    bindings
}

fn render_props(component: &mut Component, rewriter: &mut Rewriter<'_>, value: &Expression<'_>) {
    component.props_source = Some(slice(rewriter.source(), value.span()));

    match unwrap_parens(value) {
        Expression::ArrayExpression(_) => {
            component.props = string_keys(value)
                .into_iter()
                .map(|name| PropDeclaration {
                    name,
                    type_name: None,
                    required: false,
                })
                .collect();
        }
        Expression::ObjectExpression(obj) => {
            for property in object_properties(obj) {
                let Some(name) = property.key.static_name() else {
                    continue;
                };
                let name = CompactString::new(&*name);
                let mut prop = PropDeclaration {
                    name: name.clone(),
                    type_name: None,
                    required: false,
                };

                match unwrap_parens(&property.value) {
                    Expression::ObjectExpression(options) => {
                        for option in object_properties(options) {
                            match option.key.static_name().as_deref() {
                                Some("type") => {
                                    prop.type_name =
                                        Some(slice(rewriter.source(), option.value.span()));
                                }
                                Some("required") => {
                                    if let Expression::BooleanLiteral(flag) = &option.value {
                                        prop.required = flag.value;
                                    }
                                }
                                Some("default") => {
                                    let default = match Callable::from_expression(&option.value) {
                                        Some(callable) if option.method => {
                                            callable.as_arrow(rewriter)
                                        }
                                        _ => slice(rewriter.source(), option.value.span()),
                                    };
                                    component.prop_defaults.insert(name.clone(), dedent(&default));
                                }
                                _ => {}
                            }
                        }
                    }
                    other => prop.type_name = Some(slice(rewriter.source(), other.span())),
                }

                component.props.push(prop);
            }
        }
        _ => tracing::warn!("`props` is neither an array nor an object, skipped"),
    }
}

fn render_data(component: &mut Component, rewriter: &mut Rewriter<'_>, value: &Expression<'_>) {
    let Some((setup, object)) = data_object(value) else {
        tracing::warn!("`data` does not return an object literal, skipped");
        return;
    };

    for stmt in setup {
        let text = rewriter.render(span_range(stmt.span()), |v| v.visit_statement(stmt));
        component.data_setup.push(dedent(&text));
    }

    for entry in &object.properties {
        let ObjectPropertyKind::ObjectProperty(property) = entry else {
            tracing::warn!("spread in `data` is not supported, skipped");
            continue;
        };
        let Some(name) = property.key.static_name() else {
            continue;
        };
        let value = &property.value;
        let initial = rewriter.render(span_range(value.span()), |v| v.visit_expression(value));
        component
            .refs
            .push((CompactString::new(&*name), dedent(&initial)));
    }
}

fn render_computeds(
    component: &mut Component,
    rewriter: &mut Rewriter<'_>,
    value: &Expression<'_>,
) {
    let Some(object) = as_object(value) else {
        return;
    };

    for property in object_properties(object) {
        let Some(name) = property.key.static_name() else {
            continue;
        };
        let name = CompactString::new(&*name);

        let argument = match Callable::from_expression(&property.value) {
            Some(Callable::Arrow(arrow)) => Callable::Arrow(arrow).as_arrow(rewriter),
            Some(callable) => format!("() => {}", callable.body_block(rewriter)),
            None => match as_object(&property.value) {
                Some(accessors) => render_accessors(rewriter, accessors),
                None => {
                    tracing::warn!(computed = name.as_str(), "unsupported computed, skipped");
                    continue;
                }
            },
        };

        component.computeds.push((name, argument));
    }
}

/// `{ get() {...}, set(v) {...} }` as an object of arrow functions.
fn render_accessors(rewriter: &mut Rewriter<'_>, accessors: &ObjectExpression<'_>) -> String {
    let mut parts = Vec::new();
    for accessor in object_properties(accessors) {
        let Some(key) = accessor.key.static_name() else {
            continue;
        };
        if let Some(callable) = Callable::from_expression(&accessor.value) {
            let arrow = callable.as_arrow(rewriter);
            parts.push(format!("    {key}: {}", indent_tail(&arrow, "    ")));
        }
    }
    format!("{{\n{}\n}}", parts.join(",\n"))
}

fn render_methods(component: &mut Component, rewriter: &mut Rewriter<'_>, value: &Expression<'_>) {
    let Some(object) = as_object(value) else {
        return;
    };

    for property in object_properties(object) {
        let Some(name) = property.key.static_name() else {
            continue;
        };
        let name = CompactString::new(&*name);
        let declaration = match Callable::from_expression(&property.value) {
            Some(callable) => callable.as_declaration(&name, rewriter),
            None => {
                let value = &property.value;
                let text = rewriter.render(span_range(value.span()), |v| v.visit_expression(value));
                format!("const {name} = {}", dedent(&text))
            }
        };
        component.methods.push((name, declaration));
    }
}

fn render_watchers(
    component: &mut Component,
    rewriter: &mut Rewriter<'_>,
    value: &Expression<'_>,
) {
    let Some(object) = as_object(value) else {
        return;
    };

    for property in object_properties(object) {
        let Some(key) = property.key.static_name() else {
            continue;
        };
        let source = watch_source(rewriter, &key);

        let (handler, options) = match unwrap_parens(&property.value) {
            Expression::StringLiteral(method) => (method.value.to_string(), None),
            Expression::ObjectExpression(config) => {
                let mut handler = None;
                let mut options = Vec::new();
                for option in object_properties(config) {
                    match option.key.static_name().as_deref() {
                        Some("handler") => {
                            handler = match unwrap_parens(&option.value) {
                                Expression::StringLiteral(method) => Some(method.value.to_string()),
                                other => Callable::from_expression(other)
                                    .map(|callable| callable.as_arrow(rewriter)),
                            };
                        }
                        Some(_) => options.push(slice(rewriter.source(), option.span)),
                        None => {}
                    }
                }
                match handler {
                    Some(handler) if options.is_empty() => (handler, None),
                    Some(handler) => (handler, Some(format!("{{ {} }}", options.join(", ")))),
                    None => {
                        tracing::warn!(watch = &*key, "watcher without handler, skipped");
                        continue;
                    }
                }
            }
            other => match Callable::from_expression(other) {
                Some(callable) => (callable.as_arrow(rewriter), None),
                None => {
                    tracing::warn!(watch = &*key, "unsupported watcher, skipped");
                    continue;
                }
            },
        };

        let call = match options {
            Some(options) => format!("watch({source}, {handler}, {options})"),
            None => format!("watch({source}, {handler})"),
        };
        component.watchers.push(call);
    }
}

/// The first argument of `watch()` for an Options API watch key such as
/// `count` or `user.name`.
fn watch_source(rewriter: &Rewriter<'_>, key: &str) -> String {
    let (root, path) = match key.split_once('.') {
        Some((root, rest)) => (root, Some(rest)),
        None => (key, None),
    };

    match (rewriter.binding(root), path) {
        (Some(Binding::Ref | Binding::Computed), None) => root.to_string(),
        (Some(Binding::Ref | Binding::Computed), Some(path)) => {
            format!("() => {root}.value.{path}")
        }
        (Some(Binding::Prop), None) => format!("() => props.{root}"),
        (Some(Binding::Prop), Some(path)) => format!("() => props.{root}.{path}"),
        (Some(Binding::Method), _) | (None, _) => {
            tracing::warn!(watch = key, "watch key does not name component state");
            format!("() => {key}")
        }
    }
}

/// A function-valued option.
#[derive(Clone, Copy)]
enum Callable<'b, 'a> {
    Function(&'b Function<'a>),
    Arrow(&'b ArrowFunctionExpression<'a>),
}

impl<'b, 'a> Callable<'b, 'a> {
    fn from_expression(expr: &'b Expression<'a>) -> Option<Self> {
        match expr {
            Expression::FunctionExpression(func) => Some(Self::Function(func)),
            Expression::ArrowFunctionExpression(arrow) => Some(Self::Arrow(arrow)),
            Expression::ParenthesizedExpression(paren) => Self::from_expression(&paren.expression),
            _ => None,
        }
    }

    fn is_async(&self) -> bool {
        match self {
            Self::Function(func) => func.r#async,
            Self::Arrow(arrow) => arrow.r#async,
        }
    }

    /// Parameter list including any return type annotation.
    fn signature(&self, source: &str) -> String {
        let Self::Function(func) = self else {
            return "()".to_string();
        };
        let end = func
            .body
            .as_ref()
            .map_or(func.params.span.end, |body| body.span.start);
        let text = source[func.params.span.start as usize..end as usize].trim();
        if text.starts_with('(') {
            text.to_string()
        } else {
            format!("({text})")
        }
    }

    /// The function body as a braced block.
    fn body_block(&self, rewriter: &mut Rewriter<'_>) -> String {
        match self {
            Self::Function(func) => match &func.body {
                Some(body) => {
                    let text = rewriter.render(span_range(body.span), |v| v.visit_function_body(body));
                    dedent(&text)
                }
                None => "{}".to_string(),
            },
            Self::Arrow(arrow) if arrow.expression => {
                let body = &arrow.body;
                let text = rewriter.render(span_range(body.span), |v| v.visit_function_body(body));
                format!("{{\n    return {}\n}}", indent_tail(&dedent(&text), "    "))
            }
            Self::Arrow(arrow) => {
                let body = &arrow.body;
                let text = rewriter.render(span_range(body.span), |v| v.visit_function_body(body));
                dedent(&text)
            }
        }
    }

    fn as_arrow(&self, rewriter: &mut Rewriter<'_>) -> String {
        match self {
            Self::Arrow(arrow) => {
                let text =
                    rewriter.render(span_range(arrow.span), |v| v.visit_arrow_function_expression(arrow));
                dedent(&text)
            }
            Self::Function(_) => {
                let prefix = if self.is_async() { "async " } else { "" };
                let signature = self.signature(rewriter.source());
                format!("{prefix}{signature} => {}", self.body_block(rewriter))
            }
        }
    }

    fn as_declaration(&self, name: &str, rewriter: &mut Rewriter<'_>) -> String {
        match self {
            Self::Arrow(_) => format!("const {name} = {}", self.as_arrow(rewriter)),
            Self::Function(func) => {
                let prefix = if func.r#async { "async " } else { "" };
                let star = if func.generator { "*" } else { "" };
                let signature = self.signature(rewriter.source());
                format!(
                    "{prefix}function{star} {name}{signature} {}",
                    self.body_block(rewriter)
                )
            }
        }
    }

    /// Statements of the body without the enclosing braces.
    fn inline_body(&self, rewriter: &mut Rewriter<'_>) -> String {
        let block = self.body_block(rewriter);
        let inner = block
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .unwrap_or(&block);
        let inner = inner.trim_matches('\n');
        let indent = inner
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.len() - line.trim_start().len())
            .min()
            .unwrap_or(0);
        inner
            .lines()
            .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Statements before the `return` and the returned object of `data`.
fn data_object<'b, 'a>(
    value: &'b Expression<'a>,
) -> Option<(Vec<&'b Statement<'a>>, &'b ObjectExpression<'a>)> {
    if let Some(object) = as_object(value) {
        return Some((Vec::new(), object));
    }

    let body = match Callable::from_expression(value)? {
        Callable::Function(func) => func.body.as_deref()?,
        Callable::Arrow(arrow) if arrow.expression => {
            return match arrow.body.statements.first() {
                Some(Statement::ExpressionStatement(stmt)) => {
                    as_object(&stmt.expression).map(|object| (Vec::new(), object))
                }
                _ => None,
            };
        }
        Callable::Arrow(arrow) => &*arrow.body,
    };

    let mut setup = Vec::new();
    for stmt in &body.statements {
        match stmt {
            Statement::ReturnStatement(ret) => {
                let object = ret.argument.as_ref().and_then(as_object)?;
                return Some((setup, object));
            }
            other => setup.push(other),
        }
    }
    None
}

/// Names listed by an array of strings or the keys of an object.
fn string_keys(value: &Expression<'_>) -> Vec<CompactString> {
    match unwrap_parens(value) {
        Expression::ArrayExpression(array) => array
            .elements
            .iter()
            .filter_map(|element| match element {
                ArrayExpressionElement::StringLiteral(s) => Some(CompactString::new(s.value.as_str())),
                _ => None,
            })
            .collect(),
        Expression::ObjectExpression(object) => object_properties(object)
            .filter_map(|property| property.key.static_name())
            .map(|name| CompactString::new(&*name))
            .collect(),
        _ => Vec::new(),
    }
}

fn object_properties<'b, 'a>(
    object: &'b ObjectExpression<'a>,
) -> impl Iterator<Item = &'b ObjectProperty<'a>> {
    object.properties.iter().filter_map(|property| match property {
        ObjectPropertyKind::ObjectProperty(property) => Some(&**property),
        ObjectPropertyKind::SpreadProperty(_) => None,
    })
}

fn as_object<'b, 'a>(value: &'b Expression<'a>) -> Option<&'b ObjectExpression<'a>> {
    match unwrap_parens(value) {
        Expression::ObjectExpression(object) => Some(&**object),
        _ => None,
    }
}

fn unwrap_parens<'b, 'a>(value: &'b Expression<'a>) -> &'b Expression<'a> {
    match value {
        Expression::ParenthesizedExpression(paren) => unwrap_parens(&paren.expression),
        Expression::TSAsExpression(ts_as) => unwrap_parens(&ts_as.expression),
        _ => value,
    }
}

#[inline]
fn span_range(span: Span) -> Range<usize> {
    span.start as usize..span.end as usize
}

fn slice(source: &str, span: Span) -> String {
    source[span_range(span)].to_string()
}

/// Maps script offsets to 1-indexed file lines.
struct LineIndex {
    starts: Vec<u32>,
    first_line: usize,
}

impl LineIndex {
    fn new(script: &str, first_line: usize) -> Self {
        let mut starts = vec![0];
        starts.extend(
            script
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );
        Self { starts, first_line }
    }

    fn line_of(&self, offset: u32) -> usize {
        let index = self.starts.partition_point(|start| *start <= offset);
        self.first_line + index.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTER: &str = r#"
import Child from './Child.vue'
import { reactive } from 'vue'

export default {
    name: 'Counter',
    props: {
        title: { type: String, required: true },
        step: { type: Number, default: 1 },
        tags: { type: Array, default() { return [] } },
    },
    data() {
        return {
            count: 0,
            label: this.title,
        }
    },
    computed: {
        double() {
            return this.count * 2
        },
    },
    watch: {
        count(value) {
            this.$emit('change', value)
        },
    },
    methods: {
        inc() {
            this.count += this.step
        },
    },
    mounted() {
        this.inc()
    },
}
"#;

    #[test]
    fn test_collects_symbols() {
        let component = analyze(COUNTER, None, 1).unwrap();

        assert!(component.symbols.refs.contains_key("count"));
        assert!(component.symbols.refs.contains_key("label"));
        assert!(component.symbols.computeds.contains_key("double"));
        assert!(component.symbols.methods.contains_key("inc"));
        assert_eq!(component.symbols.len(), 4);
        // `count: 0,` is on line 14 of the fixture
        assert_eq!(component.symbols.refs["count"].line, 14);
    }

    #[test]
    fn test_renders_props() {
        let component = analyze(COUNTER, None, 1).unwrap();

        let names: Vec<&str> = component.props.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["title", "step", "tags"]);
        assert!(component.props[0].required);
        assert_eq!(component.props[1].type_name.as_deref(), Some("Number"));
        assert_eq!(component.prop_defaults["step"], "1");
        assert_eq!(component.prop_defaults["tags"], "() => { return [] }");
    }

    #[test]
    fn test_renders_state() {
        let component = analyze(COUNTER, None, 1).unwrap();

        assert_eq!(
            component.refs,
            vec![
                (CompactString::new("count"), "0".to_string()),
                (CompactString::new("label"), "props.title".to_string()),
            ]
        );
        assert_eq!(component.computeds[0].1, "() => {\n    return count.value * 2\n}");
        assert_eq!(
            component.methods[0].1,
            "function inc() {\n    count.value += props.step\n}"
        );
        assert_eq!(
            component.watchers,
            vec!["watch(count, (value) => {\n    $emit('change', value)\n})".to_string()]
        );
        assert_eq!(component.hooks, vec![("onMounted", "() => {\n    inc()\n}".to_string())]);
    }

    #[test]
    fn test_usage_and_imports() {
        let component = analyze(COUNTER, None, 1).unwrap();

        assert!(component.using.emit);
        assert_eq!(component.emits, vec![CompactString::new("change")]);
        assert_eq!(component.imports, vec!["import Child from './Child.vue'".to_string()]);
        assert!(component.vue_imports.contains("reactive"));
    }

    #[test]
    fn test_created_is_inlined() {
        let source = "export default {\n  data: () => ({ ready: false }),\n  created() {\n    this.ready = true\n    console.log('ready')\n  }\n}\n";
        let component = analyze(source, None, 1).unwrap();

        assert_eq!(component.refs[0].0, "ready");
        assert_eq!(component.created, vec!["ready.value = true\nconsole.log('ready')".to_string()]);
    }

    #[test]
    fn test_watch_with_options() {
        let source = "export default {\n  props: ['user'],\n  watch: {\n    'user.name': { handler: 'reload', deep: true },\n  },\n  methods: { reload() {} },\n}\n";
        let component = analyze(source, None, 1).unwrap();

        assert_eq!(
            component.watchers,
            vec!["watch(() => props.user.name, reload, { deep: true })".to_string()]
        );
    }

    #[test]
    fn test_computed_accessors() {
        let source = "export default {\n  data() { return { first: '' } },\n  computed: {\n    name: {\n      get() { return this.first },\n      set(v) { this.first = v },\n    },\n  },\n}\n";
        let component = analyze(source, None, 1).unwrap();

        assert_eq!(
            component.computeds[0].1,
            "{\n    get: () => { return first.value },\n    set: (v) => { first.value = v }\n}"
        );
    }

    #[test]
    fn test_define_component_wrapper() {
        let source = "import { defineComponent } from 'vue'\nexport default defineComponent({ methods: { go() {} } })\n";
        let component = analyze(source, Some("ts"), 1).unwrap();

        assert!(component.symbols.methods.contains_key("go"));
        assert!(component.vue_imports.is_empty());
    }

    #[test]
    fn test_top_level_comments_are_kept() {
        let source = "// top comment\nimport Child from './Child.vue'\n// vue helpers\nimport { ref } from 'vue'\nexport default { data() { return { n: 1 } } }\n// trailing\n";
        let component = analyze(source, None, 1).unwrap();

        assert_eq!(
            component.imports,
            ["// top comment\nimport Child from './Child.vue'"]
        );
        assert_eq!(component.comments, ["// vue helpers"]);
        assert!(component.statements.is_empty());
    }

    #[test]
    fn test_missing_default_export() {
        let result = analyze("const a = 1\n", None, 1);
        assert!(matches!(result, Err(SketchError::NoDefaultExport)));
    }

    #[test]
    fn test_parse_error() {
        let result = analyze("export default {", None, 1);
        assert!(matches!(result, Err(SketchError::ScriptParse(_))));
    }
}
