//! Template reference extraction.

use reframe_relief::ast::{RootNode, SimpleExpressionNode};
use reframe_relief::visit::Visit;
use reframe_relief::{parse_sfc, Bump};
use rustc_hash::FxHashSet;

use compact_str::CompactString;

/// Collects the root identifier of every dynamic expression.
#[derive(Debug, Default)]
pub struct ReferenceCollector {
    references: FxHashSet<CompactString>,
}

impl ReferenceCollector {
    pub fn into_references(self) -> FxHashSet<CompactString> {
        self.references
    }
}

impl<'a> Visit<'a> for ReferenceCollector {
    fn visit_simple_expression(&mut self, expression: &SimpleExpressionNode) {
        if expression.is_static {
            return;
        }
        let root = root_identifier(&expression.content);
        if !root.is_empty() {
            self.references.insert(CompactString::new(root));
        }
    }
}

/// The part of an expression before its first `.`
#[inline]
pub fn root_identifier(content: &str) -> &str {
    content.split('.').next().unwrap_or(content).trim()
}

/// Every distinct root identifier referenced by a dynamic expression under `root`.
pub fn extract_references(root: &RootNode<'_>) -> FxHashSet<CompactString> {
    let mut collector = ReferenceCollector::default();
    collector.visit_root(root);
    collector.into_references()
}

/// Parse the `<template>` block of `source` and extract its references.
///
/// Files without a template, or that cannot be split into blocks, reference
/// nothing.
pub fn template_references(source: &str) -> FxHashSet<CompactString> {
    let descriptor = match parse_sfc(source) {
        Ok(descriptor) => descriptor,
        Err(error) => {
            tracing::warn!(%error, "could not split component into blocks");
            return FxHashSet::default();
        }
    };
    let Some(template) = descriptor.template() else {
        tracing::debug!("component has no <template>");
        return FxHashSet::default();
    };

    let allocator = Bump::new();
    let (root, errors) = reframe_armature::parse(&allocator, template.content);
    for error in errors.iter() {
        tracing::warn!(%error, "template parse error");
    }
    extract_references(&root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn references(template: &str) -> Vec<String> {
        let allocator = Bump::new();
        let (root, _) = reframe_armature::parse(&allocator, template);
        let mut names: Vec<String> = extract_references(&root)
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_root_identifier() {
        assert_eq!(root_identifier("foo.bar.baz"), "foo");
        assert_eq!(root_identifier("  count "), "count");
        assert_eq!(root_identifier("count + 1"), "count + 1");
    }

    #[test]
    fn test_extract_interpolations_and_directives() {
        let names = references(
            r#"<div :class="theme.name" @click="inc"><p>{{ count }} {{ user.profile.name }}</p></div>"#,
        );
        assert_eq!(names, ["count", "inc", "theme", "user"]);
    }

    #[test]
    fn test_static_arguments_excluded() {
        // `click` is a static directive argument
        let names = references(r#"<button @click="save">Save</button>"#);
        assert_eq!(names, ["save"]);
    }

    #[test]
    fn test_dynamic_argument_included() {
        let names = references(r#"<a v-bind:[attr]="value"></a>"#);
        assert_eq!(names, ["attr", "value"]);
    }

    #[test]
    fn test_v_for_expressions() {
        let names = references(r#"<ul><li v-for="item in items" :key="item.id">{{ item.label }}</li></ul>"#);
        assert!(names.contains(&"items".to_string()));
        assert!(names.contains(&"item".to_string()));
    }

    #[test]
    fn test_template_references_from_sfc() {
        let source = "<template>\n  <p>{{ count }}</p>\n</template>\n\n<script setup>\nconst count = 1\n</script>\n";
        let names = template_references(source);
        assert!(names.contains("count"));
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_template_references_without_template() {
        assert!(template_references("<script>export default {}</script>").is_empty());
    }
}
