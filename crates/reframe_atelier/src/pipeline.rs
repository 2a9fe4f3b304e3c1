//! The draft to component pipeline.

use reframe_glyph::FormatOptions;
use reframe_sketch::DraftTransform;

use crate::assemble::{assemble, AssembleOptions};
use crate::error::ResolveError;
use crate::extract::template_references;
use crate::format::{format_component, formatter_options};
use crate::imports::consolidate_imports;
use crate::props::build_props_table;
use crate::reconcile::reconcile;

/// Settings for [`resolve`].
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub assemble: AssembleOptions,
    pub format: FormatOptions,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            assemble: AssembleOptions::default(),
            format: formatter_options(None),
        }
    }
}

/// Turn a `<script setup>` draft into a formatted component factory.
///
/// Runs extraction, reconciliation, assembly and import consolidation
/// synchronously, then awaits the formatter.
pub async fn resolve(draft: &DraftTransform, options: &ResolveOptions) -> Result<String, ResolveError> {
    let source = draft.scan.source();
    let references = template_references(&source);
    let bindings = reconcile(&references, &draft.symbols);
    tracing::debug!(
        references = references.len(),
        exposed = bindings.len(),
        "template bindings reconciled"
    );

    let props = build_props_table(&draft.props, &draft.prop_default_nodes);
    let assembly = assemble(
        &draft.transformed,
        &bindings,
        &props,
        draft.using.emit,
        &options.assemble,
    );
    let code = consolidate_imports(&assembly.code);

    format_component(code, options.format.clone()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use reframe_sketch::transform_source;

    const COUNTER: &str = r#"<template>
  <div>
    <p>{{ count }}</p>
    <p>{{ count.value }}</p>
    <p>{{ title }}</p>
  </div>
</template>

<script>
export default {
  props: ['title'],
  data() {
    return { count: 0, hidden: 1 }
  },
}
</script>
"#;

    /// Names in the last `return { ... }` of the component.
    fn exposed_bindings(code: &str) -> Vec<&str> {
        let start = code.rfind("return {").expect("setup returns bindings") + "return {".len();
        let end = start + code[start..].find('}').expect("closed return object");
        code[start..end]
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    #[tokio::test]
    async fn test_resolve_exposes_only_used_declarations() {
        let draft = transform_source(COUNTER, "Counter.vue").unwrap();
        let code = resolve(&draft, &ResolveOptions::default()).await.unwrap();

        assert!(code.contains("export default defineComponent("));
        assert!(code.contains("from '@vue/composition-api'"));
        assert!(code.contains("setup(props)"));
        assert!(code.contains("return { count }"));

        let returned = exposed_bindings(&code);
        assert_eq!(returned, ["count"]);
        // declared but never read by the template
        assert!(code.contains("const hidden = ref(1)"));
        assert!(!returned.contains(&"hidden"));
        // props stay on `props`
        assert!(!returned.contains(&"title"));
        assert!(!code.contains("<script setup"));
        assert!(code.starts_with("<template>\n"));
    }

    #[tokio::test]
    async fn test_resolve_with_emit() {
        let source = "<template>\n  <button @click=\"done\">ok</button>\n</template>\n\n<script>\nexport default {\n  methods: {\n    done() {\n      this.$emit('finished')\n    },\n  },\n}\n</script>\n";
        let draft = transform_source(source, "Done.vue").unwrap();
        let code = resolve(&draft, &ResolveOptions::default()).await.unwrap();

        assert!(code.contains("setup(props, { emit })"));
        assert!(code.contains("emit('finished')"));
        assert!(!code.contains("$emit"));
        assert!(!code.contains("defineEmits"));
    }
}
