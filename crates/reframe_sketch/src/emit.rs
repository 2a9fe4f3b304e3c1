//! `<script setup>` emission.

use std::collections::BTreeSet;

use crate::component::Component;
use crate::draft::PropDeclaration;
use crate::rewrite::indent_tail;

const INDENT: &str = "    ";

/// Render the `<script setup>` block for an analyzed component.
pub(crate) fn script_setup(component: &Component, lang: Option<&str>) -> String {
    let mut sections: Vec<String> = Vec::new();

    let mut head: Vec<String> = component.comments.clone();
    head.extend(component.imports.iter().cloned());
    let vue_names = vue_imports(component);
    if !vue_names.is_empty() {
        let names: Vec<&str> = vue_names.iter().map(String::as_str).collect();
        head.push(format!("import {{ {} }} from 'vue'", names.join(", ")));
    }
    head.extend(component.statements.iter().cloned());
    push_section(&mut sections, head);

    let mut macros = Vec::new();
    if !component.props.is_empty() {
        let macro_call = if is_typescript(lang) {
            typed_props(component)
        } else {
            let source = component.props_source.as_deref().unwrap_or("[]");
            format!("defineProps({source})")
        };
        macros.push(format!("const props = {macro_call}"));
    }
    if component.using.emit {
        let events: Vec<String> = component
            .emits
            .iter()
            .map(|event| format!("'{event}'"))
            .collect();
        macros.push(format!("const $emit = defineEmits([{}])", events.join(", ")));
    }
    push_section(&mut sections, macros);

    push_section(&mut sections, component.data_setup.clone());
    push_section(
        &mut sections,
        component
            .refs
            .iter()
            .map(|(name, value)| format!("const {name} = ref({value})"))
            .collect(),
    );
    push_section(
        &mut sections,
        component
            .computeds
            .iter()
            .map(|(name, argument)| format!("const {name} = computed({argument})"))
            .collect(),
    );
    for (_, declaration) in &component.methods {
        sections.push(declaration.clone());
    }
    for watcher in &component.watchers {
        sections.push(watcher.clone());
    }
    for (hook, callback) in &component.hooks {
        sections.push(format!("{hook}({callback})"));
    }
    push_section(&mut sections, component.created.clone());

    let open = match lang {
        Some(lang) => format!("<script setup lang=\"{lang}\">"),
        None => "<script setup>".to_string(),
    };
    format!("{open}\n{}\n</script>", sections.join("\n\n"))
}

fn push_section(sections: &mut Vec<String>, lines: Vec<String>) {
    if !lines.is_empty() {
        sections.push(lines.join("\n"));
    }
}

/// Names the draft needs from `vue`, sorted.
fn vue_imports(component: &Component) -> BTreeSet<String> {
    let mut names = component.vue_imports.clone();
    let mut need = |name: &str, used: bool| {
        if used {
            names.insert(name.to_string());
        }
    };
    need("ref", !component.refs.is_empty());
    need("computed", !component.computeds.is_empty());
    need("watch", !component.watchers.is_empty());
    need("nextTick", component.using.next_tick);
    for (hook, _) in &component.hooks {
        names.insert((*hook).to_string());
    }
    names
}

fn is_typescript(lang: Option<&str>) -> bool {
    matches!(lang, Some("ts" | "tsx"))
}

/// `defineProps<{ ... }>()`, wrapped in `withDefaults` when any prop has a default.
fn typed_props(component: &Component) -> String {
    let members: Vec<String> = component
        .props
        .iter()
        .map(|prop| format!("{INDENT}{}", prop_member(prop)))
        .collect();
    let define = format!("defineProps<{{\n{}\n}}>()", members.join("\n"));

    let defaults: Vec<String> = component
        .props
        .iter()
        .filter_map(|prop| {
            let default = component.prop_defaults.get(&prop.name)?;
            Some(format!("{INDENT}{}: {}", prop.name, indent_tail(default, INDENT)))
        })
        .collect();
    if defaults.is_empty() {
        define
    } else {
        format!("withDefaults({define}, {{\n{}\n}})", defaults.join(",\n"))
    }
}

fn prop_member(prop: &PropDeclaration) -> String {
    let optional = if prop.required { "" } else { "?" };
    let ty = prop.type_name.as_deref().map_or_else(|| "any".to_string(), ts_type);
    format!("{}{optional}: {ty}", prop.name)
}

/// TypeScript type for a runtime prop type expression.
pub fn ts_type(runtime: &str) -> String {
    let runtime = runtime.trim();

    if let Some(list) = runtime.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let types: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|ty| !ty.is_empty())
            .map(ts_type)
            .collect();
        return if types.is_empty() {
            "any".to_string()
        } else {
            types.join(" | ")
        };
    }

    // `Object as PropType<User>`, `Array as () => string[]`
    if let Some((_, cast)) = runtime.split_once(" as ") {
        let cast = cast.trim();
        if let Some(inner) = cast.strip_prefix("PropType<").and_then(|s| s.strip_suffix('>')) {
            return inner.trim().to_string();
        }
        if let Some((params, ret)) = cast.split_once("=>") {
            if params.trim() == "()" && !ret.trim().is_empty() {
                return ret.trim().to_string();
            }
        }
        return "any".to_string();
    }

    match runtime {
        "String" => "string",
        "Number" => "number",
        "Boolean" => "boolean",
        "Symbol" => "symbol",
        "BigInt" => "bigint",
        "Array" => "any[]",
        "Object" => "Record<string, any>",
        "Function" => "(...args: any[]) => any",
        other if is_type_reference(other) => other,
        _ => "any",
    }
    .to_string()
}

/// `Date`, `Intl.Locale`: a name TypeScript can use as a type directly.
fn is_type_reference(name: &str) -> bool {
    name != "null"
        && name.split('.').all(|part| {
            part.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
                && part.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::analyze;

    #[test]
    fn test_ts_type() {
        assert_eq!(ts_type("String"), "string");
        assert_eq!(ts_type("[String, Number]"), "string | number");
        assert_eq!(ts_type("Object as PropType<User>"), "User");
        assert_eq!(ts_type("Date"), "Date");
        assert_eq!(ts_type("Function"), "(...args: any[]) => any");
        assert_eq!(ts_type("null"), "any");
    }

    #[test]
    fn test_ts_type_casts() {
        assert_eq!(ts_type("Array as () => string[]"), "string[]");
        assert_eq!(ts_type("Object as () => { id: number }"), "{ id: number }");
        assert_eq!(ts_type("Function as PropType<() => void>"), "() => void");
        assert_eq!(ts_type("Array as unknown as Tag[]"), "any");
        assert_eq!(ts_type("Object as (x: number) => User"), "any");
        assert_eq!(ts_type("[String, Array as () => string[]]"), "string | string[]");
    }

    #[test]
    fn test_ts_type_unrecognised_expression() {
        assert_eq!(ts_type("Intl.Locale"), "Intl.Locale");
        assert_eq!(ts_type("getType()"), "any");
        assert_eq!(ts_type("types[0]"), "any");
        assert_eq!(ts_type(""), "any");
    }

    #[test]
    fn test_emit_typed_props_with_cast() {
        let source = "export default {\n  props: {\n    tags: { type: Array as () => string[] },\n  },\n}\n";
        let component = analyze(source, Some("ts"), 1).unwrap();
        let output = script_setup(&component, Some("ts"));
        assert!(output.contains("tags?: string[]"));
        assert!(!output.contains(" as () =>"));
    }

    #[test]
    fn test_emit_plain_script() {
        let source = "export default {\n  props: ['title'],\n  data() {\n    return { count: 0 }\n  },\n  methods: {\n    inc() {\n      this.count++\n      this.$emit('inc')\n    },\n  },\n}\n";
        let component = analyze(source, None, 1).unwrap();
        let output = script_setup(&component, None);

        assert_eq!(
            output,
            "<script setup>\n\
             import { ref } from 'vue'\n\
             \n\
             const props = defineProps(['title'])\n\
             const $emit = defineEmits(['inc'])\n\
             \n\
             const count = ref(0)\n\
             \n\
             function inc() {\n  count.value++\n  $emit('inc')\n}\n\
             </script>"
        );
    }

    #[test]
    fn test_emit_typed_props() {
        let source = "export default {\n  props: {\n    title: { type: String, required: true },\n    size: { type: Number, default: 2 },\n  },\n}\n";
        let component = analyze(source, Some("ts"), 1).unwrap();
        let output = script_setup(&component, Some("ts"));

        assert!(output.starts_with("<script setup lang=\"ts\">\n"));
        assert!(output.contains(
            "const props = withDefaults(defineProps<{\n    title: string\n    size?: number\n}>(), {\n    size: 2\n})"
        ));
        assert!(!output.contains("from 'vue'"));
    }

    #[test]
    fn test_vue_import_sorted_and_merged() {
        let source = "import { reactive } from 'vue'\nexport default {\n  data: () => ({ a: 1 }),\n  computed: { b() { return this.a } },\n  mounted() { this.$nextTick(() => {}) },\n}\n";
        let component = analyze(source, None, 1).unwrap();
        let output = script_setup(&component, None);

        assert!(output.contains(
            "import { computed, nextTick, onMounted, reactive, ref } from 'vue'"
        ));
    }

    #[test]
    fn test_emit_keeps_leading_comments() {
        let source = "// top comment\nimport Child from './Child.vue'\n/* helper */\nconst limit = 3\n// the component\nexport default {\n  components: { Child },\n}\n";
        let component = analyze(source, None, 1).unwrap();
        let output = script_setup(&component, None);

        assert_eq!(
            output,
            "<script setup>\n\
             // the component\n\
             // top comment\n\
             import Child from './Child.vue'\n\
             /* helper */\n\
             const limit = 3\n\
             </script>"
        );
    }
}
