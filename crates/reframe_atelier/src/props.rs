//! Runtime props object for the component factory.

use compact_str::CompactString;
use reframe_sketch::PropDeclaration;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// A JavaScript object literal whose leaves are source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    /// Printed as-is: `true`, `String`, `() => []`
    Raw(String),
    Object(Vec<(CompactString, LiteralValue)>),
}

impl LiteralValue {
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    /// Render as an object literal, recursing into nested objects.
    pub fn stringify(&self) -> String {
        match self {
            Self::Raw(text) => text.clone(),
            Self::Object(entries) => {
                let body: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{key}: {}", value.stringify()))
                    .collect();
                format!("{{{}}}", body.join(", "))
            }
        }
    }
}

/// Normalized metadata of one prop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropEntry {
    pub required: bool,
    /// Runtime type with its first character capitalized, `None` when untyped
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    /// Source text of the default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Props in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropsTable {
    entries: Vec<(CompactString, PropEntry)>,
}

impl PropsTable {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&PropEntry> {
        self.entries
            .iter()
            .find(|(key, _)| key.as_str() == name)
            .map(|(_, entry)| entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CompactString, &PropEntry)> {
        self.entries.iter().map(|(name, entry)| (name, entry))
    }

    pub fn to_literal(&self) -> LiteralValue {
        let entries = self
            .entries
            .iter()
            .map(|(name, entry)| {
                let mut fields = vec![
                    (
                        CompactString::const_new("required"),
                        LiteralValue::raw(entry.required.to_string()),
                    ),
                    (
                        CompactString::const_new("type"),
                        LiteralValue::raw(entry.type_name.as_deref().unwrap_or("null")),
                    ),
                ];
                if let Some(default) = &entry.default {
                    fields.push((CompactString::const_new("default"), LiteralValue::raw(default)));
                }
                (name.clone(), LiteralValue::Object(fields))
            })
            .collect();
        LiteralValue::Object(entries)
    }

    /// The `props:` value of the component factory.
    #[inline]
    pub fn stringify(&self) -> String {
        self.to_literal().stringify()
    }
}

/// Build the props table from the raw declarations and their default snippets.
pub fn build_props_table(
    props: &[PropDeclaration],
    defaults: &FxHashMap<CompactString, String>,
) -> PropsTable {
    let entries = props
        .iter()
        .map(|prop| {
            let entry = PropEntry {
                required: prop.required,
                type_name: prop.type_name.as_deref().map(capitalize),
                default: defaults.get(&prop.name).cloned(),
            };
            (prop.name.clone(), entry)
        })
        .collect();
    PropsTable { entries }
}

/// Uppercase the first character.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str, type_name: Option<&str>, required: bool) -> PropDeclaration {
        PropDeclaration {
            name: CompactString::new(name),
            type_name: type_name.map(str::to_string),
            required,
        }
    }

    #[test]
    fn test_stringify_capitalizes_type() {
        let table = build_props_table(&[prop("a", Some("string"), true)], &FxHashMap::default());
        assert_eq!(table.stringify(), "{a: {required: true, type: String}}");
    }

    #[test]
    fn test_default_preserved() {
        let mut defaults = FxHashMap::default();
        defaults.insert(CompactString::new("size"), "() => []".to_string());
        let table = build_props_table(
            &[prop("size", Some("Array"), false), prop("label", None, false)],
            &defaults,
        );

        assert_eq!(
            table.stringify(),
            "{size: {required: false, type: Array, default: () => []}, label: {required: false, type: null}}"
        );
        assert_eq!(table.get("size").and_then(|e| e.default.as_deref()), Some("() => []"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_table() {
        let table = build_props_table(&[], &FxHashMap::default());
        assert!(table.is_empty());
        assert_eq!(table.stringify(), "{}");
    }

    #[test]
    fn test_nested_literal() {
        let value = LiteralValue::Object(vec![(
            CompactString::new("outer"),
            LiteralValue::Object(vec![(CompactString::new("inner"), LiteralValue::raw("1"))]),
        )]);
        assert_eq!(value.stringify(), "{outer: {inner: 1}}");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("number"), "Number");
        assert_eq!(capitalize("[String, Number]"), "[String, Number]");
        assert_eq!(capitalize(""), "");
    }
}
