//! Output tables of the transform.

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// What a component option became in the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationKind {
    /// `data` entry, now a `ref`
    Ref,
    Computed,
    Method,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// 1-indexed line of the declaration in the source file
    pub line: usize,
}

/// Declared component state, keyed by name within each category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolTable {
    pub computeds: FxHashMap<CompactString, Declaration>,
    pub methods: FxHashMap<CompactString, Declaration>,
    pub refs: FxHashMap<CompactString, Declaration>,
}

impl SymbolTable {
    pub fn insert(&mut self, name: impl Into<CompactString>, declaration: Declaration) {
        let table = match declaration.kind {
            DeclarationKind::Ref => &mut self.refs,
            DeclarationKind::Computed => &mut self.computeds,
            DeclarationKind::Method => &mut self.methods,
        };
        table.insert(name.into(), declaration);
    }

    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.computeds
            .get(name)
            .or_else(|| self.methods.get(name))
            .or_else(|| self.refs.get(name))
    }

    /// Whether `name` is a computed, a method or a ref.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.computeds.len() + self.methods.len() + self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A prop as declared in the `props` option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropDeclaration {
    pub name: CompactString,
    /// Runtime type as written (`String`, `[String, Number]`), if any
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub required: bool,
}

/// Instance APIs the component body used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Using {
    /// `this.$emit`
    pub emit: bool,
    /// `this.$nextTick`
    pub next_tick: bool,
}

/// Source lines of the file that was transformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scan {
    pub lines: Vec<String>,
}

impl Scan {
    pub fn new(source: &str) -> Self {
        Self {
            lines: source.lines().map(str::to_string).collect(),
        }
    }

    /// Rejoin the lines into the original source.
    pub fn source(&self) -> String {
        self.lines.join("\n")
    }
}

/// Result of converting an Options API component into a `<script setup>` draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftTransform {
    /// The whole SFC with its `<script>` replaced by `<script setup>`
    pub transformed: String,
    pub scan: Scan,
    pub symbols: SymbolTable,
    /// Props in declaration order
    pub props: Vec<PropDeclaration>,
    /// Source text of each prop's `default`
    pub prop_default_nodes: FxHashMap<CompactString, String>,
    pub using: Using,
    /// `lang` of the converted script block
    pub lang: Option<String>,
}
