//! Symbol reconciliation.

use compact_str::CompactString;
use reframe_sketch::SymbolTable;

/// Keep the candidates declared as a computed, a method or a ref.
///
/// Props and globals are dropped. The result is deduplicated and sorted so
/// the generated `return { ... }` is stable across runs.
pub fn reconcile<'c, I>(candidates: I, symbols: &SymbolTable) -> Vec<CompactString>
where
    I: IntoIterator<Item = &'c CompactString>,
{
    let mut exposed: Vec<CompactString> = candidates
        .into_iter()
        .filter(|name| symbols.contains(name))
        .cloned()
        .collect();
    exposed.sort_unstable();
    exposed.dedup();
    exposed
}

#[cfg(test)]
mod tests {
    use super::*;
    use reframe_sketch::{Declaration, DeclarationKind};

    fn table() -> SymbolTable {
        let mut symbols = SymbolTable::default();
        for (name, kind) in [
            ("count", DeclarationKind::Ref),
            ("double", DeclarationKind::Computed),
            ("inc", DeclarationKind::Method),
            ("unused", DeclarationKind::Ref),
        ] {
            symbols.insert(name, Declaration { kind, line: 1 });
        }
        symbols
    }

    fn names(list: &[&str]) -> Vec<CompactString> {
        list.iter().map(|name| CompactString::new(name)).collect()
    }

    #[test]
    fn test_filters_undeclared() {
        let candidates = names(&["title", "inc", "$t", "count"]);
        assert_eq!(reconcile(&candidates, &table()), names(&["count", "inc"]));
    }

    #[test]
    fn test_sorted_and_deduplicated() {
        let candidates = names(&["inc", "double", "count", "inc", "count"]);
        assert_eq!(
            reconcile(&candidates, &table()),
            names(&["count", "double", "inc"])
        );
    }

    #[test]
    fn test_empty_candidates() {
        let candidates: Vec<CompactString> = Vec::new();
        assert!(reconcile(&candidates, &table()).is_empty());
    }
}
