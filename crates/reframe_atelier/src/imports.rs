//! Import consolidation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::assemble::{insert_after_script_open, line_ending};

/// A whole-line `import <bindings> from '<source>'` statement.
static IMPORT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*import\s+([^;'"]+?)\s+from\s+['"]([^'"]+)['"];?[ \t]*(?:\r?\n|$)"#)
        .unwrap()
});

/// One import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    /// What is bound, as written: `{ ref, computed }`, `Child`, `* as utils`
    pub bindings: String,
    pub source: String,
}

impl ImportRecord {
    pub fn render(&self) -> String {
        format!("import {} from '{}'", self.bindings, self.source)
    }
}

/// Every import statement in `text`, in order.
pub fn find_imports(text: &str) -> Vec<ImportRecord> {
    IMPORT_LINE
        .captures_iter(text)
        .map(|caps| ImportRecord {
            bindings: caps[1].split_ascii_whitespace().collect::<Vec<_>>().join(" "),
            source: caps[2].to_string(),
        })
        .collect()
}

/// Gather the imports right after the opening `<script>` line.
///
/// Only acts when there is more than one import. Exact duplicates are kept
/// once. Running it twice gives the same text as running it once.
pub fn consolidate_imports(text: &str) -> String {
    let imports = find_imports(text);
    if imports.len() <= 1 {
        return text.to_string();
    }

    let mut unique: Vec<ImportRecord> = Vec::with_capacity(imports.len());
    for import in imports {
        if !unique.contains(&import) {
            unique.push(import);
        }
    }
    let block = unique
        .iter()
        .map(ImportRecord::render)
        .collect::<Vec<_>>()
        .join(line_ending(text));

    let stripped = IMPORT_LINE.replace_all(text, "");
    match insert_after_script_open(&stripped, &block) {
        Some(out) => out,
        None => {
            tracing::warn!("no <script> tag to move imports under");
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSEMBLED: &str = "<script>\nimport { ref, defineComponent } from '@vue/composition-api'\n\nexport default defineComponent({\nsetup() {\nimport Child from './Child.vue'\nconst a = ref(1)\n}\n})\n</script>\n";

    #[test]
    fn test_moves_imports_under_script_tag() {
        let output = consolidate_imports(ASSEMBLED);
        assert_eq!(
            output,
            "<script>\nimport { ref, defineComponent } from '@vue/composition-api'\nimport Child from './Child.vue'\n\nexport default defineComponent({\nsetup() {\nconst a = ref(1)\n}\n})\n</script>\n"
        );
    }

    #[test]
    fn test_idempotent() {
        let once = consolidate_imports(ASSEMBLED);
        assert_eq!(consolidate_imports(&once), once);
    }

    #[test]
    fn test_single_import_untouched() {
        let text = "<script>\nconst a = 1\nimport { ref } from 'vue'\n</script>";
        assert_eq!(consolidate_imports(text), text);
    }

    #[test]
    fn test_duplicates_dropped() {
        let text = "<script>\nimport { a } from 'x'\nimport { a } from \"x\";\nimport b from 'y'\n</script>";
        assert_eq!(
            consolidate_imports(text),
            "<script>\nimport { a } from 'x'\nimport b from 'y'\n</script>"
        );
    }

    #[test]
    fn test_keeps_crlf_line_endings() {
        let text = "<script>\r\nimport a from 'a'\r\nconst x = 1\r\nimport b from 'b'\r\n</script>\r\n";
        let output = consolidate_imports(text);
        assert_eq!(
            output,
            "<script>\r\nimport a from 'a'\r\nimport b from 'b'\r\nconst x = 1\r\n</script>\r\n"
        );
        assert!(!output.replace("\r\n", "").contains('\n'));
        assert_eq!(consolidate_imports(&output), output);
    }

    #[test]
    fn test_find_imports() {
        let imports = find_imports("import {\n  a,\n  b\n} from 'mod'\nimport * as u from \"u\"\n");
        assert_eq!(
            imports,
            vec![
                ImportRecord {
                    bindings: "{ a, b }".to_string(),
                    source: "mod".to_string(),
                },
                ImportRecord {
                    bindings: "* as u".to_string(),
                    source: "u".to_string(),
                },
            ]
        );
    }
}
