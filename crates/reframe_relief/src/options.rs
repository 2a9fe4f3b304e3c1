//! Parser options.

use crate::String;

#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Interpolation delimiters, `{{` and `}}` unless overridden
    pub delimiters: (String, String),
    /// Keep `<!-- -->` comments as nodes
    pub comments: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            delimiters: (String::const_new("{{"), String::const_new("}}")),
            comments: true,
        }
    }
}

/// HTML void elements, which never have children or an end tag.
pub fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_tags() {
        assert!(is_void_tag("br"));
        assert!(is_void_tag("input"));
        assert!(!is_void_tag("div"));
        assert!(!is_void_tag("template"));
    }

    #[test]
    fn test_default_delimiters() {
        let opts = ParserOptions::default();
        assert_eq!(opts.delimiters.0, "{{");
        assert_eq!(opts.delimiters.1, "}}");
        assert!(opts.comments);
    }
}
