//! Formatter adapter.

use reframe_glyph::{format_file, FormatOptions, PartialFormatOptions};

use crate::error::ResolveError;

/// File name the assembled component is formatted as.
const COMPONENT_FILENAME: &str = "component.vue";

/// The fixed component style with `overrides` layered on top.
pub fn formatter_options(overrides: Option<&PartialFormatOptions>) -> FormatOptions {
    let mut options = FormatOptions::composition_profile();
    if let Some(overrides) = overrides {
        overrides.apply(&mut options);
    }
    options
}

/// Format an assembled component off the async runtime.
pub async fn format_component(text: String, options: FormatOptions) -> Result<String, ResolveError> {
    let result =
        tokio::task::spawn_blocking(move || format_file(&text, COMPONENT_FILENAME, &options))
            .await??;
    tracing::debug!(changed = result.changed, "component formatted");
    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_options_overrides() {
        let overrides = PartialFormatOptions {
            tab_width: Some(2),
            semi: Some(true),
            ..Default::default()
        };
        let options = formatter_options(Some(&overrides));
        assert_eq!(options.tab_width, 2);
        assert!(options.semi);
        assert_eq!(options.print_width, 9999);
        assert!(options.single_quote);
    }

    #[tokio::test]
    async fn test_format_component() {
        let text = "<script>\nconst a = \"x\";\n</script>\n".to_string();
        let code = format_component(text, formatter_options(None)).await.unwrap();
        assert!(code.contains("const a = 'x'"));
        assert!(!code.contains(';'));
    }

    #[tokio::test]
    async fn test_format_error_propagates() {
        let text = "<script>\nconst = ;\n</script>\n".to_string();
        let result = format_component(text, formatter_options(None)).await;
        assert!(matches!(result, Err(ResolveError::Format(_))));
    }
}
