//! Configuration file loading for reframe.
//!
//! Reads `reframe.config.json` from the current working directory, or the
//! file given with `--config`.

use reframe_atelier::{formatter_options, AssembleOptions, ResolveOptions};
use reframe_glyph::PartialFormatOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILENAME: &str = "reframe.config.json";

/// Top-level reframe configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ReframeConfig {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Formatter options layered over the fixed component style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<PartialFormatOptions>,

    /// `compositionModule` and `factory`.
    #[serde(flatten)]
    pub assemble: AssembleOptions,
}

impl ReframeConfig {
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            assemble: self.assemble.clone(),
            format: formatter_options(self.format.as_ref()),
        }
    }
}

/// Load the config from `explicit`, or `reframe.config.json` in `dir`.
///
/// A missing default file yields the defaults silently. Anything unreadable
/// or invalid yields the defaults with a warning.
pub fn load_config(dir: &Path, explicit: Option<&Path>) -> ReframeConfig {
    let config_path = match explicit {
        Some(path) => dir.join(path),
        None => dir.join(CONFIG_FILENAME),
    };

    if explicit.is_none() && !config_path.exists() {
        return ReframeConfig::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %config_path.display(), "config loaded");
                config
            }
            Err(e) => {
                eprintln!(
                    "\x1b[33mWarning:\x1b[0m Failed to parse {}: {}",
                    config_path.display(),
                    e
                );
                ReframeConfig::default()
            }
        },
        Err(e) => {
            eprintln!(
                "\x1b[33mWarning:\x1b[0m Failed to read {}: {}",
                config_path.display(),
                e
            );
            ReframeConfig::default()
        }
    }
}

/// JSON Schema for `reframe.config.json`.
pub const REFRAME_CONFIG_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Reframe Configuration",
  "description": "Configuration file for reframe - Options API to Composition API converter",
  "type": "object",
  "properties": {
    "$schema": {
      "type": "string",
      "description": "JSON Schema reference for editor autocompletion"
    },
    "format": {
      "type": "object",
      "description": "Formatter options applied on top of the fixed component style",
      "properties": {
        "printWidth": { "type": "integer", "minimum": 1 },
        "tabWidth": { "type": "integer", "minimum": 0, "maximum": 255 },
        "useTabs": { "type": "boolean" },
        "semi": { "type": "boolean" },
        "singleQuote": { "type": "boolean" },
        "trailingComma": { "enum": ["none", "es5", "all"] },
        "bracketSpacing": { "type": "boolean" },
        "arrowParens": { "enum": ["always", "avoid"] },
        "endOfLine": { "enum": ["lf", "crlf", "cr", "auto"] }
      },
      "additionalProperties": false
    },
    "compositionModule": {
      "type": "string",
      "description": "Module the component factory is imported from",
      "default": "@vue/composition-api"
    },
    "factory": {
      "type": "string",
      "description": "Component factory function",
      "default": "defineComponent"
    }
  },
  "additionalProperties": false
}"#;
