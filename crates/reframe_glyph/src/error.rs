//! Error types for reframe_glyph formatter.

use reframe_relief::SfcError;
use thiserror::Error;

/// Errors that can occur during formatting
#[derive(Debug, Error)]
pub enum FormatError {
    /// Error splitting the SFC into blocks
    #[error("Failed to parse SFC: {0}")]
    ParseError(#[from] SfcError),

    /// Error parsing JavaScript/TypeScript
    #[error("Failed to parse script: {0}")]
    ScriptParseError(String),
}
