//! Error types for the Options API transform.

use std::path::PathBuf;

use reframe_relief::SfcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SketchError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Sfc(#[from] SfcError),

    #[error("failed to parse script: {0}")]
    ScriptParse(String),

    /// The file has no plain `<script>` block to convert
    #[error("no <script> block found")]
    MissingScript,

    #[error("<script> block has no `export default` component options")]
    NoDefaultExport,
}
