//! Pipeline errors.

use reframe_glyph::FormatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to format component: {0}")]
    Format(#[from] FormatError),

    /// The blocking formatter task panicked or was cancelled
    #[error("formatter task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
