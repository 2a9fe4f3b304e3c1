//! Template and SFC error types.

use thiserror::Error;

/// What went wrong while parsing a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EofInTag,
    EofInComment,
    MissingInterpolationEnd,
    InvalidEndTag,
    MissingEndTag,
    VForMalformedExpression,
}

impl ErrorCode {
    pub fn message(&self) -> &'static str {
        match self {
            Self::EofInTag => "Unexpected EOF in tag.",
            Self::EofInComment => "Unexpected EOF in comment.",
            Self::MissingInterpolationEnd => "Interpolation end sign was not found.",
            Self::InvalidEndTag => "Invalid end tag.",
            Self::MissingEndTag => "Element is missing end tag.",
            Self::VForMalformedExpression => "v-for has invalid expression.",
        }
    }
}

/// Error raised while parsing a template, at a byte offset into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{} (at byte {offset})", code.message())]
pub struct CompilerError {
    pub code: ErrorCode,
    pub offset: usize,
}

impl CompilerError {
    pub fn new(code: ErrorCode, offset: usize) -> Self {
        Self { code, offset }
    }
}

/// Error raised while splitting an SFC into blocks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SfcError {
    #[error("Single file component can contain only one <template> element")]
    DuplicateTemplate { offset: usize },

    #[error("Element <{tag}> is missing end tag")]
    UnclosedBlock { tag: String, offset: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiler_error_message() {
        let err = CompilerError::new(ErrorCode::MissingEndTag, 5);
        assert_eq!(err.to_string(), "Element is missing end tag. (at byte 5)");
    }

    #[test]
    fn test_sfc_error_display() {
        let err = SfcError::UnclosedBlock {
            tag: "script".into(),
            offset: 0,
        };
        assert_eq!(err.to_string(), "Element <script> is missing end tag");
    }
}
