//! # reframe_relief
//!
//! Relief - The sculptured AST surface for Reframe Vue templates.
//!
//! ## Name Origin
//!
//! **Relief** is a sculptural technique where forms project from a flat
//! background. The template AST is the raised surface of a component: the
//! part of the markup that carries meaning once the plain text is carved away.
//!
//! ## Contents
//!
//! - [`ast`]: template node kinds, allocated in a `bumpalo` arena
//! - [`visit`]: the [`Visit`] trait with `walk_*` helpers
//! - [`sfc`]: top-level block splitting for `.vue` files
//! - [`errors`]: template and SFC error types

pub mod ast;
pub mod errors;
pub mod options;
pub mod sfc;
pub mod visit;

pub use bumpalo::boxed::Box;
pub use bumpalo::collections::Vec;
pub use bumpalo::Bump;
pub use compact_str::CompactString as String;

pub use ast::*;
pub use errors::{CompilerError, ErrorCode, SfcError};
pub use options::{is_void_tag, ParserOptions};
pub use sfc::{parse_sfc, SfcBlock, SfcDescriptor};
pub use visit::Visit;
