//! # reframe_armature
//!
//! Armature - The structural parser framework for Reframe Vue templates.
//!
//! ## Name Origin
//!
//! An **armature** is the internal skeleton a sculptor builds before applying
//! clay. The scanner and parser in this crate give raw template markup the
//! structure that [`reframe_relief`] nodes are then shaped around.
//!
//! ## Stages
//!
//! - [`scanner`]: flat tokens, pulled one at a time
//! - [`parser`]: nesting, directive decoding and `v-for` splitting

mod directive;
pub mod parser;
pub mod scanner;

pub use parser::{parse, parse_with_options, Parser};
pub use scanner::{OpenTag, RawAttr, Scanner, Token};
