//! # reframe_atelier
//!
//! Atelier - The Composition API component workshop for Reframe.
//!
//! ## Name Origin
//!
//! An **atelier** is the workshop where a sketch is finished into a piece.
//! `reframe_atelier` takes the `<script setup>` draft from `reframe_sketch`,
//! works out which declarations the template really uses, and finishes the
//! draft as a `defineComponent({ setup() { ... } })` component.
//!
//! ## Pipeline
//!
//! 1. [`extract_references`]: root identifiers of dynamic template expressions
//! 2. [`reconcile`]: keep the ones declared as computed, method or ref
//! 3. [`assemble`]: text rewrites into the component factory call
//! 4. [`consolidate_imports`]: gather imports under the `<script>` tag
//! 5. [`format_component`]: the fixed formatter profile
//!
//! [`resolve`] runs all of them.

mod assemble;
mod error;
mod extract;
mod format;
mod imports;
mod pipeline;
mod props;
mod reconcile;

pub use assemble::{
    assemble, emit_setup_signature, inject_return, normalize_vue_import, replace_emit, strip_call,
    strip_props_macros, strip_setup_attribute, wrap_component, AssembleOptions, Assembly, Rewrite,
    RewriteReport,
};
pub use error::ResolveError;
pub use extract::{extract_references, root_identifier, template_references, ReferenceCollector};
pub use format::{format_component, formatter_options};
pub use imports::{consolidate_imports, find_imports, ImportRecord};
pub use pipeline::{resolve, ResolveOptions};
pub use props::{build_props_table, capitalize, LiteralValue, PropEntry, PropsTable};
pub use reconcile::reconcile;
