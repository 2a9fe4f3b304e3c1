//! # reframe_sketch
//!
//! Sketch - The Options API to `<script setup>` draft for Reframe.
//!
//! ## Name Origin
//!
//! A **sketch** is the first pass of a drawing: the composition is settled,
//! the finish is not. `reframe_sketch` produces that first pass. It rewrites
//! an Options API component into `<script setup>` form and records what it
//! found, leaving the final component shape to `reframe_atelier`.
//!
//! ## Example
//!
//! ```ignore
//! let draft = reframe_sketch::transform_path("src/Counter.vue")?;
//! println!("{}", draft.transformed);
//! for (name, decl) in &draft.symbols.refs {
//!     println!("ref {name} declared on line {}", decl.line);
//! }
//! ```

mod component;
mod draft;
mod emit;
mod error;
mod rewrite;

use std::path::Path;

use reframe_relief::parse_sfc;

pub use draft::*;
pub use emit::ts_type;
pub use error::SketchError;
pub use rewrite::{dedent, Binding};

/// Read and transform the component at `path`.
pub fn transform_path(path: impl AsRef<Path>) -> Result<DraftTransform, SketchError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| SketchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    transform_source(&source, &path.display().to_string())
}

/// Transform an Options API SFC. `filename` is only used for diagnostics.
pub fn transform_source(source: &str, filename: &str) -> Result<DraftTransform, SketchError> {
    let descriptor = parse_sfc(source)?;
    let script = descriptor.script().ok_or(SketchError::MissingScript)?;
    let lang = script.lang().map(str::to_string);
    let first_line = source[..script.content_range.start].matches('\n').count() + 1;

    tracing::debug!(file = filename, lang = ?lang, "transforming component");
    let component = component::analyze(script.content, lang.as_deref(), first_line)?;
    let setup = emit::script_setup(&component, lang.as_deref());

    let mut blocks = Vec::with_capacity(descriptor.blocks.len());
    for block in &descriptor.blocks {
        if block.range == script.range {
            blocks.push(setup.as_str());
        } else {
            blocks.push(&source[block.range.clone()]);
        }
    }
    let mut transformed = blocks.join("\n\n");
    transformed.push('\n');

    tracing::debug!(
        file = filename,
        symbols = component.symbols.len(),
        props = component.props.len(),
        "draft ready"
    );

    Ok(DraftTransform {
        transformed,
        scan: Scan::new(source),
        symbols: component.symbols,
        props: component.props,
        prop_default_nodes: component.prop_defaults,
        using: component.using,
        lang,
    })
}
