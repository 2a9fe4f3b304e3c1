//! # Reframe
//!
//! Options API to Composition API converter for Vue components, written in Rust.
//!
//! ## Name Origin
//!
//! To **reframe** a picture is to keep the subject and change the frame
//! around it. Reframe keeps a component's state, logic and template and
//! moves them from the Options API frame into a `setup()` function.
//!
//! ## Crates
//!
//! - [`relief`] - Template AST, visitor and SFC block splitting
//! - [`armature`] - Template scanner and parser
//! - [`sketch`] - Options API to `<script setup>` draft
//! - [`glyph`] - Vue SFC formatter
//! - [`atelier`] - Template-driven binding resolution and component assembly

pub mod config;

use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;

/// Template AST, visitor and SFC block splitting.
pub use reframe_relief as relief;

/// Template scanner and parser.
pub use reframe_armature as armature;

/// Options API to `<script setup>` draft.
pub use reframe_sketch as sketch;

/// Vue SFC formatter.
pub use reframe_glyph as glyph;

/// Template-driven binding resolution and component assembly.
pub use reframe_atelier as atelier;

#[derive(Parser, Debug)]
#[command(name = "reframe")]
#[command(about = "Convert Vue Options API components to the Composition API", long_about = None)]
#[command(version, disable_version_flag = true)]
pub struct Cli {
    /// Print version
    #[arg(short = 'v', short_alias = 'V', long, action = clap::ArgAction::Version)]
    version: (),

    /// Component file to convert, e.g. -p "Counter.vue"
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Output file (default: output.<ext> in the current directory)
    #[arg(short, long, num_args = 0..=1)]
    pub output: Option<Option<PathBuf>>,

    /// Write the `<script setup>` draft instead of a setup() component
    #[arg(short, long)]
    pub syntax: bool,

    /// Config file path (default: ./reframe.config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log every pipeline stage
    #[arg(long)]
    pub verbose: bool,

    /// Print the JSON schema of the config file and exit
    #[arg(long)]
    pub print_schema: bool,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Transform(#[from] reframe_sketch::SketchError),

    #[error(transparent)]
    Resolve(#[from] reframe_atelier::ResolveError),
}

/// How a run ended without a propagated error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The converted component was written here
    Converted(PathBuf),
    /// The `<script setup>` draft was written here
    Draft(PathBuf),
    /// No `--path` was given
    MissingPath,
    /// The schema was printed
    Schema,
    /// Writing the output failed; the error was printed
    WriteFailed(PathBuf),
}

/// Install the stderr log subscriber.
pub fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_max_level(level)
        .try_init();
}

/// Run one conversion with relative paths resolved against `cwd`.
pub async fn run(cli: &Cli, cwd: &Path) -> Result<Outcome, RunError> {
    if cli.print_schema {
        println!("{}", config::REFRAME_CONFIG_SCHEMA);
        return Ok(Outcome::Schema);
    }

    let Some(path) = &cli.path else {
        eprintln!("\x1b[31mError:\x1b[0m a file path is required, e.g. -p \"Counter.vue\"");
        return Ok(Outcome::MissingPath);
    };
    let input = cwd.join(path);
    let output = output_path(cli, cwd, &input);

    let config = config::load_config(cwd, cli.config.as_deref());
    let draft = reframe_sketch::transform_path(&input)?;

    if cli.syntax {
        return Ok(write_output(&output, &draft.transformed).map_or_else(
            || Outcome::Draft(output.clone()),
            Outcome::WriteFailed,
        ));
    }

    let code = reframe_atelier::resolve(&draft, &config.resolve_options()).await?;
    Ok(write_output(&output, &code).map_or_else(
        || Outcome::Converted(output.clone()),
        Outcome::WriteFailed,
    ))
}

/// `--output <path>`, or `output.<ext>` in `cwd` with the input's extension.
fn output_path(cli: &Cli, cwd: &Path, input: &Path) -> PathBuf {
    match &cli.output {
        Some(Some(path)) => cwd.join(path),
        _ => {
            let ext = input
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or("vue");
            cwd.join(format!("output.{ext}"))
        }
    }
}

/// Write `contents`, printing the result. Returns the path back on failure.
fn write_output(output: &Path, contents: &str) -> Option<PathBuf> {
    match std::fs::write(output, contents) {
        Ok(()) => {
            println!(
                "\x1b[32m✓\x1b[0m converted to composition-api: {}",
                output.display()
            );
            None
        }
        Err(e) => {
            eprintln!(
                "\x1b[31mError:\x1b[0m failed to write {}: {}",
                output.display(),
                e
            );
            Some(output.to_path_buf())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from(["reframe", "-p", "Counter.vue", "-o", "out.vue", "-s"]).unwrap();
        assert_eq!(cli.path.as_deref(), Some(Path::new("Counter.vue")));
        assert_eq!(cli.output, Some(Some(PathBuf::from("out.vue"))));
        assert!(cli.syntax);
    }

    #[test]
    fn test_output_flag_without_value() {
        let cli = Cli::try_parse_from(["reframe", "-p", "a.vue", "-o"]).unwrap();
        assert_eq!(cli.output, Some(None));
        let output = output_path(&cli, Path::new("/work"), Path::new("/work/a.vue"));
        assert_eq!(output, PathBuf::from("/work/output.vue"));
    }

    #[test]
    fn test_default_output_keeps_extension() {
        let cli = Cli::try_parse_from(["reframe", "-p", "a.nvue"]).unwrap();
        let output = output_path(&cli, Path::new("/work"), Path::new("/work/a.nvue"));
        assert_eq!(output, PathBuf::from("/work/output.nvue"));
    }
}
