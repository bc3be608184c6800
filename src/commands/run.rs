//! Run command implementation

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::cli::RunArgs;
use crate::common::fs::expand_input_files;
use crate::compiler::Compiler;
use crate::error::{KclError, Result};
use crate::format::{self, OutputFormat};

/// Check the output format and settings files before anything is compiled
fn validate(args: &RunArgs) -> Result<OutputFormat> {
    let format = args.format.parse::<OutputFormat>()?;
    if let Some(missing) = args.settings.iter().find(|s| !Path::new(s).exists()) {
        return Err(KclError::SettingsFileNotFound {
            path: missing.clone(),
        });
    }
    Ok(format)
}

pub fn run(args: RunArgs) -> Result<()> {
    execute(&args, &Compiler::from_env())
}

fn execute(args: &RunArgs, compiler: &Compiler) -> Result<()> {
    let format = validate(args)?;
    let entries = expand_input_files(&args.entries)?;
    debug!(entries = ?entries, format = %format, "running");

    let compiled = compiler.compile(&args.compile_options(entries))?;
    if !compiled.warnings.is_empty() {
        eprint!("{}", compiled.warnings);
    }
    let rendered = format::render(&compiled.yaml, format, args.sort_keys)?;

    match &args.output {
        Some(path) => std::fs::write(path, rendered).map_err(|e| KclError::FileWriteFailed {
            path: path.clone(),
            reason: e.to_string(),
        }),
        None => {
            std::io::stdout().lock().write_all(rendered.as_bytes())?;
            Ok(())
        }
    }
}
