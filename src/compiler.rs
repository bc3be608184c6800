//! Bridge to the external KCL compiler executable
//!
//! `kcl run` does not compile anything itself. It forwards the entries and
//! language flags to the compiler (`KCL_COMPILER`, default `kclvm_cli`) and
//! captures the YAML it prints on stdout.

use std::path::PathBuf;
use std::process::Command;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::config;
use crate::error::{KclError, Result};

static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").unwrap()
});

/// Remove terminal color and style sequences
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Language options forwarded to the compiler
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub entries: Vec<String>,
    pub arguments: Vec<String>,
    pub settings: Vec<String>,
    pub overrides: Vec<String>,
    pub path_selectors: Vec<String>,
    pub external_packages: Vec<String>,
    pub disable_none: bool,
    pub strict_range_check: bool,
    pub debug: bool,
    pub sort_keys: bool,
    pub vendor: bool,
    pub no_style: bool,
}

impl CompileOptions {
    /// Command line for the compiler: `run <entries> <flags>`
    pub fn command_args(&self) -> Vec<String> {
        let mut args = vec!["run".to_string()];
        args.extend(self.entries.iter().cloned());

        for (flag, values) in [
            ("-D", &self.arguments),
            ("-Y", &self.settings),
            ("-O", &self.overrides),
            ("-S", &self.path_selectors),
            ("-E", &self.external_packages),
        ] {
            for value in values {
                args.push(flag.to_string());
                args.push(value.clone());
            }
        }

        for (flag, set) in [
            ("-n", self.disable_none),
            ("-r", self.strict_range_check),
            ("-d", self.debug),
            ("-k", self.sort_keys),
            ("-V", self.vendor),
        ] {
            if set {
                args.push(flag.to_string());
            }
        }
        args
    }
}

pub struct Compiler {
    program: PathBuf,
}

impl Compiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(config::compiler_program())
    }

    /// Run the compiler, capturing its YAML stdout and any diagnostics
    pub fn compile(&self, options: &CompileOptions) -> Result<Compiled> {
        let args = options.command_args();
        debug!(program = %self.program.display(), args = ?args, "invoking compiler");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| KclError::CompilerNotFound {
                program: self.program.display().to_string(),
                reason: e.to_string(),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let diagnostics = if options.no_style {
            strip_ansi(&stderr)
        } else {
            stderr.into_owned()
        };

        if !output.status.success() {
            warn!(status = ?output.status.code(), "compiler failed");
            return Err(KclError::CompileFailed {
                message: diagnostics.trim_end().to_string(),
            });
        }

        Ok(Compiled {
            yaml: String::from_utf8_lossy(&output.stdout).into_owned(),
            warnings: diagnostics,
        })
    }
}

/// Output of a successful compile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compiled {
    pub yaml: String,
    /// Compiler stderr, passed on to the user
    pub warnings: String,
}
