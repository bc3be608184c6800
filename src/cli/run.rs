use clap::Parser;

use crate::compiler::CompileOptions;

/// Arguments for the run command
#[derive(Parser, Debug, Default)]
#[command(after_help = "EXAMPLES:\n  \
                  Run a single file and output YAML:\n    kcl run path/to/kcl.k\n\n\
                  Run a single file and output JSON:\n    kcl run path/to/kcl.k --format json\n\n\
                  Run a single file and output TOML:\n    kcl run path/to/kcl.k --format toml\n\n\
                  Run multiple files:\n    kcl run path/to/kcl1.k path/to/kcl2.k\n\n\
                  Run the current package:\n    kcl run")]
pub struct RunArgs {
    /// Entry files, directories or glob patterns
    pub entries: Vec<String>,

    /// Specify the top-level argument
    #[arg(long = "argument", short = 'D', value_name = "ARG")]
    pub arguments: Vec<String>,

    /// Specify the command line setting files
    #[arg(long = "setting", short = 'Y', value_name = "FILE")]
    pub settings: Vec<String>,

    /// Specify the configuration override path and value
    #[arg(long = "overrides", short = 'O', value_name = "OVERRIDE")]
    pub overrides: Vec<String>,

    /// Specify the path selectors
    #[arg(long = "path_selector", short = 'S', value_name = "SELECTOR")]
    pub path_selectors: Vec<String>,

    /// Mapping of package name and path where the package is located
    #[arg(long = "external", short = 'E', value_name = "PKG=PATH")]
    pub external_packages: Vec<String>,

    /// Specify the output file path
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// Specify the output format (yaml, json, toml, xml)
    #[arg(long, default_value = "yaml")]
    pub format: String,

    /// Disable dumping None values
    #[arg(long = "disable_none", short = 'n')]
    pub disable_none: bool,

    /// Do perform strict numeric range checks
    #[arg(long = "strict_range_check", short = 'r')]
    pub strict_range_check: bool,

    /// Run in debug mode
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Sort output result keys
    #[arg(long = "sort_keys", short = 'k')]
    pub sort_keys: bool,

    /// Run in vendor mode
    #[arg(long, short = 'V')]
    pub vendor: bool,

    /// Disable the output style and color
    #[arg(long = "no_style")]
    pub no_style: bool,
}

impl RunArgs {
    /// Compiler options for `entries`, which the caller has already expanded
    pub fn compile_options(&self, entries: Vec<String>) -> CompileOptions {
        CompileOptions {
            entries,
            arguments: self.arguments.clone(),
            settings: self.settings.clone(),
            overrides: self.overrides.clone(),
            path_selectors: self.path_selectors.clone(),
            external_packages: self.external_packages.clone(),
            disable_none: self.disable_none,
            strict_range_check: self.strict_range_check,
            debug: self.debug,
            sort_keys: self.sort_keys,
            vendor: self.vendor,
            no_style: self.no_style,
        }
    }
}
