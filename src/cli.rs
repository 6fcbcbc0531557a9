use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "licence-compliance-checker",
    about = "Check licences compliance based on list of restricted licences",
    version
)]
pub struct Cli {
    /// Project directories to check
    #[arg(
        value_name = "PATH",
        required_unless_present = "check_go_modules",
        conflicts_with = "check_go_modules"
    )]
    pub paths: Vec<String>,

    /// Licence that will fail the compliance check if found for a project (repeatable)
    #[arg(short = 'r', long = "restricted-licence", value_name = "LICENCE", value_delimiter = ',')]
    pub restricted_licences: Vec<String>,

    /// Project whose licence will not be checked for compliance (repeatable)
    #[arg(short = 'i', long = "ignore-project", value_name = "PROJECT", value_delimiter = ',')]
    pub ignored_projects: Vec<String>,

    /// Override the licence detected for a project directory, e.g. vendor/github.com/spf13/cobra=MIT (repeatable)
    #[arg(
        short = 'o',
        long = "override-licence",
        value_name = "PROJECT=LICENCE",
        value_delimiter = ',',
        value_parser = parse_key_val,
        conflicts_with = "overridden_module_licences"
    )]
    pub overridden_licences: Vec<(String, String)>,

    /// Override the licence detected for a go module, e.g. github.com/spf13/cobra=MIT (repeatable)
    #[arg(
        short = 'm',
        long = "override-module-licence",
        value_name = "MODULE=LICENCE",
        value_delimiter = ',',
        value_parser = parse_key_val
    )]
    pub overridden_module_licences: Vec<(String, String)>,

    /// Check all go modules the current project depends on, instead of PATH arguments
    #[arg(long)]
    pub check_go_modules: bool,

    /// Run an external detector emitting go-license-detector JSON, e.g. "license-detector -f json"
    #[arg(long, value_name = "COMMAND")]
    pub detector_command: Option<String>,

    /// Policy config file [default: ./.licence-compliance-checker/config.toml, fallback ~/.config/licence-compliance-checker/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// (output) Log level; nothing is logged when unset
    #[arg(short = 'L', long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// (output) Show compliance checks regardless of outcome
    #[arg(short = 'A', long)]
    pub show_compliance_all: bool,

    /// (output) Show compliance checks only in case of errors
    #[arg(short = 'E', long)]
    pub show_compliance_errors: bool,

    /// (output) Format used to show compliance checks
    #[arg(long, default_value = "json", value_name = "FORMAT")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Parse a `KEY=VALUE` pair. The key is everything before the first `=`.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{}`", s))?;
    if key.is_empty() || value.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key or value in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}
