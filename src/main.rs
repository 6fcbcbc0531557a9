//! `licence-compliance-checker` — detect project licences and fail on restricted ones.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and set up logging.
//! 2. Load the policy file and merge CLI flags into it ([`config`]).
//! 3. Resolve project paths: positional arguments or every go module ([`modules`]).
//! 4. Detect licences and classify projects ([`detection`], [`compliance`]).
//! 5. Optionally show the results ([`report`]).
//! 6. Exit `0` when compliant, `1` when any project is restricted or unidentifiable.

mod cli;
mod compliance;
mod config;
mod detection;
mod license;
mod models;
mod modules;
mod report;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, LogLevel, OutputFormat};
use compliance::Compliance;
use config::{load_config, ComplianceConfig};
use detection::command::CommandLicenceDetector;
use detection::filesystem::FileLicenceDetector;
use detection::LicenceDetector;
use models::{ComplianceResults, DetectionRecord};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let config = build_config(&cli)?;
    let paths = project_paths(&cli)?;

    info!("Validating licence compliance with config: {:?}", config);
    let compliance = Compliance::new(config, build_detector(&cli)?);
    let results = compliance
        .validate(&paths)
        .context("Error validating licence compliance")?;
    debug!("Licence compliance results: {:?}", results);

    if !results.is_compliant() {
        if cli.show_compliance_errors || cli.show_compliance_all {
            show(&results, cli.format)?;
        }
        error!(
            "Some licences are not compliant and/or cannot be identified: restricted: {:?}, unidentifiable: {:?}",
            projects(&results.restricted),
            projects(&results.unidentifiable)
        );
        std::process::exit(1);
    }

    if cli.show_compliance_all {
        show(&results, cli.format)?;
    }

    info!("Licences are compliant");
    Ok(())
}

/// Logging stays off unless a level is given. `RUST_LOG` refines it when set.
fn init_logging(level: Option<LogLevel>) {
    let Some(level) = level else {
        return;
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Policy file values extended with the CLI flags.
fn build_config(cli: &Cli) -> Result<ComplianceConfig> {
    let base = std::env::current_dir()?;
    let mut config = load_config(&base, cli.config.as_deref())?;

    let mut overrides: Vec<(String, String)> = cli.overridden_licences.clone();
    for (module, licence) in &cli.overridden_module_licences {
        let dir = modules::module_dir(module)
            .with_context(|| format!("Failed to find directory for go module {}", module))?;
        debug!(module = %module, dir = %dir, "resolved go module");
        overrides.push((dir, licence.clone()));
    }

    config.merge(ComplianceConfig {
        restricted_licences: cli.restricted_licences.iter().cloned().collect(),
        ignored_projects: cli.ignored_projects.iter().cloned().collect(),
        overridden_project_licences: overrides.into_iter().collect(),
    });

    if config.restricted_licences.is_empty() {
        bail!("at least one restricted licence is required: use --restricted-licence or restricted_licences in the config file");
    }
    Ok(config)
}

fn project_paths(cli: &Cli) -> Result<Vec<String>> {
    if !cli.check_go_modules {
        return Ok(cli.paths.clone());
    }
    let paths = modules::all_module_dirs().context("Failed to list go modules")?;
    info!("Found go modules: {:?}", paths);
    Ok(paths)
}

fn build_detector(cli: &Cli) -> Result<Box<dyn LicenceDetector>> {
    match cli.detector_command.as_deref() {
        Some(command_line) => {
            let detector = CommandLicenceDetector::from_command_line(command_line)
                .context("--detector-command must not be empty")?;
            Ok(Box::new(detector))
        }
        None => Ok(Box::new(FileLicenceDetector::new()?)),
    }
}

fn show(results: &ComplianceResults, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => report::json::render(results),
        OutputFormat::Table => report::terminal::render(results),
    }
}

fn projects(records: &[DetectionRecord]) -> Vec<&str> {
    records.iter().map(|r| r.project.as_str()).collect()
}
