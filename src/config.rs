use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Inputs of a compliance run; constant for its whole duration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComplianceConfig {
    /// Licences that fail the check when they are a project's most probable licence.
    pub restricted_licences: BTreeSet<String>,
    /// Projects exempt from any check. They are reported as `ignored`.
    pub ignored_projects: BTreeSet<String>,
    /// Licence forced for a project, replacing whatever was detected.
    pub overridden_project_licences: BTreeMap<String, String>,
}

impl ComplianceConfig {
    /// Extend this config with the values of `other`.
    ///
    /// Overrides from `other` replace existing ones for the same project.
    pub fn merge(&mut self, other: ComplianceConfig) {
        self.restricted_licences.extend(other.restricted_licences);
        self.ignored_projects.extend(other.ignored_projects);
        self.overridden_project_licences
            .extend(other.overridden_project_licences);
    }

    pub fn is_ignored(&self, project: &str) -> bool {
        self.ignored_projects.contains(project)
    }

    pub fn is_restricted(&self, licence: &str) -> bool {
        self.restricted_licences.contains(licence)
    }

    pub fn overridden_licence(&self, project: &str) -> Option<&str> {
        self.overridden_project_licences
            .get(project)
            .map(String::as_str)
    }
}

/// Load the policy file, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<base>/.licence-compliance-checker/config.toml`
/// 3. `~/.config/licence-compliance-checker/config.toml`
/// 4. An empty [`ComplianceConfig`]
pub fn load_config(base: &Path, config_override: Option<&Path>) -> Result<ComplianceConfig> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = base
        .join(".licence-compliance-checker")
        .join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("licence-compliance-checker")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(ComplianceConfig::default())
}

fn read_config(path: &Path) -> Result<ComplianceConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}
