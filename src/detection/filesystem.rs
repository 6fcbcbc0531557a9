use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

use super::{DetectionError, LicenceDetector};
use crate::license::{spdx, text::TextScorer};
use crate::models::{DetectionRecord, LicenceMatch};

pub const NO_LICENCE_FOUND: &str = "no license file was found";

/// Detects licences from the files found at the top of each project directory.
///
/// Licence files (`LICENSE`, `COPYING`, ...) are scored against known licence
/// texts. When none of them is recognised, the licence declared in
/// `Cargo.toml` or `package.json` is used instead.
pub struct FileLicenceDetector {
    scorer: TextScorer,
}

impl FileLicenceDetector {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            scorer: TextScorer::new()?,
        })
    }

    fn detect_project(&self, project: &str) -> DetectionRecord {
        let dir = Path::new(project);
        if !dir.exists() {
            return DetectionRecord::unidentified(
                project,
                format!("{}: no such file or directory", project),
            );
        }
        if !dir.is_dir() {
            return DetectionRecord::unidentified(project, format!("{}: not a directory", project));
        }

        let files = match licence_files(dir) {
            Ok(files) => files,
            Err(e) => return DetectionRecord::unidentified(project, format!("{}: {}", project, e)),
        };

        // Highest confidence seen per licence
        let mut best: BTreeMap<String, f32> = BTreeMap::new();
        for file in &files {
            let content = match std::fs::read_to_string(file) {
                Ok(content) => content,
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "skipping unreadable licence file");
                    continue;
                }
            };
            for m in self.scorer.score(&content) {
                trace!(file = %file.display(), licence = %m.licence, confidence = m.confidence, "licence file scored");
                let entry = best.entry(m.licence).or_insert(m.confidence);
                if m.confidence > *entry {
                    *entry = m.confidence;
                }
            }
        }

        if best.is_empty() {
            let exprs = declared_licences(dir);
            let compound = exprs
                .iter()
                .find(|e| spdx::is_compound(e) && spdx::alternatives(e).is_empty());
            if let Some(expr) = compound {
                return DetectionRecord::unidentified(
                    project,
                    format!("compound licence expression `{}` needs an override", expr),
                );
            }
            for licence in exprs.iter().flat_map(|e| spdx::alternatives(e)) {
                debug!(project, licence = %licence, "using licence declared in manifest");
                best.insert(licence, 1.0);
            }
        }

        if best.is_empty() {
            return DetectionRecord::unidentified(project, NO_LICENCE_FOUND);
        }

        let matches = best
            .into_iter()
            .map(|(licence, confidence)| LicenceMatch::new(licence, confidence))
            .collect();
        DetectionRecord::identified(project, matches)
    }
}

impl LicenceDetector for FileLicenceDetector {
    fn detect(&self, paths: &[String]) -> Result<Vec<DetectionRecord>, DetectionError> {
        let records: Vec<DetectionRecord> = paths.iter().map(|p| self.detect_project(p)).collect();
        debug!("Licence detection results: {:?}", records);
        Ok(records)
    }
}

/// Licence-like files directly inside `dir`, sorted by name.
fn licence_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        // Follows symlinks, e.g. `LICENSE-MIT -> ../../LICENSE-MIT` in workspaces.
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_uppercase();
        if is_licence_file_name(&name) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_licence_file_name(upper: &str) -> bool {
    upper.starts_with("LICENSE")
        || upper.starts_with("LICENCE")
        || upper.starts_with("COPYING")
        || upper.starts_with("UNLICENSE")
        || upper.ends_with(".LICENSE")
        || upper.ends_with(".LICENCE")
}

#[derive(Debug, Deserialize)]
struct CargoManifest {
    package: Option<CargoPackage>,
}

#[derive(Debug, Deserialize)]
struct CargoPackage {
    /// A string, or `{ workspace = true }` which cannot be resolved here.
    license: Option<toml::Value>,
}

/// Licence expressions declared by the package manifests found in `dir`.
fn declared_licences(dir: &Path) -> Vec<String> {
    let mut declared = Vec::new();

    let cargo = dir.join("Cargo.toml");
    if cargo.exists() {
        match parse_cargo_licence(&cargo) {
            Ok(expr) => declared.extend(expr),
            Err(e) => warn!(file = %cargo.display(), error = %e, "unable to parse manifest"),
        }
    }

    let package_json = dir.join("package.json");
    if package_json.exists() {
        match parse_package_json_licences(&package_json) {
            Ok(exprs) => declared.extend(exprs),
            Err(e) => warn!(file = %package_json.display(), error = %e, "unable to parse manifest"),
        }
    }

    declared
}

fn parse_cargo_licence(path: &Path) -> anyhow::Result<Option<String>> {
    let content = std::fs::read_to_string(path)?;
    let manifest: CargoManifest = toml::from_str(&content)?;
    Ok(manifest
        .package
        .and_then(|p| p.license)
        .and_then(|l| l.as_str().map(str::to_string)))
}

/// Reads `license`, either a string or a legacy `{ "type": .. }` object, and
/// the legacy `licenses` array.
fn parse_package_json_licences(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let json: Value = serde_json::from_str(&content)?;

    let licence_name = |v: &Value| -> Option<String> {
        v.as_str()
            .or_else(|| v.get("type").and_then(Value::as_str))
            .map(str::to_string)
    };

    let mut licences = Vec::new();
    if let Some(licence) = json.get("license").and_then(licence_name) {
        licences.push(licence);
    }
    if let Some(list) = json.get("licenses").and_then(Value::as_array) {
        licences.extend(list.iter().filter_map(licence_name));
    }
    Ok(licences)
}
