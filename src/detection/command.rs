use std::process::Command;

use tracing::{debug, trace};

use super::{DetectionError, LicenceDetector};
use crate::models::DetectionRecord;

/// Runs an external detector once for all paths and reads its JSON report
/// from stdout, e.g. `license-detector -f json <paths...>`.
///
/// The report must be an array of `{"project", "matches", "error"}` objects;
/// extra fields are ignored.
#[derive(Debug, Clone)]
pub struct CommandLicenceDetector {
    program: String,
    args: Vec<String>,
}

impl CommandLicenceDetector {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a whitespace separated command line. `None` when empty.
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self::new(program, words.collect()))
    }

    fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl LicenceDetector for CommandLicenceDetector {
    fn detect(&self, paths: &[String]) -> Result<Vec<DetectionRecord>, DetectionError> {
        let command = self.display();
        debug!(command = %command, paths = paths.len(), "running licence detector");

        let output = Command::new(&self.program)
            .args(&self.args)
            .args(paths)
            .output()
            .map_err(|source| DetectionError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DetectionError::Failed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        trace!(
            "Licence detection raw output: {}",
            String::from_utf8_lossy(&output.stdout)
        );
        let records: Vec<DetectionRecord> = serde_json::from_slice(&output.stdout)?;
        debug!("Licence detection results: {:?}", records);
        Ok(records)
    }
}
