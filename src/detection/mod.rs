//! Licence detectors: produce one [`DetectionRecord`] per requested project.
//!
//! - [`filesystem`] — inspects licence files and package manifests on disk.
//! - [`command`] — delegates to an external program emitting
//!   go-license-detector compatible JSON.

use thiserror::Error;

use crate::models::DetectionRecord;

pub mod command;
pub mod filesystem;

/// Failure of a whole detection run.
///
/// Projects whose licence cannot be identified are not errors; they come back
/// as records carrying an error message.
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("failed to run licence detector `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("licence detector `{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("malformed licence detector output: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait LicenceDetector {
    /// Detect licences for every path, in a single call.
    ///
    /// Records correlate with paths through [`DetectionRecord::project`] and
    /// may come back in any order.
    fn detect(&self, paths: &[String]) -> Result<Vec<DetectionRecord>, DetectionError>;
}
