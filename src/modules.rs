//! Resolves Go modules to the directories holding their sources, through `go list`.

use std::process::Command;

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ModuleError {
    #[error("failed to run `go list`: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("`go list` failed for {target}: {stderr} ({status}) (try setting GO111MODULE=on)")]
    Failed {
        target: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("no directory found for go module {0}")]
    NoDirectory(String),
}

/// Directory of a single module, e.g. `github.com/spf13/cobra`.
pub fn module_dir(module: &str) -> Result<String, ModuleError> {
    go_list(module)?
        .into_iter()
        .next()
        .ok_or_else(|| ModuleError::NoDirectory(module.to_string()))
}

/// Directories of every module the current module depends on, itself included.
pub fn all_module_dirs() -> Result<Vec<String>, ModuleError> {
    let dirs = go_list("all")?;
    debug!(count = dirs.len(), "listed go modules");
    Ok(dirs)
}

fn go_list(target: &str) -> Result<Vec<String>, ModuleError> {
    let output = Command::new("go")
        .args(["list", "-m", "-f", "\"{{.Dir}}\"", target])
        .output()?;

    if !output.status.success() {
        return Err(ModuleError::Failed {
            target: target.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(parse_dirs(&String::from_utf8_lossy(&output.stdout)))
}

/// One directory per line, quoted by the `go list` template; blank lines dropped.
fn parse_dirs(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(|line| line.trim().trim_matches('"').to_string())
        .filter(|dir| !dir.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dirs() {
        let stdout = "\"/home/me/project\"\n\"/go/pkg/mod/github.com/spf13/cobra@v1.8.0\"\n\"\"\n\n";
        assert_eq!(
            parse_dirs(stdout),
            vec![
                "/home/me/project".to_string(),
                "/go/pkg/mod/github.com/spf13/cobra@v1.8.0".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_dirs_empty() {
        assert!(parse_dirs("").is_empty());
    }
}
