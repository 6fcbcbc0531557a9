use anyhow::{Context, Result};

use crate::models::ComplianceResults;

pub fn to_json(results: &ComplianceResults) -> Result<String> {
    serde_json::to_string(results).context("unable to marshal compliance results as json")
}

/// Print the results as a single line of JSON on stdout.
pub fn render(results: &ComplianceResults) -> Result<()> {
    println!("{}", to_json(results)?);
    Ok(())
}
