//! JSON run report

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::domain::ScanStats;

/// Write `stats` as pretty JSON to `path`, replacing any previous report.
pub fn write_report(path: &Path, root: &str, output: &Path, stats: &ScanStats) -> Result<()> {
    let mut value = stats.to_report_value();
    value["root"] = serde_json::json!(root);
    value["output"] = serde_json::json!(output.display().to_string());

    let body = serde_json::to_string_pretty(&value)?;
    fs::write(path, body).with_context(|| format!("Failed to write report {}", path.display()))?;
    Ok(())
}
