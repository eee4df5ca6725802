use super::tools::run_tool;
use crate::error::ToolFailure;
use crate::types::config::AuditConfig;
use crate::types::facts::{AuditSummary, Manifest, ManifestKind, Probe};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const AUDIT_TOOL: &str = "npm audit";

#[derive(Debug, Deserialize)]
struct AuditDocument {
    metadata: Option<AuditMetadata>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AuditMetadata {
    vulnerabilities: AuditCounts,
}

#[derive(Debug, Default, Deserialize)]
struct AuditCounts {
    #[serde(default)]
    critical: u32,
    #[serde(default)]
    high: u32,
    #[serde(default)]
    moderate: u32,
    #[serde(default)]
    low: u32,
}

pub async fn audit(
    root: &Path,
    manifest: &Probe<Manifest>,
    config: &AuditConfig,
    deadline: Duration,
) -> Probe<AuditSummary> {
    if !config.enabled {
        return Probe::Unavailable("dependency audit disabled by configuration".to_string());
    }
    match manifest {
        Probe::Collected(manifest) if manifest.kind == ManifestKind::Npm => {}
        Probe::Collected(_) => {
            return Probe::Unavailable("no auditable npm manifest".to_string());
        }
        Probe::Failed(reason) => {
            return Probe::Failed(format!("manifest unreadable: {reason}"));
        }
        Probe::Unavailable(_) => {
            return Probe::Unavailable("no package manifest to audit".to_string());
        }
    }

    let result = match run_tool(&config.command, root, deadline).await {
        Ok(output) => parse_audit_output(&output.stdout).map_err(|failure| {
            // npm audit exits non-zero when it finds vulnerabilities, so only
            // report the exit status when the output was not usable either.
            if output.status != 0 {
                ToolFailure::Exit {
                    tool: AUDIT_TOOL.to_string(),
                    status: output.status,
                    stderr: output.stderr.clone(),
                }
            } else {
                failure
            }
        }),
        Err(failure) => Err(failure),
    };
    Probe::from_tool(result)
}

pub fn parse_audit_output(stdout: &str) -> Result<AuditSummary, ToolFailure> {
    let document: AuditDocument =
        serde_json::from_str(stdout.trim()).map_err(|e| parse_failure(e.to_string()))?;
    if let Some(error) = document.error {
        return Err(parse_failure(format!("audit reported an error: {error}")));
    }
    let counts = document
        .metadata
        .map(|metadata| metadata.vulnerabilities)
        .ok_or_else(|| parse_failure("missing metadata.vulnerabilities".to_string()))?;
    Ok(AuditSummary {
        critical: counts.critical,
        high: counts.high,
        moderate: counts.moderate,
        low: counts.low,
    })
}

fn parse_failure(reason: String) -> ToolFailure {
    ToolFailure::Parse {
        tool: AUDIT_TOOL.to_string(),
        reason,
    }
}
