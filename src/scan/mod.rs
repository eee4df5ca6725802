pub mod audit;
pub mod complexity;
pub mod docs;
pub mod filesystem;
pub mod git_meta;
pub mod github;
pub mod lint;
pub mod manifest;
pub mod source;
pub mod tools;
pub mod workspace;

use crate::error::{GradeError, Result};
use crate::types::config::{GradeConfig, ProviderKind};
use crate::types::facts::{FactSource, FileComplexity, Probe, RepoFacts};
use chrono::{DateTime, Utc};
use source::RepoRef;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use workspace::Workspace;

#[derive(Debug, Clone)]
pub enum Target {
    Remote(RepoRef),
    Local(PathBuf),
}

impl Target {
    pub fn describe(&self) -> String {
        match self {
            Self::Remote(repo) => repo.to_string(),
            Self::Local(path) => path.display().to_string(),
        }
    }
}

/// Produces the facts snapshot for `target`. Any error here is fatal for the request.
pub async fn fetch_facts(
    target: &Target,
    config: &GradeConfig,
    now: DateTime<Utc>,
) -> Result<RepoFacts> {
    match target {
        Target::Local(path) => {
            if !path.is_dir() {
                return Err(GradeError::NotFound(path.display().to_string()));
            }
            collect_local(path, FactSource::LocalDirectory, config, now).await
        }
        Target::Remote(repo) => match config.provider.kind {
            ProviderKind::Clone => {
                let workspace = Workspace::acquire()?;
                let checkout = workspace::clone_into(
                    &workspace,
                    repo,
                    config.provider.clone_depth,
                    config.timeouts.clone_deadline(),
                )
                .await?;
                collect_local(&checkout, FactSource::LocalClone, config, now).await
            }
            ProviderKind::Api => {
                let client =
                    github::GithubClient::new(&config.provider, config.timeouts.http_deadline())?;
                client.fetch_facts(repo, now).await
            }
        },
    }
}

pub async fn collect_local(
    root: &Path,
    source: FactSource,
    config: &GradeConfig,
    now: DateTime<Utc>,
) -> Result<RepoFacts> {
    info!(root = %root.display(), "collecting repository facts");
    let owned_root = root.to_path_buf();
    let (files, readme, manifest) = tokio::task::spawn_blocking(move || {
        let files = filesystem::list_files(&owned_root);
        let readme = docs::read_readme(&owned_root, &files);
        let manifest = manifest::read_manifest(&owned_root, &files);
        (files, readme, manifest)
    })
    .await
    .map_err(|e| GradeError::Infrastructure(format!("file scan aborted: {e}")))?;

    let deadline = config.timeouts.tool_deadline();
    let (history, lint, audit, complexity) = tokio::join!(
        git_meta::read_history(root, deadline),
        lint::lint(root, &files, &config.lint, deadline),
        audit::audit(root, &manifest, &config.audit, deadline),
        measure_complexity(root, &files, deadline),
    );

    for (probe, state) in [
        ("history", probe_state(&history)),
        ("lint", probe_state(&lint)),
        ("audit", probe_state(&audit)),
        ("complexity", probe_state(&complexity)),
    ] {
        if let Some(reason) = state {
            warn!(probe, reason, "fact probe failed; analyzer will degrade");
        }
    }

    let mut facts = RepoFacts::empty(source, now);
    facts.files = files;
    facts.readme = readme;
    facts.manifest = manifest;
    facts.history = history;
    facts.lint = lint;
    facts.audit = audit;
    facts.complexity = complexity;
    Ok(facts)
}

fn probe_state<T>(probe: &Probe<T>) -> Option<&str> {
    match probe {
        Probe::Failed(reason) => Some(reason.as_str()),
        _ => None,
    }
}

async fn measure_complexity(
    root: &Path,
    files: &[String],
    deadline: std::time::Duration,
) -> Probe<Vec<FileComplexity>> {
    let root = root.to_path_buf();
    let files = files.to_vec();
    let task = tokio::task::spawn_blocking(move || complexity::measure_files(&root, &files));
    match tokio::time::timeout(deadline, task).await {
        Ok(Ok(measured)) => Probe::Collected(measured),
        Ok(Err(e)) => Probe::Failed(format!("complexity measurement aborted: {e}")),
        Err(_) => Probe::Failed(format!(
            "complexity measurement timed out after {}s",
            deadline.as_secs()
        )),
    }
}
