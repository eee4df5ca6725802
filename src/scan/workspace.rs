use super::source::RepoRef;
use super::tools::run_tool;
use crate::error::{GradeError, Result, ToolFailure};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, info};

/// Transient working area for one analysis; removed when dropped.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn acquire() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("gitgrade-")
            .tempdir()
            .map_err(|e| GradeError::Infrastructure(format!("cannot create working area: {e}")))?;
        debug!(path = %dir.path().display(), "acquired working area");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn checkout_dir(&self) -> PathBuf {
        self.dir.path().join("repo")
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        debug!(path = %self.dir.path().display(), "releasing working area");
    }
}

pub async fn clone_into(
    workspace: &Workspace,
    repo: &RepoRef,
    depth: Option<u32>,
    deadline: Duration,
) -> Result<PathBuf> {
    let target = workspace.checkout_dir();
    let mut argv = vec![
        "git".to_string(),
        "clone".to_string(),
        "--quiet".to_string(),
        "--no-tags".to_string(),
    ];
    if let Some(depth) = depth {
        argv.push(format!("--depth={depth}"));
    }
    argv.push(repo.clone_url());
    argv.push(target.display().to_string());

    info!(repo = %repo, "cloning repository");
    match run_tool(&argv, workspace.path(), deadline).await {
        Ok(output) if output.status == 0 => Ok(target),
        Ok(output) => Err(classify_clone_failure(repo, &output.stderr)),
        Err(ToolFailure::Timeout { secs, .. }) => Err(GradeError::Infrastructure(format!(
            "clone of {repo} timed out after {secs}s"
        ))),
        Err(failure) => Err(GradeError::Infrastructure(failure.to_string())),
    }
}

pub fn classify_clone_failure(repo: &RepoRef, stderr: &str) -> GradeError {
    let lower = stderr.to_lowercase();
    if lower.contains("not found")
        || lower.contains("could not read username")
        || lower.contains("authentication failed")
    {
        GradeError::NotFound(repo.slug())
    } else if lower.contains("rate limit") || lower.contains("429") {
        GradeError::RateLimited(repo.to_string())
    } else {
        GradeError::Infrastructure(format!("git clone failed: {}", stderr.trim()))
    }
}
