use crate::error::ToolFailure;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs `argv` in `dir` to completion or until `deadline`; the child is killed on timeout.
pub async fn run_tool(
    argv: &[String],
    dir: &Path,
    deadline: Duration,
) -> Result<ToolOutput, ToolFailure> {
    run_tool_with_env(argv, dir, &[], deadline).await
}

/// Like [`run_tool`], with extra environment variables for the child.
pub async fn run_tool_with_env(
    argv: &[String],
    dir: &Path,
    envs: &[(&str, &str)],
    deadline: Duration,
) -> Result<ToolOutput, ToolFailure> {
    let Some((program, args)) = argv.split_first() else {
        return Err(ToolFailure::Spawn {
            tool: "<empty>".to_string(),
            reason: "no command configured".to_string(),
        });
    };

    debug!(tool = %program, ?args, dir = %dir.display(), "running tool");
    let child = Command::new(program)
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .envs(envs.iter().copied())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| ToolFailure::Spawn {
            tool: program.clone(),
            reason: e.to_string(),
        })?;

    let output = match tokio::time::timeout(deadline, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(ToolFailure::Spawn {
                tool: program.clone(),
                reason: e.to_string(),
            })
        }
        Err(_) => {
            return Err(ToolFailure::Timeout {
                tool: program.clone(),
                secs: deadline.as_secs(),
            })
        }
    };

    Ok(ToolOutput {
        status: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
