use super::tools::run_tool;
use crate::error::ToolFailure;
use crate::types::facts::{History, Probe};
use std::path::Path;
use std::time::Duration;

const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';

pub async fn read_history(root: &Path, deadline: Duration) -> Probe<History> {
    if !root.join(".git").exists() {
        return Probe::Failed(format!("not a git repository: {}", root.display()));
    }
    let argv = [
        "git".to_string(),
        "log".to_string(),
        "--no-color".to_string(),
        "--format=%ct%x1f%s%x1e".to_string(),
    ];
    let result = match run_tool(&argv, root, deadline).await {
        Ok(output) if output.status == 0 => Ok(parse_log(&output.stdout)),
        Ok(output) if output.stderr.contains("does not have any commits") => {
            Ok(History::default())
        }
        Ok(output) => Err(ToolFailure::Exit {
            tool: "git log".to_string(),
            status: output.status,
            stderr: output.stderr,
        }),
        Err(failure) => Err(failure),
    };
    Probe::from_tool(result)
}

pub fn parse_log(stdout: &str) -> History {
    let mut history = History::default();
    for record in stdout.split(RECORD_SEP) {
        let record = record.trim_matches(|c: char| c == '\n' || c == '\r');
        if record.is_empty() {
            continue;
        }
        let (timestamp, subject) = record.split_once(FIELD_SEP).unwrap_or(("", record));
        if let Ok(ts) = timestamp.trim().parse::<i64>() {
            history.timestamps.push(ts);
        }
        history.messages.push(subject.trim().to_string());
    }
    history.commit_count = history.messages.len();
    history
}
