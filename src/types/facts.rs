use crate::error::ToolFailure;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const FACTS_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactSource {
    LocalClone,
    LocalDirectory,
    HostingApi,
}

/// Outcome of one tool-derived fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Probe<T> {
    Collected(T),
    Failed(String),
    Unavailable(String),
}

impl<T> Probe<T> {
    pub fn from_tool(result: Result<T, ToolFailure>) -> Self {
        match result {
            Ok(value) => Self::Collected(value),
            Err(failure) => Self::Failed(failure.to_string()),
        }
    }

    pub fn collected(&self) -> Option<&T> {
        match self {
            Self::Collected(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    Npm,
    Cargo,
    Python,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub kind: ManifestKind,
    pub path: String,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct History {
    pub commit_count: usize,
    pub messages: Vec<String>,
    pub timestamps: Vec<i64>,
}

impl History {
    pub fn average_message_len(&self) -> usize {
        if self.messages.is_empty() {
            return 0;
        }
        let total: usize = self
            .messages
            .iter()
            .map(|message| message.chars().count())
            .sum();
        total / self.messages.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LintSummary {
    pub error_count: u32,
    pub warning_count: u32,
    pub files_linted: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub critical: u32,
    pub high: u32,
    pub moderate: u32,
    pub low: u32,
}

impl AuditSummary {
    pub fn actionable(&self) -> u32 {
        self.critical + self.high + self.moderate
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileComplexity {
    pub path: String,
    pub cyclomatic: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoMetadata {
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub subscribers: u64,
    pub open_issues: u64,
    pub open_pulls: u64,
    pub description: Option<String>,
    pub has_wiki: bool,
    pub has_issues: bool,
    pub updated_at: Option<DateTime<Utc>>,
    pub languages: Vec<String>,
}

impl RepoMetadata {
    pub fn days_since_update(&self, now: DateTime<Utc>) -> Option<i64> {
        self.updated_at
            .map(|updated| (now - updated).num_days().max(0))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RepoFacts {
    pub version: u32,
    pub source: FactSource,
    pub observed_at: DateTime<Utc>,
    pub files: Vec<String>,
    pub readme: Option<String>,
    pub manifest: Probe<Manifest>,
    pub history: Probe<History>,
    pub lint: Probe<LintSummary>,
    pub audit: Probe<AuditSummary>,
    pub complexity: Probe<Vec<FileComplexity>>,
    pub metadata: Option<RepoMetadata>,
}

impl RepoFacts {
    /// Facts with nothing observed. Providers and tests fill in what they have.
    pub fn empty(source: FactSource, observed_at: DateTime<Utc>) -> Self {
        Self {
            version: FACTS_VERSION,
            source,
            observed_at,
            files: Vec::new(),
            readme: None,
            manifest: Probe::Unavailable("no manifest found".to_string()),
            history: Probe::Unavailable("history not collected".to_string()),
            lint: Probe::Unavailable("lint not run".to_string()),
            audit: Probe::Unavailable("audit not run".to_string()),
            complexity: Probe::Unavailable("complexity not measured".to_string()),
            metadata: None,
        }
    }

    pub fn has_dir(&self, dir: &str) -> bool {
        let prefix = format!("{dir}/");
        self.files.iter().any(|path| path.starts_with(&prefix))
    }

    pub fn has_root_file(&self, names: &[&str]) -> bool {
        self.files.iter().any(|path| {
            !path.contains('/')
                && names
                    .iter()
                    .any(|name| path.eq_ignore_ascii_case(name))
        })
    }

    pub fn source_files(&self) -> impl Iterator<Item = &String> {
        self.files.iter().filter(|path| is_source_path(path))
    }
}

const SOURCE_EXTENSIONS: [&str; 20] = [
    "rs", "py", "js", "jsx", "mjs", "cjs", "ts", "tsx", "go", "java", "kt", "c", "h", "cpp",
    "hpp", "cc", "cs", "rb", "php", "swift",
];

pub fn is_source_path(path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or(path);
    let Some((_, ext)) = file.rsplit_once('.') else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    SOURCE_EXTENSIONS.contains(&ext.as_str())
}

pub fn is_test_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    let in_test_dir = lower.split('/').rev().skip(1).any(|segment| {
        matches!(
            segment,
            "test" | "tests" | "spec" | "specs" | "__tests__" | "e2e"
        )
    });
    let file = lower.rsplit('/').next().unwrap_or(&lower);
    let stem = file.split('.').next().unwrap_or(file);
    in_test_dir
        || file.contains(".test.")
        || file.contains(".spec.")
        || stem.ends_with("_test")
        || stem.ends_with("_spec")
        || stem.starts_with("test_")
}
