use super::manifest::{find_manifest, parse_manifest};
use super::source::RepoRef;
use crate::error::{GradeError, Result};
use crate::types::config::ProviderConfig;
use crate::types::facts::{FactSource, History, Manifest, Probe, RepoFacts, RepoMetadata};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct RepoResponse {
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    watchers_count: u64,
    #[serde(default)]
    subscribers_count: u64,
    description: Option<String>,
    #[serde(default)]
    has_wiki: bool,
    #[serde(default)]
    has_issues: bool,
    updated_at: Option<DateTime<Utc>>,
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
    author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct IssueEntry {
    pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

pub struct GithubClient {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(config: &ProviderConfig, deadline: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(deadline)
            .user_agent(concat!("gitgrade/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty());
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.api_base, path);
        let builder = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a GET and returns the response, or `None` when the status is
    /// one of `absent`.
    async fn fetch(
        &self,
        repo: &RepoRef,
        path: &str,
        accept: &str,
        absent: &[StatusCode],
    ) -> Result<Option<reqwest::Response>> {
        debug!(path, "GET");
        let response = self
            .request(path)
            .header("Accept", accept)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if absent.contains(&status) {
            debug!(path, %status, "resource absent");
            return Ok(None);
        }
        classify_status(repo, status)?;
        Ok(Some(response))
    }

    async fn get_json<T: DeserializeOwned>(&self, repo: &RepoRef, path: &str) -> Result<T> {
        match self.get_optional_json(repo, path, &[]).await? {
            Some(value) => Ok(value),
            None => Err(GradeError::NotFound(repo.slug())),
        }
    }

    async fn get_optional_json<T: DeserializeOwned>(
        &self,
        repo: &RepoRef,
        path: &str,
        absent: &[StatusCode],
    ) -> Result<Option<T>> {
        match self.fetch(repo, path, "application/vnd.github+json", absent).await? {
            Some(response) => Ok(Some(response.json::<T>().await.map_err(transport_error)?)),
            None => Ok(None),
        }
    }

    /// Raw file content; `None` when the file does not exist.
    async fn get_raw(&self, repo: &RepoRef, path: &str) -> Result<Option<String>> {
        match self
            .fetch(repo, path, "application/vnd.github.raw", &[StatusCode::NOT_FOUND])
            .await?
        {
            Some(response) => Ok(Some(response.text().await.map_err(transport_error)?)),
            None => Ok(None),
        }
    }

    /// Only the repository lookup is fatal. Secondary endpoints degrade to
    /// empty values, except a rate limit, which would leave every remaining
    /// probe empty too.
    pub async fn fetch_facts(&self, repo: &RepoRef, now: DateTime<Utc>) -> Result<RepoFacts> {
        info!(repo = %repo, "fetching repository facts from hosting API");
        let base = format!("/repos/{}/{}", repo.owner, repo.repo);
        let meta: RepoResponse = self.get_json(repo, &base).await?;
        let branch = meta
            .default_branch
            .clone()
            .unwrap_or_else(|| "HEAD".to_string());

        let languages_path = format!("{base}/languages");
        let commits_path = format!("{base}/commits?per_page={PAGE_SIZE}");
        let issues_path = format!("{base}/issues?state=open&per_page={PAGE_SIZE}");
        let pulls_path = format!("{base}/pulls?state=open&per_page={PAGE_SIZE}");
        let tree_path = format!("{base}/git/trees/{branch}?recursive=1");
        let readme_path = format!("{base}/readme");
        let optional = [StatusCode::NOT_FOUND, StatusCode::CONFLICT, StatusCode::GONE];
        let (languages, commits, issues, pulls, tree, readme) = tokio::join!(
            self.get_optional_json::<BTreeMap<String, u64>>(repo, &languages_path, &optional),
            self.get_optional_json::<Vec<CommitEntry>>(repo, &commits_path, &[StatusCode::CONFLICT]),
            self.get_optional_json::<Vec<IssueEntry>>(repo, &issues_path, &optional),
            self.get_optional_json::<Vec<serde_json::Value>>(repo, &pulls_path, &optional),
            self.get_optional_json::<TreeResponse>(repo, &tree_path, &optional),
            self.get_raw(repo, &readme_path),
        );

        let languages = secondary("languages", languages)?;
        let issues = secondary("issues", issues)?;
        let pulls = secondary("pulls", pulls)?;
        let tree = secondary("tree", tree)?;
        let readme = secondary("readme", readme.map(Some))?;
        let history = history_probe(commits)?;

        let mut files = tree
            .tree
            .into_iter()
            .filter(|entry| entry.kind == "blob")
            .map(|entry| entry.path)
            .collect::<Vec<_>>();
        files.sort();

        let manifest = self.fetch_manifest(repo, &base, &files).await;

        let mut facts = RepoFacts::empty(FactSource::HostingApi, now);
        facts.metadata = Some(RepoMetadata {
            stars: meta.stargazers_count,
            forks: meta.forks_count,
            watchers: meta.watchers_count,
            subscribers: meta.subscribers_count,
            open_issues: issues
                .iter()
                .filter(|issue| issue.pull_request.is_none())
                .count() as u64,
            open_pulls: pulls.len() as u64,
            description: meta.description,
            has_wiki: meta.has_wiki,
            has_issues: meta.has_issues,
            updated_at: meta.updated_at,
            languages: languages.into_keys().collect(),
        });
        facts.files = files;
        facts.readme = readme;
        facts.manifest = manifest;
        facts.history = history;
        facts.lint = Probe::Unavailable("lint requires a local checkout".to_string());
        facts.audit = Probe::Unavailable("audit requires a local checkout".to_string());
        facts.complexity =
            Probe::Unavailable("complexity requires a local checkout".to_string());
        Ok(facts)
    }

    async fn fetch_manifest(&self, repo: &RepoRef, base: &str, files: &[String]) -> Probe<Manifest> {
        let Some((name, kind)) = find_manifest(files) else {
            return Probe::Unavailable("no package manifest found".to_string());
        };
        match self.get_raw(repo, &format!("{base}/contents/{name}")).await {
            Ok(Some(content)) => match parse_manifest(name, kind, &content) {
                Ok(manifest) => Probe::Collected(manifest),
                Err(reason) => Probe::Failed(format!("{name}: {reason}")),
            },
            Ok(None) => Probe::Failed(format!("{name}: listed in tree but not retrievable")),
            Err(err) => {
                warn!(error = %err, "manifest fetch failed");
                Probe::Failed(format!("{name}: {err}"))
            }
        }
    }
}

fn history_from_commits(commits: &[CommitEntry]) -> History {
    let messages = commits
        .iter()
        .map(|entry| {
            entry
                .commit
                .message
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .collect::<Vec<_>>();
    let timestamps = commits
        .iter()
        .filter_map(|entry| entry.commit.author.as_ref()?.date)
        .map(|date| date.timestamp())
        .collect();
    History {
        commit_count: messages.len(),
        messages,
        timestamps,
    }
}

/// Commit history as a probe. An empty repository answers 409, which is a
/// collected history of zero commits rather than a failure.
fn history_probe(result: Result<Option<Vec<CommitEntry>>>) -> Result<Probe<History>> {
    match result {
        Ok(Some(commits)) => Ok(Probe::Collected(history_from_commits(&commits))),
        Ok(None) => Ok(Probe::Collected(History::default())),
        Err(err @ GradeError::RateLimited(_)) => Err(err),
        Err(err) => {
            warn!(error = %err, "commit history fetch failed");
            Ok(Probe::Failed(err.to_string()))
        }
    }
}

fn secondary<T: Default>(endpoint: &str, result: Result<Option<T>>) -> Result<T> {
    match result {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(err @ GradeError::RateLimited(_)) => Err(err),
        Err(err) => {
            warn!(endpoint, error = %err, "secondary endpoint failed; continuing without it");
            Ok(T::default())
        }
    }
}

fn classify_status(repo: &RepoRef, status: StatusCode) -> Result<()> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND => Err(GradeError::NotFound(repo.slug())),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Err(GradeError::RateLimited(
            format!("{} returned {status}", repo.host),
        )),
        other => Err(GradeError::Infrastructure(format!(
            "hosting API returned {other} for {repo}"
        ))),
    }
}

fn transport_error(err: reqwest::Error) -> GradeError {
    if err.is_timeout() {
        GradeError::Infrastructure(format!("hosting API request timed out: {err}"))
    } else {
        GradeError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_subjects_and_dates_are_extracted() {
        let commits: Vec<CommitEntry> = serde_json::from_str(
            r#"[
                {"commit":{"message":"Fix race in watcher\n\nLonger body","author":{"date":"2024-01-02T03:04:05Z"}}},
                {"commit":{"message":"Initial commit","author":null}}
            ]"#,
        )
        .expect("commits should deserialize");
        let history = history_from_commits(&commits);
        assert_eq!(history.commit_count, 2);
        assert_eq!(history.messages[0], "Fix race in watcher");
        assert_eq!(history.timestamps.len(), 1);
    }

    #[test]
    fn repo_response_tolerates_missing_fields() {
        let meta: RepoResponse = serde_json::from_str(
            r#"{"stargazers_count":12,"description":null,"updated_at":"2024-05-01T00:00:00Z"}"#,
        )
        .expect("partial repo response should deserialize");
        assert_eq!(meta.stargazers_count, 12);
        assert_eq!(meta.forks_count, 0);
        assert!(meta.updated_at.is_some());
        assert!(meta.default_branch.is_none());
    }

    fn repo() -> RepoRef {
        RepoRef::parse("https://github.com/acme/widget").expect("url should parse")
    }

    #[test]
    fn status_codes_map_to_error_kinds() {
        let repo = repo();
        assert!(classify_status(&repo, StatusCode::OK).is_ok());
        assert!(matches!(
            classify_status(&repo, StatusCode::NOT_FOUND),
            Err(GradeError::NotFound(_))
        ));
        for status in [StatusCode::FORBIDDEN, StatusCode::TOO_MANY_REQUESTS] {
            assert!(matches!(
                classify_status(&repo, status),
                Err(GradeError::RateLimited(_))
            ));
        }
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::CONFLICT,
            StatusCode::GONE,
        ] {
            assert!(matches!(
                classify_status(&repo, status),
                Err(GradeError::Infrastructure(_))
            ));
        }
    }

    #[test]
    fn empty_repository_has_empty_history() {
        let probe = history_probe(Ok(None)).expect("empty repo is not an error");
        assert_eq!(probe, Probe::Collected(History::default()));
    }

    #[test]
    fn commit_endpoint_failure_degrades_history() {
        let err = GradeError::Infrastructure("hosting API returned 502".to_string());
        let probe = history_probe(Err(err)).expect("server error should degrade");
        assert!(matches!(probe, Probe::Failed(reason) if reason.contains("502")));
    }

    #[test]
    fn rate_limit_on_secondary_endpoint_stays_fatal() {
        let err = GradeError::RateLimited("github.com returned 429".to_string());
        assert!(history_probe(Err(err)).is_err());
        let err = GradeError::RateLimited("github.com returned 403".to_string());
        assert!(secondary::<Vec<IssueEntry>>("issues", Err(err)).is_err());
    }

    #[test]
    fn disabled_issues_default_to_none() {
        let issues = secondary::<Vec<IssueEntry>>("issues", Ok(None)).expect("410 is absent");
        assert!(issues.is_empty());
        let err = GradeError::Infrastructure("hosting API returned 500".to_string());
        let languages =
            secondary::<BTreeMap<String, u64>>("languages", Err(err)).expect("should degrade");
        assert!(languages.is_empty());
    }

    #[test]
    fn tree_entries_keep_type() {
        let tree: TreeResponse = serde_json::from_str(
            r#"{"tree":[{"path":"src","type":"tree"},{"path":"src/main.rs","type":"blob"}]}"#,
        )
        .expect("tree should deserialize");
        assert_eq!(tree.tree.len(), 2);
        assert_eq!(tree.tree[1].kind, "blob");
        assert_eq!(tree.tree[1].path, "src/main.rs");
    }
}
