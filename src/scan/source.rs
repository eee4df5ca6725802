use crate::error::{GradeError, Result};
use std::fmt;

/// A `<host>/<owner>/<repo>` reference to a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub host: String,
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(GradeError::InvalidInput(
                "Repository URL is required".to_string(),
            ));
        }

        let rest = if let Some(scp) = trimmed.strip_prefix("git@") {
            scp.replacen(':', "/", 1)
        } else {
            let without_scheme = trimmed
                .split_once("://")
                .map(|(scheme, rest)| {
                    if matches!(scheme, "https" | "http" | "ssh" | "git") {
                        Ok(rest)
                    } else {
                        Err(GradeError::InvalidInput(format!(
                            "unsupported scheme '{scheme}' in {trimmed}"
                        )))
                    }
                })
                .transpose()?
                .unwrap_or(trimmed);
            without_scheme.to_string()
        };

        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        let segments = rest
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();
        let [host, owner, repo, ..] = segments.as_slice() else {
            return Err(GradeError::InvalidInput(format!(
                "expected <host>/<owner>/<repo>: {trimmed}"
            )));
        };

        let host = host.rsplit('@').next().unwrap_or_default().to_lowercase();
        let repo = repo.strip_suffix(".git").unwrap_or(*repo);
        if !host.contains('.') && host != "localhost" {
            return Err(GradeError::InvalidInput(format!(
                "'{host}' is not a valid host name"
            )));
        }
        for (label, value) in [("owner", *owner), ("repository", repo)] {
            if !is_valid_name(value) {
                return Err(GradeError::InvalidInput(format!(
                    "invalid {label} name '{value}'"
                )));
            }
        }

        Ok(Self {
            host,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn clone_url(&self) -> String {
        format!("https://{}/{}/{}.git", self.host, self.owner, self.repo)
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.owner, self.repo)
    }
}

fn is_valid_name(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
