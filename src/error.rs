use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradeError {
    #[error("invalid repository reference: {0}")]
    InvalidInput(String),

    #[error("repository not found or is private: {0}")]
    NotFound(String),

    #[error("upstream rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("failed to acquire repository: {0}")]
    Infrastructure(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    NotFound,
    RateLimited,
    Infrastructure,
}

impl GradeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) | Self::ConfigParse(_) | Self::Toml(_) => ErrorKind::Input,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::RateLimited(_) => ErrorKind::RateLimited,
            Self::Infrastructure(_) | Self::Io(_) | Self::Json(_) | Self::Http(_) => {
                ErrorKind::Infrastructure
            }
        }
    }

    /// Short caller-facing message; the full error goes into `details`.
    pub fn headline(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Input => "Invalid repository reference or configuration",
            ErrorKind::NotFound => "Repository not found or is private",
            ErrorKind::RateLimited => "Rate limit exceeded. Please try again later.",
            ErrorKind::Infrastructure => {
                "Failed to analyze the repository. Please check the URL and try again."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&GradeError> for ErrorResponse {
    fn from(err: &GradeError) -> Self {
        Self {
            error: err.headline().to_string(),
            details: Some(err.to_string()),
        }
    }
}

/// Failure of one external tool. Never escalates past the fact layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolFailure {
    #[error("{tool} could not be started: {reason}")]
    Spawn { tool: String, reason: String },

    #[error("{tool} exited with status {status}: {stderr}")]
    Exit {
        tool: String,
        status: i32,
        stderr: String,
    },

    #[error("{tool} produced unparseable output: {reason}")]
    Parse { tool: String, reason: String },

    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: String, secs: u64 },
}

pub type Result<T> = std::result::Result<T, GradeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_is_distinct_from_not_found() {
        let limited = GradeError::RateLimited("403".to_string());
        let missing = GradeError::NotFound("octo/none".to_string());
        assert_eq!(limited.kind(), ErrorKind::RateLimited);
        assert_eq!(missing.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn error_response_carries_details() {
        let err = GradeError::InvalidInput("missing owner".to_string());
        let response = ErrorResponse::from(&err);
        let rendered = serde_json::to_string(&response).expect("response should serialize");
        assert!(rendered.contains("\"error\""));
        assert!(rendered.contains("missing owner"));
    }
}
