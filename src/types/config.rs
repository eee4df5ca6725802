use crate::error::GradeError;
use crate::types::score::CategoryBinding;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub lint: LintConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Clone,
    Api,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_token_env")]
    pub token_env: String,
    pub clone_depth: Option<u32>,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            api_base: default_api_base(),
            token_env: default_token_env(),
            clone_depth: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_clone_secs")]
    pub clone_secs: u64,
    #[serde(default = "default_http_secs")]
    pub http_secs: u64,
    #[serde(default = "default_tool_secs")]
    pub tool_secs: u64,
    #[serde(default = "default_analyzer_secs")]
    pub analyzer_secs: u64,
}

fn default_clone_secs() -> u64 {
    120
}

fn default_http_secs() -> u64 {
    20
}

fn default_tool_secs() -> u64 {
    90
}

fn default_analyzer_secs() -> u64 {
    10
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            clone_secs: default_clone_secs(),
            http_secs: default_http_secs(),
            tool_secs: default_tool_secs(),
            analyzer_secs: default_analyzer_secs(),
        }
    }
}

impl TimeoutConfig {
    pub fn clone_deadline(&self) -> Duration {
        Duration::from_secs(self.clone_secs)
    }

    pub fn http_deadline(&self) -> Duration {
        Duration::from_secs(self.http_secs)
    }

    pub fn tool_deadline(&self) -> Duration {
        Duration::from_secs(self.tool_secs)
    }

    pub fn analyzer_deadline(&self) -> Duration {
        Duration::from_secs(self.analyzer_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Module,
    Script,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Script => "script",
        }
    }
}

/// Which ESLint configuration system the engine is driven with. `Flat` needs
/// ESLint 9 (or 8.57+), `Legacy` needs ESLint 8 or older.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    #[default]
    Flat,
    Legacy,
}

/// Lint engine settings handed to the lint probe and the code quality analyzer.
#[derive(Debug, Clone, Deserialize)]
pub struct LintConfig {
    #[serde(default = "default_lint_command")]
    pub command: Vec<String>,
    #[serde(default = "default_environments")]
    pub environments: Vec<String>,
    #[serde(default = "default_rule_set")]
    pub rule_set: String,
    #[serde(default = "default_ecma_version")]
    pub ecma_version: u32,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default)]
    pub config_format: ConfigFormat,
    #[serde(default = "default_error_penalty")]
    pub error_penalty: u32,
    #[serde(default = "default_warning_penalty")]
    pub warning_penalty: u32,
}

fn default_lint_command() -> Vec<String> {
    vec!["npx".to_string(), "--no-install".to_string(), "eslint".to_string()]
}

fn default_environments() -> Vec<String> {
    vec!["browser".to_string(), "node".to_string(), "es2021".to_string()]
}

fn default_rule_set() -> String {
    "eslint:recommended".to_string()
}

fn default_ecma_version() -> u32 {
    2021
}

fn default_error_penalty() -> u32 {
    2
}

fn default_warning_penalty() -> u32 {
    1
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            command: default_lint_command(),
            environments: default_environments(),
            rule_set: default_rule_set(),
            ecma_version: default_ecma_version(),
            source_type: SourceType::default(),
            config_format: ConfigFormat::default(),
            error_penalty: default_error_penalty(),
            warning_penalty: default_warning_penalty(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    #[serde(default = "default_audit_command")]
    pub command: Vec<String>,
}

fn default_audit_enabled() -> bool {
    true
}

fn default_audit_command() -> Vec<String> {
    vec!["npm".to_string(), "audit".to_string(), "--json".to_string()]
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            command: default_audit_command(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub binding: CategoryBinding,
}

/// Rule sets shipped as `@eslint/js` presets.
pub const FLAT_RULE_SETS: [&str; 2] = ["eslint:recommended", "eslint:all"];

const SUPPORTED_ECMA_VERSIONS: [u32; 10] = [5, 2015, 2016, 2017, 2018, 2019, 2020, 2021, 2022, 2023];

impl GradeConfig {
    pub fn validate(&self) -> Result<(), GradeError> {
        for (name, secs) in [
            ("timeouts.clone_secs", self.timeouts.clone_secs),
            ("timeouts.http_secs", self.timeouts.http_secs),
            ("timeouts.tool_secs", self.timeouts.tool_secs),
            ("timeouts.analyzer_secs", self.timeouts.analyzer_secs),
        ] {
            if secs == 0 {
                return Err(GradeError::ConfigParse(format!(
                    "{name} must be greater than 0"
                )));
            }
        }

        if self.lint.command.is_empty() {
            return Err(GradeError::ConfigParse(
                "lint.command cannot be empty".to_string(),
            ));
        }
        if !SUPPORTED_ECMA_VERSIONS.contains(&self.lint.ecma_version) {
            return Err(GradeError::ConfigParse(format!(
                "unsupported lint.ecma_version: {}",
                self.lint.ecma_version
            )));
        }
        if self.lint.rule_set.trim().is_empty() {
            return Err(GradeError::ConfigParse(
                "lint.rule_set cannot be empty".to_string(),
            ));
        }
        if self.lint.config_format == ConfigFormat::Flat
            && !FLAT_RULE_SETS.contains(&self.lint.rule_set.as_str())
        {
            return Err(GradeError::ConfigParse(format!(
                "lint.rule_set '{}' is not available with flat config; use one of {} or set lint.config_format = \"legacy\"",
                self.lint.rule_set,
                FLAT_RULE_SETS.join(", ")
            )));
        }

        if self.audit.enabled && self.audit.command.is_empty() {
            return Err(GradeError::ConfigParse(
                "audit.command cannot be empty when audit.enabled = true".to_string(),
            ));
        }

        if !self.provider.api_base.starts_with("http") {
            return Err(GradeError::ConfigParse(format!(
                "provider.api_base must be an http(s) URL: {}",
                self.provider.api_base
            )));
        }
        if self.provider.clone_depth == Some(0) {
            return Err(GradeError::ConfigParse(
                "provider.clone_depth must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
