use super::Analyzer;
use crate::scan::lint::lintable_files;
use crate::types::config::LintConfig;
use crate::types::facts::{Probe, RepoFacts};
use crate::types::score::{AnalyzerKind, Issue, PartialScore};

pub const MAX_SCORE: u32 = 30;
pub const DEGRADED_SCORE: u32 = 15;

pub const NO_SOURCE_FILES: &str = "code_quality.no_source_files";
pub const LINT_FINDINGS: &str = "code_quality.lint_findings";
pub const LINT_FAILED: &str = "code_quality.lint_failed";
pub const LINT_UNAVAILABLE: &str = "code_quality.lint_unavailable";

pub struct CodeQualityAnalyzer {
    config: LintConfig,
}

impl CodeQualityAnalyzer {
    pub fn new(config: LintConfig) -> Self {
        Self { config }
    }
}

impl Analyzer for CodeQualityAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::CodeQuality
    }

    fn max_score(&self) -> u32 {
        MAX_SCORE
    }

    fn analyze(&self, facts: &RepoFacts) -> PartialScore {
        if facts.source_files().next().is_none() {
            return PartialScore::new(
                0,
                MAX_SCORE,
                vec![Issue::new(NO_SOURCE_FILES, "No source files found to lint")],
            );
        }

        match &facts.lint {
            Probe::Collected(summary) => {
                let penalty = summary
                    .error_count
                    .saturating_mul(self.config.error_penalty)
                    .saturating_add(
                        summary
                            .warning_count
                            .saturating_mul(self.config.warning_penalty),
                    );
                let mut issues = Vec::new();
                if summary.error_count > 0 || summary.warning_count > 0 {
                    issues.push(Issue::new(
                        LINT_FINDINGS,
                        format!(
                            "Lint reported {} error(s) and {} warning(s)",
                            summary.error_count, summary.warning_count
                        ),
                    ));
                }
                PartialScore::new(MAX_SCORE.saturating_sub(penalty), MAX_SCORE, issues)
            }
            Probe::Failed(reason) => PartialScore::new(
                DEGRADED_SCORE,
                MAX_SCORE,
                vec![Issue::new(LINT_FAILED, format!("Lint engine failed: {reason}"))],
            ),
            // No JavaScript in the tree: nothing the engine could deduct for.
            Probe::Unavailable(_) if lintable_files(&facts.files).is_empty() => {
                PartialScore::new(MAX_SCORE, MAX_SCORE, Vec::new())
            }
            Probe::Unavailable(reason) => PartialScore::new(
                DEGRADED_SCORE,
                MAX_SCORE,
                vec![Issue::new(
                    LINT_UNAVAILABLE,
                    format!("Lint results unavailable: {reason}"),
                )],
            ),
        }
    }
}
