use super::Analyzer;
use crate::types::facts::{Probe, RepoFacts};
use crate::types::score::{AnalyzerKind, Issue, PartialScore};

pub const MAX_SCORE: u32 = 30;

pub const VULNERABILITIES: &str = "security.vulnerabilities";
pub const AUDIT_FAILED: &str = "security.audit_failed";

pub struct SecurityAnalyzer;

impl Analyzer for SecurityAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Security
    }

    fn max_score(&self) -> u32 {
        MAX_SCORE
    }

    fn analyze(&self, facts: &RepoFacts) -> PartialScore {
        match &facts.audit {
            Probe::Collected(audit) => {
                let penalty = audit
                    .critical
                    .saturating_mul(10)
                    .saturating_add(audit.high.saturating_mul(5))
                    .saturating_add(audit.moderate.saturating_mul(2));
                let mut issues = Vec::new();
                if audit.actionable() > 0 {
                    issues.push(Issue::new(
                        VULNERABILITIES,
                        format!(
                            "Dependency audit found {} critical, {} high and {} moderate vulnerabilities",
                            audit.critical, audit.high, audit.moderate
                        ),
                    ));
                }
                PartialScore::new(MAX_SCORE.saturating_sub(penalty), MAX_SCORE, issues)
            }
            Probe::Failed(reason) => PartialScore::new(
                MAX_SCORE,
                MAX_SCORE,
                vec![Issue::new(
                    AUDIT_FAILED,
                    format!("Dependency audit failed: {reason}"),
                )],
            ),
            Probe::Unavailable(_) => PartialScore::new(MAX_SCORE, MAX_SCORE, Vec::new()),
        }
    }
}
