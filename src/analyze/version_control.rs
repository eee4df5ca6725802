use super::Analyzer;
use crate::types::facts::{Probe, RepoFacts};
use crate::types::score::{AnalyzerKind, Issue, PartialScore};

pub const MAX_SCORE: u32 = 20;

pub const HISTORY_UNAVAILABLE: &str = "version_control.history_unavailable";
pub const FEW_COMMITS: &str = "version_control.few_commits";
pub const TERSE_MESSAGES: &str = "version_control.terse_messages";

pub struct VersionControlAnalyzer;

impl Analyzer for VersionControlAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::VersionControl
    }

    fn max_score(&self) -> u32 {
        MAX_SCORE
    }

    fn analyze(&self, facts: &RepoFacts) -> PartialScore {
        let history = match &facts.history {
            Probe::Collected(history) => history,
            Probe::Failed(reason) | Probe::Unavailable(reason) => {
                return PartialScore::new(
                    0,
                    MAX_SCORE,
                    vec![Issue::new(
                        HISTORY_UNAVAILABLE,
                        format!("Could not read commit history: {reason}"),
                    )],
                );
            }
        };

        if history.commit_count == 0 {
            return PartialScore::new(
                0,
                MAX_SCORE,
                vec![Issue::new(FEW_COMMITS, "Repository has no commits")],
            );
        }

        let mut score = 0;
        let mut issues = Vec::new();
        if history.commit_count > 50 {
            score += 10;
        } else if history.commit_count > 10 {
            score += 5;
        } else {
            issues.push(Issue::new(
                FEW_COMMITS,
                format!("Only {} commits in history", history.commit_count),
            ));
        }

        let average = history.average_message_len();
        if average > 20 {
            score += 10;
        } else if average > 10 {
            score += 5;
        } else {
            issues.push(Issue::new(
                TERSE_MESSAGES,
                format!("Commit messages are terse (average {average} characters)"),
            ));
        }

        PartialScore::new(score, MAX_SCORE, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::fixtures::healthy_facts;
    use crate::types::facts::History;

    fn history(count: usize, message: &str) -> Probe<History> {
        Probe::Collected(History {
            commit_count: count,
            messages: vec![message.to_string(); count],
            timestamps: Vec::new(),
        })
    }

    #[test]
    fn active_history_scores_full_marks() {
        let result = VersionControlAnalyzer.analyze(&healthy_facts());
        assert_eq!(result.score, MAX_SCORE);
    }

    #[test]
    fn thresholds_are_strict() {
        let mut facts = healthy_facts();
        facts.history = history(50, "exactly twenty chars");
        let result = VersionControlAnalyzer.analyze(&facts);
        assert_eq!(result.score, 10);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn sparse_terse_history_is_flagged() {
        let mut facts = healthy_facts();
        facts.history = history(3, "wip");
        let result = VersionControlAnalyzer.analyze(&facts);
        assert_eq!(result.score, 0);
        assert!(result.has_issue(FEW_COMMITS));
        assert!(result.has_issue(TERSE_MESSAGES));
    }

    #[test]
    fn history_failure_records_issue() {
        let mut facts = healthy_facts();
        facts.history = Probe::Failed("not a git repository".to_string());
        let result = VersionControlAnalyzer.analyze(&facts);
        assert_eq!(result.score, 0);
        assert_eq!(result.issues.len(), 1);
        assert!(result.has_issue(HISTORY_UNAVAILABLE));
    }
}
