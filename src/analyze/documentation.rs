use super::Analyzer;
use crate::types::facts::RepoFacts;
use crate::types::score::{AnalyzerKind, Issue, PartialScore};

pub const MAX_SCORE: u32 = 40;

pub const MISSING_README: &str = "documentation.missing_readme";
pub const SHORT_README: &str = "documentation.short_readme";
pub const MISSING_SECTION: &str = "documentation.missing_section";

const SECTIONS: [(&str, &str); 3] = [
    ("installation", "README lacks an installation section"),
    ("usage", "README lacks a usage section"),
    ("contributing", "README lacks a contributing section"),
];

pub struct DocumentationAnalyzer;

impl Analyzer for DocumentationAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Documentation
    }

    fn max_score(&self) -> u32 {
        MAX_SCORE
    }

    fn analyze(&self, facts: &RepoFacts) -> PartialScore {
        let Some(readme) = facts.readme.as_deref().filter(|text| !text.trim().is_empty()) else {
            return PartialScore::new(
                0,
                MAX_SCORE,
                vec![Issue::new(MISSING_README, "README is missing or unreadable")],
            );
        };

        let mut score = 0;
        let mut issues = Vec::new();
        let length = readme.chars().count();
        if length > 1000 {
            score += 10;
        } else if length > 300 {
            score += 5;
        } else {
            issues.push(Issue::new(
                SHORT_README,
                format!("README is very short ({length} characters)"),
            ));
        }

        let lower = readme.to_lowercase();
        for (keyword, message) in SECTIONS {
            if lower.contains(keyword) {
                score += 10;
            } else {
                issues.push(Issue::new(MISSING_SECTION, message));
            }
        }

        PartialScore::new(score, MAX_SCORE, issues)
    }
}
