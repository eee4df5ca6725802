use super::Analyzer;
use crate::scan::complexity::average;
use crate::types::facts::{Probe, RepoFacts};
use crate::types::score::{AnalyzerKind, Issue, PartialScore};

pub const MAX_SCORE: u32 = 20;
pub const DEGRADED_SCORE: u32 = 10;

pub const HIGH_COMPLEXITY: &str = "complexity.high";
pub const UNMEASURED: &str = "complexity.unmeasured";

pub struct ComplexityAnalyzer;

impl Analyzer for ComplexityAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Complexity
    }

    fn max_score(&self) -> u32 {
        MAX_SCORE
    }

    fn analyze(&self, facts: &RepoFacts) -> PartialScore {
        let measured = match &facts.complexity {
            Probe::Collected(measured) => measured,
            Probe::Failed(reason) | Probe::Unavailable(reason) => {
                return PartialScore::new(
                    DEGRADED_SCORE,
                    MAX_SCORE,
                    vec![Issue::new(
                        UNMEASURED,
                        format!("Complexity could not be measured: {reason}"),
                    )],
                );
            }
        };
        // Nothing parseable: no functions to grade, and nothing to report.
        let Some(avg) = average(measured) else {
            return PartialScore::new(0, MAX_SCORE, Vec::new());
        };

        if avg <= 5.0 {
            PartialScore::new(20, MAX_SCORE, Vec::new())
        } else if avg <= 10.0 {
            PartialScore::new(15, MAX_SCORE, Vec::new())
        } else if avg <= 20.0 {
            PartialScore::new(10, MAX_SCORE, Vec::new())
        } else {
            PartialScore::new(
                5,
                MAX_SCORE,
                vec![Issue::new(
                    HIGH_COMPLEXITY,
                    format!("Average cyclomatic complexity is high ({avg:.1})"),
                )],
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::fixtures::healthy_facts;
    use crate::types::facts::FileComplexity;

    fn with_values(values: &[u32]) -> RepoFacts {
        let mut facts = healthy_facts();
        facts.complexity = Probe::Collected(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| FileComplexity {
                    path: format!("src/f{i}.js"),
                    cyclomatic: *v,
                })
                .collect(),
        );
        facts
    }

    #[test]
    fn bands_are_inclusive_upper_bounds() {
        assert_eq!(ComplexityAnalyzer.analyze(&with_values(&[5])).score, 20);
        assert_eq!(ComplexityAnalyzer.analyze(&with_values(&[10])).score, 15);
        assert_eq!(ComplexityAnalyzer.analyze(&with_values(&[20])).score, 10);
    }

    #[test]
    fn very_complex_code_is_flagged() {
        let result = ComplexityAnalyzer.analyze(&with_values(&[30, 40]));
        assert_eq!(result.score, 5);
        assert!(result.has_issue(HIGH_COMPLEXITY));
    }

    #[test]
    fn nothing_measured_scores_zero_silently() {
        let result = ComplexityAnalyzer.analyze(&with_values(&[]));
        assert_eq!(result.score, 0);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn failed_measurement_degrades_with_issue() {
        let mut facts = healthy_facts();
        facts.complexity = Probe::Failed("complexity measurement timed out after 30s".to_string());
        let result = ComplexityAnalyzer.analyze(&facts);
        assert_eq!(result.score, DEGRADED_SCORE);
        assert!(result.has_issue(UNMEASURED));
        assert!(result.issues[0].message.contains("timed out"));
    }

    #[test]
    fn remote_facts_without_checkout_are_not_scored_as_zero() {
        let mut facts = healthy_facts();
        facts.complexity = Probe::Unavailable("complexity requires a local checkout".to_string());
        let result = ComplexityAnalyzer.analyze(&facts);
        assert_eq!(result.score, DEGRADED_SCORE);
        assert_eq!(result.issues.len(), 1);
        assert!(result.has_issue(UNMEASURED));
    }
}
