use super::Analyzer;
use crate::types::facts::{is_test_path, RepoFacts};
use crate::types::score::{AnalyzerKind, Issue, PartialScore};

pub const MAX_SCORE: u32 = 20;

pub const NO_TESTS: &str = "testing.no_tests";
pub const LOW_RATIO: &str = "testing.low_ratio";

pub struct TestingAnalyzer;

impl Analyzer for TestingAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Testing
    }

    fn max_score(&self) -> u32 {
        MAX_SCORE
    }

    fn analyze(&self, facts: &RepoFacts) -> PartialScore {
        let (sources, tests) = facts
            .source_files()
            .fold((0usize, 0usize), |(sources, tests), path| {
                (sources + 1, tests + usize::from(is_test_path(path)))
            });

        if tests == 0 {
            return PartialScore::new(
                0,
                MAX_SCORE,
                vec![Issue::new(NO_TESTS, "No test files found")],
            );
        }

        // ratio is compared as tests/sources against halves and fifths without floats
        if tests * 2 > sources {
            PartialScore::new(20, MAX_SCORE, Vec::new())
        } else if tests * 5 > sources {
            PartialScore::new(12, MAX_SCORE, Vec::new())
        } else {
            PartialScore::new(
                6,
                MAX_SCORE,
                vec![Issue::new(
                    LOW_RATIO,
                    format!("Low test ratio: {tests} test file(s) for {sources} source file(s)"),
                )],
            )
        }
    }
}
