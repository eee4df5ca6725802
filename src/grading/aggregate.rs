use crate::types::score::{AnalyzerKind, PartialScore};
use std::collections::BTreeMap;

/// Percentage of earned points, rounded half up, in integer arithmetic.
pub fn overall_score(results: &BTreeMap<AnalyzerKind, PartialScore>) -> u8 {
    let (earned, possible) = results.values().fold((0u64, 0u64), |(earned, possible), p| {
        (earned + u64::from(p.score), possible + u64::from(p.max_score))
    });
    if possible == 0 {
        return 0;
    }
    let percent = (200 * earned + possible) / (2 * possible);
    u8::try_from(percent.min(100)).unwrap_or(100)
}
