use super::Analyzer;
use crate::types::facts::{RepoFacts, RepoMetadata};
use crate::types::score::{AnalyzerKind, PartialScore};

pub const MAX_SCORE: u32 = 20;
const BASELINE: u32 = 10;

/// Credits popularity, activity and community signals from hosting metadata
/// on top of a fixed baseline, capped at the maximum. Local checkouts carry no
/// metadata and receive the baseline only.
pub struct RealWorldAnalyzer;

impl Analyzer for RealWorldAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::RealWorld
    }

    fn max_score(&self) -> u32 {
        MAX_SCORE
    }

    fn analyze(&self, facts: &RepoFacts) -> PartialScore {
        let mut score = BASELINE;
        if let Some(meta) = &facts.metadata {
            if meta.stars > 50 {
                score += 4;
            }
            if meta.forks > 10 {
                score += 2;
            }
            if meta.watchers > 20 {
                score += 2;
            }
            match meta.days_since_update(facts.observed_at) {
                Some(days) if days < 30 => score += 2,
                Some(days) if days < 90 => score += 1,
                _ => {}
            }
            score += community_signals(meta);
        }
        PartialScore::new(score.min(MAX_SCORE), MAX_SCORE, Vec::new())
    }
}

/// One point per sign that people can find, discuss and contribute to the project.
fn community_signals(meta: &RepoMetadata) -> u32 {
    let described = meta
        .description
        .as_deref()
        .is_some_and(|text| text.trim().chars().count() > 50);
    [
        described,
        meta.has_wiki,
        meta.has_issues,
        meta.subscribers > 10,
        meta.open_issues > 0,
        meta.open_pulls > 0,
    ]
    .into_iter()
    .filter(|signal| *signal)
    .count() as u32
}
