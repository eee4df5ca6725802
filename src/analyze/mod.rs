pub mod complexity;
pub mod documentation;
pub mod quality;
pub mod real_world;
pub mod security;
pub mod structure;
pub mod tech_stack;
pub mod testing;
pub mod version_control;

use crate::types::config::GradeConfig;
use crate::types::facts::RepoFacts;
use crate::types::score::{AnalyzerKind, PartialScore};
use std::sync::Arc;

/// One scoring category. Implementations must be pure functions of the facts.
pub trait Analyzer: Send + Sync {
    fn kind(&self) -> AnalyzerKind;
    fn max_score(&self) -> u32;
    fn analyze(&self, facts: &RepoFacts) -> PartialScore;
}

pub fn default_analyzers(config: &GradeConfig) -> Vec<Arc<dyn Analyzer>> {
    vec![
        Arc::new(structure::StructureAnalyzer),
        Arc::new(quality::CodeQualityAnalyzer::new(config.lint.clone())),
        Arc::new(documentation::DocumentationAnalyzer),
        Arc::new(version_control::VersionControlAnalyzer),
        Arc::new(testing::TestingAnalyzer),
        Arc::new(tech_stack::TechStackAnalyzer),
        Arc::new(real_world::RealWorldAnalyzer),
        Arc::new(security::SecurityAnalyzer),
        Arc::new(complexity::ComplexityAnalyzer),
    ]
}
