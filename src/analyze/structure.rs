use super::Analyzer;
use crate::scan::docs::README_NAMES;
use crate::scan::manifest::MANIFEST_FILES;
use crate::types::facts::RepoFacts;
use crate::types::score::{AnalyzerKind, Issue, PartialScore};

pub const MAX_SCORE: u32 = 30;
const SOURCE_DIRS: [&str; 4] = ["src", "lib", "app", "pkg"];

pub const MISSING_SOURCE_DIR: &str = "structure.missing_source_dir";
pub const MISSING_MANIFEST: &str = "structure.missing_manifest";
pub const MISSING_README: &str = "structure.missing_readme";

pub struct StructureAnalyzer;

impl Analyzer for StructureAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Structure
    }

    fn max_score(&self) -> u32 {
        MAX_SCORE
    }

    fn analyze(&self, facts: &RepoFacts) -> PartialScore {
        let mut score = 0;
        let mut issues = Vec::new();

        if SOURCE_DIRS.iter().any(|dir| facts.has_dir(dir)) {
            score += 10;
        } else {
            issues.push(Issue::new(
                MISSING_SOURCE_DIR,
                "Missing source directory (src/)",
            ));
        }

        let manifest_names = MANIFEST_FILES.map(|(name, _)| name);
        if facts.has_root_file(&manifest_names) {
            score += 10;
        } else {
            issues.push(Issue::new(
                MISSING_MANIFEST,
                "Missing package manifest (package.json, Cargo.toml, ...)",
            ));
        }

        if facts.has_root_file(&README_NAMES) {
            score += 10;
        } else {
            issues.push(Issue::new(MISSING_README, "Missing README file"));
        }

        PartialScore::new(score, MAX_SCORE, issues)
    }
}
