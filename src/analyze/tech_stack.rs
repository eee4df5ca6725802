use super::Analyzer;
use crate::types::facts::{Probe, RepoFacts};
use crate::types::score::{AnalyzerKind, Issue, PartialScore};

pub const MAX_SCORE: u32 = 20;
const POINTS_PER_DEPENDENCY: u32 = 5;

pub const MANIFEST_UNAVAILABLE: &str = "tech_stack.manifest_unavailable";
pub const NO_RECOGNIZED: &str = "tech_stack.no_recognized_dependencies";

/// Frameworks and tooling that earn credit, across the supported ecosystems.
const CATALOG: &[&str] = &[
    // javascript
    "react", "vue", "svelte", "@angular/core", "next", "express", "koa", "fastify",
    "@nestjs/core", "typescript", "jest", "mocha", "vitest", "eslint", "prettier",
    "webpack", "vite", "babel-loader", "@babel/core",
    // rust
    "tokio", "serde", "clap", "axum", "actix-web", "anyhow", "thiserror", "tracing",
    "reqwest",
    // python
    "django", "flask", "fastapi", "pytest", "numpy", "pandas", "requests", "sqlalchemy",
    "pydantic", "black", "ruff", "mypy",
];

pub struct TechStackAnalyzer;

impl Analyzer for TechStackAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::TechStack
    }

    fn max_score(&self) -> u32 {
        MAX_SCORE
    }

    fn analyze(&self, facts: &RepoFacts) -> PartialScore {
        let manifest = match &facts.manifest {
            Probe::Collected(manifest) => manifest,
            Probe::Failed(reason) => {
                return PartialScore::new(
                    0,
                    MAX_SCORE,
                    vec![Issue::new(
                        MANIFEST_UNAVAILABLE,
                        format!("Could not read dependency manifest: {reason}"),
                    )],
                );
            }
            Probe::Unavailable(_) => {
                return PartialScore::new(
                    0,
                    MAX_SCORE,
                    vec![Issue::new(
                        MANIFEST_UNAVAILABLE,
                        "No dependency manifest found",
                    )],
                );
            }
        };

        let recognized = manifest
            .dependencies
            .iter()
            .filter(|dep| CATALOG.contains(&dep.to_ascii_lowercase().as_str()))
            .count();
        if recognized == 0 {
            return PartialScore::new(
                0,
                MAX_SCORE,
                vec![Issue::new(
                    NO_RECOGNIZED,
                    "No recognized frameworks or tooling in dependencies",
                )],
            );
        }

        let recognized = u32::try_from(recognized).unwrap_or(u32::MAX);
        let score = recognized
            .saturating_mul(POINTS_PER_DEPENDENCY)
            .min(MAX_SCORE);
        PartialScore::new(score, MAX_SCORE, Vec::new())
    }
}
