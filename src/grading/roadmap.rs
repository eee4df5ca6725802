use crate::analyze::{
    complexity, documentation, quality, security, structure, tech_stack, version_control,
};
use crate::types::score::{AnalyzerKind, PartialScore};
use std::collections::BTreeMap;

pub const WELL_MAINTAINED: &str = "Repository is well-maintained! Keep up the good work!";
pub const CI_CD: &str = "Implement a CI/CD pipeline to automate builds, tests and deployments";

const SOURCE_LAYOUT: &str = "Organize source code under a dedicated src/ directory";
const ADD_MANIFEST: &str = "Add a package manifest (package.json, Cargo.toml or pyproject.toml) to declare dependencies";
const ADD_README: &str = "Add a README that explains what the project does and how to run it";
const EXPAND_README: &str = "Expand the README with installation, usage and contributing sections";
const ADD_TESTS: &str = "Increase test coverage with unit and integration tests";
const COMMIT_PRACTICE: &str = "Commit in small increments with descriptive commit messages";
const ADOPT_TOOLING: &str = "Adopt established frameworks and development tooling";
const UPGRADE_DEPENDENCIES: &str = "Upgrade dependencies with known vulnerabilities";
const DEPENDENCY_SCANNING: &str = "Set up automated dependency scanning and updates";
const LINTING: &str = "Adopt a linter and formatter and fix the reported issues";
const REFACTOR: &str = "Refactor complex functions into smaller, focused units";
const TRACK_COMPLEXITY: &str = "Track code complexity with a static analysis step in CI";

/// Ordered recommendations derived from analyzer issues and low ratios.
pub fn build(results: &BTreeMap<AnalyzerKind, PartialScore>) -> Vec<String> {
    let mut items: Vec<&'static str> = Vec::new();
    let mut push = |text: &'static str| {
        if !items.contains(&text) {
            items.push(text);
        }
    };

    if let Some(p) = results.get(&AnalyzerKind::Structure) {
        if p.has_issue(structure::MISSING_SOURCE_DIR) {
            push(SOURCE_LAYOUT);
        }
        if p.has_issue(structure::MISSING_MANIFEST) {
            push(ADD_MANIFEST);
        }
        if p.has_issue(structure::MISSING_README) {
            push(ADD_README);
        }
    }

    if let Some(p) = results.get(&AnalyzerKind::Documentation) {
        if p.has_issue(documentation::MISSING_README) {
            push(ADD_README);
        } else if p.ratio() < 0.5 {
            push(EXPAND_README);
        }
    }

    if let Some(p) = results.get(&AnalyzerKind::Testing) {
        if !p.issues.is_empty() {
            push(ADD_TESTS);
        }
    }

    if let Some(p) = results.get(&AnalyzerKind::VersionControl) {
        if p.ratio() < 0.5 || p.has_issue(version_control::HISTORY_UNAVAILABLE) {
            push(COMMIT_PRACTICE);
        }
    }

    if let Some(p) = results.get(&AnalyzerKind::TechStack) {
        if p.has_issue(tech_stack::MANIFEST_UNAVAILABLE) {
            push(ADD_MANIFEST);
        } else if p.ratio() < 0.5 {
            push(ADOPT_TOOLING);
        }
    }

    if let Some(p) = results.get(&AnalyzerKind::Security) {
        if p.has_issue(security::VULNERABILITIES) {
            push(UPGRADE_DEPENDENCIES);
        }
        if p.has_issue(security::AUDIT_FAILED) || p.has_issue("security.failed") {
            push(DEPENDENCY_SCANNING);
        }
    }

    if let Some(p) = results.get(&AnalyzerKind::CodeQuality) {
        if p.ratio() < 0.5
            || p.has_issue(quality::LINT_FINDINGS)
            || p.has_issue(quality::LINT_FAILED)
        {
            push(LINTING);
        }
    }

    if let Some(p) = results.get(&AnalyzerKind::Complexity) {
        if p.ratio() < 0.5 {
            push(REFACTOR);
        }
        if p.has_issue(complexity::UNMEASURED) || p.has_issue("complexity.failed") {
            push(TRACK_COMPLEXITY);
        }
    }

    if items.is_empty() {
        return vec![WELL_MAINTAINED.to_string()];
    }
    items.push(CI_CD);
    items.into_iter().map(str::to_string).collect()
}
