pub mod aggregate;
pub mod classify;
pub mod narrate;
pub mod roadmap;

use crate::types::facts::RepoFacts;
use crate::types::report::{CategoryScores, Report, ScoreView};
use crate::types::score::{AnalyzerKind, Category, CategoryBinding, PartialScore};
use std::collections::BTreeMap;
use tracing::debug;

/// Turns the full set of analyzer results into the final report.
///
/// The overall score is computed over analyzer results; `binding` only
/// decides which analyzer each display label shows.
pub fn build_report(
    results: &BTreeMap<AnalyzerKind, PartialScore>,
    facts: &RepoFacts,
    binding: CategoryBinding,
) -> Report {
    let overall_score = aggregate::overall_score(results);
    let skill_level = classify::skill_level(overall_score);
    let badge = classify::badge(overall_score);
    debug!(overall_score, skill = skill_level.as_str(), "graded repository");

    let scores = CategoryScores(
        Category::ALL
            .iter()
            .map(|category| {
                let view = results
                    .get(&binding.analyzer_for(*category))
                    .map(ScoreView::from)
                    .unwrap_or(ScoreView {
                        score: 0,
                        max_score: 0,
                    });
                (*category, view)
            })
            .collect(),
    );

    Report {
        overall_score,
        skill_level,
        badge,
        summary: narrate::summarize(overall_score, skill_level, results, facts),
        roadmap: roadmap::build(results),
        scores,
        analyzers: results
            .iter()
            .map(|(kind, partial)| (*kind, partial.clone()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::default_analyzers;
    use crate::analyze::fixtures::{fixed_now, healthy_facts, readme_with};
    use crate::types::config::GradeConfig;
    use crate::types::facts::{AuditSummary, FactSource, FileComplexity, History, Probe};

    fn grade(facts: &RepoFacts) -> BTreeMap<AnalyzerKind, PartialScore> {
        default_analyzers(&GradeConfig::default())
            .iter()
            .map(|analyzer| (analyzer.kind(), analyzer.analyze(facts)))
            .collect()
    }

    fn scenario_facts() -> RepoFacts {
        let mut facts = healthy_facts();
        facts.readme = Some(readme_with(&["Installation", "Usage"], 1500));
        facts.history = Probe::Collected(History {
            commit_count: 60,
            messages: vec!["Update routing layer".to_string(); 60],
            timestamps: Vec::new(),
        });
        facts.audit = Probe::Collected(AuditSummary {
            critical: 1,
            ..AuditSummary::default()
        });
        facts.complexity = Probe::Collected(vec![FileComplexity {
            path: "src/app.js".to_string(),
            cyclomatic: 4,
        }]);
        facts
    }

    #[test]
    fn documented_service_with_one_critical_vulnerability() {
        let facts = scenario_facts();
        let results = grade(&facts);
        assert_eq!(results[&AnalyzerKind::Documentation].score, 30);
        assert_eq!(results[&AnalyzerKind::Security].score, 20);
        assert_eq!(results[&AnalyzerKind::Complexity].score, 20);

        let report = build_report(&results, &facts, CategoryBinding::Legacy);
        assert_eq!(
            report.roadmap,
            vec![
                "Upgrade dependencies with known vulnerabilities".to_string(),
                roadmap::CI_CD.to_string(),
            ]
        );
        assert!(report.overall_score <= 100);
    }

    #[test]
    fn empty_repository_scores_zero_in_layout_categories() {
        let facts = RepoFacts::empty(FactSource::LocalDirectory, fixed_now());
        let results = grade(&facts);
        for kind in [
            AnalyzerKind::Structure,
            AnalyzerKind::Documentation,
            AnalyzerKind::Testing,
        ] {
            assert_eq!(results[&kind].score, 0);
            assert!(!results[&kind].issues.is_empty());
        }
        let report = build_report(&results, &facts, CategoryBinding::Legacy);
        assert!(!report.roadmap.is_empty());
        assert_eq!(report.roadmap.last().map(String::as_str), Some(roadmap::CI_CD));
    }

    #[test]
    fn report_json_uses_all_labels_in_order() {
        let facts = scenario_facts();
        let report = build_report(&grade(&facts), &facts, CategoryBinding::Legacy);
        let json = serde_json::to_string(&report).unwrap();
        let mut last = 0;
        for category in Category::ALL {
            let at = json.find(&format!("\"{}\"", category.label())).unwrap();
            assert!(at > last);
            last = at;
        }
        assert!(json.contains("\"overallScore\""));
        assert!(json.contains("\"maxScore\""));
        assert!(!json.contains("\"analyzers\""));
    }

    #[test]
    fn identical_facts_give_identical_json() {
        let facts = scenario_facts();
        let first = build_report(&grade(&facts), &facts, CategoryBinding::Legacy);
        let second = build_report(&grade(&facts), &facts, CategoryBinding::Legacy);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn binding_changes_labels_but_not_overall() {
        let facts = scenario_facts();
        let results = grade(&facts);
        let legacy = build_report(&results, &facts, CategoryBinding::Legacy);
        let distinct = build_report(&results, &facts, CategoryBinding::Distinct);
        assert_eq!(legacy.overall_score, distinct.overall_score);

        let security = |report: &Report| {
            report
                .scores
                .0
                .iter()
                .find(|(category, _)| *category == Category::Security)
                .map(|(_, view)| *view)
                .unwrap()
        };
        assert_eq!(security(&legacy).max_score, 30);
        assert_eq!(security(&legacy).score, 30);
        assert_eq!(security(&distinct).score, 20);
    }
}
