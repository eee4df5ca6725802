use crate::types::facts::{RepoFacts, RepoMetadata};
use crate::types::report::SkillLevel;
use crate::types::score::{AnalyzerKind, PartialScore};
use std::collections::BTreeMap;

/// Builds the prose summary. Output depends only on its inputs.
pub fn summarize(
    overall: u8,
    skill: SkillLevel,
    results: &BTreeMap<AnalyzerKind, PartialScore>,
    facts: &RepoFacts,
) -> String {
    let mut sentences = vec![format!(
        "This repository has an overall score of {overall}/100, reflecting {} level development practices.",
        skill.as_str()
    )];

    for kind in AnalyzerKind::ALL {
        if let Some(partial) = results.get(&kind) {
            sentences.push(describe(kind, partial));
        }
    }

    if let Some(meta) = &facts.metadata {
        let mut community = format!(
            "The project has {} stars and {} forks",
            meta.stars, meta.forks
        );
        match meta.days_since_update(facts.observed_at) {
            Some(days) => community.push_str(&format!(" and was last updated {days} days ago.")),
            None => community.push('.'),
        }
        sentences.push(community);
        sentences.push(activity(meta, facts));
    }

    let attention: Vec<&str> = AnalyzerKind::ALL
        .iter()
        .filter_map(|kind| results.get(kind))
        .flat_map(|partial| partial.issues.iter().map(|issue| issue.message.as_str()))
        .collect();
    if !attention.is_empty() {
        sentences.push(format!(
            "Key areas that need attention: {}.",
            attention.join("; ")
        ));
    }

    sentences.join(" ")
}

fn activity(meta: &RepoMetadata, facts: &RepoFacts) -> String {
    let languages = meta.languages.len();
    let plural = if languages == 1 { "" } else { "s" };
    let maintenance = match meta.days_since_update(facts.observed_at) {
        Some(days) if days < 30 => "active",
        _ => "moderate",
    };
    match facts.history.collected() {
        Some(history) => format!(
            "The repository shows {languages} programming language{plural} and {} commits, indicating {maintenance} maintenance.",
            history.commit_count
        ),
        None => format!(
            "The repository shows {languages} programming language{plural}, indicating {maintenance} maintenance."
        ),
    }
}

fn describe(kind: AnalyzerKind, partial: &PartialScore) -> String {
    let subject = capitalize(kind.title());
    let (score, max) = (partial.score, partial.max_score);
    let ratio = partial.ratio();
    if ratio >= 0.8 {
        format!("{subject} is strong ({score}/{max}).")
    } else if ratio >= 0.5 {
        format!("{subject} is adequate ({score}/{max}).")
    } else {
        format!("{subject} has room for improvement ({score}/{max}).")
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
