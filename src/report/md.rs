use crate::types::report::Report;

pub fn to_markdown(report: &Report) -> String {
    let mut output = String::new();
    output.push_str("# Repository Grade\n\n");
    output.push_str(&format!(
        "{} Overall score: {}/100 ({})\n\n",
        report.badge.symbol(),
        report.overall_score,
        report.skill_level.as_str()
    ));
    output.push_str(&report.summary);
    output.push_str("\n\n");

    output.push_str("## Category Scores\n\n");
    output.push_str("| Category | Score |\n| --- | --- |\n");
    for (category, view) in &report.scores.0 {
        output.push_str(&format!(
            "| {} | {}/{} |\n",
            category.label(),
            view.score,
            view.max_score
        ));
    }
    output.push('\n');

    output.push_str("## Issues\n\n");
    if report.issue_count() == 0 {
        output.push_str("- none\n\n");
    } else {
        for (kind, partial) in &report.analyzers {
            for issue in &partial.issues {
                output.push_str(&format!("- [{}] {}\n", kind.id(), issue.message));
            }
        }
        output.push('\n');
    }

    output.push_str("## Roadmap\n\n");
    for (index, step) in report.roadmap.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", index + 1, step));
    }

    output
}
