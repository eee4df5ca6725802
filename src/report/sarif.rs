use crate::types::report::Report;
use serde_json::json;

/// One SARIF result per analyzer issue; the roadmap is carried as run properties.
pub fn to_sarif(report: &Report) -> Result<String, serde_json::Error> {
    let results: Vec<_> = report
        .analyzers
        .iter()
        .flat_map(|(kind, partial)| {
            partial.issues.iter().map(move |issue| {
                json!({
                    "ruleId": issue.id,
                    "level": if partial.ratio() < 0.5 { "error" } else { "warning" },
                    "message": { "text": issue.message },
                    "properties": { "analyzer": kind.id() },
                })
            })
        })
        .collect();

    let sarif = json!({
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "gitgrade",
                    "version": env!("CARGO_PKG_VERSION"),
                }
            },
            "results": results,
            "properties": {
                "overallScore": report.overall_score,
                "roadmap": report.roadmap,
            }
        }]
    });

    serde_json::to_string_pretty(&sarif)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::sample_report;

    #[test]
    fn sarif_has_one_result_per_issue() {
        let rendered = to_sarif(&sample_report()).expect("sarif should serialize");
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let results = value["runs"][0]["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["ruleId"], "security.vulnerabilities");
        assert_eq!(results[0]["level"], "warning");
        assert_eq!(value["runs"][0]["properties"]["overallScore"], 83);
    }
}
