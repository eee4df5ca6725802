use crate::analyze::{default_analyzers, Analyzer};
use crate::error::Result;
use crate::grading;
use crate::scan::{self, Target};
use crate::types::config::GradeConfig;
use crate::types::facts::RepoFacts;
use crate::types::report::Report;
use crate::types::score::{AnalyzerKind, CategoryBinding, PartialScore};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Full request: collect facts, run every analyzer, grade.
///
/// Only fact collection can fail the request. Analyzer trouble is folded into
/// degraded scores.
pub async fn analyze(
    target: &Target,
    config: &GradeConfig,
    binding: CategoryBinding,
    now: DateTime<Utc>,
) -> Result<Report> {
    info!(target = %target.describe(), "analyzing repository");
    let facts = Arc::new(scan::fetch_facts(target, config, now).await?);
    let analyzers = default_analyzers(config);
    let results = run_analyzers(
        Arc::clone(&facts),
        &analyzers,
        config.timeouts.analyzer_deadline(),
    )
    .await;
    Ok(grading::build_report(&results, &facts, binding))
}

/// Runs each analyzer on the blocking pool. The returned map always has one
/// entry per analyzer, keyed by kind, whatever order they finish in.
pub async fn run_analyzers(
    facts: Arc<RepoFacts>,
    analyzers: &[Arc<dyn Analyzer>],
    deadline: Duration,
) -> BTreeMap<AnalyzerKind, PartialScore> {
    let mut tasks = JoinSet::new();
    for analyzer in analyzers {
        let analyzer = Arc::clone(analyzer);
        let facts = Arc::clone(&facts);
        tasks.spawn(async move {
            let kind = analyzer.kind();
            let max = analyzer.max_score();
            let handle = tokio::task::spawn_blocking(move || analyzer.analyze(&facts));
            let partial = match tokio::time::timeout(deadline, handle).await {
                Ok(Ok(partial)) => partial,
                Ok(Err(err)) if err.is_panic() => {
                    warn!(analyzer = kind.id(), "analyzer panicked");
                    PartialScore::degraded(kind, max, "analyzer panicked")
                }
                Ok(Err(err)) => {
                    warn!(analyzer = kind.id(), error = %err, "analyzer task failed");
                    PartialScore::degraded(kind, max, &err.to_string())
                }
                Err(_) => {
                    warn!(analyzer = kind.id(), "analyzer timed out");
                    PartialScore::degraded(
                        kind,
                        max,
                        &format!("timed out after {}ms", deadline.as_millis()),
                    )
                }
            };
            (kind, partial)
        });
    }

    let mut results = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((kind, partial)) => {
                results.insert(kind, partial);
            }
            Err(err) => warn!(error = %err, "analyzer supervisor task failed"),
        }
    }

    for analyzer in analyzers {
        let kind = analyzer.kind();
        results
            .entry(kind)
            .or_insert_with(|| PartialScore::degraded(kind, analyzer.max_score(), "no result"));
    }
    results
}
