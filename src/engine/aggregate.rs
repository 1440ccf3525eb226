//! Turn a raw finding sequence into a sorted, summarized report.
//!
//! The aggregator is a pure function of its input: aggregating twice on
//! identical findings yields identical reports, and re-feeding a report's
//! findings reproduces it.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::engine::context::RuleContext;
use crate::engine::evaluate::Evaluation;
use crate::engine::types::{Category, Finding, Severity, round_cost};

/// Counts and totals recomputed from the finding set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total_findings: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_category: BTreeMap<Category, usize>,
    /// Sum of all present impact estimates, rounded to cents.
    pub total_monthly_impact: f64,
    /// Monthly impact times twelve.
    pub total_annual_impact: f64,
    /// Rule executions skipped for missing attributes (observability, not
    /// a failure).
    pub rules_skipped: usize,
}

/// The aggregated result of one orchestration call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Findings sorted by severity, then impact, then rule and resource id.
    pub findings: Vec<Finding>,
    pub summary: Summary,
    /// Highest-severity distinct recommendations, capped.
    pub top_recommendations: Vec<String>,
}

/// Total order used for report findings: severity descending, impact
/// descending with absent impact after present, then rule and resource id
/// ascending for determinism.
fn compare(a: &Finding, b: &Finding) -> Ordering {
    b.severity
        .cmp(&a.severity)
        .then_with(|| match (a.estimated_monthly_impact, b.estimated_monthly_impact) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.rule_id.cmp(&b.rule_id))
        .then_with(|| a.resource_id.cmp(&b.resource_id))
}

/// Drop exact `(rule_id, resource_id)` duplicates, keeping the first.
/// Findings from different rules on the same resource are all retained.
fn dedup(findings: Vec<Finding>) -> Vec<Finding> {
    let mut seen = HashSet::new();
    findings
        .into_iter()
        .filter(|f| seen.insert((f.rule_id.clone(), f.resource_id.clone())))
        .collect()
}

fn summarize(findings: &[Finding], rules_skipped: usize) -> Summary {
    let mut by_severity: BTreeMap<Severity, usize> = BTreeMap::new();
    let mut by_category: BTreeMap<Category, usize> = BTreeMap::new();
    let mut total_monthly = 0.0;
    for finding in findings {
        *by_severity.entry(finding.severity).or_default() += 1;
        *by_category.entry(finding.category).or_default() += 1;
        if let Some(impact) = finding.estimated_monthly_impact {
            total_monthly += impact;
        }
    }
    Summary {
        total_findings: findings.len(),
        by_severity,
        by_category,
        total_monthly_impact: round_cost(total_monthly),
        total_annual_impact: round_cost(total_monthly * 12.0),
        rules_skipped,
    }
}

/// First distinct recommendation texts in sorted order; since the findings
/// are already severity-ordered, each text is represented by its
/// highest-severity occurrence.
fn top_recommendations(findings: &[Finding], cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    findings
        .iter()
        .filter(|f| seen.insert(f.recommendation.clone()))
        .take(cap)
        .map(|f| f.recommendation.clone())
        .collect()
}

/// Aggregate one evaluation pass into a report.
pub fn aggregate(evaluation: Evaluation, ctx: &RuleContext) -> Report {
    let mut findings = dedup(evaluation.findings);
    findings.sort_by(compare);
    let summary = summarize(&findings, evaluation.rules_skipped);
    let top = top_recommendations(&findings, ctx.max_recommendations);
    Report {
        findings,
        summary,
        top_recommendations: top,
    }
}

/// Merge reports from several category passes.
///
/// Summary statistics are recomputed from the merged finding set rather
/// than summed, so a resource that appears in two passes is never counted
/// twice. Skip counts, which track rule executions rather than findings,
/// are summed.
pub fn merge(reports: Vec<Report>, ctx: &RuleContext) -> Report {
    let mut findings = Vec::new();
    let mut rules_skipped = 0;
    for report in reports {
        findings.extend(report.findings);
        rules_skipped += report.summary.rules_skipped;
    }
    aggregate(
        Evaluation {
            findings,
            rules_skipped,
        },
        ctx,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::descriptor::ResourceType;

    fn finding(rule: &str, resource: &str, severity: Severity, impact: Option<f64>) -> Finding {
        let mut f = Finding::new(
            rule,
            ResourceType::Instance,
            resource,
            severity,
            Category::Security,
            format!("title {}", rule),
            format!("recommendation {}", rule),
        );
        f.estimated_monthly_impact = impact;
        f
    }

    fn evaluation(findings: Vec<Finding>) -> Evaluation {
        Evaluation {
            findings,
            rules_skipped: 0,
        }
    }

    #[test]
    fn test_sort_severity_then_impact() {
        let report = aggregate(
            evaluation(vec![
                finding("R-3", "a", Severity::Medium, Some(50.0)),
                finding("R-1", "a", Severity::Critical, None),
                finding("R-2", "a", Severity::Medium, Some(80.0)),
                finding("R-4", "a", Severity::Medium, None),
            ]),
            &RuleContext::default(),
        );
        let order: Vec<&str> = report.findings.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(order, vec!["R-1", "R-2", "R-3", "R-4"]);
    }

    #[test]
    fn test_tie_broken_by_rule_id_then_resource() {
        let report = aggregate(
            evaluation(vec![
                finding("R-2", "a", Severity::High, None),
                finding("R-1", "b", Severity::High, None),
                finding("R-1", "a", Severity::High, None),
            ]),
            &RuleContext::default(),
        );
        let order: Vec<(&str, &str)> = report
            .findings
            .iter()
            .map(|f| (f.rule_id.as_str(), f.resource_id.as_str()))
            .collect();
        assert_eq!(order, vec![("R-1", "a"), ("R-1", "b"), ("R-2", "a")]);
    }

    #[test]
    fn test_exact_duplicates_suppressed_others_retained() {
        let report = aggregate(
            evaluation(vec![
                finding("R-1", "a", Severity::High, None),
                finding("R-1", "a", Severity::High, None),
                finding("R-2", "a", Severity::High, None),
            ]),
            &RuleContext::default(),
        );
        assert_eq!(report.findings.len(), 2);
    }

    #[test]
    fn test_summary_counts_and_totals() {
        let report = aggregate(
            evaluation(vec![
                finding("R-1", "a", Severity::Critical, Some(10.0)),
                finding("R-2", "b", Severity::Medium, Some(2.5)),
                finding("R-3", "c", Severity::Medium, None),
            ]),
            &RuleContext::default(),
        );
        assert_eq!(report.summary.total_findings, 3);
        assert_eq!(report.summary.by_severity[&Severity::Critical], 1);
        assert_eq!(report.summary.by_severity[&Severity::Medium], 2);
        assert_eq!(report.summary.total_monthly_impact, 12.5);
        assert_eq!(report.summary.total_annual_impact, 150.0);
    }

    #[test]
    fn test_aggregate_idempotent() {
        let ctx = RuleContext::default();
        let first = aggregate(
            evaluation(vec![
                finding("R-2", "b", Severity::Low, Some(3.0)),
                finding("R-1", "a", Severity::Critical, None),
                finding("R-3", "c", Severity::High, Some(12.0)),
            ]),
            &ctx,
        );
        let second = aggregate(
            Evaluation {
                findings: first.findings.clone(),
                rules_skipped: first.summary.rules_skipped,
            },
            &ctx,
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_top_recommendations_deduped_and_capped() {
        let ctx = RuleContext::default().with_max_recommendations(2);
        let mut findings = vec![
            finding("R-1", "a", Severity::Critical, None),
            finding("R-1", "b", Severity::Critical, None), // same recommendation text
            finding("R-2", "c", Severity::High, None),
            finding("R-3", "d", Severity::Low, None),
        ];
        findings[1].recommendation = "recommendation R-1".to_string();
        let report = aggregate(evaluation(findings), &ctx);
        assert_eq!(
            report.top_recommendations,
            vec!["recommendation R-1", "recommendation R-2"]
        );
    }

    #[test]
    fn test_merge_recomputes_instead_of_summing() {
        let ctx = RuleContext::default();
        // The same finding lands in both category passes.
        let shared = finding("R-1", "a", Severity::High, Some(5.0));
        let left = aggregate(evaluation(vec![shared.clone()]), &ctx);
        let right = aggregate(evaluation(vec![shared]), &ctx);
        let merged = merge(vec![left, right], &ctx);
        assert_eq!(merged.summary.total_findings, 1);
        assert_eq!(merged.summary.total_monthly_impact, 5.0);
    }

    #[test]
    fn test_merge_sums_skip_counts() {
        let ctx = RuleContext::default();
        let mut left = aggregate(evaluation(vec![]), &ctx);
        left.summary.rules_skipped = 2;
        let mut right = aggregate(evaluation(vec![]), &ctx);
        right.summary.rules_skipped = 3;
        let merged = merge(vec![left, right], &ctx);
        assert_eq!(merged.summary.rules_skipped, 5);
    }

    #[test]
    fn test_ordering_invariant_holds() {
        let report = aggregate(
            evaluation(vec![
                finding("R-5", "e", Severity::Low, Some(1.0)),
                finding("R-4", "d", Severity::High, Some(9.0)),
                finding("R-3", "c", Severity::High, Some(90.0)),
                finding("R-2", "b", Severity::Critical, None),
                finding("R-1", "a", Severity::Medium, None),
            ]),
            &RuleContext::default(),
        );
        for pair in report.findings.windows(2) {
            assert!(pair[0].severity >= pair[1].severity);
            if pair[0].severity == pair[1].severity {
                let x = pair[0].estimated_monthly_impact.unwrap_or(f64::NEG_INFINITY);
                let y = pair[1].estimated_monthly_impact.unwrap_or(f64::NEG_INFINITY);
                assert!(x >= y);
            }
        }
    }
}
