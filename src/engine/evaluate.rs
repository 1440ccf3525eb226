//! Evaluation pass: run every applicable rule against every descriptor.
//!
//! Rules are pure and non-interacting, so the pass fans out across
//! descriptors with rayon; determinism comes from the aggregator's sort,
//! not from evaluation order.

use log::{debug, trace};
use rayon::prelude::*;

use crate::engine::context::{ConfigError, RuleContext};
use crate::engine::descriptor::ResourceDescriptor;
use crate::engine::rules::{Rule, all_rules};
use crate::engine::types::Finding;

/// Raw output of one evaluation pass, before aggregation.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    /// Findings in no particular order.
    pub findings: Vec<Finding>,
    /// Rule executions skipped because a required attribute was absent.
    pub rules_skipped: usize,
}

impl Evaluation {
    fn merge(mut self, other: Evaluation) -> Evaluation {
        self.findings.extend(other.findings);
        self.rules_skipped += other.rules_skipped;
        self
    }
}

/// Evaluate descriptors against the full rule registry.
pub fn evaluate(
    descriptors: &[ResourceDescriptor],
    ctx: &RuleContext,
) -> Result<Evaluation, ConfigError> {
    evaluate_with_rules(descriptors, &all_rules(), ctx)
}

/// Evaluate descriptors against a caller-selected rule set.
///
/// The context is validated up front so a pass never partially executes
/// with bad configuration.
pub fn evaluate_with_rules(
    descriptors: &[ResourceDescriptor],
    rules: &[Box<dyn Rule>],
    ctx: &RuleContext,
) -> Result<Evaluation, ConfigError> {
    ctx.validate()?;

    debug!(
        "evaluating {} descriptors against {} rules",
        descriptors.len(),
        rules.len()
    );

    let evaluation = descriptors
        .par_iter()
        .map(|descriptor| {
            let mut local = Evaluation::default();
            for rule in rules.iter().filter(|r| r.applies_to(descriptor.resource_type)) {
                match rule.check(descriptor, ctx) {
                    Ok(findings) => local.findings.extend(findings),
                    Err(missing) => {
                        trace!(
                            "rule {} skipped {} '{}': {}",
                            rule.code(),
                            descriptor.resource_type,
                            descriptor.resource_id,
                            missing
                        );
                        local.rules_skipped += 1;
                    }
                }
            }
            local
        })
        .reduce(Evaluation::default, Evaluation::merge);

    debug!(
        "pass produced {} findings, {} rule executions skipped",
        evaluation.findings.len(),
        evaluation.rules_skipped
    );
    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::descriptor::{ResourceDescriptor, ResourceType};
    use crate::engine::rules::codes;
    use crate::engine::rules::testutil::{allow, ingress, policy_with_statements, sg_with_ingress};
    use std::collections::BTreeSet;

    fn sample_descriptors() -> Vec<ResourceDescriptor> {
        vec![
            sg_with_ingress("sg-1", vec![ingress("tcp", 22, 22, "0.0.0.0/0")]),
            policy_with_statements("p1", vec![allow(&["*"], &["*"])]),
            ResourceDescriptor::new(ResourceType::Volume, "vol-1")
                .attr("attached", false)
                .attr("size_gb", 100i64)
                .attr("monthly_cost", 10.0),
        ]
    }

    #[test]
    fn test_pass_over_mixed_descriptors() {
        let evaluation = evaluate(&sample_descriptors(), &RuleContext::default()).unwrap();
        let codes_seen: BTreeSet<&str> = evaluation
            .findings
            .iter()
            .map(|f| f.rule_id.as_str())
            .collect();
        assert!(codes_seen.contains(codes::OPEN_SENSITIVE_PORT));
        assert!(codes_seen.contains(codes::ADMIN_POLICY));
        assert!(codes_seen.contains(codes::UNATTACHED_VOLUME));
    }

    #[test]
    fn test_missing_attribute_counts_one_skip() {
        // Bucket without encryption state: S3-003 requires it and must skip.
        let bucket =
            ResourceDescriptor::new(ResourceType::Bucket, "b1").attr("is_public", false);
        let evaluation = evaluate(std::slice::from_ref(&bucket), &RuleContext::default()).unwrap();
        // S3-001 and S3-002 short-circuit on is_public=false; only S3-003
        // actually needs the encryption state here.
        assert_eq!(evaluation.rules_skipped, 1);
        assert!(evaluation.findings.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected_before_pass() {
        let ctx = RuleContext::default().with_idle_cpu_threshold(-5.0);
        assert!(evaluate(&sample_descriptors(), &ctx).is_err());
    }

    #[test]
    fn test_rule_independence() {
        // A subset registry yields the same findings for its rules as the
        // full registry does.
        let ctx = RuleContext::default();
        let descriptors = sample_descriptors();

        let full = evaluate(&descriptors, &ctx).unwrap();
        let subset: Vec<_> = all_rules()
            .into_iter()
            .filter(|r| r.code() == codes::ADMIN_POLICY)
            .collect();
        let alone = evaluate_with_rules(&descriptors, &subset, &ctx).unwrap();

        let mut from_full: Vec<_> = full
            .findings
            .into_iter()
            .filter(|f| f.rule_id.as_str() == codes::ADMIN_POLICY)
            .collect();
        let mut from_subset = alone.findings;
        from_full.sort_by(|a, b| a.resource_id.cmp(&b.resource_id));
        from_subset.sort_by(|a, b| a.resource_id.cmp(&b.resource_id));
        assert_eq!(from_full, from_subset);
    }

    #[test]
    fn test_determinism_across_runs() {
        let ctx = RuleContext::default();
        let descriptors = sample_descriptors();
        let a = evaluate(&descriptors, &ctx).unwrap();
        let b = evaluate(&descriptors, &ctx).unwrap();
        let key = |f: &Finding| (f.rule_id.clone(), f.resource_id.clone());
        let mut ka: Vec<_> = a.findings.iter().map(key).collect();
        let mut kb: Vec<_> = b.findings.iter().map(key).collect();
        ka.sort();
        kb.sort();
        assert_eq!(ka, kb);
        assert_eq!(a.rules_skipped, b.rules_skipped);
    }
}
