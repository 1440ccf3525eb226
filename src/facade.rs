//! Orchestration facade: snapshot in, sorted report out.
//!
//! Each entry point is normalize -> evaluate -> aggregate with a different
//! rule or descriptor selection. All of them validate the context up front
//! and never talk to the network.

use log::info;

use crate::engine::aggregate::{Report, aggregate, merge};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{ResourceDescriptor, ResourceType};
use crate::engine::evaluate::evaluate_with_rules;
use crate::engine::rules::{all_rules, rules_in_categories};
use crate::engine::types::Category;
use crate::error::{CloudAuditError, Result};
use crate::normalize::{AccountSnapshot, normalize_snapshot};

/// Diagnose targets and the resource types each one covers.
const TARGETS: &[(&str, &[ResourceType])] = &[
    ("ec2", &[ResourceType::Instance, ResourceType::SecurityGroup]),
    ("s3", &[ResourceType::Bucket]),
    (
        "iam",
        &[
            ResourceType::User,
            ResourceType::Role,
            ResourceType::Policy,
            ResourceType::Account,
        ],
    ),
    (
        "network",
        &[
            ResourceType::SecurityGroup,
            ResourceType::ElasticIp,
            ResourceType::NatGateway,
        ],
    ),
    ("storage", &[ResourceType::Volume, ResourceType::Snapshot]),
    ("rds", &[ResourceType::RdsInstance]),
];

fn run_pass(
    descriptors: &[ResourceDescriptor],
    categories: &[Category],
    ctx: &RuleContext,
) -> Result<Report> {
    let rules = rules_in_categories(categories);
    let evaluation = evaluate_with_rules(descriptors, &rules, ctx)?;
    Ok(aggregate(evaluation, ctx))
}

/// Run the security and compliance rules over the whole snapshot.
pub fn audit_security(snapshot: &AccountSnapshot, ctx: &RuleContext) -> Result<Report> {
    ctx.validate()?;
    let descriptors = normalize_snapshot(snapshot, ctx);
    info!("security audit over {} resources", descriptors.len());
    run_pass(
        &descriptors,
        &[Category::Security, Category::Compliance],
        ctx,
    )
}

/// Run the cost rules over the whole snapshot.
pub fn optimize_costs(snapshot: &AccountSnapshot, ctx: &RuleContext) -> Result<Report> {
    ctx.validate()?;
    let descriptors = normalize_snapshot(snapshot, ctx);
    info!("cost pass over {} resources", descriptors.len());
    run_pass(&descriptors, &[Category::Cost], ctx)
}

/// Run every rule category against the resources behind one diagnose target.
///
/// An unknown target is an error, never a silently empty report.
pub fn diagnose_issue(
    snapshot: &AccountSnapshot,
    target: &str,
    ctx: &RuleContext,
) -> Result<Report> {
    ctx.validate()?;
    let types = TARGETS
        .iter()
        .find(|(name, _)| *name == target)
        .map(|(_, types)| *types)
        .ok_or_else(|| CloudAuditError::UnsupportedResourceType {
            requested: target.to_string(),
            supported: supported_targets().join(", "),
        })?;

    let descriptors: Vec<ResourceDescriptor> = normalize_snapshot(snapshot, ctx)
        .into_iter()
        .filter(|d| types.contains(&d.resource_type))
        .collect();
    info!(
        "diagnosing target '{}' over {} resources",
        target,
        descriptors.len()
    );
    let evaluation = evaluate_with_rules(&descriptors, &all_rules(), ctx)?;
    Ok(aggregate(evaluation, ctx))
}

/// Full account overview: the security and cost passes merged into one
/// report. Merging recomputes the summary, so nothing is counted twice.
pub fn account_overview(snapshot: &AccountSnapshot, ctx: &RuleContext) -> Result<Report> {
    let security = audit_security(snapshot, ctx)?;
    let costs = optimize_costs(snapshot, ctx)?;
    Ok(merge(vec![security, costs], ctx))
}

/// Names accepted by `diagnose_issue`.
pub fn supported_targets() -> Vec<&'static str> {
    TARGETS.iter().map(|(name, _)| *name).collect()
}
