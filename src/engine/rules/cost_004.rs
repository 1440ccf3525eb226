//! COST-004: orphaned-snapshot
//!
//! Old snapshots whose source volume is gone. Nothing will ever be
//! restored from most of them.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct OrphanedSnapshotRule;

impl Rule for OrphanedSnapshotRule {
    fn code(&self) -> &'static str {
        codes::ORPHANED_SNAPSHOT
    }

    fn name(&self) -> &'static str {
        "orphaned-snapshot"
    }

    fn category(&self) -> Category {
        Category::Cost
    }

    fn default_severity(&self) -> Severity {
        Severity::Medium
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::Snapshot]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["age_days", "has_parent_volume", "monthly_cost"]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        let age_days = resource.require_int("age_days")?;
        if age_days <= ctx.max_snapshot_age_days {
            return Ok(Vec::new());
        }
        if resource.require_bool("has_parent_volume")? {
            return Ok(Vec::new());
        }
        let monthly_cost = resource.require_float("monthly_cost")?;

        Ok(vec![
            Finding::new(
                self.code(),
                resource.resource_type,
                resource.resource_id.clone(),
                self.default_severity(),
                self.category(),
                format!(
                    "Snapshot '{}' is old and its source volume is gone",
                    resource.resource_id
                ),
                "Delete the snapshot or archive it to cold storage if retention requires it.",
            )
            .with_rationale(format!("{} days old with no parent volume", age_days))
            .with_impact(monthly_cost),
        ])
    }
}
