//! COST-003: stopped-instance
//!
//! Stopped instances stop compute billing but keep paying for their EBS
//! volumes, addresses, and stale AMIs. Long-stopped instances are usually
//! forgotten.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct StoppedInstanceRule;

impl Rule for StoppedInstanceRule {
    fn code(&self) -> &'static str {
        codes::STOPPED_INSTANCE
    }

    fn name(&self) -> &'static str {
        "stopped-instance"
    }

    fn category(&self) -> Category {
        Category::Cost
    }

    fn default_severity(&self) -> Severity {
        Severity::Medium
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::Instance]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["state"]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        _ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        if resource.require_str("state")? != "stopped" {
            return Ok(Vec::new());
        }

        let mut finding = Finding::new(
            self.code(),
            resource.resource_type,
            resource.resource_id.clone(),
            self.default_severity(),
            self.category(),
            format!(
                "Instance '{}' is stopped but not terminated",
                resource.resource_id
            ),
            "Terminate the instance if it is no longer needed; its storage keeps billing.",
        )
        .with_rationale("instance state is 'stopped'");

        // Storage carry is only priced when the attached volume sizes are known.
        if let Some(storage_cost) = resource.float_opt("stopped_storage_monthly_cost") {
            finding = finding
                .with_rationale(format!(
                    "attached volumes bill ~${:.2}/month while stopped",
                    storage_cost
                ))
                .with_impact(storage_cost);
        }

        Ok(vec![finding])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_instance_with_storage_cost() {
        let instance = ResourceDescriptor::new(ResourceType::Instance, "i-1")
            .attr("state", "stopped")
            .attr("stopped_storage_monthly_cost", 8.0);
        let findings = StoppedInstanceRule
            .check(&instance, &RuleContext::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].estimated_monthly_impact, Some(8.0));
    }

    #[test]
    fn test_stopped_instance_without_known_storage() {
        let instance =
            ResourceDescriptor::new(ResourceType::Instance, "i-1").attr("state", "stopped");
        let findings = StoppedInstanceRule
            .check(&instance, &RuleContext::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].estimated_monthly_impact, None);
    }

    #[test]
    fn test_running_instance_is_clean() {
        let instance =
            ResourceDescriptor::new(ResourceType::Instance, "i-1").attr("state", "running");
        assert!(
            StoppedInstanceRule
                .check(&instance, &RuleContext::default())
                .unwrap()
                .is_empty()
        );
    }
}
