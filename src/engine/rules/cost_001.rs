//! COST-001: unattached-volume
//!
//! EBS volumes in the `available` state bill for storage with nothing
//! using them.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct UnattachedVolumeRule;

impl Rule for UnattachedVolumeRule {
    fn code(&self) -> &'static str {
        codes::UNATTACHED_VOLUME
    }

    fn name(&self) -> &'static str {
        "unattached-volume"
    }

    fn category(&self) -> Category {
        Category::Cost
    }

    fn default_severity(&self) -> Severity {
        Severity::Medium
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::Volume]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["attached", "size_gb", "monthly_cost"]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        _ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        if resource.require_bool("attached")? {
            return Ok(Vec::new());
        }
        let size_gb = resource.require_int("size_gb")?;
        let monthly_cost = resource.require_float("monthly_cost")?;

        Ok(vec![
            Finding::new(
                self.code(),
                resource.resource_type,
                resource.resource_id.clone(),
                self.default_severity(),
                self.category(),
                format!(
                    "Volume '{}' is not attached to any instance",
                    resource.resource_id
                ),
                "Snapshot the volume if its data matters, then delete it.",
            )
            .with_rationale(format!("{} GB billing while unattached", size_gb))
            .with_impact(monthly_cost),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(attached: bool) -> ResourceDescriptor {
        ResourceDescriptor::new(ResourceType::Volume, "vol-1")
            .attr("attached", attached)
            .attr("size_gb", 100i64)
            .attr("monthly_cost", 10.0)
    }

    #[test]
    fn test_unattached_volume_priced() {
        let findings = UnattachedVolumeRule
            .check(&volume(false), &RuleContext::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[0].estimated_monthly_impact, Some(10.0));
    }

    #[test]
    fn test_attached_volume_is_clean() {
        assert!(
            UnattachedVolumeRule
                .check(&volume(true), &RuleContext::default())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_unknown_size_skips() {
        let v = ResourceDescriptor::new(ResourceType::Volume, "vol-1").attr("attached", false);
        assert!(UnattachedVolumeRule.check(&v, &RuleContext::default()).is_err());
    }
}
