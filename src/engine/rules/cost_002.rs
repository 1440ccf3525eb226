//! COST-002: unused-elastic-ip
//!
//! Allocated Elastic IPs bill when not associated with anything.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct UnusedElasticIpRule;

impl Rule for UnusedElasticIpRule {
    fn code(&self) -> &'static str {
        codes::UNUSED_ELASTIC_IP
    }

    fn name(&self) -> &'static str {
        "unused-elastic-ip"
    }

    fn category(&self) -> Category {
        Category::Cost
    }

    fn default_severity(&self) -> Severity {
        Severity::Medium
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::ElasticIp]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["associated"]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        if resource.require_bool("associated")? {
            return Ok(Vec::new());
        }

        Ok(vec![
            Finding::new(
                self.code(),
                resource.resource_type,
                resource.resource_id.clone(),
                self.default_severity(),
                self.category(),
                format!(
                    "Elastic IP '{}' is allocated but unused",
                    resource.resource_id
                ),
                "Release the address or associate it with a running resource.",
            )
            .with_rationale("no association on the allocation")
            .with_impact(ctx.prices.elastic_ip_monthly),
        ])
    }
}
