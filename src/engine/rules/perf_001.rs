//! PERF-001: overloaded-instance
//!
//! Sustained high average CPU over the lookback window. The inverse of
//! COST-005, used mainly by the diagnose flow.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct OverloadedInstanceRule;

impl Rule for OverloadedInstanceRule {
    fn code(&self) -> &'static str {
        codes::OVERLOADED_INSTANCE
    }

    fn name(&self) -> &'static str {
        "overloaded-instance"
    }

    fn category(&self) -> Category {
        Category::Performance
    }

    fn default_severity(&self) -> Severity {
        Severity::Medium
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::Instance]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["state", "cpu_avg"]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        if resource.require_str("state")? != "running" {
            return Ok(Vec::new());
        }
        let cpu_avg = resource.require_float("cpu_avg")?;
        if cpu_avg <= ctx.high_cpu_threshold {
            return Ok(Vec::new());
        }

        let mut finding = Finding::new(
            self.code(),
            resource.resource_type,
            resource.resource_id.clone(),
            self.default_severity(),
            self.category(),
            format!(
                "Instance '{}' is running at sustained high CPU",
                resource.resource_id
            ),
            "Move to a larger instance class or scale the workload out.",
        )
        .with_rationale(format!(
            "average CPU {:.1}% exceeds the {:.1}% threshold",
            cpu_avg, ctx.high_cpu_threshold
        ));
        if let Some(cpu_max) = resource.float_opt("cpu_max") {
            finding = finding.with_rationale(format!("peak CPU {:.1}%", cpu_max));
        }
        Ok(vec![finding])
    }
}
