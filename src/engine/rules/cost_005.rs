//! COST-005: idle-instance
//!
//! Running instances whose average CPU over the lookback window sits below
//! the idle threshold. Deep idle (below half the threshold) escalates the
//! severity, so lower utilization never produces a milder verdict.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct IdleInstanceRule;

impl Rule for IdleInstanceRule {
    fn code(&self) -> &'static str {
        codes::IDLE_INSTANCE
    }

    fn name(&self) -> &'static str {
        "idle-instance"
    }

    fn category(&self) -> Category {
        Category::Cost
    }

    fn default_severity(&self) -> Severity {
        Severity::Low
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::Instance]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["state", "cpu_avg", "monthly_cost"]
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
        if cpu_avg >= ctx.idle_cpu_threshold {
            return Ok(Vec::new());
        }
        let monthly_cost = resource.require_float("monthly_cost")?;

        let severity = if cpu_avg < ctx.idle_cpu_threshold / 2.0 {
            Severity::Medium
        } else {
            Severity::Low
        };

        let mut finding = Finding::new(
            self.code(),
            resource.resource_type,
            resource.resource_id.clone(),
            severity,
            self.category(),
            format!("Instance '{}' is idle", resource.resource_id),
            "Downsize the instance class or terminate the instance.",
        )
        .with_rationale(format!(
            "average CPU {:.1}% is below the {:.1}% idle threshold",
            cpu_avg, ctx.idle_cpu_threshold
        ))
        .with_impact(monthly_cost);
        if let Some(instance_type) = resource.str_opt("instance_type") {
            finding = finding.with_rationale(format!("instance class: {}", instance_type));
        }
        Ok(vec![finding])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(state: &str, cpu_avg: f64) -> ResourceDescriptor {
        ResourceDescriptor::new(ResourceType::Instance, "i-1")
            .attr("state", state)
            .attr("cpu_avg", cpu_avg)
            .attr("monthly_cost", 70.08)
            .attr("instance_type", "m5.large")
    }

    #[test]
    fn test_idle_instance_is_low_with_full_cost() {
        let findings = IdleInstanceRule
            .check(&instance("running", 4.0), &RuleContext::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Low);
        assert_eq!(findings[0].estimated_monthly_impact, Some(70.08));
    }

    #[test]
    fn test_deep_idle_escalates_to_medium() {
        let findings = IdleInstanceRule
            .check(&instance("running", 2.0), &RuleContext::default())
            .unwrap();
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_busy_instance_is_clean() {
        assert!(
            IdleInstanceRule
                .check(&instance("running", 6.0), &RuleContext::default())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_severity_monotonic_as_cpu_drops() {
        let ctx = RuleContext::default();
        let mut last = Severity::Low;
        for cpu in [4.9, 3.0, 2.4, 1.0, 0.1] {
            let findings = IdleInstanceRule.check(&instance("running", cpu), &ctx).unwrap();
            assert!(findings[0].severity >= last);
            last = findings[0].severity;
        }
    }

    #[test]
    fn test_stopped_instance_not_idle() {
        assert!(
            IdleInstanceRule
                .check(&instance("stopped", 0.0), &RuleContext::default())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_missing_metrics_skip() {
        let no_metrics = ResourceDescriptor::new(ResourceType::Instance, "i-1")
            .attr("state", "running")
            .attr("monthly_cost", 70.08);
        assert!(
            IdleInstanceRule
                .check(&no_metrics, &RuleContext::default())
                .is_err()
        );
    }
}
