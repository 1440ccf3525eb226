//! IAM-001: admin-policy
//!
//! A policy statement granting every action on every resource.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct AdminPolicyRule;

impl Rule for AdminPolicyRule {
    fn code(&self) -> &'static str {
        codes::ADMIN_POLICY
    }

    fn name(&self) -> &'static str {
        "admin-policy"
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn default_severity(&self) -> Severity {
        Severity::Critical
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::Policy]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["statements"]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        _ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        let statements = resource.require_statements("statements")?;

        if !statements.iter().any(|s| s.is_admin()) {
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
                    "Policy '{}' grants full administrative access",
                    resource.resource_id
                ),
                "Scope the policy to the specific actions and resources the workload needs.",
            )
            .with_rationale("statement allows Action \"*\" on Resource \"*\""),
        ])
    }
}
