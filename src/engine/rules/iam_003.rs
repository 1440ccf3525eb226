//! IAM-003: wildcard-resource
//!
//! An allow statement applying specific actions to Resource "*".

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct WildcardResourceRule;

impl Rule for WildcardResourceRule {
    fn code(&self) -> &'static str {
        codes::WILDCARD_RESOURCE
    }

    fn name(&self) -> &'static str {
        "wildcard-resource"
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn default_severity(&self) -> Severity {
        Severity::Medium
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

        let matched: Vec<String> = statements
            .iter()
            .filter(|s| s.is_allow() && s.has_wildcard_resource() && !s.has_wildcard_action())
            .map(|s| format!("{} allowed on Resource \"*\"", s.actions.join(", ")))
            .collect();

        if matched.is_empty() {
            return Ok(Vec::new());
        }

        let mut finding = Finding::new(
            self.code(),
            resource.resource_type,
            resource.resource_id.clone(),
            self.default_severity(),
            self.category(),
            format!(
                "Policy '{}' applies to every resource",
                resource.resource_id
            ),
            "Pin the statement to the ARNs the workload touches instead of Resource \"*\".",
        );
        for fact in matched {
            finding = finding.with_rationale(fact);
        }
        Ok(vec![finding])
    }
}
