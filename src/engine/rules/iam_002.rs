//! IAM-002: wildcard-action
//!
//! An allow statement with Action "*" scoped to specific resources.
//! Full admin statements are IAM-001's concern.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct WildcardActionRule;

impl Rule for WildcardActionRule {
    fn code(&self) -> &'static str {
        codes::WILDCARD_ACTION
    }

    fn name(&self) -> &'static str {
        "wildcard-action"
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn default_severity(&self) -> Severity {
        Severity::High
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
            .filter(|s| s.is_allow() && s.has_wildcard_action() && !s.has_wildcard_resource())
            .map(|s| format!("Action \"*\" allowed on {}", s.resources.join(", ")))
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
            format!("Policy '{}' allows every action", resource.resource_id),
            "Enumerate the actions the workload actually performs instead of Action \"*\".",
        );
        for fact in matched {
            finding = finding.with_rationale(fact);
        }
        Ok(vec![finding])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rules::testutil::{allow, policy_with_statements};

    #[test]
    fn test_wildcard_action_scoped_resource_is_high() {
        let policy = policy_with_statements(
            "p1",
            vec![allow(&["*"], &["arn:aws:s3:::my-bucket/*"])],
        );
        let findings = WildcardActionRule
            .check(&policy, &RuleContext::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_admin_statement_not_reported_here() {
        let policy = policy_with_statements("p1", vec![allow(&["*"], &["*"])]);
        assert!(
            WildcardActionRule
                .check(&policy, &RuleContext::default())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_service_wildcard_is_not_action_wildcard() {
        let policy = policy_with_statements("p1", vec![allow(&["ec2:*"], &["arn:aws:ec2:*"])]);
        assert!(
            WildcardActionRule
                .check(&policy, &RuleContext::default())
                .unwrap()
                .is_empty()
        );
    }
}
