//! IAM-004: privilege-escalation
//!
//! Permission combinations that let a principal raise its own privileges.
//! The catalog follows the widely published IAM escalation paths; matching
//! is wildcard-aware, so `iam:*` grants count.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, PolicyStatement, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

/// A known escalation path: the description and the actions that, granted
/// together, enable it.
struct EscalationPath {
    description: &'static str,
    actions: &'static [&'static str],
}

const ESCALATION_PATHS: &[EscalationPath] = &[
    EscalationPath {
        description: "create a new version of any policy",
        actions: &["iam:CreatePolicyVersion"],
    },
    EscalationPath {
        description: "activate an older, broader policy version",
        actions: &["iam:SetDefaultPolicyVersion"],
    },
    EscalationPath {
        description: "launch an instance with a privileged role attached",
        actions: &["iam:PassRole", "ec2:RunInstances"],
    },
    EscalationPath {
        description: "create and invoke a Lambda function with a privileged role",
        actions: &["iam:PassRole", "lambda:CreateFunction", "lambda:InvokeFunction"],
    },
    EscalationPath {
        description: "mint access keys for other principals",
        actions: &["iam:CreateAccessKey"],
    },
    EscalationPath {
        description: "create console profiles for other users",
        actions: &["iam:CreateLoginProfile"],
    },
    EscalationPath {
        description: "reset other users' console passwords",
        actions: &["iam:UpdateLoginProfile"],
    },
    EscalationPath {
        description: "attach managed policies to users",
        actions: &["iam:AttachUserPolicy"],
    },
    EscalationPath {
        description: "attach managed policies to roles",
        actions: &["iam:AttachRolePolicy"],
    },
    EscalationPath {
        description: "write inline policies for users",
        actions: &["iam:PutUserPolicy"],
    },
    EscalationPath {
        description: "rewrite a role's trust policy and assume it",
        actions: &["iam:UpdateAssumeRolePolicy", "sts:AssumeRole"],
    },
];

fn grants_all(statements: &[PolicyStatement], actions: &[&str]) -> bool {
    actions
        .iter()
        .all(|a| statements.iter().any(|s| s.grants_action(a)))
}

pub struct PrivilegeEscalationRule;

impl Rule for PrivilegeEscalationRule {
    fn code(&self) -> &'static str {
        codes::PRIVILEGE_ESCALATION
    }

    fn name(&self) -> &'static str {
        "privilege-escalation"
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

        // Full-admin policies are IAM-001's concern; every path would match.
        if statements.iter().any(|s| s.is_admin()) {
            return Ok(Vec::new());
        }

        let matched: Vec<String> = ESCALATION_PATHS
            .iter()
            .filter(|path| grants_all(statements, path.actions))
            .map(|path| format!("{} ({})", path.description, path.actions.join(" + ")))
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
                "Policy '{}' permits privilege escalation",
                resource.resource_id
            ),
            "Remove or condition the escalation-capable permissions; scope iam:* grants to specific principals.",
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
    fn test_passrole_plus_lambda_is_critical() {
        let policy = policy_with_statements(
            "p1",
            vec![allow(
                &["iam:PassRole", "lambda:CreateFunction", "lambda:InvokeFunction"],
                &["*"],
            )],
        );
        let findings = PrivilegeEscalationRule
            .check(&policy, &RuleContext::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert!(findings[0].rationale[0].contains("Lambda"));
    }

    #[test]
    fn test_passrole_alone_is_clean() {
        let policy = policy_with_statements("p1", vec![allow(&["iam:PassRole"], &["*"])]);
        assert!(
            PrivilegeEscalationRule
                .check(&policy, &RuleContext::default())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_combination_across_statements() {
        let policy = policy_with_statements(
            "p1",
            vec![
                allow(&["iam:UpdateAssumeRolePolicy"], &["*"]),
                allow(&["sts:AssumeRole"], &["*"]),
            ],
        );
        let findings = PrivilegeEscalationRule
            .check(&policy, &RuleContext::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_service_wildcard_counts() {
        let policy = policy_with_statements("p1", vec![allow(&["iam:*"], &["*"])]);
        let findings = PrivilegeEscalationRule
            .check(&policy, &RuleContext::default())
            .unwrap();
        // iam:* alone enables several paths.
        assert_eq!(findings.len(), 1);
        assert!(findings[0].rationale.len() >= 5);
    }

    #[test]
    fn test_admin_policy_deferred_to_iam001() {
        let policy = policy_with_statements("p1", vec![allow(&["*"], &["*"])]);
        assert!(
            PrivilegeEscalationRule
                .check(&policy, &RuleContext::default())
                .unwrap()
                .is_empty()
        );
    }
}
