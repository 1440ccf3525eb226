//! IAM-005: console-user-without-mfa

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct ConsoleUserWithoutMfaRule;

impl Rule for ConsoleUserWithoutMfaRule {
    fn code(&self) -> &'static str {
        codes::CONSOLE_USER_WITHOUT_MFA
    }

    fn name(&self) -> &'static str {
        "console-user-without-mfa"
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn default_severity(&self) -> Severity {
        Severity::High
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::User]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["console_access", "mfa_enabled"]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        _ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        if !resource.require_bool("console_access")? {
            return Ok(Vec::new());
        }
        if resource.require_bool("mfa_enabled")? {
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
                    "User '{}' can sign in to the console without MFA",
                    resource.resource_id
                ),
                "Require an MFA device for every console-enabled user.",
            )
            .with_rationale("password login enabled, no MFA device registered"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(console: bool, mfa: Option<bool>) -> ResourceDescriptor {
        ResourceDescriptor::new(ResourceType::User, "alice")
            .attr("console_access", console)
            .attr_opt("mfa_enabled", mfa)
    }

    #[test]
    fn test_console_without_mfa_is_high() {
        let findings = ConsoleUserWithoutMfaRule
            .check(&user(true, Some(false)), &RuleContext::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_console_with_mfa_is_clean() {
        assert!(
            ConsoleUserWithoutMfaRule
                .check(&user(true, Some(true)), &RuleContext::default())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_api_only_user_ignores_mfa() {
        // No console access: MFA state is irrelevant, even when unknown.
        assert!(
            ConsoleUserWithoutMfaRule
                .check(&user(false, None), &RuleContext::default())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_unknown_mfa_state_skips() {
        assert!(
            ConsoleUserWithoutMfaRule
                .check(&user(true, None), &RuleContext::default())
                .is_err()
        );
    }
}
