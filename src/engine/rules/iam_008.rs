//! IAM-008: open-trust-policy
//!
//! A role whose trust policy lets any principal assume it.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct OpenTrustPolicyRule;

impl Rule for OpenTrustPolicyRule {
    fn code(&self) -> &'static str {
        codes::OPEN_TRUST_POLICY
    }

    fn name(&self) -> &'static str {
        "open-trust-policy"
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn default_severity(&self) -> Severity {
        Severity::High
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::Role]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["trust_open_to_world"]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        _ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        if !resource.require_bool("trust_open_to_world")? {
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
                    "Role '{}' can be assumed by any principal",
                    resource.resource_id
                ),
                "Pin the trust policy to specific account or service principals and add conditions.",
            )
            .with_rationale("trust policy allows sts:AssumeRole with Principal \"*\" and no condition"),
        ])
    }
}
