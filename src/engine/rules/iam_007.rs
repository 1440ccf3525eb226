//! IAM-007: root-access-key

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct RootAccessKeyRule;

impl Rule for RootAccessKeyRule {
    fn code(&self) -> &'static str {
        codes::ROOT_ACCESS_KEY
    }

    fn name(&self) -> &'static str {
        "root-access-key"
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn default_severity(&self) -> Severity {
        Severity::Critical
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::Account]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["root_access_key_present"]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        _ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        if !resource.require_bool("root_access_key_present")? {
            return Ok(Vec::new());
        }

        Ok(vec![
            Finding::new(
                self.code(),
                resource.resource_type,
                resource.resource_id.clone(),
                self.default_severity(),
                self.category(),
                "Root account has active access keys",
                "Delete the root access keys and use IAM roles for programmatic access.",
            )
            .with_rationale("programmatic credentials exist for the root account"),
        ])
    }
}
