//! IAM-006: stale-access-key
//!
//! Access keys that have outlived the rotation window.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct StaleAccessKeyRule;

impl Rule for StaleAccessKeyRule {
    fn code(&self) -> &'static str {
        codes::STALE_ACCESS_KEY
    }

    fn name(&self) -> &'static str {
        "stale-access-key"
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn default_severity(&self) -> Severity {
        Severity::Medium
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::User]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["has_access_keys", "oldest_key_age_days", "oldest_key_id"]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        if !resource.require_bool("has_access_keys")? {
            return Ok(Vec::new());
        }
        let age_days = resource.require_int("oldest_key_age_days")?;
        if age_days <= ctx.max_key_age_days {
            return Ok(Vec::new());
        }
        let key_id = resource.require_str("oldest_key_id")?;

        Ok(vec![
            Finding::new(
                self.code(),
                resource.resource_type,
                resource.resource_id.clone(),
                self.default_severity(),
                self.category(),
                format!(
                    "User '{}' has an access key overdue for rotation",
                    resource.resource_id
                ),
                format!(
                    "Rotate access keys at least every {} days.",
                    ctx.max_key_age_days
                ),
            )
            .with_rationale(format!("key {} is {} days old", key_id, age_days)),
        ])
    }
}
