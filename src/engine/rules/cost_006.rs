//! COST-006: missing-cost-tags
//!
//! Taggable resources missing the required cost-allocation tags. Inert
//! unless the context lists required tags.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct MissingCostTagsRule;

impl Rule for MissingCostTagsRule {
    fn code(&self) -> &'static str {
        codes::MISSING_COST_TAGS
    }

    fn name(&self) -> &'static str {
        "missing-cost-tags"
    }

    fn category(&self) -> Category {
        Category::Cost
    }

    fn default_severity(&self) -> Severity {
        Severity::Low
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[
            ResourceType::Instance,
            ResourceType::Volume,
            ResourceType::Bucket,
            ResourceType::RdsInstance,
        ]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &[]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        let missing: Vec<&str> = ctx
            .required_tags
            .iter()
            .filter(|t| !resource.tags.contains_key(*t))
            .map(String::as_str)
            .collect();

        if missing.is_empty() {
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
                    "{} '{}' lacks cost-allocation tags",
                    resource.resource_type, resource.resource_id
                ),
                "Tag the resource so its spend can be attributed.",
            )
            .with_rationale(format!("missing tags: {}", missing.join(", "))),
        ])
    }
}
