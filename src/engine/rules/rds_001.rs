//! RDS-001: public-db-instance

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct PublicDbInstanceRule;

impl Rule for PublicDbInstanceRule {
    fn code(&self) -> &'static str {
        codes::PUBLIC_DB_INSTANCE
    }

    fn name(&self) -> &'static str {
        "public-db-instance"
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn default_severity(&self) -> Severity {
        Severity::High
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::RdsInstance]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["publicly_accessible"]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        _ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        if !resource.require_bool("publicly_accessible")? {
            return Ok(Vec::new());
        }

        let mut finding = Finding::new(
            self.code(),
            resource.resource_type,
            resource.resource_id.clone(),
            self.default_severity(),
            self.category(),
            format!(
                "Database instance '{}' is publicly accessible",
                resource.resource_id
            ),
            "Disable public accessibility and reach the database through the VPC.",
        )
        .with_rationale("PubliclyAccessible is enabled");
        if let Some(engine) = resource.str_opt("engine") {
            finding = finding.with_rationale(format!("engine: {}", engine));
        }
        Ok(vec![finding])
    }
}
