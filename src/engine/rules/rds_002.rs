//! RDS-002: unencrypted-db-storage

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct UnencryptedDbStorageRule;

impl Rule for UnencryptedDbStorageRule {
    fn code(&self) -> &'static str {
        codes::UNENCRYPTED_DB_STORAGE
    }

    fn name(&self) -> &'static str {
        "unencrypted-db-storage"
    }

    fn category(&self) -> Category {
        Category::Compliance
    }

    fn default_severity(&self) -> Severity {
        Severity::Medium
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::RdsInstance]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["storage_encrypted"]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        _ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        if resource.require_bool("storage_encrypted")? {
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
                    "Database instance '{}' stores data unencrypted",
                    resource.resource_id
                ),
                "Recreate the instance from an encrypted snapshot; encryption cannot be enabled in place.",
            )
            .with_rationale("StorageEncrypted is disabled"),
        ])
    }
}
