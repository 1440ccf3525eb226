//! S3-002: public-bucket
//!
//! Publicly reachable bucket with default encryption enabled. Encryption at
//! rest does not protect objects served to anonymous readers.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct PublicBucketRule;

impl Rule for PublicBucketRule {
    fn code(&self) -> &'static str {
        codes::PUBLIC_BUCKET
    }

    fn name(&self) -> &'static str {
        "public-bucket"
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn default_severity(&self) -> Severity {
        Severity::High
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::Bucket]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["is_public", "encryption_enabled"]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        _ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        if !resource.require_bool("is_public")? {
            return Ok(Vec::new());
        }
        if !resource.require_bool("encryption_enabled")? {
            return Ok(Vec::new()); // S3-001
        }

        Ok(vec![
            Finding::new(
                self.code(),
                resource.resource_type,
                resource.resource_id.clone(),
                self.default_severity(),
                self.category(),
                format!("Bucket '{}' is publicly accessible", resource.resource_id),
                "Enable the public access block unless the bucket intentionally serves public content.",
            )
            .with_rationale("bucket grants public read access"),
        ])
    }
}
