//! S3-003: unencrypted-bucket
//!
//! Default encryption disabled on a private bucket. Baseline-compliance
//! finding rather than an exposure.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct UnencryptedBucketRule;

impl Rule for UnencryptedBucketRule {
    fn code(&self) -> &'static str {
        codes::UNENCRYPTED_BUCKET
    }

    fn name(&self) -> &'static str {
        "unencrypted-bucket"
    }

    fn category(&self) -> Category {
        Category::Compliance
    }

    fn default_severity(&self) -> Severity {
        Severity::Medium
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::Bucket]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["encryption_enabled"]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        _ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        if resource.require_bool("encryption_enabled")? {
            return Ok(Vec::new());
        }
        // Public buckets get the stronger S3-001 verdict instead.
        if resource.require_bool("is_public").unwrap_or(false) {
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
                    "Bucket '{}' has default encryption disabled",
                    resource.resource_id
                ),
                "Enable SSE-S3 or SSE-KMS default encryption on the bucket.",
            )
            .with_rationale("no server-side encryption configuration"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unencrypted_private_bucket_is_medium_compliance() {
        let bucket = ResourceDescriptor::new(ResourceType::Bucket, "logs")
            .attr("is_public", false)
            .attr("encryption_enabled", false);
        let findings = UnencryptedBucketRule
            .check(&bucket, &RuleContext::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[0].category, Category::Compliance);
    }

    #[test]
    fn test_encrypted_bucket_is_clean() {
        let bucket = ResourceDescriptor::new(ResourceType::Bucket, "logs")
            .attr("is_public", false)
            .attr("encryption_enabled", true);
        assert!(
            UnencryptedBucketRule
                .check(&bucket, &RuleContext::default())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_public_unencrypted_deferred_to_s3001() {
        let bucket = ResourceDescriptor::new(ResourceType::Bucket, "logs")
            .attr("is_public", true)
            .attr("encryption_enabled", false);
        assert!(
            UnencryptedBucketRule
                .check(&bucket, &RuleContext::default())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_missing_encryption_attr_skips() {
        let bucket = ResourceDescriptor::new(ResourceType::Bucket, "logs").attr("is_public", false);
        assert!(
            UnencryptedBucketRule
                .check(&bucket, &RuleContext::default())
                .is_err()
        );
    }
}
