//! S3-001: public-unencrypted-bucket
//!
//! Publicly reachable bucket without default encryption. The worst of both.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct PublicUnencryptedBucketRule;

impl Rule for PublicUnencryptedBucketRule {
    fn code(&self) -> &'static str {
        codes::PUBLIC_UNENCRYPTED_BUCKET
    }

    fn name(&self) -> &'static str {
        "public-unencrypted-bucket"
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn default_severity(&self) -> Severity {
        Severity::Critical
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
        if resource.require_bool("encryption_enabled")? {
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
                    "Bucket '{}' is public and unencrypted",
                    resource.resource_id
                ),
                "Enable the public access block, review the bucket policy and ACL, and turn on default encryption.",
            )
            .with_rationale("bucket grants public read access")
            .with_rationale("default encryption is disabled"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(public: bool, encrypted: Option<bool>) -> ResourceDescriptor {
        ResourceDescriptor::new(ResourceType::Bucket, "data-dump")
            .attr("is_public", public)
            .attr_opt("encryption_enabled", encrypted)
    }

    #[test]
    fn test_public_unencrypted_is_critical() {
        let findings = PublicUnencryptedBucketRule
            .check(&bucket(true, Some(false)), &RuleContext::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
    }

    #[test]
    fn test_public_encrypted_deferred_to_s3002() {
        assert!(
            PublicUnencryptedBucketRule
                .check(&bucket(true, Some(true)), &RuleContext::default())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_private_bucket_is_clean() {
        assert!(
            PublicUnencryptedBucketRule
                .check(&bucket(false, Some(false)), &RuleContext::default())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_unknown_encryption_skips_when_public() {
        assert!(
            PublicUnencryptedBucketRule
                .check(&bucket(true, None), &RuleContext::default())
                .is_err()
        );
    }
}
