//! S3 bucket shapes: ACL grants, bucket policy, public-access block and
//! encryption state, stitched into one record per bucket upstream.

use serde::Deserialize;

use super::{RawTag, tags_to_map};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{ResourceDescriptor, ResourceType};
use crate::normalize::iam::{RawPolicyDocument, principal_is_public};

const ALL_USERS_URI: &str = "http://acs.amazonaws.com/groups/global/AllUsers";
const AUTH_USERS_URI: &str = "http://acs.amazonaws.com/groups/global/AuthenticatedUsers";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawBucket {
    pub name: String,
    #[serde(default)]
    pub acl_grants: Vec<RawGrant>,
    #[serde(default)]
    pub policy: Option<RawPolicyDocument>,
    #[serde(default)]
    pub public_access_block: Option<RawPublicAccessBlock>,
    /// Tri-state: `GetBucketEncryption` can be denied, in which case the
    /// encryption state stays unknown and encryption rules skip the bucket.
    #[serde(default)]
    pub encryption_enabled: Option<bool>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawGrant {
    #[serde(default)]
    pub grantee_uri: Option<String>,
    #[serde(default)]
    pub permission: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPublicAccessBlock {
    #[serde(default)]
    pub block_public_acls: bool,
    #[serde(default)]
    pub ignore_public_acls: bool,
    #[serde(default)]
    pub block_public_policy: bool,
    #[serde(default)]
    pub restrict_public_buckets: bool,
}

impl RawPublicAccessBlock {
    fn blocks_public_access(&self) -> bool {
        self.block_public_acls
            || self.ignore_public_acls
            || self.block_public_policy
            || self.restrict_public_buckets
    }
}

impl RawBucket {
    fn acl_is_public(&self) -> bool {
        self.acl_grants.iter().any(|grant| {
            grant
                .grantee_uri
                .as_deref()
                .is_some_and(|uri| uri == ALL_USERS_URI || uri == AUTH_USERS_URI)
        })
    }

    fn policy_is_public(&self) -> bool {
        let Some(policy) = &self.policy else {
            return false;
        };
        policy.statement.clone().into_vec().iter().any(|s| {
            s.effect.eq_ignore_ascii_case("allow")
                && s.condition.is_none()
                && s.principal.as_ref().is_some_and(principal_is_public)
        })
    }

    /// A bucket counts as public when every public-access-block flag is
    /// false (or no block is configured) and either the ACL grants to an
    /// AWS global group or the policy allows an unconditional wildcard
    /// principal.
    fn is_public(&self) -> bool {
        if self
            .public_access_block
            .as_ref()
            .is_some_and(RawPublicAccessBlock::blocks_public_access)
        {
            return false;
        }
        self.acl_is_public() || self.policy_is_public()
    }
}

pub fn normalize_buckets(buckets: &[RawBucket], _ctx: &RuleContext) -> Vec<ResourceDescriptor> {
    buckets
        .iter()
        .map(|bucket| {
            let mut descriptor = ResourceDescriptor::new(ResourceType::Bucket, bucket.name.clone())
                .attr("is_public", bucket.is_public())
                .attr_opt("encryption_enabled", bucket.encryption_enabled);
            descriptor.tags = tags_to_map(&bucket.tags);
            descriptor
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RuleContext {
        RuleContext::default()
    }

    #[test]
    fn test_acl_grant_to_all_users_is_public() {
        let bucket: RawBucket = serde_json::from_str(
            r#"{
                "Name": "assets",
                "AclGrants": [
                    {"GranteeUri": "http://acs.amazonaws.com/groups/global/AllUsers", "Permission": "READ"}
                ],
                "EncryptionEnabled": true
            }"#,
        )
        .unwrap();
        let descriptors = normalize_buckets(std::slice::from_ref(&bucket), &ctx());
        assert!(descriptors[0].require_bool("is_public").unwrap());
        assert!(descriptors[0].require_bool("encryption_enabled").unwrap());
    }

    #[test]
    fn test_public_access_block_overrides_acl() {
        let bucket: RawBucket = serde_json::from_str(
            r#"{
                "Name": "locked",
                "AclGrants": [
                    {"GranteeUri": "http://acs.amazonaws.com/groups/global/AllUsers"}
                ],
                "PublicAccessBlock": {
                    "BlockPublicAcls": true,
                    "IgnorePublicAcls": true,
                    "BlockPublicPolicy": true,
                    "RestrictPublicBuckets": true
                }
            }"#,
        )
        .unwrap();
        assert!(!bucket.is_public());
    }

    #[test]
    fn test_partial_public_access_block_still_blocks() {
        let bucket: RawBucket = serde_json::from_str(
            r#"{
                "Name": "half-locked",
                "AclGrants": [
                    {"GranteeUri": "http://acs.amazonaws.com/groups/global/AllUsers"}
                ],
                "PublicAccessBlock": {"BlockPublicAcls": true}
            }"#,
        )
        .unwrap();
        assert!(!bucket.is_public());
    }

    #[test]
    fn test_all_false_public_access_block_does_not_block() {
        let bucket: RawBucket = serde_json::from_str(
            r#"{
                "Name": "unblocked",
                "AclGrants": [
                    {"GranteeUri": "http://acs.amazonaws.com/groups/global/AuthenticatedUsers"}
                ],
                "PublicAccessBlock": {
                    "BlockPublicAcls": false,
                    "IgnorePublicAcls": false,
                    "BlockPublicPolicy": false,
                    "RestrictPublicBuckets": false
                }
            }"#,
        )
        .unwrap();
        assert!(bucket.is_public());
    }

    #[test]
    fn test_wildcard_policy_is_public_unless_conditioned() {
        let open: RawBucket = serde_json::from_str(
            r#"{
                "Name": "website",
                "Policy": {
                    "Statement": [{
                        "Effect": "Allow",
                        "Principal": "*",
                        "Action": "s3:GetObject",
                        "Resource": "arn:aws:s3:::website/*"
                    }]
                }
            }"#,
        )
        .unwrap();
        assert!(open.is_public());

        let vpc_only: RawBucket = serde_json::from_str(
            r#"{
                "Name": "internal",
                "Policy": {
                    "Statement": [{
                        "Effect": "Allow",
                        "Principal": "*",
                        "Action": "s3:GetObject",
                        "Resource": "arn:aws:s3:::internal/*",
                        "Condition": {"StringEquals": {"aws:SourceVpce": "vpce-1"}}
                    }]
                }
            }"#,
        )
        .unwrap();
        assert!(!vpc_only.is_public());
    }

    #[test]
    fn test_unknown_encryption_left_absent() {
        let bucket: RawBucket = serde_json::from_str(r#"{"Name": "opaque"}"#).unwrap();
        let descriptors = normalize_buckets(std::slice::from_ref(&bucket), &ctx());
        assert!(!descriptors[0].require_bool("is_public").unwrap());
        assert!(descriptors[0].require_bool("encryption_enabled").is_err());
    }
}
