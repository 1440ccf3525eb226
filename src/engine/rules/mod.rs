//! Rule system for account evaluation.
//!
//! Each rule is a separate module with a consistent interface. Rules are
//! identified by codes like SEC-001, IAM-004, COST-002. Rules are pure
//! functions of `(ResourceDescriptor, RuleContext)`: no shared state, no
//! side effects, so execution order never affects the finding set and a
//! rule can be added by creating a module and one registry line.

mod cost_001;
mod cost_002;
mod cost_003;
mod cost_004;
mod cost_005;
mod cost_006;
mod iam_001;
mod iam_002;
mod iam_003;
mod iam_004;
mod iam_005;
mod iam_006;
mod iam_007;
mod iam_008;
mod perf_001;
mod rds_001;
mod rds_002;
mod s3_001;
mod s3_002;
mod s3_003;
mod sec_001;
mod sec_002;
mod sec_003;

use once_cell::sync::Lazy;

use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

// ============================================================================
// Rule Trait
// ============================================================================

/// Trait for account evaluation rules.
pub trait Rule: Send + Sync {
    /// Get the rule code (e.g., "SEC-001").
    fn code(&self) -> &'static str;

    /// Get the human-readable rule name (e.g., "open-sensitive-port").
    fn name(&self) -> &'static str;

    /// Get the rule category.
    fn category(&self) -> Category;

    /// Get the default severity this rule assigns.
    fn default_severity(&self) -> Severity;

    /// Resource types this rule applies to.
    fn resource_types(&self) -> &'static [ResourceType];

    /// Descriptor attribute keys the rule reads. The normalizer is expected
    /// to populate these whenever the upstream data allows it.
    fn required_attrs(&self) -> &'static [&'static str];

    /// Evaluate one resource. A missing required attribute is a skip, not
    /// a failure: the engine counts it and moves on.
    fn check(
        &self,
        resource: &ResourceDescriptor,
        ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute>;

    /// Whether the rule applies to a resource type.
    fn applies_to(&self, resource_type: ResourceType) -> bool {
        self.resource_types().contains(&resource_type)
    }
}

// ============================================================================
// Rule Codes
// ============================================================================

/// Rule code constants.
pub mod codes {
    pub const OPEN_SENSITIVE_PORT: &str = "SEC-001";
    pub const OPEN_PORT: &str = "SEC-002";
    pub const OPEN_ALL_PORTS: &str = "SEC-003";
    pub const ADMIN_POLICY: &str = "IAM-001";
    pub const WILDCARD_ACTION: &str = "IAM-002";
    pub const WILDCARD_RESOURCE: &str = "IAM-003";
    pub const PRIVILEGE_ESCALATION: &str = "IAM-004";
    pub const CONSOLE_USER_WITHOUT_MFA: &str = "IAM-005";
    pub const STALE_ACCESS_KEY: &str = "IAM-006";
    pub const ROOT_ACCESS_KEY: &str = "IAM-007";
    pub const OPEN_TRUST_POLICY: &str = "IAM-008";
    pub const PUBLIC_UNENCRYPTED_BUCKET: &str = "S3-001";
    pub const PUBLIC_BUCKET: &str = "S3-002";
    pub const UNENCRYPTED_BUCKET: &str = "S3-003";
    pub const PUBLIC_DB_INSTANCE: &str = "RDS-001";
    pub const UNENCRYPTED_DB_STORAGE: &str = "RDS-002";
    pub const UNATTACHED_VOLUME: &str = "COST-001";
    pub const UNUSED_ELASTIC_IP: &str = "COST-002";
    pub const STOPPED_INSTANCE: &str = "COST-003";
    pub const ORPHANED_SNAPSHOT: &str = "COST-004";
    pub const IDLE_INSTANCE: &str = "COST-005";
    pub const MISSING_COST_TAGS: &str = "COST-006";
    pub const OVERLOADED_INSTANCE: &str = "PERF-001";
}

// ============================================================================
// Rule Registry
// ============================================================================

/// Get all registered rules.
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(sec_001::OpenSensitivePortRule),
        Box::new(sec_002::OpenPortRule),
        Box::new(sec_003::OpenAllPortsRule),
        Box::new(iam_001::AdminPolicyRule),
        Box::new(iam_002::WildcardActionRule),
        Box::new(iam_003::WildcardResourceRule),
        Box::new(iam_004::PrivilegeEscalationRule),
        Box::new(iam_005::ConsoleUserWithoutMfaRule),
        Box::new(iam_006::StaleAccessKeyRule),
        Box::new(iam_007::RootAccessKeyRule),
        Box::new(iam_008::OpenTrustPolicyRule),
        Box::new(s3_001::PublicUnencryptedBucketRule),
        Box::new(s3_002::PublicBucketRule),
        Box::new(s3_003::UnencryptedBucketRule),
        Box::new(rds_001::PublicDbInstanceRule),
        Box::new(rds_002::UnencryptedDbStorageRule),
        Box::new(cost_001::UnattachedVolumeRule),
        Box::new(cost_002::UnusedElasticIpRule),
        Box::new(cost_003::StoppedInstanceRule),
        Box::new(cost_004::OrphanedSnapshotRule),
        Box::new(cost_005::IdleInstanceRule),
        Box::new(cost_006::MissingCostTagsRule),
        Box::new(perf_001::OverloadedInstanceRule),
    ]
}

/// Get the rules belonging to any of the given categories.
pub fn rules_in_categories(categories: &[Category]) -> Vec<Box<dyn Rule>> {
    all_rules()
        .into_iter()
        .filter(|r| categories.contains(&r.category()))
        .collect()
}

/// Rule definition for documentation/introspection.
#[derive(Debug, Clone)]
pub struct RuleDefinition {
    pub code: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub default_severity: Severity,
    pub resource_types: &'static [ResourceType],
}

static DEFINITIONS: Lazy<Vec<RuleDefinition>> = Lazy::new(|| {
    all_rules()
        .iter()
        .map(|r| RuleDefinition {
            code: r.code(),
            name: r.name(),
            category: r.category(),
            default_severity: r.default_severity(),
            resource_types: r.resource_types(),
        })
        .collect()
});

/// Get rule definitions for the `rules` subcommand and docs.
pub fn rule_definitions() -> &'static [RuleDefinition] {
    &DEFINITIONS
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::engine::descriptor::{
        IngressRule, PolicyStatement, ResourceDescriptor, ResourceType,
    };

    /// Security group descriptor with one ingress rule.
    pub fn sg_with_ingress(id: &str, rules: Vec<IngressRule>) -> ResourceDescriptor {
        let is_public = rules.iter().any(|r| r.public);
        ResourceDescriptor::new(ResourceType::SecurityGroup, id)
            .attr("ingress", crate::engine::descriptor::AttrValue::Ingress(rules))
            .attr("is_public", is_public)
    }

    pub fn ingress(protocol: &str, from: u16, to: u16, cidr: &str) -> IngressRule {
        IngressRule {
            protocol: protocol.to_string(),
            from_port: Some(from),
            to_port: Some(to),
            cidr: cidr.to_string(),
            public: cidr == "0.0.0.0/0" || cidr == "::/0",
        }
    }

    /// Policy descriptor from statements.
    pub fn policy_with_statements(id: &str, stmts: Vec<PolicyStatement>) -> ResourceDescriptor {
        let has_wildcard_action = stmts.iter().any(|s| s.is_allow() && s.has_wildcard_action());
        let has_wildcard_resource = stmts
            .iter()
            .any(|s| s.is_allow() && s.has_wildcard_resource());
        ResourceDescriptor::new(ResourceType::Policy, id)
            .attr(
                "statements",
                crate::engine::descriptor::AttrValue::Statements(stmts),
            )
            .attr("has_wildcard_action", has_wildcard_action)
            .attr("has_wildcard_resource", has_wildcard_resource)
    }

    pub fn allow(actions: &[&str], resources: &[&str]) -> PolicyStatement {
        PolicyStatement {
            effect: "Allow".to_string(),
            actions: actions.iter().map(|s| s.to_string()).collect(),
            resources: resources.iter().map(|s| s.to_string()).collect(),
            has_condition: false,
        }
    }
}
