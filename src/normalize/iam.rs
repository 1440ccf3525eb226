//! IAM shapes: policy documents, users with credential data, roles, and
//! the account summary.
//!
//! Policy documents keep AWS's quirks at this layer only: `Action` and
//! `Resource` can be a string or a list, `Principal` can be the string `*`
//! or a map, and a missing `Condition` means unconditional.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::{OneOrMany, RawTag, tags_to_map};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{
    AttrValue, PolicyStatement, ResourceDescriptor, ResourceType,
};

// ============================================================================
// Policy documents
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RawPolicyDocument {
    #[serde(rename = "Statement", default)]
    pub statement: OneOrMany<RawStatement>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawStatement {
    #[serde(default = "default_effect")]
    pub effect: String,
    #[serde(default)]
    pub action: Option<OneOrMany<String>>,
    #[serde(default)]
    pub resource: Option<OneOrMany<String>>,
    #[serde(default)]
    pub principal: Option<Value>,
    #[serde(default)]
    pub condition: Option<Value>,
}

fn default_effect() -> String {
    "Deny".to_string()
}

impl RawPolicyDocument {
    pub fn statements(&self) -> Vec<PolicyStatement> {
        self.statement
            .clone()
            .into_vec()
            .into_iter()
            .map(|s| PolicyStatement {
                effect: s.effect.clone(),
                actions: s.action.clone().map(OneOrMany::into_vec).unwrap_or_default(),
                resources: s
                    .resource
                    .clone()
                    .map(OneOrMany::into_vec)
                    .unwrap_or_default(),
                has_condition: s.condition.is_some(),
            })
            .collect()
    }

    /// Whether any statement allows the whole world in, unconditionally.
    /// Used for role trust policies.
    pub fn open_to_world(&self) -> bool {
        self.statement.clone().into_vec().iter().any(|s| {
            s.effect.eq_ignore_ascii_case("allow")
                && s.condition.is_none()
                && s.principal.as_ref().is_some_and(principal_is_public)
        })
    }
}

/// Whether a Principal element means "anyone": the string `*`, or a map
/// whose `AWS` entry is (or contains) `*`.
pub(crate) fn principal_is_public(principal: &Value) -> bool {
    match principal {
        Value::String(s) => s == "*",
        Value::Object(map) => map.get("AWS").is_some_and(|aws| match aws {
            Value::String(s) => s == "*",
            Value::Array(items) => items.iter().any(|v| v.as_str() == Some("*")),
            _ => false,
        }),
        _ => false,
    }
}

// ============================================================================
// Managed policies
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawManagedPolicy {
    pub policy_name: String,
    #[serde(default)]
    pub arn: Option<String>,
    /// Default-version document, pre-fetched and URL-decoded upstream.
    #[serde(default)]
    pub document: Option<RawPolicyDocument>,
}

pub fn normalize_policies(policies: &[RawManagedPolicy]) -> Vec<ResourceDescriptor> {
    policies
        .iter()
        .map(|policy| {
            let id = policy.arn.clone().unwrap_or_else(|| policy.policy_name.clone());
            let descriptor = ResourceDescriptor::new(ResourceType::Policy, id)
                .attr("policy_name", policy.policy_name.clone());
            match &policy.document {
                // No document means the fetch could not read the policy
                // version; leave "statements" absent so policy rules skip.
                None => descriptor,
                Some(doc) => {
                    let statements = doc.statements();
                    let wildcard_action = statements
                        .iter()
                        .any(|s| s.is_allow() && s.has_wildcard_action());
                    let wildcard_resource = statements
                        .iter()
                        .any(|s| s.is_allow() && s.has_wildcard_resource());
                    descriptor
                        .attr("statements", AttrValue::Statements(statements))
                        .attr("has_wildcard_action", wildcard_action)
                        .attr("has_wildcard_resource", wildcard_resource)
                }
            }
        })
        .collect()
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawUser {
    pub user_name: String,
    /// From the credential report; absent when the report was unavailable.
    #[serde(default)]
    pub password_enabled: Option<bool>,
    #[serde(default)]
    pub mfa_active: Option<bool>,
    #[serde(default)]
    pub access_keys: Vec<RawAccessKey>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawAccessKey {
    pub access_key_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub create_date: Option<DateTime<Utc>>,
}

impl RawAccessKey {
    fn is_active(&self) -> bool {
        // ListAccessKeys always reports a status; treat absence as active
        // rather than silently dropping the key from review.
        self.status.as_deref().map(|s| s == "Active").unwrap_or(true)
    }
}

pub fn normalize_users(users: &[RawUser], ctx: &RuleContext) -> Vec<ResourceDescriptor> {
    users
        .iter()
        .map(|user| {
            let active: Vec<&RawAccessKey> =
                user.access_keys.iter().filter(|k| k.is_active()).collect();
            let oldest = active
                .iter()
                .filter_map(|k| k.create_date.map(|at| (ctx.age_days(at), &k.access_key_id)))
                .max_by_key(|(age, _)| *age);

            let mut descriptor =
                ResourceDescriptor::new(ResourceType::User, user.user_name.clone())
                    .attr_opt("console_access", user.password_enabled)
                    .attr_opt("mfa_enabled", user.mfa_active)
                    .attr("has_access_keys", !active.is_empty())
                    .attr_opt("oldest_key_age_days", oldest.map(|(age, _)| age))
                    .attr_opt("oldest_key_id", oldest.map(|(_, id)| id.clone()));
            descriptor.tags = tags_to_map(&user.tags);
            descriptor
        })
        .collect()
}

// ============================================================================
// Roles
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRole {
    pub role_name: String,
    #[serde(default)]
    pub assume_role_policy_document: Option<RawPolicyDocument>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
}

pub fn normalize_roles(roles: &[RawRole]) -> Vec<ResourceDescriptor> {
    roles
        .iter()
        .map(|role| {
            let mut descriptor =
                ResourceDescriptor::new(ResourceType::Role, role.role_name.clone()).attr_opt(
                    "trust_open_to_world",
                    role.assume_role_policy_document
                        .as_ref()
                        .map(RawPolicyDocument::open_to_world),
                );
            descriptor.tags = tags_to_map(&role.tags);
            descriptor
        })
        .collect()
}

// ============================================================================
// Account summary
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawAccountSummary {
    #[serde(default)]
    pub account_id: Option<String>,
    /// `AccountAccessKeysPresent` from GetAccountSummary: a count, not a bool.
    #[serde(default)]
    pub account_access_keys_present: Option<i64>,
}

pub fn normalize_account(summary: Option<&RawAccountSummary>) -> Vec<ResourceDescriptor> {
    let Some(summary) = summary else {
        return Vec::new();
    };
    let id = summary
        .account_id
        .clone()
        .unwrap_or_else(|| "account".to_string());
    vec![
        ResourceDescriptor::new(ResourceType::Account, id).attr_opt(
            "root_access_key_present",
            summary.account_access_keys_present.map(|n| n > 0),
        ),
    ]
}
