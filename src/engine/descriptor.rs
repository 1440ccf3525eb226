//! Canonical, provider-neutral view of one AWS resource.
//!
//! The normalizer folds heterogeneous API shapes into `ResourceDescriptor`
//! values so rules can evaluate every resource type through one interface.
//! Attributes that cannot be computed upstream are left absent; the typed
//! accessors fail closed with `MissingAttribute`, which the engine turns
//! into a skip rather than a defaulted (and misleading) value.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Resource types
// ============================================================================

/// The kinds of resources the engine knows how to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Role,
    Policy,
    User,
    Account,
    SecurityGroup,
    Bucket,
    Instance,
    Volume,
    Snapshot,
    ElasticIp,
    NatGateway,
    RdsInstance,
}

impl ResourceType {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::Policy => "policy",
            Self::User => "user",
            Self::Account => "account",
            Self::SecurityGroup => "security_group",
            Self::Bucket => "bucket",
            Self::Instance => "instance",
            Self::Volume => "volume",
            Self::Snapshot => "snapshot",
            Self::ElasticIp => "elastic_ip",
            Self::NatGateway => "nat_gateway",
            Self::RdsInstance => "rds_instance",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Structured attribute payloads
// ============================================================================

/// One ingress rule of a security group, reduced to what exposure rules need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngressRule {
    /// Protocol as reported by the provider ("tcp", "udp", "-1" for all).
    pub protocol: String,
    /// Start of the port range. Absent for all-traffic rules.
    pub from_port: Option<u16>,
    /// End of the port range. Absent for all-traffic rules.
    pub to_port: Option<u16>,
    /// Source CIDR of the rule.
    pub cidr: String,
    /// Whether the source CIDR is the whole internet (0.0.0.0/0 or ::/0).
    pub public: bool,
}

impl IngressRule {
    /// Whether the rule spans every port (explicit 0-65535 or all-traffic protocol).
    pub fn covers_all_ports(&self) -> bool {
        if self.protocol == "-1" {
            return true;
        }
        matches!((self.from_port, self.to_port), (Some(0), Some(65535)))
    }

    /// Whether `port` falls inside this rule's range.
    pub fn covers_port(&self, port: u16) -> bool {
        if self.protocol == "-1" {
            return true;
        }
        match (self.from_port, self.to_port) {
            (Some(from), Some(to)) => from <= port && port <= to,
            _ => false,
        }
    }
}

/// One statement of an IAM policy document, reduced to what risk rules need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyStatement {
    /// "Allow" or "Deny".
    pub effect: String,
    /// Action patterns granted by the statement.
    pub actions: Vec<String>,
    /// Resource patterns the statement applies to.
    pub resources: Vec<String>,
    /// Whether the statement carries a Condition block.
    pub has_condition: bool,
}

impl PolicyStatement {
    pub fn is_allow(&self) -> bool {
        self.effect.eq_ignore_ascii_case("allow")
    }

    /// Whether any action element is the literal `*`.
    pub fn has_wildcard_action(&self) -> bool {
        self.actions.iter().any(|a| a == "*")
    }

    /// Whether any resource element is the literal `*`.
    pub fn has_wildcard_resource(&self) -> bool {
        self.resources.iter().any(|r| r == "*")
    }

    /// Admin-equivalent: Allow on every action against every resource.
    pub fn is_admin(&self) -> bool {
        self.is_allow() && self.has_wildcard_action() && self.has_wildcard_resource()
    }

    /// Whether the statement grants `action`, honoring `*` and
    /// service-prefix wildcards like `iam:*` or `iam:Create*`.
    pub fn grants_action(&self, action: &str) -> bool {
        self.is_allow() && self.actions.iter().any(|p| action_matches(p, action))
    }
}

/// Match a granted action pattern against a concrete action name.
///
/// Patterns use the IAM `*` wildcard; matching is case-insensitive, like IAM.
pub fn action_matches(pattern: &str, action: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    let action = action.to_ascii_lowercase();
    if !pattern.contains('*') {
        return pattern == action;
    }
    // Each literal segment between wildcards must appear in order; the
    // first and last segments stay anchored to the ends.
    let segments: Vec<&str> = pattern.split('*').collect();
    let (first, last) = (segments[0], segments[segments.len() - 1]);
    let Some(mut rest) = action.strip_prefix(first) else {
        return false;
    };
    for segment in &segments[1..segments.len() - 1] {
        let Some(at) = rest.find(segment) else {
            return false;
        };
        rest = &rest[at + segment.len()..];
    }
    rest.ends_with(last)
}

// ============================================================================
// Attribute values
// ============================================================================

/// A single normalized attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    StrList(Vec<String>),
    Ingress(Vec<IngressRule>),
    Statements(Vec<PolicyStatement>),
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

// ============================================================================
// Missing attribute (skip path)
// ============================================================================

/// A rule asked for an attribute the normalizer did not populate.
///
/// This is never surfaced to callers as a failure: the engine counts the
/// skip and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing attribute '{key}'")]
pub struct MissingAttribute {
    pub key: String,
}

impl MissingAttribute {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

// ============================================================================
// Resource descriptor
// ============================================================================

/// Canonical snapshot of one resource's rule-relevant attributes.
///
/// Constructed fresh per evaluation pass and immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub resource_type: ResourceType,
    pub resource_id: String,
    /// Populated attribute set; which keys are present depends on the
    /// resource type and on what the upstream fetch could observe.
    pub attributes: BTreeMap<String, AttrValue>,
    /// Provider tags, used by cost-allocation rules.
    pub tags: BTreeMap<String, String>,
}

impl ResourceDescriptor {
    pub fn new(resource_type: ResourceType, resource_id: impl Into<String>) -> Self {
        Self {
            resource_type,
            resource_id: resource_id.into(),
            attributes: BTreeMap::new(),
            tags: BTreeMap::new(),
        }
    }

    /// Set an attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set an attribute only when the upstream value is known.
    pub fn attr_opt(self, key: impl Into<String>, value: Option<impl Into<AttrValue>>) -> Self {
        match value {
            Some(v) => self.attr(key, v),
            None => self,
        }
    }

    /// Set a tag.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    fn get(&self, key: &str) -> Result<&AttrValue, MissingAttribute> {
        self.attributes.get(key).ok_or_else(|| MissingAttribute::new(key))
    }

    pub fn require_bool(&self, key: &str) -> Result<bool, MissingAttribute> {
        match self.get(key)? {
            AttrValue::Bool(v) => Ok(*v),
            _ => Err(MissingAttribute::new(key)),
        }
    }

    pub fn require_int(&self, key: &str) -> Result<i64, MissingAttribute> {
        match self.get(key)? {
            AttrValue::Int(v) => Ok(*v),
            _ => Err(MissingAttribute::new(key)),
        }
    }

    pub fn require_float(&self, key: &str) -> Result<f64, MissingAttribute> {
        match self.get(key)? {
            AttrValue::Float(v) => Ok(*v),
            AttrValue::Int(v) => Ok(*v as f64),
            _ => Err(MissingAttribute::new(key)),
        }
    }

    pub fn require_str(&self, key: &str) -> Result<&str, MissingAttribute> {
        match self.get(key)? {
            AttrValue::Str(v) => Ok(v),
            _ => Err(MissingAttribute::new(key)),
        }
    }

    pub fn require_ingress(&self, key: &str) -> Result<&[IngressRule], MissingAttribute> {
        match self.get(key)? {
            AttrValue::Ingress(v) => Ok(v),
            _ => Err(MissingAttribute::new(key)),
        }
    }

    pub fn require_statements(&self, key: &str) -> Result<&[PolicyStatement], MissingAttribute> {
        match self.get(key)? {
            AttrValue::Statements(v) => Ok(v),
            _ => Err(MissingAttribute::new(key)),
        }
    }

    /// Optional float accessor for attributes rules treat as best-effort.
    pub fn float_opt(&self, key: &str) -> Option<f64> {
        match self.attributes.get(key) {
            Some(AttrValue::Float(v)) => Some(*v),
            Some(AttrValue::Int(v)) => Some(*v as f64),
            _ => None,
        }
    }

    /// Optional string accessor.
    pub fn str_opt(&self, key: &str) -> Option<&str> {
        match self.attributes.get(key) {
            Some(AttrValue::Str(v)) => Some(v),
            _ => None,
        }
    }
}
