//! Normalization: raw, already-fetched AWS API shapes -> `ResourceDescriptor`s.
//!
//! The raw types deserialize the PascalCase JSON the AWS CLI and SDKs emit
//! (`IpPermissions`, `CidrIp`, one-or-many `Action` values, ...). An account
//! snapshot is the stitched-together output of the upstream fetch layer;
//! this module never talks to AWS itself. Attributes that cannot be derived
//! from the snapshot are left absent so the engine's skip path handles them.

pub mod ec2;
pub mod iam;
pub mod rds;
pub mod s3;

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::engine::context::RuleContext;
use crate::engine::descriptor::ResourceDescriptor;

pub use ec2::{
    RawAddress, RawDatapoint, RawInstance, RawSecurityGroup, RawSnapshot, RawVolume,
    normalize_addresses, normalize_instances, normalize_security_groups, normalize_snapshots,
    normalize_volumes,
};
pub use iam::{
    RawAccountSummary, RawManagedPolicy, RawPolicyDocument, RawRole, RawUser, normalize_account,
    normalize_policies, normalize_roles, normalize_users,
};
pub use rds::{RawDbInstance, normalize_db_instances};
pub use s3::{RawBucket, normalize_buckets};

/// A provider tag pair, as in EC2 `Tags` / RDS `TagList`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTag {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

pub(crate) fn tags_to_map(tags: &[RawTag]) -> BTreeMap<String, String> {
    tags.iter()
        .map(|t| (t.key.clone(), t.value.clone()))
        .collect()
}

/// A JSON field that AWS serializes either as a scalar or as a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(v) => vec![v],
            Self::Many(v) => v,
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

/// Everything the upstream fetch layer hands us for one pass, grouped by
/// resource type. All fields default so partial snapshots normalize to
/// whatever subset they cover.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountSnapshot {
    pub security_groups: Vec<RawSecurityGroup>,
    pub instances: Vec<RawInstance>,
    /// CloudWatch CPU datapoints keyed by instance id, folded into the
    /// instance descriptors as `cpu_avg` / `cpu_max`.
    pub instance_metrics: BTreeMap<String, Vec<RawDatapoint>>,
    pub volumes: Vec<RawVolume>,
    pub snapshots: Vec<RawSnapshot>,
    pub addresses: Vec<RawAddress>,
    pub buckets: Vec<RawBucket>,
    pub users: Vec<RawUser>,
    pub roles: Vec<RawRole>,
    pub policies: Vec<RawManagedPolicy>,
    pub account: Option<RawAccountSummary>,
    pub db_instances: Vec<RawDbInstance>,
}

impl AccountSnapshot {
    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Normalize every resource in the snapshot.
pub fn normalize_snapshot(snapshot: &AccountSnapshot, ctx: &RuleContext) -> Vec<ResourceDescriptor> {
    let mut descriptors = Vec::new();
    descriptors.extend(normalize_security_groups(&snapshot.security_groups));
    descriptors.extend(normalize_instances(
        &snapshot.instances,
        &snapshot.instance_metrics,
        &snapshot.volumes,
        ctx,
    ));
    descriptors.extend(normalize_volumes(&snapshot.volumes, ctx));
    descriptors.extend(normalize_snapshots(
        &snapshot.snapshots,
        &snapshot.volumes,
        ctx,
    ));
    descriptors.extend(normalize_addresses(&snapshot.addresses));
    descriptors.extend(normalize_buckets(&snapshot.buckets, ctx));
    descriptors.extend(normalize_users(&snapshot.users, ctx));
    descriptors.extend(normalize_roles(&snapshot.roles));
    descriptors.extend(normalize_policies(&snapshot.policies));
    descriptors.extend(normalize_account(snapshot.account.as_ref()));
    descriptors.extend(normalize_db_instances(&snapshot.db_instances, ctx));
    descriptors
}
