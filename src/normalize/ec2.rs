//! EC2, EBS, Elastic IP and CloudWatch shapes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{RawTag, tags_to_map};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{IngressRule, ResourceDescriptor, ResourceType};
use crate::engine::types::round_cost;

// ============================================================================
// Security groups
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawSecurityGroup {
    pub group_id: String,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub ip_permissions: Vec<RawIpPermission>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawIpPermission {
    pub ip_protocol: String,
    /// -1 in the raw shape means "all ports" for ICMP-style entries.
    #[serde(default)]
    pub from_port: Option<i64>,
    #[serde(default)]
    pub to_port: Option<i64>,
    #[serde(default)]
    pub ip_ranges: Vec<RawIpRange>,
    #[serde(default)]
    pub ipv6_ranges: Vec<RawIpv6Range>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawIpRange {
    pub cidr_ip: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawIpv6Range {
    pub cidr_ipv6: String,
}

fn port_u16(raw: Option<i64>) -> Option<u16> {
    raw.and_then(|p| u16::try_from(p).ok())
}

fn is_world_cidr(cidr: &str) -> bool {
    cidr == "0.0.0.0/0" || cidr == "::/0"
}

/// Flatten one `IpPermissions` entry into per-CIDR ingress rules.
fn flatten_permission(perm: &RawIpPermission) -> Vec<IngressRule> {
    let cidrs = perm
        .ip_ranges
        .iter()
        .map(|r| r.cidr_ip.as_str())
        .chain(perm.ipv6_ranges.iter().map(|r| r.cidr_ipv6.as_str()));
    cidrs
        .map(|cidr| IngressRule {
            protocol: perm.ip_protocol.clone(),
            from_port: port_u16(perm.from_port),
            to_port: port_u16(perm.to_port),
            cidr: cidr.to_string(),
            public: is_world_cidr(cidr),
        })
        .collect()
}

pub fn normalize_security_groups(groups: &[RawSecurityGroup]) -> Vec<ResourceDescriptor> {
    groups
        .iter()
        .map(|group| {
            let ingress: Vec<IngressRule> = group
                .ip_permissions
                .iter()
                .flat_map(flatten_permission)
                .collect();
            let is_public = ingress.iter().any(|rule| rule.public);
            let mut descriptor =
                ResourceDescriptor::new(ResourceType::SecurityGroup, group.group_id.clone())
                    .attr(
                        "ingress",
                        crate::engine::descriptor::AttrValue::Ingress(ingress),
                    )
                    .attr("is_public", is_public)
                    .attr_opt("group_name", group.group_name.clone());
            descriptor.tags = tags_to_map(&group.tags);
            descriptor
        })
        .collect()
}

// ============================================================================
// Instances
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawInstance {
    pub instance_id: String,
    #[serde(default)]
    pub instance_type: Option<String>,
    #[serde(default)]
    pub state: Option<RawInstanceState>,
    #[serde(default)]
    pub launch_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawInstanceState {
    pub name: String,
}

/// One CloudWatch CPU utilization datapoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDatapoint {
    pub average: f64,
    #[serde(default)]
    pub maximum: Option<f64>,
}

/// Fold datapoints into (mean of averages, max of maxima).
fn fold_cpu(datapoints: &[RawDatapoint]) -> Option<(f64, f64)> {
    if datapoints.is_empty() {
        return None;
    }
    let avg = datapoints.iter().map(|d| d.average).sum::<f64>() / datapoints.len() as f64;
    let max = datapoints
        .iter()
        .map(|d| d.maximum.unwrap_or(d.average))
        .fold(f64::MIN, f64::max);
    Some((avg, max))
}

pub fn normalize_instances(
    instances: &[RawInstance],
    metrics: &BTreeMap<String, Vec<RawDatapoint>>,
    volumes: &[RawVolume],
    ctx: &RuleContext,
) -> Vec<ResourceDescriptor> {
    instances
        .iter()
        .map(|instance| {
            let cpu = metrics
                .get(&instance.instance_id)
                .and_then(|points| fold_cpu(points));
            let monthly_cost = instance
                .instance_type
                .as_deref()
                .map(|t| round_cost(ctx.prices.instance_monthly(t)));
            // Storage kept billable while the instance itself is stopped.
            let storage_cost: f64 = volumes
                .iter()
                .filter(|v| v.attached_to(&instance.instance_id))
                .map(|v| v.monthly_cost(ctx))
                .sum();

            let mut descriptor =
                ResourceDescriptor::new(ResourceType::Instance, instance.instance_id.clone())
                    .attr_opt("state", instance.state.as_ref().map(|s| s.name.clone()))
                    .attr_opt("instance_type", instance.instance_type.clone())
                    .attr_opt("monthly_cost", monthly_cost)
                    .attr_opt("cpu_avg", cpu.map(|(avg, _)| avg))
                    .attr_opt("cpu_max", cpu.map(|(_, max)| max))
                    .attr_opt(
                        "age_days",
                        instance.launch_time.map(|at| ctx.age_days(at)),
                    );
            if storage_cost > 0.0 {
                descriptor =
                    descriptor.attr("stopped_storage_monthly_cost", round_cost(storage_cost));
            }
            descriptor.tags = tags_to_map(&instance.tags);
            descriptor
        })
        .collect()
}

// ============================================================================
// Volumes
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawVolume {
    pub volume_id: String,
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub volume_type: Option<String>,
    #[serde(default)]
    pub encrypted: Option<bool>,
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attachments: Vec<RawAttachment>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawAttachment {
    pub instance_id: String,
}

impl RawVolume {
    fn is_attached(&self) -> bool {
        self.state.as_deref() == Some("in-use") || !self.attachments.is_empty()
    }

    fn attached_to(&self, instance_id: &str) -> bool {
        self.attachments.iter().any(|a| a.instance_id == instance_id)
    }

    fn monthly_cost(&self, ctx: &RuleContext) -> f64 {
        let gb = self.size.unwrap_or(0) as f64;
        let per_gb = ctx
            .prices
            .volume_gb_price(self.volume_type.as_deref().unwrap_or(""));
        gb * per_gb
    }
}

pub fn normalize_volumes(volumes: &[RawVolume], ctx: &RuleContext) -> Vec<ResourceDescriptor> {
    volumes
        .iter()
        .map(|volume| {
            let mut descriptor =
                ResourceDescriptor::new(ResourceType::Volume, volume.volume_id.clone())
                    .attr("attached", volume.is_attached())
                    .attr_opt("size_gb", volume.size)
                    .attr_opt("volume_type", volume.volume_type.clone())
                    .attr_opt("encrypted", volume.encrypted)
                    .attr(
                        "monthly_cost",
                        round_cost(volume.monthly_cost(ctx)),
                    );
            descriptor.tags = tags_to_map(&volume.tags);
            descriptor
        })
        .collect()
}

// ============================================================================
// Snapshots
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawSnapshot {
    pub snapshot_id: String,
    #[serde(default)]
    pub volume_id: Option<String>,
    #[serde(default)]
    pub volume_size: Option<i64>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
}

pub fn normalize_snapshots(
    snapshots: &[RawSnapshot],
    volumes: &[RawVolume],
    ctx: &RuleContext,
) -> Vec<ResourceDescriptor> {
    snapshots
        .iter()
        .map(|snapshot| {
            // A snapshot is orphaned when its source volume no longer exists.
            let has_parent = snapshot
                .volume_id
                .as_deref()
                .is_some_and(|id| volumes.iter().any(|v| v.volume_id == id));
            let monthly_cost = snapshot
                .volume_size
                .map(|gb| round_cost(gb as f64 * ctx.prices.snapshot_gb_monthly));
            let mut descriptor =
                ResourceDescriptor::new(ResourceType::Snapshot, snapshot.snapshot_id.clone())
                    .attr("has_parent_volume", has_parent)
                    .attr_opt("age_days", snapshot.start_time.map(|at| ctx.age_days(at)))
                    .attr_opt("monthly_cost", monthly_cost);
            descriptor.tags = tags_to_map(&snapshot.tags);
            descriptor
        })
        .collect()
}

// ============================================================================
// Elastic IPs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawAddress {
    #[serde(default)]
    pub public_ip: Option<String>,
    #[serde(default)]
    pub allocation_id: Option<String>,
    #[serde(default)]
    pub association_id: Option<String>,
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
}

pub fn normalize_addresses(addresses: &[RawAddress]) -> Vec<ResourceDescriptor> {
    addresses
        .iter()
        .map(|address| {
            let id = address
                .allocation_id
                .clone()
                .or_else(|| address.public_ip.clone())
                .unwrap_or_else(|| "eip-unknown".to_string());
            let associated =
                address.association_id.is_some() || address.instance_id.is_some();
            let mut descriptor = ResourceDescriptor::new(ResourceType::ElasticIp, id)
                .attr("associated", associated);
            descriptor.tags = tags_to_map(&address.tags);
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
    fn test_security_group_flattens_per_cidr() {
        let json = r#"{
            "GroupId": "sg-1",
            "GroupName": "web",
            "IpPermissions": [
                {
                    "IpProtocol": "tcp",
                    "FromPort": 443,
                    "ToPort": 443,
                    "IpRanges": [{"CidrIp": "0.0.0.0/0"}, {"CidrIp": "10.0.0.0/8"}],
                    "Ipv6Ranges": [{"CidrIpv6": "::/0"}]
                }
            ]
        }"#;
        let group: RawSecurityGroup = serde_json::from_str(json).unwrap();
        let descriptors = normalize_security_groups(std::slice::from_ref(&group));
        assert_eq!(descriptors.len(), 1);
        let ingress = descriptors[0].require_ingress("ingress").unwrap();
        assert_eq!(ingress.len(), 3);
        assert!(ingress[0].public);
        assert!(!ingress[1].public);
        assert!(ingress[2].public);
        assert!(descriptors[0].require_bool("is_public").unwrap());
    }

    #[test]
    fn test_all_traffic_permission_has_no_ports() {
        let perm = RawIpPermission {
            ip_protocol: "-1".to_string(),
            from_port: Some(-1),
            to_port: Some(-1),
            ip_ranges: vec![RawIpRange {
                cidr_ip: "0.0.0.0/0".to_string(),
            }],
            ipv6_ranges: vec![],
        };
        let rules = flatten_permission(&perm);
        assert_eq!(rules[0].from_port, None);
        assert!(rules[0].covers_all_ports());
    }

    #[test]
    fn test_instance_cpu_folding_and_cost() {
        let instance: RawInstance = serde_json::from_str(
            r#"{
                "InstanceId": "i-1",
                "InstanceType": "m5.large",
                "State": {"Name": "running"}
            }"#,
        )
        .unwrap();
        let mut metrics = BTreeMap::new();
        metrics.insert(
            "i-1".to_string(),
            vec![
                RawDatapoint {
                    average: 2.0,
                    maximum: Some(4.0),
                },
                RawDatapoint {
                    average: 4.0,
                    maximum: Some(9.0),
                },
            ],
        );
        let descriptors = normalize_instances(&[instance], &metrics, &[], &ctx());
        let d = &descriptors[0];
        assert_eq!(d.require_str("state").unwrap(), "running");
        assert_eq!(d.require_float("cpu_avg").unwrap(), 3.0);
        assert_eq!(d.require_float("cpu_max").unwrap(), 9.0);
        assert_eq!(d.require_float("monthly_cost").unwrap(), 70.08);
    }

    #[test]
    fn test_instance_without_metrics_leaves_cpu_absent() {
        let instance: RawInstance =
            serde_json::from_str(r#"{"InstanceId": "i-2", "State": {"Name": "running"}}"#)
                .unwrap();
        let descriptors = normalize_instances(&[instance], &BTreeMap::new(), &[], &ctx());
        assert!(descriptors[0].require_float("cpu_avg").is_err());
        assert!(descriptors[0].require_float("monthly_cost").is_err());
    }

    #[test]
    fn test_stopped_instance_carries_attached_storage_cost() {
        let instance: RawInstance = serde_json::from_str(
            r#"{"InstanceId": "i-3", "InstanceType": "t3.medium", "State": {"Name": "stopped"}}"#,
        )
        .unwrap();
        let volume: RawVolume = serde_json::from_str(
            r#"{
                "VolumeId": "vol-1",
                "Size": 100,
                "VolumeType": "gp2",
                "State": "in-use",
                "Attachments": [{"InstanceId": "i-3"}]
            }"#,
        )
        .unwrap();
        let descriptors = normalize_instances(&[instance], &BTreeMap::new(), &[volume], &ctx());
        assert_eq!(
            descriptors[0]
                .require_float("stopped_storage_monthly_cost")
                .unwrap(),
            10.0
        );
    }

    #[test]
    fn test_volume_attachment_and_cost() {
        let detached: RawVolume = serde_json::from_str(
            r#"{"VolumeId": "vol-9", "Size": 200, "VolumeType": "gp3", "State": "available"}"#,
        )
        .unwrap();
        let descriptors = normalize_volumes(&[detached], &ctx());
        assert!(!descriptors[0].require_bool("attached").unwrap());
        assert_eq!(descriptors[0].require_float("monthly_cost").unwrap(), 16.0);
    }

    #[test]
    fn test_snapshot_orphan_detection() {
        let volumes: Vec<RawVolume> = serde_json::from_str(
            r#"[{"VolumeId": "vol-live", "Size": 10}]"#,
        )
        .unwrap();
        let snapshots: Vec<RawSnapshot> = serde_json::from_str(
            r#"[
                {"SnapshotId": "snap-1", "VolumeId": "vol-live", "VolumeSize": 10},
                {"SnapshotId": "snap-2", "VolumeId": "vol-gone", "VolumeSize": 40}
            ]"#,
        )
        .unwrap();
        let descriptors = normalize_snapshots(&snapshots, &volumes, &ctx());
        assert!(descriptors[0].require_bool("has_parent_volume").unwrap());
        assert!(!descriptors[1].require_bool("has_parent_volume").unwrap());
        assert_eq!(descriptors[1].require_float("monthly_cost").unwrap(), 2.0);
    }

    #[test]
    fn test_address_association() {
        let addresses: Vec<RawAddress> = serde_json::from_str(
            r#"[
                {"AllocationId": "eipalloc-1", "AssociationId": "eipassoc-1", "InstanceId": "i-1"},
                {"AllocationId": "eipalloc-2", "PublicIp": "203.0.113.9"}
            ]"#,
        )
        .unwrap();
        let descriptors = normalize_addresses(&addresses);
        assert!(descriptors[0].require_bool("associated").unwrap());
        assert!(!descriptors[1].require_bool("associated").unwrap());
        assert_eq!(descriptors[1].resource_id, "eipalloc-2");
    }
}
