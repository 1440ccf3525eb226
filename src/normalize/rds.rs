//! RDS instance shapes. Field names here do not follow a uniform case
//! convention upstream (`DBInstanceIdentifier` vs `PubliclyAccessible`),
//! so renames are explicit.

use serde::Deserialize;

use super::{RawTag, tags_to_map};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{ResourceDescriptor, ResourceType};
use crate::engine::types::round_cost;

#[derive(Debug, Clone, Deserialize)]
pub struct RawDbInstance {
    #[serde(rename = "DBInstanceIdentifier")]
    pub db_instance_identifier: String,
    #[serde(rename = "DBInstanceClass", default)]
    pub db_instance_class: Option<String>,
    #[serde(rename = "Engine", default)]
    pub engine: Option<String>,
    #[serde(rename = "PubliclyAccessible", default)]
    pub publicly_accessible: Option<bool>,
    #[serde(rename = "StorageEncrypted", default)]
    pub storage_encrypted: Option<bool>,
    #[serde(rename = "TagList", default)]
    pub tag_list: Vec<RawTag>,
}

pub fn normalize_db_instances(
    instances: &[RawDbInstance],
    ctx: &RuleContext,
) -> Vec<ResourceDescriptor> {
    instances
        .iter()
        .map(|db| {
            let monthly_cost = db
                .db_instance_class
                .as_deref()
                .map(|class| round_cost(ctx.prices.instance_monthly(class)));
            let mut descriptor = ResourceDescriptor::new(
                ResourceType::RdsInstance,
                db.db_instance_identifier.clone(),
            )
            .attr_opt("publicly_accessible", db.publicly_accessible)
            .attr_opt("storage_encrypted", db.storage_encrypted)
            .attr_opt("engine", db.engine.clone())
            .attr_opt("instance_class", db.db_instance_class.clone())
            .attr_opt("monthly_cost", monthly_cost);
            descriptor.tags = tags_to_map(&db.tag_list);
            descriptor
        })
        .collect()
}
