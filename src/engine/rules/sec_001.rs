//! SEC-001: open-sensitive-port
//!
//! Internet-wide ingress to a sensitive port (SSH, RDP, databases).

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct OpenSensitivePortRule;

impl Rule for OpenSensitivePortRule {
    fn code(&self) -> &'static str {
        codes::OPEN_SENSITIVE_PORT
    }

    fn name(&self) -> &'static str {
        "open-sensitive-port"
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn default_severity(&self) -> Severity {
        Severity::Critical
    }

    fn resource_types(&self) -> &'static [ResourceType] {
        &[ResourceType::SecurityGroup]
    }

    fn required_attrs(&self) -> &'static [&'static str] {
        &["ingress"]
    }

    fn check(
        &self,
        resource: &ResourceDescriptor,
        ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        let ingress = resource.require_ingress("ingress")?;

        let mut exposures = Vec::new();
        for rule in ingress.iter().filter(|r| r.public) {
            // All-port wildcards are SEC-003's concern.
            if rule.covers_all_ports() {
                continue;
            }
            for port in &ctx.sensitive_ports {
                if rule.covers_port(*port) {
                    exposures.push(format!("ingress {} on port {}", rule.cidr, port));
                }
            }
        }

        if exposures.is_empty() {
            return Ok(Vec::new());
        }

        let mut finding = Finding::new(
            self.code(),
            resource.resource_type,
            resource.resource_id.clone(),
            self.default_severity(),
            self.category(),
            format!(
                "Security group '{}' exposes sensitive ports to the internet",
                resource.resource_id
            ),
            "Restrict ingress on sensitive ports to trusted CIDR ranges, a bastion host, or a VPN.",
        );
        for fact in exposures {
            finding = finding.with_rationale(fact);
        }
        Ok(vec![finding])
    }
}
