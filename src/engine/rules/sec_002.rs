//! SEC-002: open-port
//!
//! Internet-wide ingress on a non-sensitive port. Lower grade than SEC-001
//! but still worth review for anything that is not a public-facing service.

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct OpenPortRule;

impl Rule for OpenPortRule {
    fn code(&self) -> &'static str {
        codes::OPEN_PORT
    }

    fn name(&self) -> &'static str {
        "open-port"
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn default_severity(&self) -> Severity {
        Severity::Medium
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
            if rule.covers_all_ports() {
                continue; // SEC-003
            }
            // Ranges touching a sensitive port are SEC-001's concern.
            if ctx.sensitive_ports.iter().any(|p| rule.covers_port(*p)) {
                continue;
            }
            let range = match (rule.from_port, rule.to_port) {
                (Some(from), Some(to)) if from == to => format!("port {}", from),
                (Some(from), Some(to)) => format!("ports {}-{}", from, to),
                _ => "unspecified ports".to_string(),
            };
            exposures.push(format!("ingress {} on {}", rule.cidr, range));
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
                "Security group '{}' allows unrestricted ingress",
                resource.resource_id
            ),
            "Confirm the service is meant to be public; otherwise restrict the source CIDR.",
        );
        for fact in exposures {
            finding = finding.with_rationale(fact);
        }
        Ok(vec![finding])
    }
}
