//! SEC-003: open-all-ports
//!
//! Internet-wide ingress spanning the entire port range (0-65535 or the
//! all-traffic protocol).

use super::{Rule, codes};
use crate::engine::context::RuleContext;
use crate::engine::descriptor::{MissingAttribute, ResourceDescriptor, ResourceType};
use crate::engine::types::{Category, Finding, Severity};

pub struct OpenAllPortsRule;

impl Rule for OpenAllPortsRule {
    fn code(&self) -> &'static str {
        codes::OPEN_ALL_PORTS
    }

    fn name(&self) -> &'static str {
        "open-all-ports"
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn default_severity(&self) -> Severity {
        Severity::High
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
        _ctx: &RuleContext,
    ) -> Result<Vec<Finding>, MissingAttribute> {
        let ingress = resource.require_ingress("ingress")?;

        let mut exposures = Vec::new();
        for rule in ingress.iter().filter(|r| r.public && r.covers_all_ports()) {
            let what = if rule.protocol == "-1" {
                "all protocols".to_string()
            } else {
                format!("{} 0-65535", rule.protocol)
            };
            exposures.push(format!("ingress {} on {}", rule.cidr, what));
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
                "Security group '{}' opens the full port range to the internet",
                resource.resource_id
            ),
            "Replace the wildcard rule with explicit per-service port rules and trusted sources.",
        );
        for fact in exposures {
            finding = finding.with_rationale(fact);
        }
        Ok(vec![finding])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::descriptor::IngressRule;
    use crate::engine::rules::testutil::{ingress, sg_with_ingress};

    #[test]
    fn test_full_range_is_high() {
        let sg = sg_with_ingress("sg-1", vec![ingress("tcp", 0, 65535, "0.0.0.0/0")]);
        let findings = OpenAllPortsRule.check(&sg, &RuleContext::default()).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_all_traffic_protocol_is_high() {
        let sg = sg_with_ingress(
            "sg-1",
            vec![IngressRule {
                protocol: "-1".to_string(),
                from_port: None,
                to_port: None,
                cidr: "::/0".to_string(),
                public: true,
            }],
        );
        let findings = OpenAllPortsRule.check(&sg, &RuleContext::default()).unwrap();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].rationale[0].contains("all protocols"));
    }

    #[test]
    fn test_single_port_not_flagged() {
        let sg = sg_with_ingress("sg-1", vec![ingress("tcp", 443, 443, "0.0.0.0/0")]);
        assert!(
            OpenAllPortsRule
                .check(&sg, &RuleContext::default())
                .unwrap()
                .is_empty()
        );
    }
}
