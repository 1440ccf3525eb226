//! Core value types for the rule engine.
//!
//! These types follow the pattern used by our other analysis layers:
//! - `Severity` - Finding severity levels
//! - `Category` - What aspect of the account a finding concerns
//! - `RuleCode` - Rule identifiers (e.g., "SEC-001")
//! - `Finding` - One rule's verdict on one resource

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::descriptor::ResourceType;

// ============================================================================
// Severity
// ============================================================================

/// Severity levels for findings.
///
/// Ordered from most severe to least severe:
/// `Critical > High > Medium > Low`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Issues that require immediate attention (e.g., admin access open to the world)
    Critical,
    /// High impact issues (significant exposure or waste)
    High,
    /// Medium impact issues
    Medium,
    /// Low impact issues
    Low,
}

impl Severity {
    /// Parse a severity from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so Critical > High > Medium > Low
        other.rank().cmp(&self.rank())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// Category
// ============================================================================

/// What aspect of the account a rule (and its findings) concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Exposure, privilege, credential hygiene
    Security,
    /// Resources incurring avoidable spend
    Cost,
    /// Settings required by baseline policy (e.g., encryption at rest)
    Compliance,
    /// Capacity and utilization issues
    Performance,
}

impl Category {
    /// Parse a category from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "security" => Some(Self::Security),
            "cost" => Some(Self::Cost),
            "compliance" => Some(Self::Compliance),
            "performance" => Some(Self::Performance),
            _ => None,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::Cost => "cost",
            Self::Compliance => "compliance",
            Self::Performance => "performance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Rule Codes
// ============================================================================

/// A rule code identifier (e.g., "SEC-001").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleCode(pub String);

impl RuleCode {
    /// Create a new rule code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RuleCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RuleCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ============================================================================
// Finding
// ============================================================================

/// One rule's verdict on one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// The rule that produced this finding.
    pub rule_id: RuleCode,
    /// Type of the resource the finding refers to.
    pub resource_type: ResourceType,
    /// Identifier of the resource within its type.
    pub resource_id: String,
    /// Severity of the finding.
    pub severity: Severity,
    /// Category of the rule.
    pub category: Category,
    /// Short human-readable statement.
    pub title: String,
    /// Concrete facts supporting the verdict.
    pub rationale: Vec<String>,
    /// Estimated monthly cost impact in USD, when the finding has one.
    /// Used as the secondary sort key; always non-negative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_monthly_impact: Option<f64>,
    /// Actionable remediation text.
    pub recommendation: String,
}

impl Finding {
    /// Create a new finding without a cost impact.
    pub fn new(
        rule_id: impl Into<RuleCode>,
        resource_type: ResourceType,
        resource_id: impl Into<String>,
        severity: Severity,
        category: Category,
        title: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            resource_type,
            resource_id: resource_id.into(),
            severity,
            category,
            title: title.into(),
            rationale: Vec::new(),
            estimated_monthly_impact: None,
            recommendation: recommendation.into(),
        }
    }

    /// Append a supporting fact.
    pub fn with_rationale(mut self, fact: impl Into<String>) -> Self {
        self.rationale.push(fact.into());
        self
    }

    /// Set the estimated monthly impact. Negative values are clamped to zero.
    pub fn with_impact(mut self, monthly_usd: f64) -> Self {
        self.estimated_monthly_impact = Some(monthly_usd.max(0.0));
        self
    }
}

/// Round a cost to 2 decimal places.
pub fn round_cost(cost: f64) -> f64 {
    (cost * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("critical"), Some(Severity::Critical));
        assert_eq!(Severity::parse("HIGH"), Some(Severity::High));
        assert_eq!(Severity::parse("Medium"), Some(Severity::Medium));
        assert_eq!(Severity::parse("low"), Some(Severity::Low));
        assert_eq!(Severity::parse("invalid"), None);
    }

    #[test]
    fn test_severity_max_picks_most_severe() {
        let severities = [Severity::Low, Severity::Critical, Severity::Medium];
        assert_eq!(severities.iter().max(), Some(&Severity::Critical));
    }

    #[test]
    fn test_category_roundtrip() {
        for c in [
            Category::Security,
            Category::Cost,
            Category::Compliance,
            Category::Performance,
        ] {
            assert_eq!(Category::parse(c.as_str()), Some(c));
        }
    }

    #[test]
    fn test_rule_code() {
        let code = RuleCode::new("SEC-001");
        assert_eq!(code.as_str(), "SEC-001");
        assert_eq!(code.to_string(), "SEC-001");
        assert_eq!(RuleCode::from("SEC-001"), code);
    }

    #[test]
    fn test_finding_impact_clamped() {
        let f = Finding::new(
            "COST-001",
            ResourceType::Volume,
            "vol-1",
            Severity::Medium,
            Category::Cost,
            "t",
            "r",
        )
        .with_impact(-5.0);
        assert_eq!(f.estimated_monthly_impact, Some(0.0));
    }

    #[test]
    fn test_round_cost() {
        assert_eq!(round_cost(10.1234), 10.12);
        assert_eq!(round_cost(10.125), 10.13);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"critical\""
        );
    }
}
