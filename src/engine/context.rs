//! Evaluation-pass configuration.
//!
//! A `RuleContext` carries every threshold and unit price the rules read,
//! plus the evaluation timestamp used for age computations. It is built
//! once per pass and never mutated during it, which is what keeps rules
//! free of cross-rule ordering effects.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hours in a month, for converting hourly instance prices.
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Default sensitive ports: SSH, RDP, common databases and search engines.
pub const DEFAULT_SENSITIVE_PORTS: &[u16] =
    &[22, 3389, 3306, 5432, 1433, 27017, 6379, 9200, 5601, 8020];

/// Configuration problems detected before a pass runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("threshold '{name}' must be positive, got {value}")]
    NonPositiveThreshold { name: &'static str, value: f64 },

    #[error("price '{name}' must be non-negative, got {value}")]
    NegativePrice { name: String, value: f64 },

    #[error("sensitive port list must not be empty")]
    EmptySensitivePorts,

    #[error("max_recommendations must be at least 1")]
    ZeroRecommendationCap,
}

// ============================================================================
// Price table
// ============================================================================

/// Unit prices used to estimate the monthly cost of zombie resources.
///
/// On-demand us-east-1 list prices; override per pass when they drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceTable {
    /// Monthly price of an allocated but unassociated Elastic IP.
    pub elastic_ip_monthly: f64,
    /// Monthly price per GB of EBS storage, keyed by volume type.
    pub volume_gb_monthly: BTreeMap<String, f64>,
    /// Fallback per-GB price for unknown volume types.
    pub default_volume_gb_monthly: f64,
    /// Monthly price per GB of EBS snapshot storage.
    pub snapshot_gb_monthly: f64,
    /// Hourly on-demand price keyed by instance class.
    pub instance_hourly: BTreeMap<String, f64>,
    /// Fallback hourly price for unknown instance classes.
    pub default_instance_hourly: f64,
}

impl Default for PriceTable {
    fn default() -> Self {
        let mut volume_gb_monthly = BTreeMap::new();
        volume_gb_monthly.insert("gp2".to_string(), 0.10);
        volume_gb_monthly.insert("gp3".to_string(), 0.08);
        volume_gb_monthly.insert("io1".to_string(), 0.125);
        volume_gb_monthly.insert("io2".to_string(), 0.125);
        volume_gb_monthly.insert("st1".to_string(), 0.045);
        volume_gb_monthly.insert("sc1".to_string(), 0.015);

        let mut instance_hourly = BTreeMap::new();
        instance_hourly.insert("t2.micro".to_string(), 0.0116);
        instance_hourly.insert("t3.micro".to_string(), 0.0104);
        instance_hourly.insert("t3.small".to_string(), 0.0208);
        instance_hourly.insert("t3.medium".to_string(), 0.0416);
        instance_hourly.insert("t3.large".to_string(), 0.0832);
        instance_hourly.insert("m5.large".to_string(), 0.096);
        instance_hourly.insert("m5.xlarge".to_string(), 0.192);
        instance_hourly.insert("m5.2xlarge".to_string(), 0.384);
        instance_hourly.insert("c5.large".to_string(), 0.085);
        instance_hourly.insert("c5.xlarge".to_string(), 0.17);
        instance_hourly.insert("r5.large".to_string(), 0.126);
        instance_hourly.insert("r5.xlarge".to_string(), 0.252);
        instance_hourly.insert("db.t3.micro".to_string(), 0.017);
        instance_hourly.insert("db.t3.medium".to_string(), 0.068);
        instance_hourly.insert("db.m5.large".to_string(), 0.171);

        Self {
            elastic_ip_monthly: 3.65,
            volume_gb_monthly,
            default_volume_gb_monthly: 0.10,
            snapshot_gb_monthly: 0.05,
            instance_hourly,
            default_instance_hourly: 0.05,
        }
    }
}

impl PriceTable {
    /// Monthly per-GB storage price for a volume type.
    pub fn volume_gb_price(&self, volume_type: &str) -> f64 {
        self.volume_gb_monthly
            .get(volume_type)
            .copied()
            .unwrap_or(self.default_volume_gb_monthly)
    }

    /// Full monthly on-demand cost of an instance class.
    pub fn instance_monthly(&self, instance_type: &str) -> f64 {
        let hourly = self
            .instance_hourly
            .get(instance_type)
            .copied()
            .unwrap_or(self.default_instance_hourly);
        hourly * HOURS_PER_MONTH
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("elastic_ip_monthly", self.elastic_ip_monthly),
            ("default_volume_gb_monthly", self.default_volume_gb_monthly),
            ("snapshot_gb_monthly", self.snapshot_gb_monthly),
            ("default_instance_hourly", self.default_instance_hourly),
        ];
        for (name, value) in named {
            if value < 0.0 {
                return Err(ConfigError::NegativePrice {
                    name: name.to_string(),
                    value,
                });
            }
        }
        for (name, value) in self.volume_gb_monthly.iter().chain(&self.instance_hourly) {
            if *value < 0.0 {
                return Err(ConfigError::NegativePrice {
                    name: name.clone(),
                    value: *value,
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Rule context
// ============================================================================

/// Read-only configuration shared by all rules during one evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleContext {
    /// Timestamp used for all age computations. Injectable for tests.
    pub evaluated_at: DateTime<Utc>,
    /// Access keys older than this are flagged.
    pub max_key_age_days: i64,
    /// Orphaned snapshots older than this are flagged.
    pub max_snapshot_age_days: i64,
    /// Average CPU below this (percent) marks an instance idle.
    pub idle_cpu_threshold: f64,
    /// Average CPU above this (percent) marks an instance overloaded.
    pub high_cpu_threshold: f64,
    /// Ports whose public exposure is critical rather than medium.
    pub sensitive_ports: Vec<u16>,
    /// Cost-allocation tags every taggable resource must carry.
    /// Empty means the tag rule is inert.
    pub required_tags: Vec<String>,
    /// Unit prices for impact estimation.
    pub prices: PriceTable,
    /// Cap on the report's deduplicated recommendation list.
    pub max_recommendations: usize,
}

impl Default for RuleContext {
    fn default() -> Self {
        Self {
            evaluated_at: Utc::now(),
            max_key_age_days: 90,
            max_snapshot_age_days: 90,
            idle_cpu_threshold: 5.0,
            high_cpu_threshold: 80.0,
            sensitive_ports: DEFAULT_SENSITIVE_PORTS.to_vec(),
            required_tags: Vec::new(),
            prices: PriceTable::default(),
            max_recommendations: 10,
        }
    }
}

impl RuleContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_evaluated_at(mut self, at: DateTime<Utc>) -> Self {
        self.evaluated_at = at;
        self
    }

    pub fn with_max_key_age_days(mut self, days: i64) -> Self {
        self.max_key_age_days = days;
        self
    }

    pub fn with_max_snapshot_age_days(mut self, days: i64) -> Self {
        self.max_snapshot_age_days = days;
        self
    }

    pub fn with_idle_cpu_threshold(mut self, percent: f64) -> Self {
        self.idle_cpu_threshold = percent;
        self
    }

    pub fn with_high_cpu_threshold(mut self, percent: f64) -> Self {
        self.high_cpu_threshold = percent;
        self
    }

    pub fn with_sensitive_ports(mut self, ports: Vec<u16>) -> Self {
        self.sensitive_ports = ports;
        self
    }

    pub fn with_required_tags(mut self, tags: Vec<String>) -> Self {
        self.required_tags = tags;
        self
    }

    pub fn with_prices(mut self, prices: PriceTable) -> Self {
        self.prices = prices;
        self
    }

    pub fn with_max_recommendations(mut self, cap: usize) -> Self {
        self.max_recommendations = cap;
        self
    }

    /// Whole days between `at` and the evaluation time. Future timestamps
    /// clamp to zero.
    pub fn age_days(&self, at: DateTime<Utc>) -> i64 {
        (self.evaluated_at - at).num_days().max(0)
    }

    /// Reject out-of-range configuration before any evaluation runs,
    /// so a pass never partially executes with bad thresholds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = [
            ("max_key_age_days", self.max_key_age_days as f64),
            ("max_snapshot_age_days", self.max_snapshot_age_days as f64),
            ("idle_cpu_threshold", self.idle_cpu_threshold),
            ("high_cpu_threshold", self.high_cpu_threshold),
        ];
        for (name, value) in thresholds {
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveThreshold { name, value });
            }
        }
        if self.sensitive_ports.is_empty() {
            return Err(ConfigError::EmptySensitivePorts);
        }
        if self.max_recommendations == 0 {
            return Err(ConfigError::ZeroRecommendationCap);
        }
        self.prices.validate()
    }
}
