use std::collections::BTreeMap;

use serde::Deserialize;

use crate::engine::context::{PriceTable, RuleContext};

/// On-disk configuration file. Every section and field is optional; what
/// is absent keeps its built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub thresholds: Thresholds,
    pub prices: Prices,
    pub sensitive_ports: Option<Vec<u16>>,
    pub required_tags: Option<Vec<String>>,
    pub max_recommendations: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    pub max_key_age_days: Option<i64>,
    pub max_snapshot_age_days: Option<i64>,
    pub idle_cpu_threshold: Option<f64>,
    pub high_cpu_threshold: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Prices {
    pub elastic_ip_monthly: Option<f64>,
    pub snapshot_gb_monthly: Option<f64>,
    pub default_volume_gb_monthly: Option<f64>,
    pub default_instance_hourly: Option<f64>,
    /// Per-GB monthly overrides keyed by volume type; merged over defaults.
    pub volume_gb_monthly: BTreeMap<String, f64>,
    /// Hourly overrides keyed by instance class; merged over defaults.
    pub instance_hourly: BTreeMap<String, f64>,
}

impl Config {
    /// Overlay this file's values onto the default rule context. Validation
    /// happens later, at the start of the evaluation pass.
    pub fn into_context(self) -> RuleContext {
        let mut ctx = RuleContext::default();
        let mut prices = PriceTable::default();

        if let Some(v) = self.thresholds.max_key_age_days {
            ctx.max_key_age_days = v;
        }
        if let Some(v) = self.thresholds.max_snapshot_age_days {
            ctx.max_snapshot_age_days = v;
        }
        if let Some(v) = self.thresholds.idle_cpu_threshold {
            ctx.idle_cpu_threshold = v;
        }
        if let Some(v) = self.thresholds.high_cpu_threshold {
            ctx.high_cpu_threshold = v;
        }

        if let Some(v) = self.prices.elastic_ip_monthly {
            prices.elastic_ip_monthly = v;
        }
        if let Some(v) = self.prices.snapshot_gb_monthly {
            prices.snapshot_gb_monthly = v;
        }
        if let Some(v) = self.prices.default_volume_gb_monthly {
            prices.default_volume_gb_monthly = v;
        }
        if let Some(v) = self.prices.default_instance_hourly {
            prices.default_instance_hourly = v;
        }
        prices.volume_gb_monthly.extend(self.prices.volume_gb_monthly);
        prices.instance_hourly.extend(self.prices.instance_hourly);
        ctx.prices = prices;

        if let Some(ports) = self.sensitive_ports {
            ctx.sensitive_ports = ports;
        }
        if let Some(tags) = self.required_tags {
            ctx.required_tags = tags;
        }
        if let Some(cap) = self.max_recommendations {
            ctx.max_recommendations = cap;
        }
        ctx
    }
}
