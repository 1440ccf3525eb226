//! Rule engine: descriptors in, severity-ranked report out.
//!
//! The engine is pure, in-memory computation. Fetching data from AWS,
//! credentials, pagination and retries all belong to whatever produced
//! the descriptors (normally `normalize` applied to an account snapshot).

pub mod aggregate;
pub mod context;
pub mod descriptor;
pub mod evaluate;
pub mod rules;
pub mod types;

pub use aggregate::{Report, Summary, aggregate, merge};
pub use context::{ConfigError, PriceTable, RuleContext};
pub use descriptor::{
    AttrValue, IngressRule, MissingAttribute, PolicyStatement, ResourceDescriptor, ResourceType,
};
pub use evaluate::{Evaluation, evaluate, evaluate_with_rules};
pub use rules::{Rule, RuleDefinition, all_rules, rule_definitions, rules_in_categories};
pub use types::{Category, Finding, RuleCode, Severity};
