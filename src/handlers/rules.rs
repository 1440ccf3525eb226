//! Handler for the `rules` command: print the rule catalog.

use colored::*;

use crate::cli::{CategoryFilter, OutputFormat};
use crate::engine::rules::rule_definitions;
use crate::engine::types::Category;
use crate::error::Result;

fn filter_category(filter: CategoryFilter) -> Category {
    match filter {
        CategoryFilter::Security => Category::Security,
        CategoryFilter::Cost => Category::Cost,
        CategoryFilter::Compliance => Category::Compliance,
        CategoryFilter::Performance => Category::Performance,
    }
}

pub fn handle_rules(category: Option<CategoryFilter>, format: OutputFormat) -> Result<()> {
    let wanted = category.map(filter_category);
    let definitions: Vec<_> = rule_definitions()
        .iter()
        .filter(|d| wanted.is_none_or(|c| d.category == c))
        .collect();

    match format {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = definitions
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "code": d.code,
                        "name": d.name,
                        "category": d.category,
                        "default_severity": d.default_severity,
                        "resource_types": d.resource_types,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Table => {
            println!("\n{}", "Rule catalog".bold());
            println!("{}", "=".repeat(72));
            for d in &definitions {
                let types: Vec<&str> = d.resource_types.iter().map(|t| t.as_str()).collect();
                println!(
                    "{}  {:<28} {:<12} {:<9} [{}]",
                    d.code.bold(),
                    d.name,
                    format!("{:?}", d.category).to_lowercase(),
                    format!("{:?}", d.default_severity).to_lowercase(),
                    types.join(", "),
                );
            }
            println!("\n{} rules", definitions.len());
        }
    }
    Ok(())
}
