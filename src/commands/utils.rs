use crate::parser::{load_rules, RuleSet};
use anyhow::{Context, Result};
use std::path::Path;

/// Load rules from a TOML file, or fall back to the built-in table
pub fn load_rule_set(path: Option<&Path>) -> Result<RuleSet> {
    match path {
        Some(path) => load_rules(path)
            .with_context(|| format!("Failed to load field rules from {}", path.display())),
        None => Ok(RuleSet::default()),
    }
}

/// Display the effective field type rules
pub fn display_rules(path: Option<&Path>) -> Result<()> {
    let rules = load_rule_set(path)?;

    match path {
        Some(p) => println!("Field rules from {}", p.display()),
        None => println!("Built-in field rules"),
    }
    println!();

    for rule in rules.rules() {
        println!("  {:<10} {}", rule.kind().to_string(), rule.pattern());
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Flow Collect v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Flattens Flow123d profiler traces into indexed benchmark documents.");
}
