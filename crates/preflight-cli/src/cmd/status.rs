use crate::output::print_json;
use anyhow::Context;
use preflight_core::availability::{self, MessageKind};
use preflight_core::capability::LinkedResolver;
use preflight_core::config::Config;
use std::path::Path;

/// MCP is optional, so an unavailable status still exits 0.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let status = availability::check(root, &config, &LinkedResolver::builtin());
    let message = availability::status_message(&status);

    if json {
        let value = serde_json::json!({
            "status": status,
            "message": message,
        });
        return print_json(&value);
    }

    println!("{}", message.title);
    println!("{}", message.message);
    println!("{}", message.details);

    if message.kind == MessageKind::Warning {
        println!();
        for (issue, fix) in message.issues.iter().zip(&message.recommendations) {
            println!("  - {issue}");
            println!("    → {fix}");
        }
        println!();
        println!("Run 'preflight setup' for step-by-step instructions.");
    }

    Ok(())
}
