use crate::output::print_json;
use anyhow::Context;
use preflight_core::availability::setup_instructions;
use preflight_core::config::Config;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let guide = setup_instructions(&config);

    if json {
        return print_json(&guide);
    }

    println!("{}", guide.title);
    for step in &guide.steps {
        println!();
        println!("{}. {}", step.step, step.title);
        println!("   {}", step.description);
        if let Some(ref command) = step.command {
            println!("   $ {command}");
        }
    }
    println!();
    println!("Note: {}", guide.note);
    Ok(())
}
