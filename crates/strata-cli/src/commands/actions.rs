//! Control protocol listing.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use strata_synth::Action;

#[derive(Args)]
pub struct ActionsArgs {
    /// Show a single action by name or code
    #[arg(value_name = "ACTION")]
    action: Option<String>,
}

pub fn run(args: ActionsArgs) -> anyhow::Result<()> {
    if let Some(query) = &args.action {
        let action = lookup(query)
            .ok_or_else(|| anyhow::anyhow!("Unknown action: {}", query))?;
        println!("{} (code {})", action.name(), action.code());
        println!("  {}", action.description());
        return Ok(());
    }

    println!("Control Actions");
    println!("===============");
    println!();
    println!("  {:>4}  {:18}  {}", "Code", "Name", "Meaning");
    println!("  {:>4}  {:18}  {}", "----", "----", "-------");
    for action in Action::ALL {
        println!(
            "  {:>4}  {:18}  {}",
            action.code(),
            action.name(),
            action.description()
        );
    }
    Ok(())
}

/// Resolve a snake_case name or an integer wire code.
fn lookup(query: &str) -> Option<Action> {
    query
        .parse::<Action>()
        .ok()
        .or_else(|| query.parse::<i32>().ok().and_then(Action::from_code))
}
