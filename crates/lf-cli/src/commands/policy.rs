//! Policy command implementation - show, set and disable the late penalty policy

use anyhow::{Context, Result};
use lf_core::{PolicyConfig, PolicySettings};
use lf_db::AttendanceStore;

use crate::cli::{GlobalArgs, OutputFormat, PolicyArgs, PolicyCommands, PolicySetArgs};
use crate::commands::common::print_json;
use crate::context::RuntimeContext;

/// Execute the policy command
pub(crate) async fn execute(args: &PolicyArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;

    match &args.command {
        PolicyCommands::Show(show) => {
            let policy = ctx.policy().await?;
            match show.output {
                OutputFormat::Json => print_json(&PolicySettings::from(&policy)),
                OutputFormat::Text => {
                    print_policy(&policy);
                    Ok(())
                }
            }
        }
        PolicyCommands::Set(set) => {
            let settings = settings_from_args(set)?;
            let policy = settings
                .validate()
                .context("Late penalty policy rejected")?;
            ctx.db
                .save_policy(&policy)
                .await
                .context("Failed to save late penalty policy")?;
            log::info!("Saved late penalty policy (enabled: {})", policy.enabled());

            println!("Policy saved.\n");
            print_policy(&policy);
            println!();
            println!("Existing records keep their strike fields until reprocessed:");
            match policy.effective_from() {
                Some(from) => println!("  lf reprocess --from {}", from),
                None => println!("  lf reprocess --from <first attendance date>"),
            }
            Ok(())
        }
        PolicyCommands::Disable => {
            let policy = ctx.policy().await?.into_disabled();
            ctx.db
                .save_policy(&policy)
                .await
                .context("Failed to save late penalty policy")?;
            log::info!("Disabled late penalty policy");
            println!("Late penalties disabled. New records are saved without strike counts.");
            Ok(())
        }
    }
}

/// Settings from `--file`, or from the individual flags
pub(crate) fn settings_from_args(args: &PolicySetArgs) -> Result<PolicySettings> {
    if let Some(path) = &args.file {
        return PolicySettings::load(path)
            .with_context(|| format!("Failed to read policy file {}", path.display()));
    }

    Ok(PolicySettings {
        enabled: !args.off,
        strike_threshold: args.threshold,
        counting_mode: args.mode.clone(),
        penalty_action: args.action.clone(),
        apply_from_date: args.from,
        window: args.window.clone(),
    })
}

fn print_policy(policy: &PolicyConfig) {
    println!(
        "Late penalty:     {}",
        if policy.enabled() { "enabled" } else { "disabled" }
    );
    println!("Strike threshold: {}", policy.threshold());
    println!("Counting mode:    {}", policy.counting_mode().as_label());
    println!("Penalty action:   {}", policy.penalty_action().as_label());
    println!("Window:           {}", policy.window().as_label());
    match policy.effective_from() {
        Some(from) => println!("Applies from:     {}", from),
        None => println!("Applies from:     all dates"),
    }
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod tests;
