//! Status command implementation

use anyhow::{Context, Result};
use lf_core::EmployeeId;
use lf_engine::get_late_status;

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::{print_json, yes_no};
use crate::context::RuntimeContext;

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let employee: EmployeeId = args.employee.parse().context("Invalid --employee")?;
    let ctx = RuntimeContext::new(global)?;
    let policy = ctx.policy().await?;

    let status = get_late_status(ctx.db.as_ref(), &policy, &employee, args.date)
        .await
        .with_context(|| format!("Failed to compute late status for '{}'", employee))?;

    if args.output == OutputFormat::Json {
        return print_json(&status);
    }

    if !status.enabled {
        println!("Late penalties are disabled.");
        return Ok(());
    }
    println!("Employee {} as of {}", employee, args.date);
    println!("  Late arrivals:     {}", status.late_count);
    if let Some(run) = status.consecutive_count {
        println!("  Consecutive run:   {}", run);
    }
    println!(
        "  Policy:            {} strike(s), {}",
        status.threshold, status.counting_mode
    );
    println!("  Next late penalty: {}", yes_no(status.next_will_trigger));
    Ok(())
}
