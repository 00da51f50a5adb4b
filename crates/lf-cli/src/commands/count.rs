//! Count command implementation

use anyhow::{Context, Result};
use lf_core::{EmployeeId, RecordId};
use lf_engine::get_late_count;

use crate::cli::{CountArgs, GlobalArgs, OutputFormat};
use crate::commands::common::print_json;
use crate::context::RuntimeContext;

/// Execute the count command
pub(crate) async fn execute(args: &CountArgs, global: &GlobalArgs) -> Result<()> {
    let employee: EmployeeId = args.employee.parse().context("Invalid --employee")?;
    let excluding: Option<RecordId> = args
        .exclude
        .as_deref()
        .map(str::parse::<RecordId>)
        .transpose()
        .context("Invalid --exclude")?;
    let ctx = RuntimeContext::new(global)?;
    let policy = ctx.policy().await?;

    let count = get_late_count(
        ctx.db.as_ref(),
        &policy,
        &employee,
        args.date,
        excluding.as_ref(),
    )
    .await
    .with_context(|| format!("Failed to count late arrivals for '{}'", employee))?;

    match args.output {
        OutputFormat::Json => print_json(&count),
        OutputFormat::Text => {
            println!("{}", count.count);
            Ok(())
        }
    }
}
