//! Seed command implementation - bulk import of attendance records

use anyhow::{Context, Result};
use lf_db::AttendanceStore;
use std::collections::BTreeSet;

use crate::cli::{GlobalArgs, SeedArgs};
use crate::context::RuntimeContext;

/// Execute the seed command
pub(crate) async fn execute(args: &SeedArgs, global: &GlobalArgs) -> Result<()> {
    if !args.file.exists() {
        anyhow::bail!("Seed file not found: {}", args.file.display());
    }

    let ctx = RuntimeContext::new(global)?;

    let records = ctx
        .db
        .read_csv(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    if records.is_empty() {
        println!("No records found in {}", args.file.display());
        return Ok(());
    }

    let employees: BTreeSet<_> = records.iter().map(|r| &r.employee_id).collect();
    let earliest = records.iter().map(|r| r.date).min();

    let inserted = ctx
        .db
        .insert_records(&records)
        .await
        .with_context(|| format!("Failed to import {}", args.file.display()))?;
    log::info!(
        "Imported {} records for {} employees from {}",
        inserted,
        employees.len(),
        args.file.display()
    );

    println!(
        "Loaded {} records for {} employees from {}",
        inserted,
        employees.len(),
        args.file.display()
    );
    if let Some(from) = earliest {
        println!("Imported records have no strike counts yet. Derive them with:");
        println!("  lf reprocess --from {}", from);
    }

    Ok(())
}

#[cfg(test)]
#[path = "seed_test.rs"]
mod tests;
