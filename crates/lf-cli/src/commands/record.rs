//! Record command implementation - the single-record save path

use anyhow::{Context, Result};
use lf_core::{AttendanceRecord, AttendanceStatus, EmployeeId, HalfDayType, RecordId};
use lf_engine::{save_record, SaveOutcome};

use crate::cli::{GlobalArgs, OutputFormat, RecordArgs};
use crate::commands::common::{print_json, yes_no};
use crate::context::RuntimeContext;

/// Execute the record command
pub(crate) async fn execute(args: &RecordArgs, global: &GlobalArgs) -> Result<()> {
    let record = build_record(args)?;
    let ctx = RuntimeContext::new(global)?;
    let policy = ctx.policy().await?;

    let outcome = save_record(ctx.db.as_ref(), &policy, record)
        .await
        .with_context(|| format!("Failed to save record '{}'", args.id))?;

    match args.output {
        OutputFormat::Json => print_json(&outcome),
        OutputFormat::Text => {
            print_outcome(&outcome);
            Ok(())
        }
    }
}

/// Attendance record described by the command-line flags
pub(crate) fn build_record(args: &RecordArgs) -> Result<AttendanceRecord> {
    let id: RecordId = args.id.parse().context("Invalid --id")?;
    let employee: EmployeeId = args.employee.parse().context("Invalid --employee")?;

    let mut record = AttendanceRecord::new(id, employee, args.date, args.late);
    if let Some(status) = &args.status {
        let status: AttendanceStatus = status.parse()?;
        record = record.with_status(status);
    }
    if let Some(half_day) = &args.half_day_type {
        let half_day: HalfDayType = half_day.parse()?;
        record = record.with_half_day(half_day, args.genuine);
    }
    Ok(record)
}

fn print_outcome(outcome: &SaveOutcome) {
    let record = &outcome.record;
    let verb = if outcome.replaced { "Updated" } else { "Saved" };
    println!(
        "{} {} for employee {} on {} (late: {})",
        verb,
        record.id,
        record.employee_id,
        record.date,
        yes_no(record.is_late)
    );
    if record.is_late {
        println!("  Strike count: {}", record.derived.strike_count);
    }
    if let Some(remark) = &outcome.decision.remark {
        println!("  Penalty: {}", remark);
    }
    if outcome.stale_later_records > 0 {
        println!();
        println!(
            "{} later record(s) for this employee were not recounted. Refresh them with:",
            outcome.stale_later_records
        );
        println!(
            "  lf reprocess --from {} --employee {}",
            record.date, record.employee_id
        );
    }
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
