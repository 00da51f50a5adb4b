//! Report command implementation - monthly late summary

use anyhow::{Context, Result};
use lf_engine::{monthly_summary, MonthlySummary};

use crate::cli::{GlobalArgs, OutputFormat, ReportArgs};
use crate::commands::common::{print_json, yes_no};
use crate::context::RuntimeContext;

/// Execute the report command
pub(crate) async fn execute(args: &ReportArgs, global: &GlobalArgs) -> Result<()> {
    let (year, month) = args.month;
    let ctx = RuntimeContext::new(global)?;
    let policy = ctx.policy().await?;

    let summary = monthly_summary(ctx.db.as_ref(), &policy, year, month)
        .await
        .with_context(|| format!("Failed to build report for {:04}-{:02}", year, month))?;

    match args.output {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Text => {
            print_report(&summary);
            Ok(())
        }
    }
}

fn print_report(summary: &MonthlySummary) {
    println!(
        "Late arrivals for {:04}-{:02}",
        summary.year, summary.month
    );
    if summary.policy_enabled {
        println!(
            "Policy: {} strike(s), {}\n",
            summary.threshold, summary.counting_mode
        );
    } else {
        println!("Policy: disabled\n");
    }

    if summary.employees.is_empty() {
        println!("No late arrivals recorded.");
        return;
    }

    let id_width = summary
        .employees
        .iter()
        .map(|e| e.employee_id.len())
        .max()
        .unwrap_or(0)
        .max("EMPLOYEE".len());
    println!(
        "{:<id_width$}  {:>5}  {:>9}  {:>9}  DATES",
        "EMPLOYEE", "LATE", "PENALTIES", "THRESHOLD"
    );
    for employee in &summary.employees {
        let dates: Vec<String> = employee
            .late_dates
            .iter()
            .map(|d| d.format("%d").to_string())
            .collect();
        println!(
            "{:<id_width$}  {:>5}  {:>9}  {:>9}  {}",
            employee.employee_id.as_str(),
            employee.late_count,
            employee.penalties_recorded,
            yes_no(employee.threshold_reached),
            dates.join(",")
        );
    }
    println!();
    println!(
        "{} late arrival(s), {} employee(s) at or over the threshold",
        summary.total_late(),
        summary.over_threshold().count()
    );
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
