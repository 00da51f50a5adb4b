//! Reprocess command implementation
//!
//! Runs the batch reprocessor in the background, feeds its progress events
//! into a progress bar and cancels between employees on Ctrl-C. Exits with
//! code 2 when any employee failed.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use lf_core::EmployeeId;
use lf_engine::{EmployeeScope, ReprocessEvent, ReprocessSummary, Reprocessor};

use crate::cli::{GlobalArgs, OutputFormat, ReprocessArgs};
use crate::commands::common::{print_json, ExitCode};
use crate::context::RuntimeContext;

/// Execute the reprocess command
pub(crate) async fn execute(args: &ReprocessArgs, global: &GlobalArgs) -> Result<()> {
    let scope = match &args.employee {
        Some(employee) => EmployeeScope::One(
            employee
                .parse::<EmployeeId>()
                .context("Invalid --employee")?,
        ),
        None => EmployeeScope::All,
    };
    if args.threads == Some(0) {
        anyhow::bail!("--threads must be at least 1");
    }

    let ctx = RuntimeContext::new(global)?;
    let policy = ctx.policy().await?;
    let threads = args.threads.unwrap_or(ctx.config.reprocess.threads);
    let show_progress = !args.quiet && args.output == OutputFormat::Text;

    let mut handle = Reprocessor::new(ctx.store(), &policy)
        .with_threads(threads)
        .spawn(scope, args.from);

    let cancel = handle.cancel_flag();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nCancelling: employees already started will finish first");
            cancel.cancel();
        }
    });

    let mut progress: Option<ProgressBar> = None;
    while let Some(event) = handle.next_event().await {
        match event {
            ReprocessEvent::Started { employees } => {
                if show_progress {
                    progress = Some(progress_bar(employees));
                }
            }
            ReprocessEvent::EmployeeDone {
                employee_id,
                records_updated,
            } => {
                if let Some(pb) = &progress {
                    pb.set_message(format!("{} ({} updated)", employee_id, records_updated));
                    pb.inc(1);
                }
            }
            ReprocessEvent::EmployeeFailed {
                employee_id,
                message,
            } => match &progress {
                Some(pb) => {
                    pb.println(format!("[error] {}: {}", employee_id, message));
                    pb.inc(1);
                }
                None => eprintln!("[error] {}: {}", employee_id, message),
            },
            ReprocessEvent::Finished(_) => {}
        }
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    interrupt.abort();

    let summary = handle.wait().await.context("Reprocess failed")?;

    match args.output {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => print_summary(&summary, args),
    }

    if summary.has_errors() {
        return Err(ExitCode(2).into());
    }
    Ok(())
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

fn print_summary(summary: &ReprocessSummary, args: &ReprocessArgs) {
    if summary.cancelled {
        println!("Reprocess cancelled.");
    }
    println!(
        "Reprocessed {} employee(s) from {}: {} record(s) updated across {} employee(s)",
        summary.employees_processed,
        args.from,
        summary.records_updated,
        summary.employees_affected
    );
    if summary.has_errors() {
        println!("\n{} employee(s) failed:", summary.errors.len());
        for err in &summary.errors {
            match err.date {
                Some(date) => println!("  {} ({}): {}", err.employee_id, date, err.message),
                None => println!("  {}: {}", err.employee_id, err.message),
            }
        }
    }
}

#[cfg(test)]
#[path = "reprocess_test.rs"]
mod tests;
