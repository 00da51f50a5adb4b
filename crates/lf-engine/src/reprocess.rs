//! Batch reprocessing of derived strike fields.
//!
//! [`Reprocessor`] re-evaluates every record dated on or after a cutoff for
//! one or all employees under a single policy snapshot. Employees run in
//! parallel on a bounded pool; within an employee the history is folded in
//! date order and all of its updates are written in one atomic store call.
//! A failing employee is reported in the summary and does not stop the rest.

use crate::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use lf_core::{plan_updates, CountScope, EmployeeId, PolicyConfig};
use lf_db::{AttendanceStore, HistoryRange};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Default number of employees processed at once
pub const DEFAULT_THREADS: usize = 4;

/// Cooperative cancellation signal, checked once per employee before it
/// starts. An employee already being written always finishes.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Which employees a run covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeScope {
    All,
    One(EmployeeId),
}

/// One employee that could not be reprocessed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReprocessError {
    pub employee_id: EmployeeId,

    /// First affected date, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub message: String,
}

/// Aggregate result of a reprocess run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReprocessSummary {
    /// Records whose derived fields changed and were written
    pub records_updated: usize,

    /// Employees with at least one record written
    pub employees_affected: usize,

    /// Employees attempted, including failed ones
    pub employees_processed: usize,

    /// Set when cancellation skipped at least one employee
    pub cancelled: bool,

    /// Failed employees, sorted by employee id then date
    pub errors: Vec<ReprocessError>,
}

impl ReprocessSummary {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Progress notifications sent while a run is in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReprocessEvent {
    Started { employees: usize },
    EmployeeDone { employee_id: EmployeeId, records_updated: usize },
    EmployeeFailed { employee_id: EmployeeId, message: String },
    Finished(ReprocessSummary),
}

/// How one employee's task ended
enum EmployeeOutcome {
    Done(usize),
    Failed(ReprocessError),
    Skipped,
}

/// Batch driver that re-derives strike fields from a cutoff date forward
pub struct Reprocessor {
    store: Arc<dyn AttendanceStore>,
    policy: PolicyConfig,
    threads: usize,
    cancel: CancelFlag,
    progress: Option<UnboundedSender<ReprocessEvent>>,
}

impl Reprocessor {
    /// The policy is cloned here and used unchanged for the whole run
    pub fn new(store: Arc<dyn AttendanceStore>, policy: &PolicyConfig) -> Self {
        Self {
            store,
            policy: policy.clone(),
            threads: DEFAULT_THREADS,
            cancel: CancelFlag::new(),
            progress: None,
        }
    }

    /// Number of employees processed concurrently (at least 1)
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, progress: UnboundedSender<ReprocessEvent>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    fn emit(&self, event: ReprocessEvent) {
        if let Some(tx) = &self.progress {
            let _ = tx.send(event);
        }
    }

    /// Reprocess `scope` from `from_date` and wait for the summary.
    ///
    /// Only listing employees can fail the whole run; every per-employee
    /// failure lands in [`ReprocessSummary::errors`].
    pub async fn run(
        &self,
        scope: EmployeeScope,
        from_date: NaiveDate,
    ) -> EngineResult<ReprocessSummary> {
        let employees = match scope {
            EmployeeScope::All => self.store.list_employees().await?,
            EmployeeScope::One(employee) => vec![employee],
        };
        log::info!(
            "Reprocessing {} employee(s) from {} ({} threads, policy {})",
            employees.len(),
            from_date,
            self.threads,
            if self.policy.enabled() {
                "enabled"
            } else {
                "disabled"
            }
        );
        self.emit(ReprocessEvent::Started {
            employees: employees.len(),
        });

        let semaphore = Arc::new(Semaphore::new(self.threads));
        let mut handles = Vec::with_capacity(employees.len());

        for employee in employees {
            let store = Arc::clone(&self.store);
            let policy = self.policy.clone();
            let cancel = self.cancel.clone();
            let semaphore = Arc::clone(&semaphore);
            let progress = self.progress.clone();
            let task_employee = employee.clone();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return EmployeeOutcome::Skipped;
                };
                if cancel.is_cancelled() {
                    return EmployeeOutcome::Skipped;
                }

                let outcome =
                    reprocess_employee(store.as_ref(), &policy, &task_employee, from_date).await;
                let event = match &outcome {
                    EmployeeOutcome::Done(updated) => Some(ReprocessEvent::EmployeeDone {
                        employee_id: task_employee.clone(),
                        records_updated: *updated,
                    }),
                    EmployeeOutcome::Failed(err) => Some(ReprocessEvent::EmployeeFailed {
                        employee_id: task_employee.clone(),
                        message: err.message.clone(),
                    }),
                    EmployeeOutcome::Skipped => None,
                };
                if let (Some(tx), Some(event)) = (progress, event) {
                    let _ = tx.send(event);
                }
                outcome
            });
            handles.push((employee, handle));
        }

        let mut summary = ReprocessSummary::default();
        for (employee, handle) in handles {
            let outcome = handle.await.unwrap_or_else(|e| {
                EmployeeOutcome::Failed(ReprocessError {
                    employee_id: employee.clone(),
                    date: None,
                    message: EngineError::TaskJoin(e.to_string()).to_string(),
                })
            });
            match outcome {
                EmployeeOutcome::Done(updated) => {
                    summary.employees_processed += 1;
                    summary.records_updated += updated;
                    if updated > 0 {
                        summary.employees_affected += 1;
                    }
                }
                EmployeeOutcome::Failed(err) => {
                    summary.employees_processed += 1;
                    summary.errors.push(err);
                }
                EmployeeOutcome::Skipped => summary.cancelled = true,
            }
        }
        summary
            .errors
            .sort_by(|a, b| (&a.employee_id, a.date).cmp(&(&b.employee_id, b.date)));

        if summary.cancelled {
            log::warn!(
                "Reprocess cancelled after {} employee(s)",
                summary.employees_processed
            );
        }
        log::info!(
            "Reprocess finished: {} record(s) updated across {} employee(s), {} error(s)",
            summary.records_updated,
            summary.employees_affected,
            summary.errors.len()
        );
        self.emit(ReprocessEvent::Finished(summary.clone()));
        Ok(summary)
    }

    /// Run in the background, reporting progress on the returned handle
    pub fn spawn(mut self, scope: EmployeeScope, from_date: NaiveDate) -> ReprocessHandle {
        let (tx, events) = mpsc::unbounded_channel();
        self.progress = Some(tx);
        let cancel = self.cancel.clone();
        let join = tokio::spawn(async move { self.run(scope, from_date).await });
        ReprocessHandle {
            events,
            cancel,
            join,
        }
    }
}

/// Handle to a background reprocess started with [`Reprocessor::spawn`]
pub struct ReprocessHandle {
    events: UnboundedReceiver<ReprocessEvent>,
    cancel: CancelFlag,
    join: JoinHandle<EngineResult<ReprocessSummary>>,
}

impl ReprocessHandle {
    /// Next progress event; `None` once the run has finished and every event
    /// was received
    pub async fn next_event(&mut self) -> Option<ReprocessEvent> {
        self.events.recv().await
    }

    /// Stop starting new employees
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Wait for the run to finish
    pub async fn wait(self) -> EngineResult<ReprocessSummary> {
        self.join
            .await
            .map_err(|e| EngineError::TaskJoin(e.to_string()))?
    }
}

/// Reprocess all employees from `from_date` in the background
pub fn reprocess_from_date(
    store: Arc<dyn AttendanceStore>,
    policy: &PolicyConfig,
    from_date: NaiveDate,
) -> ReprocessHandle {
    Reprocessor::new(store, policy).spawn(EmployeeScope::All, from_date)
}

/// Date the history must be loaded from so that records on or after
/// `from_date` are counted correctly. Earlier records only seed the tally.
fn load_start(policy: &PolicyConfig, from_date: NaiveDate) -> Option<NaiveDate> {
    if !policy.enabled() {
        return Some(from_date);
    }
    CountScope::from(policy)
        .history_start(from_date)
        .map(|start| start.min(from_date))
}

async fn reprocess_employee(
    store: &dyn AttendanceStore,
    policy: &PolicyConfig,
    employee: &EmployeeId,
    from_date: NaiveDate,
) -> EmployeeOutcome {
    let failed = |date: Option<NaiveDate>, message: String| {
        log::warn!("Reprocess failed for employee '{}': {}", employee, message);
        EmployeeOutcome::Failed(ReprocessError {
            employee_id: employee.clone(),
            date,
            message,
        })
    };

    let range = HistoryRange::all().starting(load_start(policy, from_date));
    let history = match store.load_history(employee, range).await {
        Ok(history) => history,
        Err(e) => return failed(None, e.to_string()),
    };
    let updates = match plan_updates(&history, policy, from_date) {
        Ok(updates) => updates,
        Err(e) => return failed(None, e.to_string()),
    };
    if updates.is_empty() {
        log::debug!("Employee '{}' already up to date", employee);
        return EmployeeOutcome::Done(0);
    }

    match store.apply_updates(employee, &updates).await {
        Ok(written) => {
            for update in &updates {
                if let Some(remark) = &update.fields.penalty_remark {
                    log::info!("Late penalty for employee '{}': {}", employee, remark);
                }
            }
            log::debug!("Employee '{}': {} record(s) updated", employee, written);
            EmployeeOutcome::Done(written)
        }
        Err(e) => failed(updates.first().map(|u| u.date), e.to_string()),
    }
}

#[cfg(test)]
#[path = "reprocess_test.rs"]
mod tests;
