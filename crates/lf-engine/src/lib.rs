//! lf-engine - Late-strike engine bound to an attendance store
//!
//! Query operations, the non-cascading record save path, the batch
//! reprocessor and monthly reports. All strike arithmetic lives in lf-core;
//! this crate loads history, calls it, and writes results back.

pub mod error;
pub mod report;
pub mod reprocess;
pub mod save;
pub mod status;

pub use error::{EngineError, EngineResult};
pub use report::{monthly_summary, EmployeeLateSummary, MonthlySummary};
pub use reprocess::{
    reprocess_from_date, CancelFlag, EmployeeScope, ReprocessError, ReprocessEvent,
    ReprocessHandle, ReprocessSummary, Reprocessor,
};
pub use save::{save_record, SaveOutcome};
pub use status::{get_late_count, get_late_status, LateCount, LateStatus};

#[cfg(test)]
pub(crate) mod test_support;
