//! lf-core - Core library for Lateflow
//!
//! This crate provides the late-penalty policy model, attendance records,
//! strike counting, penalty decisions and project configuration parsing used
//! across all Lateflow components. Everything here is synchronous and pure.

pub mod config;
pub mod derive;
pub mod error;
mod newtype_string;
pub mod penalty;
pub mod policy;
pub mod record;
pub mod strike;

pub use config::Config;
pub use derive::{derive_fields, plan_updates};
pub use error::{CoreError, CoreResult};
pub use penalty::{evaluate, predict_next_trigger, Decision};
pub use policy::{CountingMode, PenaltyAction, PolicyConfig, PolicySettings, StrikeWindow};
pub use record::{
    validate_history, AttendanceRecord, AttendanceStatus, DerivedFields, DerivedUpdate,
    EmployeeId, HalfDayType, RecordId,
};
pub use strike::{count_strikes, tally_history, CountScope, StrikeTally};
