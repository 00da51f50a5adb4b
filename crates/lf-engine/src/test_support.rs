//! Shared fixtures for engine tests

use async_trait::async_trait;
use chrono::NaiveDate;
use lf_core::{
    AttendanceRecord, CountingMode, DerivedUpdate, EmployeeId, PenaltyAction, PolicyConfig,
    RecordId,
};
use lf_db::{AttendanceStore, DbError, DbResult, HistoryRange, MemoryStore};
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

pub(crate) fn emp(id: &str) -> EmployeeId {
    EmployeeId::new(id)
}

/// Records `{employee}-{day}` for each `(day, is_late)` pair
pub(crate) fn records(employee: &str, days: &[(u32, bool)]) -> Vec<AttendanceRecord> {
    days.iter()
        .map(|&(d, late)| {
            AttendanceRecord::new(
                RecordId::new(format!("{}-{:02}", employee, d)),
                emp(employee),
                day(d),
                late,
            )
        })
        .collect()
}

pub(crate) fn cumulative(threshold: u32) -> PolicyConfig {
    PolicyConfig::new(threshold, CountingMode::Cumulative, PenaltyAction::HalfDay).unwrap()
}

pub(crate) fn consecutive(threshold: u32) -> PolicyConfig {
    PolicyConfig::new(threshold, CountingMode::StrictlyConsecutive, PenaltyAction::FullDay)
        .unwrap()
}

pub(crate) fn memory_store(records: Vec<AttendanceRecord>) -> MemoryStore {
    MemoryStore::with_records(records).unwrap()
}

/// Ways a [`FaultyStore`] departs from the memory store it wraps
pub(crate) enum Fault {
    /// Every `apply_updates` for this employee fails
    FailWrites(EmployeeId),
    /// This record is saved just before each `apply_updates` runs, as if a
    /// concurrent edit landed between the read and the write
    SaveBeforeWrite(AttendanceRecord),
    /// `load_history` fails from this call on (1-based)
    FailHistoryFrom(usize),
}

/// Memory store with one injected fault
pub(crate) struct FaultyStore {
    inner: MemoryStore,
    fault: Fault,
    history_calls: AtomicUsize,
}

impl FaultyStore {
    pub(crate) fn new(inner: MemoryStore, fault: Fault) -> Self {
        Self {
            inner,
            fault,
            history_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AttendanceStore for FaultyStore {
    async fn load_policy(&self) -> DbResult<PolicyConfig> {
        self.inner.load_policy().await
    }

    async fn save_policy(&self, policy: &PolicyConfig) -> DbResult<()> {
        self.inner.save_policy(policy).await
    }

    async fn list_employees(&self) -> DbResult<Vec<EmployeeId>> {
        self.inner.list_employees().await
    }

    async fn load_history(
        &self,
        employee: &EmployeeId,
        range: HistoryRange,
    ) -> DbResult<Vec<AttendanceRecord>> {
        let call = self.history_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Fault::FailHistoryFrom(first) = self.fault {
            if call >= first {
                return Err(DbError::ExecutionError("connection reset".to_string()));
            }
        }
        self.inner.load_history(employee, range).await
    }

    async fn get_record(&self, id: &RecordId) -> DbResult<Option<AttendanceRecord>> {
        self.inner.get_record(id).await
    }

    async fn upsert_record(&self, record: &AttendanceRecord) -> DbResult<()> {
        self.inner.upsert_record(record).await
    }

    async fn insert_records(&self, records: &[AttendanceRecord]) -> DbResult<usize> {
        self.inner.insert_records(records).await
    }

    async fn apply_updates(
        &self,
        employee: &EmployeeId,
        updates: &[DerivedUpdate],
    ) -> DbResult<usize> {
        match &self.fault {
            Fault::FailWrites(failing) if failing == employee => {
                return Err(DbError::TransactionError("disk full".to_string()));
            }
            Fault::SaveBeforeWrite(record) => self.inner.upsert_record(record).await?,
            _ => {}
        }
        self.inner.apply_updates(employee, updates).await
    }

    fn store_type(&self) -> &'static str {
        "faulty"
    }
}
