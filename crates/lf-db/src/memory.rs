//! In-memory attendance store for tests and embedding

use crate::error::{DbError, DbResult};
use crate::traits::{AttendanceStore, HistoryRange};
use async_trait::async_trait;
use lf_core::{AttendanceRecord, DerivedUpdate, EmployeeId, PolicyConfig, RecordId};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    policy: Option<PolicyConfig>,
    records: BTreeMap<RecordId, AttendanceRecord>,
}

impl State {
    fn date_holder(&self, record: &AttendanceRecord) -> Option<&RecordId> {
        self.records
            .values()
            .find(|r| {
                r.employee_id == record.employee_id && r.date == record.date && r.id != record.id
            })
            .map(|r| &r.id)
    }
}

/// Attendance store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `records`
    pub fn with_records(records: Vec<AttendanceRecord>) -> DbResult<Self> {
        let store = Self::new();
        {
            let mut state = store.lock()?;
            for record in records {
                if let Some(holder) = state.date_holder(&record) {
                    return Err(DbError::Conflict(format!(
                        "employee '{}' already has record '{}' on {}",
                        record.employee_id, holder, record.date
                    )));
                }
                state.records.insert(record.id.clone(), record);
            }
        }
        Ok(store)
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Every stored record, ordered by id
    pub fn snapshot(&self) -> DbResult<Vec<AttendanceRecord>> {
        Ok(self.lock()?.records.values().cloned().collect())
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn load_policy(&self) -> DbResult<PolicyConfig> {
        Ok(self.lock()?.policy.clone().unwrap_or_default())
    }

    async fn save_policy(&self, policy: &PolicyConfig) -> DbResult<()> {
        self.lock()?.policy = Some(policy.clone());
        Ok(())
    }

    async fn list_employees(&self) -> DbResult<Vec<EmployeeId>> {
        let state = self.lock()?;
        let employees: BTreeSet<&EmployeeId> =
            state.records.values().map(|r| &r.employee_id).collect();
        Ok(employees.into_iter().cloned().collect())
    }

    async fn load_history(
        &self,
        employee: &EmployeeId,
        range: HistoryRange,
    ) -> DbResult<Vec<AttendanceRecord>> {
        let state = self.lock()?;
        let mut history: Vec<AttendanceRecord> = state
            .records
            .values()
            .filter(|r| r.employee_id == *employee && range.contains(r.date))
            .cloned()
            .collect();
        history.sort_by_key(|r| r.date);
        Ok(history)
    }

    async fn get_record(&self, id: &RecordId) -> DbResult<Option<AttendanceRecord>> {
        Ok(self.lock()?.records.get(id).cloned())
    }

    async fn upsert_record(&self, record: &AttendanceRecord) -> DbResult<()> {
        let mut state = self.lock()?;
        if let Some(holder) = state.date_holder(record) {
            return Err(DbError::Conflict(format!(
                "employee '{}' already has record '{}' on {}",
                record.employee_id, holder, record.date
            )));
        }
        state.records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn insert_records(&self, records: &[AttendanceRecord]) -> DbResult<usize> {
        let mut state = self.lock()?;
        let mut days = HashSet::new();
        for record in records {
            if state.records.contains_key(&record.id) {
                return Err(DbError::Conflict(format!(
                    "record id '{}' already exists",
                    record.id
                )));
            }
            let clash = state.date_holder(record).is_some()
                || !days.insert((&record.employee_id, record.date));
            if clash {
                return Err(DbError::Conflict(format!(
                    "employee '{}' has more than one record on {}",
                    record.employee_id, record.date
                )));
            }
        }
        let ids: HashSet<&RecordId> = records.iter().map(|r| &r.id).collect();
        if ids.len() != records.len() {
            return Err(DbError::Conflict(
                "record ids repeat within the batch".to_string(),
            ));
        }
        for record in records {
            state.records.insert(record.id.clone(), record.clone());
        }
        Ok(records.len())
    }

    async fn apply_updates(
        &self,
        employee: &EmployeeId,
        updates: &[DerivedUpdate],
    ) -> DbResult<usize> {
        let mut state = self.lock()?;
        // validate everything first so a bad update leaves nothing written
        for update in updates {
            match state.records.get(&update.record_id) {
                Some(r) if r.employee_id == *employee && r.is_late == update.is_late => {}
                _ => {
                    return Err(DbError::Conflict(format!(
                        "record '{}' for employee '{}' is missing or has changed",
                        update.record_id, employee
                    )))
                }
            }
        }
        for update in updates {
            if let Some(record) = state.records.get_mut(&update.record_id) {
                record.derived = update.fields.clone();
            }
        }
        Ok(updates.len())
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
