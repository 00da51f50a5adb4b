//! Record save path.
//!
//! Saving a record recomputes that record's derived fields only. Records dated
//! after it keep whatever they had, which may now be stale; the outcome says
//! how many so the caller can start a reprocess from the saved date.

use crate::error::EngineResult;
use crate::status::history_as_of;
use lf_core::{derive_fields, AttendanceRecord, CountScope, Decision, PolicyConfig};
use lf_db::{AttendanceStore, HistoryRange};
use serde::Serialize;

/// Result of saving one attendance record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    /// The record as stored, with fresh derived fields
    pub record: AttendanceRecord,
    pub decision: Decision,

    /// A stored record with the same id was overwritten
    pub replaced: bool,

    /// Records of the same employee dated after this one
    pub stale_later_records: usize,
}

/// Recompute `record`'s derived fields from its history and store it.
///
/// Any derived values on the incoming record are ignored. A second record for
/// the same employee and date is rejected as invalid input.
pub async fn save_record(
    store: &dyn AttendanceStore,
    policy: &PolicyConfig,
    mut record: AttendanceRecord,
) -> EngineResult<SaveOutcome> {
    let scope = CountScope::from(policy);
    let mut history: Vec<AttendanceRecord> =
        history_as_of(store, &scope, &record.employee_id, record.date)
            .await?
            .into_iter()
            .filter(|r| r.id != record.id)
            .collect();
    history.push(record.clone());

    let fields = derive_fields(&history, policy)?.pop().unwrap_or_default();
    let decision = Decision {
        triggered: fields.penalty_action.is_some(),
        action: fields.penalty_action,
        remark: fields.penalty_remark.clone(),
    };
    record.derived = fields;

    // All reads happen before the write so a failed read leaves nothing stored
    let replaced = store.get_record(&record.id).await?.is_some();
    let stale_later_records = match record.date.succ_opt() {
        Some(next) => {
            let range = HistoryRange {
                from: Some(next),
                to: None,
            };
            store.load_history(&record.employee_id, range).await?.len()
        }
        None => 0,
    };

    log::debug!(
        "Writing {} to the {} store (replacing: {})",
        record.id,
        store.store_type(),
        replaced
    );
    store.upsert_record(&record).await?;
    if let Some(remark) = &decision.remark {
        log::info!("Late penalty for employee '{}': {}", record.employee_id, remark);
    }
    if stale_later_records > 0 {
        log::warn!(
            "Saved {} for employee '{}' on {}; {} later record(s) were not recounted, reprocess from {} to refresh them",
            record.id,
            record.employee_id,
            record.date,
            stale_later_records,
            record.date
        );
    }

    Ok(SaveOutcome {
        record,
        decision,
        replaced,
        stale_later_records,
    })
}

#[cfg(test)]
#[path = "save_test.rs"]
mod tests;
