//! Derived strike fields as a pure function of (sorted history, policy).

use crate::error::CoreResult;
use crate::penalty::evaluate;
use crate::policy::PolicyConfig;
use crate::record::{validate_history, AttendanceRecord, DerivedFields, DerivedUpdate};
use crate::strike::{CountScope, StrikeTally};
use chrono::NaiveDate;

/// Derived fields for every record of one employee's sorted history.
///
/// A record that is not late, falls before the effective date, or is
/// evaluated under a disabled policy gets neutral fields. A late record gets
/// the strike count as of itself, plus remark and action once the count
/// reaches the threshold.
pub fn derive_fields(
    history: &[AttendanceRecord],
    policy: &PolicyConfig,
) -> CoreResult<Vec<DerivedFields>> {
    validate_history(history)?;
    if !policy.enabled() {
        return Ok(vec![DerivedFields::neutral(); history.len()]);
    }

    let mut tally = StrikeTally::new(CountScope::from(policy));
    let fields = history
        .iter()
        .map(|record| {
            let count = tally.observe(record);
            if !record.is_late || !policy.applies_to(record.date) {
                return DerivedFields::neutral();
            }
            let decision = evaluate(count, policy, record.date);
            DerivedFields {
                strike_count: count,
                penalty_remark: decision.remark,
                penalty_action: decision.action,
            }
        })
        .collect();
    Ok(fields)
}

/// Updates needed to bring records dated `from_date` or later in line with
/// `policy`.
///
/// Earlier records in `history` only seed the running state. Records whose
/// stored fields already match are skipped.
pub fn plan_updates(
    history: &[AttendanceRecord],
    policy: &PolicyConfig,
    from_date: NaiveDate,
) -> CoreResult<Vec<DerivedUpdate>> {
    let fields = derive_fields(history, policy)?;
    Ok(history
        .iter()
        .zip(fields)
        .filter(|(record, fields)| record.date >= from_date && record.derived != *fields)
        .map(|(record, fields)| DerivedUpdate {
            record_id: record.id.clone(),
            date: record.date,
            is_late: record.is_late,
            fields,
        })
        .collect())
}

#[cfg(test)]
#[path = "derive_test.rs"]
mod tests;
