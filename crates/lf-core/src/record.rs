//! Attendance records and their derived strike fields.

use crate::error::{CoreError, CoreResult};
use crate::newtype_string::define_identifier;
use crate::policy::PenaltyAction;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

define_identifier! {
    /// Opaque employee identifier assigned by the host application.
    pub struct EmployeeId;
}

define_identifier! {
    /// Opaque attendance record identifier assigned by the host application.
    pub struct RecordId;
}

/// Attendance status for the day. The engine never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    #[default]
    Present,
    HalfDay,
    Absent,
    OnLeave,
    WorkFromHome,
}

impl AttendanceStatus {
    pub fn as_label(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::HalfDay => "half_day",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::OnLeave => "on_leave",
            AttendanceStatus::WorkFromHome => "work_from_home",
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "half_day" => Ok(AttendanceStatus::HalfDay),
            "absent" => Ok(AttendanceStatus::Absent),
            "on_leave" => Ok(AttendanceStatus::OnLeave),
            "work_from_home" | "wfh" => Ok(AttendanceStatus::WorkFromHome),
            _ => Err(CoreError::invalid_input(format!(
                "unknown attendance status '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Sub-classification of a half-day, set when a leave application backs it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfDayType {
    GenuineShortage,
    LatePenalty,
    PersonalPermission,
    Other,
}

impl HalfDayType {
    pub fn as_label(&self) -> &'static str {
        match self {
            HalfDayType::GenuineShortage => "genuine_shortage",
            HalfDayType::LatePenalty => "late_penalty",
            HalfDayType::PersonalPermission => "personal_permission",
            HalfDayType::Other => "other",
        }
    }
}

impl FromStr for HalfDayType {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "genuine_shortage" => Ok(HalfDayType::GenuineShortage),
            "late_penalty" => Ok(HalfDayType::LatePenalty),
            "personal_permission" => Ok(HalfDayType::PersonalPermission),
            "other" => Ok(HalfDayType::Other),
            _ => Err(CoreError::invalid_input(format!(
                "unknown half-day type '{}'",
                s
            ))),
        }
    }
}

/// Fields the engine derives for a record. Never edited by hand.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DerivedFields {
    /// Strike count as of this record (0 when the record is not a strike)
    #[serde(default)]
    pub strike_count: u32,

    /// Set when this record's strike reaches the threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_remark: Option<String>,

    /// Action decided alongside the remark
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_action: Option<PenaltyAction>,
}

impl DerivedFields {
    /// Count 0, no remark, no action
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }
}

/// One employee's attendance on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub employee_id: EmployeeId,
    pub date: NaiveDate,

    /// Raw lateness flag captured for the day
    #[serde(default)]
    pub is_late: bool,

    #[serde(default)]
    pub status: AttendanceStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_day_type: Option<HalfDayType>,

    #[serde(default)]
    pub is_genuine_half_day: bool,

    #[serde(flatten)]
    pub derived: DerivedFields,
}

impl AttendanceRecord {
    /// New present record with neutral derived fields
    pub fn new(id: RecordId, employee_id: EmployeeId, date: NaiveDate, is_late: bool) -> Self {
        Self {
            id,
            employee_id,
            date,
            is_late,
            status: AttendanceStatus::Present,
            half_day_type: None,
            is_genuine_half_day: false,
            derived: DerivedFields::neutral(),
        }
    }

    pub fn with_status(mut self, status: AttendanceStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark the record as a half-day backed by a leave application
    pub fn with_half_day(mut self, half_day_type: HalfDayType, genuine: bool) -> Self {
        self.status = AttendanceStatus::HalfDay;
        self.half_day_type = Some(half_day_type);
        self.is_genuine_half_day = genuine;
        self
    }
}

/// New derived fields for one stored record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedUpdate {
    pub record_id: RecordId,
    pub date: NaiveDate,
    /// Lateness the fields were computed from; stores reject the update if
    /// the stored record no longer matches it
    pub is_late: bool,
    pub fields: DerivedFields,
}

/// Check that `history` belongs to one employee and is strictly ascending by
/// date. Callers must de-duplicate upstream; duplicates are rejected here.
pub fn validate_history(history: &[AttendanceRecord]) -> CoreResult<()> {
    let Some(first) = history.first() else {
        return Ok(());
    };
    for pair in history.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.employee_id != first.employee_id {
            return Err(CoreError::invalid_input(format!(
                "history mixes employees '{}' and '{}'",
                first.employee_id, next.employee_id
            )));
        }
        if next.date == prev.date {
            return Err(CoreError::invalid_input(format!(
                "duplicate attendance for employee '{}' on {}",
                next.employee_id, next.date
            )));
        }
        if next.date < prev.date {
            return Err(CoreError::invalid_input(format!(
                "history for employee '{}' is not sorted: {} follows {}",
                next.employee_id, next.date, prev.date
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
