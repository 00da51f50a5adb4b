//! Late-strike counting.
//!
//! [`StrikeTally`] is a single left fold over one employee's history, sorted
//! ascending by date. [`count_strikes`] is that fold run to the end, and the
//! reprocessor drives the same fold record by record, so the batch path and
//! the query path always agree.

use crate::error::CoreResult;
use crate::policy::{CountingMode, PolicyConfig, StrikeWindow};
use crate::record::{validate_history, AttendanceRecord, RecordId};
use chrono::{Datelike, NaiveDate};

/// The parts of a policy that decide what counts as a strike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountScope {
    pub mode: CountingMode,
    pub effective_from: Option<NaiveDate>,
    pub window: StrikeWindow,
}

impl CountScope {
    pub fn new(mode: CountingMode) -> Self {
        Self {
            mode,
            effective_from: None,
            window: StrikeWindow::Unbounded,
        }
    }

    /// Whether a record on `date` is subject to counting at all
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        self.effective_from.map_or(true, |from| date >= from)
    }

    /// Earliest record date that can contribute to the count as of `date`.
    ///
    /// `None` means the whole history is needed.
    pub fn history_start(&self, date: NaiveDate) -> Option<NaiveDate> {
        let month_start = match self.window {
            StrikeWindow::Monthly => date.with_day(1),
            StrikeWindow::Unbounded => None,
        };
        match (self.effective_from, month_start) {
            (Some(from), Some(month)) => Some(from.max(month)),
            (from, month) => from.or(month),
        }
    }
}

impl From<&PolicyConfig> for CountScope {
    fn from(policy: &PolicyConfig) -> Self {
        Self {
            mode: policy.counting_mode(),
            effective_from: policy.effective_from(),
            window: policy.window(),
        }
    }
}

/// Running strike state for one employee.
///
/// Tracks both the cumulative tally and the trailing consecutive run so the
/// status query can report either; [`current`](Self::current) picks the one
/// the counting mode asks for.
#[derive(Debug, Clone)]
pub struct StrikeTally {
    scope: CountScope,
    cumulative: u32,
    consecutive: u32,
    period: Option<(i32, u32)>,
}

impl StrikeTally {
    pub fn new(scope: CountScope) -> Self {
        Self {
            scope,
            cumulative: 0,
            consecutive: 0,
            period: None,
        }
    }

    /// Fold one record into the tally and return the count as of it.
    ///
    /// Records must arrive in ascending date order. Records outside the
    /// policy's effective window leave the tally untouched.
    pub fn observe(&mut self, record: &AttendanceRecord) -> u32 {
        if !self.scope.applies_to(record.date) {
            return self.current();
        }
        self.roll_to(record.date);
        if record.is_late {
            self.cumulative += 1;
            self.consecutive += 1;
        } else {
            self.consecutive = 0;
        }
        self.current()
    }

    /// Move the tally forward to `date` without observing a record.
    ///
    /// Only matters for a monthly window: entering a new month restarts both
    /// counters.
    pub fn roll_to(&mut self, date: NaiveDate) {
        if self.scope.window != StrikeWindow::Monthly {
            return;
        }
        let period = (date.year(), date.month());
        if self.period != Some(period) {
            if self.period.is_some() {
                log::debug!("strike window restarts at {}", date);
            }
            self.cumulative = 0;
            self.consecutive = 0;
            self.period = Some(period);
        }
    }

    /// Count under the scope's counting mode
    pub fn current(&self) -> u32 {
        match self.scope.mode {
            CountingMode::Cumulative => self.cumulative,
            CountingMode::StrictlyConsecutive => self.consecutive,
        }
    }

    /// Late records counted in the current window
    pub fn cumulative(&self) -> u32 {
        self.cumulative
    }

    /// Length of the trailing run of late records
    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }
}

/// Validate `history` and fold it into a [`StrikeTally`], skipping the record
/// whose id equals `excluding`.
pub fn tally_history(
    history: &[AttendanceRecord],
    scope: CountScope,
    excluding: Option<&RecordId>,
) -> CoreResult<StrikeTally> {
    validate_history(history)?;
    let mut tally = StrikeTally::new(scope);
    for record in history {
        if excluding.is_some_and(|id| *id == record.id) {
            continue;
        }
        tally.observe(record);
    }
    Ok(tally)
}

/// Strike count as of the last record in `history`.
///
/// `history` must be one employee's records up to and including the target
/// date, sorted ascending. `excluding` recomputes the count as if that record
/// did not exist.
pub fn count_strikes(
    history: &[AttendanceRecord],
    scope: CountScope,
    excluding: Option<&RecordId>,
) -> CoreResult<u32> {
    Ok(tally_history(history, scope, excluding)?.current())
}

#[cfg(test)]
#[path = "strike_test.rs"]
mod tests;
