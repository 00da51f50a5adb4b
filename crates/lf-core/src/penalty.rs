//! Penalty decisions for a strike count.

use crate::policy::{PenaltyAction, PolicyConfig};
use chrono::NaiveDate;
use serde::Serialize;

/// Outcome of evaluating one strike count against the policy
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Decision {
    pub triggered: bool,
    pub action: Option<PenaltyAction>,
    pub remark: Option<String>,
}

impl Decision {
    /// Not triggered, no action, no remark
    pub fn none() -> Self {
        Self::default()
    }
}

/// Decide whether `count` strikes on `date` trigger a penalty.
///
/// Every count at or beyond the threshold triggers; there are no escalating
/// tiers and repeats are not suppressed. A disabled policy never triggers.
pub fn evaluate(count: u32, policy: &PolicyConfig, date: NaiveDate) -> Decision {
    if !policy.enabled() || count < policy.threshold() {
        return Decision::none();
    }
    let action = policy.penalty_action();
    Decision {
        triggered: true,
        action: Some(action),
        remark: Some(penalty_remark(count, policy, date)),
    }
}

/// True when one more strike would reach the threshold.
pub fn predict_next_trigger(current: u32, policy: &PolicyConfig) -> bool {
    policy.enabled() && current.saturating_add(1) >= policy.threshold()
}

/// e.g. `3rd late arrival in March 2025 (2025-03-05) - Half-day penalty applied (Cumulative, threshold 3)`
pub fn penalty_remark(count: u32, policy: &PolicyConfig, date: NaiveDate) -> String {
    format!(
        "{} late arrival in {} ({}) - {} penalty applied ({}, threshold {})",
        ordinal(count),
        date.format("%B %Y"),
        date,
        policy.penalty_action(),
        policy.counting_mode(),
        policy.threshold()
    )
}

/// 1st, 2nd, 3rd, 4th, ... 11th, 12th, 13th, ... 21st
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

#[cfg(test)]
#[path = "penalty_test.rs"]
mod tests;
