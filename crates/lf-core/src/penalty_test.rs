use super::*;
use crate::policy::CountingMode;

fn policy(threshold: u32) -> PolicyConfig {
    PolicyConfig::new(threshold, CountingMode::Cumulative, PenaltyAction::HalfDay).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
}

#[test]
fn test_below_threshold_not_triggered() {
    let decision = evaluate(2, &policy(3), date());
    assert_eq!(decision, Decision::none());
}

#[test]
fn test_at_threshold_triggers() {
    let decision = evaluate(3, &policy(3), date());
    assert!(decision.triggered);
    assert_eq!(decision.action, Some(PenaltyAction::HalfDay));
    assert_eq!(
        decision.remark.as_deref(),
        Some("3rd late arrival in March 2025 (2025-03-05) - Half-day penalty applied (Cumulative, threshold 3)")
    );
}

#[test]
fn test_beyond_threshold_still_triggers() {
    let decision = evaluate(7, &policy(3), date());
    assert!(decision.triggered);
    assert_eq!(decision.action, Some(PenaltyAction::HalfDay));
    assert!(decision.remark.unwrap().starts_with("7th late arrival"));
}

#[test]
fn test_full_day_consecutive_remark() {
    let p =
        PolicyConfig::new(2, CountingMode::StrictlyConsecutive, PenaltyAction::FullDay).unwrap();
    let decision = evaluate(2, &p, date());
    assert_eq!(decision.action, Some(PenaltyAction::FullDay));
    let remark = decision.remark.unwrap();
    assert!(remark.contains("Full-day penalty applied"));
    assert!(remark.contains("Strictly Consecutive, threshold 2"));
}

#[test]
fn test_disabled_never_triggers() {
    let disabled = policy(1).into_disabled();
    for count in [0, 1, 5, 100] {
        let decision = evaluate(count, &disabled, date());
        assert!(!decision.triggered);
        assert_eq!(decision.action, None);
        assert_eq!(decision.remark, None);
    }
}

#[test]
fn test_zero_count_never_triggers() {
    assert!(!evaluate(0, &policy(1), date()).triggered);
}

#[test]
fn test_predict_next_trigger() {
    let p = policy(3);
    assert!(!predict_next_trigger(0, &p));
    assert!(!predict_next_trigger(1, &p));
    assert!(predict_next_trigger(2, &p));
    assert!(predict_next_trigger(3, &p));
    assert!(predict_next_trigger(9, &p));
}

#[test]
fn test_predict_next_trigger_disabled() {
    let p = policy(1).into_disabled();
    assert!(!predict_next_trigger(0, &p));
    assert!(!predict_next_trigger(10, &p));
}

#[test]
fn test_ordinals() {
    let cases = [
        (1, "1st"),
        (2, "2nd"),
        (3, "3rd"),
        (4, "4th"),
        (11, "11th"),
        (12, "12th"),
        (13, "13th"),
        (21, "21st"),
        (22, "22nd"),
        (101, "101st"),
        (111, "111th"),
    ];
    for (n, expected) in cases {
        assert_eq!(ordinal(n), expected, "ordinal({})", n);
    }
}
