use super::*;
use crate::test_support::{consecutive, cumulative, day, emp, memory_store, records};
use lf_core::AttendanceRecord;

#[test]
fn test_month_bounds() {
    assert_eq!(month_bounds(2025, 2).unwrap(), (
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
    ));
    assert_eq!(
        month_bounds(2024, 12).unwrap().1,
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
    );
    assert!(month_bounds(2025, 13).is_err());
    assert!(month_bounds(2025, 0).is_err());
}

#[tokio::test]
async fn test_monthly_summary() {
    let mut all = records("E1", &[(3, true), (4, true), (5, false), (6, true)]);
    all.extend(records("E2", &[(3, false), (4, true)]));
    all.extend(records("E3", &[(3, false)]));
    all.push(AttendanceRecord::new(
        lf_core::RecordId::new("E2-APR"),
        emp("E2"),
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        true,
    ));
    let store = memory_store(all);

    let summary = monthly_summary(&store, &cumulative(3), 2025, 3).await.unwrap();
    assert_eq!(summary.employees.len(), 2);
    assert_eq!(summary.total_late(), 4);

    let e1 = &summary.employees[0];
    assert_eq!(e1.employee_id, emp("E1"));
    assert_eq!(e1.late_dates, vec![day(3), day(4), day(6)]);
    assert!(e1.threshold_reached);

    let e2 = &summary.employees[1];
    assert_eq!(e2.late_count, 1);
    assert!(!e2.threshold_reached);

    let over: Vec<_> = summary.over_threshold().map(|e| e.employee_id.clone()).collect();
    assert_eq!(over, vec![emp("E1")]);
}

#[tokio::test]
async fn test_monthly_summary_counts_recorded_penalties() {
    let mut all = records("E1", &[(3, true), (4, true)]);
    all[1].derived.penalty_remark = Some("2nd late arrival".to_string());
    let store = memory_store(all);

    let summary = monthly_summary(&store, &cumulative(2), 2025, 3).await.unwrap();
    assert_eq!(summary.employees[0].penalties_recorded, 1);
}

#[tokio::test]
async fn test_monthly_summary_respects_policy() {
    let store = memory_store(records("E1", &[(3, true), (4, true), (5, true)]));

    let disabled = monthly_summary(&store, &cumulative(1).into_disabled(), 2025, 3)
        .await
        .unwrap();
    assert!(!disabled.policy_enabled);
    assert!(!disabled.employees[0].threshold_reached);

    let late_start = cumulative(1).with_effective_from(Some(day(5)));
    let summary = monthly_summary(&store, &late_start, 2025, 3).await.unwrap();
    assert_eq!(summary.employees[0].late_dates, vec![day(5)]);
}

#[tokio::test]
async fn test_consecutive_threshold_needs_a_run() {
    // four late days in the month, but never three in a row
    let mut all = records("E1", &[(3, true), (4, true), (5, false), (6, true), (7, true)]);
    all.extend(records("E2", &[(3, true), (4, true), (5, true)]));
    let store = memory_store(all);

    let summary = monthly_summary(&store, &consecutive(3), 2025, 3).await.unwrap();
    assert_eq!(summary.employees[0].late_count, 4);
    assert!(!summary.employees[0].threshold_reached);
    assert!(summary.employees[1].threshold_reached);
}

#[tokio::test]
async fn test_monthly_summary_rejects_bad_month() {
    let store = memory_store(Vec::new());
    assert!(monthly_summary(&store, &cumulative(1), 2025, 13).await.is_err());
}
