use super::*;
use chrono::NaiveDate;
use lf_core::{CountingMode, DerivedFields, PenaltyAction};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

fn record(id: &str, employee: &str, d: u32, late: bool) -> AttendanceRecord {
    AttendanceRecord::new(RecordId::new(id), EmployeeId::new(employee), day(d), late)
}

#[tokio::test]
async fn test_policy_roundtrip() {
    let store = MemoryStore::new();
    assert!(!store.load_policy().await.unwrap().enabled());

    let policy = PolicyConfig::new(2, CountingMode::Cumulative, PenaltyAction::HalfDay).unwrap();
    store.save_policy(&policy).await.unwrap();
    assert_eq!(store.load_policy().await.unwrap(), policy);
}

#[tokio::test]
async fn test_history_sorted_by_date() {
    let store = MemoryStore::with_records(vec![
        record("z", "E1", 1, true),
        record("a", "E1", 3, true),
        record("m", "E1", 2, false),
        record("x", "E2", 2, true),
    ])
    .unwrap();

    let history = store
        .load_history(&EmployeeId::new("E1"), HistoryRange::all())
        .await
        .unwrap();
    let ids: Vec<&str> = history.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["z", "m", "a"]);

    let employees = store.list_employees().await.unwrap();
    assert_eq!(employees, vec![EmployeeId::new("E1"), EmployeeId::new("E2")]);
}

#[tokio::test]
async fn test_with_records_rejects_same_day() {
    let result = MemoryStore::with_records(vec![
        record("r1", "E1", 1, true),
        record("r2", "E1", 1, false),
    ]);
    assert!(matches!(result, Err(DbError::Conflict(_))));
}

#[tokio::test]
async fn test_upsert_conflict() {
    let store = MemoryStore::new();
    store.upsert_record(&record("r1", "E1", 1, true)).await.unwrap();
    store.upsert_record(&record("r1", "E1", 1, false)).await.unwrap();
    assert!(store
        .upsert_record(&record("r2", "E1", 1, false))
        .await
        .is_err());
    assert_eq!(store.snapshot().unwrap().len(), 1);
}

#[tokio::test]
async fn test_insert_records_all_or_nothing() {
    let store = MemoryStore::with_records(vec![record("r1", "E1", 1, true)]).unwrap();
    let err = store
        .insert_records(&[record("r2", "E1", 2, true), record("r3", "E1", 1, true)])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Conflict(_)));
    assert_eq!(store.snapshot().unwrap().len(), 1);

    assert_eq!(
        store
            .insert_records(&[record("r2", "E1", 2, true)])
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_apply_updates_all_or_nothing() {
    let store =
        MemoryStore::with_records(vec![record("r1", "E1", 1, true), record("r2", "E2", 1, true)])
            .unwrap();
    let set_one = |id: &str| DerivedUpdate {
        record_id: RecordId::new(id),
        date: day(1),
        is_late: true,
        fields: DerivedFields {
            strike_count: 1,
            ..DerivedFields::neutral()
        },
    };

    // r2 belongs to E2, so the whole batch is rejected
    let err = store
        .apply_updates(&EmployeeId::new("E1"), &[set_one("r1"), set_one("r2")])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Conflict(_)));
    let r1 = store.get_record(&RecordId::new("r1")).await.unwrap().unwrap();
    assert_eq!(r1.derived.strike_count, 0);

    let written = store
        .apply_updates(&EmployeeId::new("E1"), &[set_one("r1")])
        .await
        .unwrap();
    assert_eq!(written, 1);
    let r1 = store.get_record(&RecordId::new("r1")).await.unwrap().unwrap();
    assert_eq!(r1.derived.strike_count, 1);
}

#[tokio::test]
async fn test_apply_updates_rejects_changed_lateness() {
    let store = MemoryStore::with_records(vec![record("r1", "E1", 1, false)]).unwrap();
    let stale = DerivedUpdate {
        record_id: RecordId::new("r1"),
        date: day(1),
        is_late: true,
        fields: DerivedFields {
            strike_count: 1,
            ..DerivedFields::neutral()
        },
    };
    let err = store
        .apply_updates(&EmployeeId::new("E1"), &[stale])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Conflict(_)));
    let r1 = store.get_record(&RecordId::new("r1")).await.unwrap().unwrap();
    assert!(r1.derived.is_neutral());
}
