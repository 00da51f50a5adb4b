use super::*;

#[test]
fn test_parse_enabled_settings() {
    let yaml = r#"
enabled: true
strike_threshold: 3
counting_mode: Strictly Consecutive
penalty_action: Half-day
apply_from_date: 2025-01-01
"#;
    let settings = PolicySettings::from_yaml_str(yaml).unwrap();
    let policy = settings.validate().unwrap();

    assert!(policy.enabled());
    assert_eq!(policy.threshold(), 3);
    assert_eq!(policy.counting_mode(), CountingMode::StrictlyConsecutive);
    assert_eq!(policy.penalty_action(), PenaltyAction::HalfDay);
    assert_eq!(
        policy.effective_from(),
        Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    );
    assert_eq!(policy.window(), StrikeWindow::Unbounded);
}

#[test]
fn test_legacy_enable_flag_alias() {
    let yaml = r#"
enable_late_penalty: true
strike_threshold: 2
counting_mode: cumulative
penalty_action: full_day
window: monthly
"#;
    let policy = PolicySettings::from_yaml_str(yaml)
        .unwrap()
        .validate()
        .unwrap();
    assert!(policy.enabled());
    assert_eq!(policy.penalty_action(), PenaltyAction::FullDay);
    assert_eq!(policy.window(), StrikeWindow::Monthly);
}

#[test]
fn test_threshold_zero_rejected() {
    let settings = PolicySettings {
        enabled: true,
        strike_threshold: Some(0),
        counting_mode: Some("cumulative".to_string()),
        penalty_action: Some("half-day".to_string()),
        ..Default::default()
    };
    let err = settings.validate().unwrap_err();
    assert!(matches!(err, CoreError::Configuration { .. }));
    assert!(err.to_string().contains("at least 1"));
}

#[test]
fn test_negative_threshold_rejected() {
    let settings = PolicySettings {
        enabled: true,
        strike_threshold: Some(-4),
        counting_mode: Some("cumulative".to_string()),
        penalty_action: Some("half-day".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        settings.validate(),
        Err(CoreError::Configuration { .. })
    ));
}

#[test]
fn test_missing_fields_rejected_when_enabled() {
    let settings = PolicySettings {
        enabled: true,
        strike_threshold: None,
        counting_mode: Some("cumulative".to_string()),
        penalty_action: None,
        ..Default::default()
    };
    let err = settings.validate().unwrap_err().to_string();
    assert!(err.contains("strike_threshold"));
    assert!(err.contains("penalty_action"));
    assert!(!err.contains("counting_mode"));
}

#[test]
fn test_disabled_settings_need_no_fields() {
    let policy = PolicySettings::from_yaml_str("enabled: false")
        .unwrap()
        .validate()
        .unwrap();
    assert!(!policy.enabled());
    assert_eq!(policy.threshold(), 1);
}

#[test]
fn test_unknown_counting_mode_rejected() {
    let settings = PolicySettings {
        enabled: true,
        strike_threshold: Some(3),
        counting_mode: Some("rolling".to_string()),
        penalty_action: Some("half-day".to_string()),
        ..Default::default()
    };
    let err = settings.validate().unwrap_err();
    assert!(matches!(err, CoreError::Configuration { .. }));
    assert!(err.to_string().contains("rolling"));
}

#[test]
fn test_unknown_action_rejected_even_when_disabled() {
    let settings = PolicySettings {
        enabled: false,
        penalty_action: Some("termination".to_string()),
        ..Default::default()
    };
    assert!(settings.validate().is_err());
}

#[test]
fn test_unknown_field_rejected() {
    let result = PolicySettings::from_yaml_str("enabled: true\ngrace_minutes: 5");
    assert!(matches!(result, Err(CoreError::ConfigParseError { .. })));
}

#[test]
fn test_label_normalization() {
    assert_eq!(
        "strictly-consecutive".parse::<CountingMode>().unwrap(),
        CountingMode::StrictlyConsecutive
    );
    assert_eq!(
        "  STRICTLY   consecutive ".parse::<CountingMode>().unwrap(),
        CountingMode::StrictlyConsecutive
    );
    assert_eq!(
        "Full-day".parse::<PenaltyAction>().unwrap(),
        PenaltyAction::FullDay
    );
    assert_eq!(
        "half_day".parse::<PenaltyAction>().unwrap(),
        PenaltyAction::HalfDay
    );
}

#[test]
fn test_settings_roundtrip_through_config() {
    let policy = PolicyConfig::new(4, CountingMode::StrictlyConsecutive, PenaltyAction::FullDay)
        .unwrap()
        .with_window(StrikeWindow::Monthly)
        .with_effective_from(NaiveDate::from_ymd_opt(2025, 6, 1));
    let settings = PolicySettings::from(&policy);
    assert_eq!(settings.validate().unwrap(), policy);
}

#[test]
fn test_new_rejects_zero_threshold() {
    assert!(PolicyConfig::new(0, CountingMode::Cumulative, PenaltyAction::HalfDay).is_err());
}

#[test]
fn test_applies_to_effective_date() {
    let policy = PolicyConfig::new(1, CountingMode::Cumulative, PenaltyAction::HalfDay)
        .unwrap()
        .with_effective_from(NaiveDate::from_ymd_opt(2025, 3, 10));
    assert!(!policy.applies_to(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()));
    assert!(policy.applies_to(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));

    let unbounded = PolicyConfig::new(1, CountingMode::Cumulative, PenaltyAction::HalfDay).unwrap();
    assert!(unbounded.applies_to(NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()));
}
