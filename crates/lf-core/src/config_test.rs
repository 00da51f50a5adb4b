use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("name: payroll_ops").unwrap();
    assert_eq!(config.name, "payroll_ops");
    assert_eq!(config.database.path, "lateflow.duckdb");
    assert_eq!(config.reprocess.threads, 4);
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: payroll_ops
database:
  path: ./data/attendance.duckdb
reprocess:
  threads: 8
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.database.path, "./data/attendance.duckdb");
    assert_eq!(config.reprocess.threads, 8);
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("name: x\nmodel_paths: [models]");
    assert!(result.is_err());

    let nested: Result<Config, _> = serde_yaml::from_str("name: x\ndatabase:\n  type: duckdb");
    assert!(nested.is_err());
}

#[test]
fn test_validate_rejects_empty_name() {
    let config = Config::new("  ");
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));
}

#[test]
fn test_validate_rejects_zero_threads() {
    let mut config = Config::new("ops");
    config.reprocess.threads = 0;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("reprocess.threads"));
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("lateflow.yml"), "name: from_yml").unwrap();
    std::fs::write(dir.path().join("lateflow.yaml"), "name: from_yaml").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "from_yml");
}

#[test]
fn test_load_from_dir_falls_back_to_yaml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("lateflow.yaml"), "name: from_yaml").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "from_yaml");
}

#[test]
fn test_load_from_dir_missing() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
    assert!(err.to_string().contains("[E001]"));
}

#[test]
fn test_load_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lateflow.yml");
    std::fs::write(&path, "name: [unterminated").unwrap();
    assert!(matches!(
        Config::load(&path),
        Err(CoreError::ConfigParseError { .. })
    ));
}

#[test]
fn test_database_path_absolute() {
    let root = std::path::PathBuf::from("/srv/ops");
    let config = Config::new("ops");
    assert_eq!(
        config.database_path_absolute(&root),
        root.join("lateflow.duckdb")
    );

    let mut memory = Config::new("ops");
    memory.database.path = ":memory:".to_string();
    assert_eq!(
        memory.database_path_absolute(&root),
        std::path::PathBuf::from(":memory:")
    );
}

#[test]
fn test_to_yaml_roundtrip() {
    let config = Config::new("ops");
    let yaml = config.to_yaml().unwrap();
    let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed, config);
}
