//! Shared fixtures for command tests

use std::fs;
use tempfile::TempDir;

use crate::cli::GlobalArgs;
use crate::context::RuntimeContext;

/// Project directory with a lateflow.yml pointing at an on-disk database
pub(crate) fn project() -> (TempDir, GlobalArgs) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("lateflow.yml"),
        "name: test_project\ndatabase:\n  path: attendance.duckdb\nreprocess:\n  threads: 2\n",
    )
    .unwrap();
    let global = GlobalArgs {
        verbose: false,
        project_dir: dir.path().to_path_buf(),
        config: None,
        database: None,
    };
    (dir, global)
}

/// Open the project's store the same way commands do
pub(crate) fn open(global: &GlobalArgs) -> RuntimeContext {
    RuntimeContext::new(global).unwrap()
}

/// Write an attendance CSV into the project directory
pub(crate) fn write_csv(dir: &TempDir, rows: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join("attendance.csv");
    let mut content = String::from("id,employee_id,attendance_date,is_late\n");
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(&path, content).unwrap();
    path
}
