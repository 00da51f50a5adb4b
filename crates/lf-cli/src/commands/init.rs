//! Init command implementation - scaffolds a new Lateflow project

use anyhow::{Context, Result};
use lf_core::Config;
use std::fs;
use std::path::Path;

use crate::cli::InitArgs;

const EXAMPLE_POLICY: &str = r#"# Late penalty policy. Apply with: lf policy set --file policy.yml
enabled: false
strike_threshold: 3
counting_mode: cumulative        # or: strictly consecutive
penalty_action: half-day         # or: full-day
# apply_from_date: 2025-01-01
# window: monthly                # restart counts every month
"#;

/// Execute the init command
pub(crate) async fn execute(args: &InitArgs) -> Result<()> {
    // Reject names that could cause path traversal or confusing directory names
    if args.name.contains('/')
        || args.name.contains('\\')
        || args.name.contains("..")
        || args.name.starts_with('.')
        || args.name.starts_with('-')
    {
        anyhow::bail!(
            "Invalid project name '{}': must not contain '/', '\\', '..', or start with '.' or '-'",
            args.name
        );
    }

    let project_dir = Path::new(&args.name);
    if project_dir.exists() {
        anyhow::bail!(
            "Directory '{}' already exists. Choose a different project name.",
            args.name
        );
    }

    let mut config = Config::new(&args.name);
    config.database.path = args.database_path.clone();
    config.validate().context("Invalid project settings")?;

    println!("Creating new Lateflow project: {}\n", args.name);

    fs::create_dir_all(project_dir)
        .with_context(|| format!("Failed to create directory: {}", project_dir.display()))?;
    fs::write(project_dir.join("lateflow.yml"), config.to_yaml()?)
        .context("Failed to write lateflow.yml")?;
    fs::write(project_dir.join("policy.yml"), EXAMPLE_POLICY)
        .context("Failed to write policy.yml")?;
    fs::write(project_dir.join(".gitignore"), "*.duckdb\n*.duckdb.wal\n")
        .context("Failed to write .gitignore")?;

    println!("  Created lateflow.yml");
    println!("  Created policy.yml");
    println!("  Created .gitignore");
    println!();
    println!("Project '{}' initialized successfully!", args.name);
    println!();
    println!("Next steps:");
    println!("  cd {}", args.name);
    println!("  lf policy set --file policy.yml   # Save the late penalty policy");
    println!("  lf seed attendance.csv            # Import attendance records");

    Ok(())
}
