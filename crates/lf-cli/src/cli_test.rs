use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_parse_month() {
    assert_eq!(parse_month("2025-03"), Ok((2025, 3)));
    assert_eq!(parse_month("2024-12"), Ok((2024, 12)));
    assert!(parse_month("2025-13").is_err());
    assert!(parse_month("2025").is_err());
    assert!(parse_month("March").is_err());
}

#[test]
fn test_record_requires_lateness() {
    let missing = Cli::try_parse_from([
        "lf", "record", "--id", "r1", "--employee", "E1", "--date", "2025-03-01",
    ]);
    assert!(missing.is_err());

    let both = Cli::try_parse_from([
        "lf",
        "record",
        "--id",
        "r1",
        "--employee",
        "E1",
        "--date",
        "2025-03-01",
        "--late",
        "--on-time",
    ]);
    assert!(both.is_err());
}

#[test]
fn test_global_args_after_subcommand() {
    let cli = Cli::try_parse_from([
        "lf",
        "status",
        "-e",
        "E1",
        "--date",
        "2025-03-04",
        "--database",
        ":memory:",
        "-v",
    ])
    .unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.database.as_deref(), Some(":memory:"));
    match cli.command {
        Commands::Status(args) => {
            assert_eq!(args.employee, "E1");
            assert_eq!(args.date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
            assert_eq!(args.output, OutputFormat::Text);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_policy_file_conflicts_with_flags() {
    let result = Cli::try_parse_from([
        "lf", "policy", "set", "--file", "policy.yml", "--threshold", "3",
    ]);
    assert!(result.is_err());

    let cli = Cli::try_parse_from([
        "lf",
        "policy",
        "set",
        "--threshold",
        "0",
        "--mode",
        "cumulative",
        "--action",
        "half-day",
    ])
    .unwrap();
    match cli.command {
        Commands::Policy(PolicyArgs {
            command: PolicyCommands::Set(args),
        }) => assert_eq!(args.threshold, Some(0)),
        other => panic!("unexpected command: {:?}", other),
    }
}
