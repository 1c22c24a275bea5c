use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_parse_validate() {
    let cli = Cli::try_parse_from([
        "proctor",
        "-v",
        "validate",
        "--procedure",
        "proc.sql",
        "--plan",
        "plan.json",
        "--rows",
        "20",
        "--json",
    ])
    .unwrap();

    assert!(cli.global.verbose);
    match cli.command {
        Commands::Validate(args) => {
            assert_eq!(args.procedure, "proc.sql");
            assert_eq!(args.plan, "plan.json");
            assert_eq!(args.database, ":memory:");
            assert_eq!(args.rows, Some(20));
            assert_eq!(args.seed, None);
            assert!(args.json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_seed_dialect() {
    let cli = Cli::try_parse_from([
        "proctor", "seed", "--schema", "schema.json", "--dialect", "oracle", "--seed", "7",
    ])
    .unwrap();

    match cli.command {
        Commands::Seed(args) => {
            assert_eq!(SqlDialect::from(args.dialect), SqlDialect::Oracle);
            assert_eq!(args.seed, Some(7));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_validate_requires_plan() {
    assert!(Cli::try_parse_from(["proctor", "validate", "--procedure", "p.sql"]).is_err());
}
