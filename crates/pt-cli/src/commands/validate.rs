//! Validate command implementation

use anyhow::{Context, Result};
use pt_db::{Database, DuckDbBackend};
use pt_harness::{FileOracle, Orchestrator, ValidationFailure, ValidationReport};

use crate::cli::{GlobalArgs, ValidateArgs};
use crate::commands::common::{apply_overrides, load_config, read_input, verbose, ExitCode};

/// Execute the validate command
pub async fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let mut config = apply_overrides(load_config(global)?, args.rows, args.seed);
    if let Some(secs) = args.timeout {
        config.run_timeout_secs = Some(secs);
    }
    let procedure = read_input(&args.procedure, "procedure")?;

    let db = DuckDbBackend::new(&args.database).context("Failed to connect to database")?;
    if let Some(setup) = &args.setup {
        let sql = read_input(setup, "setup")?;
        db.execute_write(&sql)
            .await
            .with_context(|| format!("Failed to run setup script {setup}"))?;
        verbose(global, &format!("Applied setup script {setup}"));
    }

    let oracle = FileOracle::new(&args.plan);
    let orchestrator =
        Orchestrator::new(&db, &oracle, config).context("Invalid validation settings")?;
    verbose(
        global,
        &format!(
            "Validating {} against plan {} on {} ({} rows per table)",
            args.procedure,
            args.plan,
            args.database,
            orchestrator.config().row_count
        ),
    );

    match orchestrator.validate(&procedure).await {
        Ok(report) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, global);
            }
            if report.passed {
                Ok(())
            } else {
                Err(ExitCode(1).into())
            }
        }
        Err(failure) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&failure_json(&failure))?);
            } else {
                eprintln!("VALIDATION ERROR");
                eprintln!("{failure}");
            }
            Err(ExitCode(1).into())
        }
    }
}

fn print_report(report: &ValidationReport, global: &GlobalArgs) {
    println!("{report}");
    println!();
    println!("EXPLANATION:");
    println!("{}", report.explanation);
    println!();
    println!("OPTIMIZED PROCEDURE:");
    println!("{}", report.optimized_procedure);

    if global.verbose {
        eprintln!("[verbose] Run id: {}", report.run_id);
        eprintln!("[verbose] Original block:\n{}", report.original_block);
        eprintln!("[verbose] Optimized block:\n{}", report.optimized_block);
    }
}

fn failure_json(failure: &ValidationFailure) -> serde_json::Value {
    serde_json::json!({
        "passed": false,
        "state": failure.state,
        "error": failure.error.to_string(),
    })
}
