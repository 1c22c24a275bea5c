//! Seed command implementation

use anyhow::{Context, Result};
use pt_core::parse_schema_description;
use pt_seed::{generate_seed_script, resolve_seed};

use crate::cli::{GlobalArgs, SeedArgs};
use crate::commands::common::{apply_overrides, load_config, read_input, verbose};

/// Execute the seed command
pub async fn execute(args: &SeedArgs, global: &GlobalArgs) -> Result<()> {
    let config = apply_overrides(load_config(global)?, args.rows, args.seed);
    let json = read_input(&args.schema, "schema")?;
    let tables = parse_schema_description(&json).context("Failed to parse schema description")?;

    let seed = resolve_seed(config.seed);
    let script = generate_seed_script(&tables, config.row_count, seed, args.dialect.into())
        .context("Failed to generate seed script")?;

    verbose(
        global,
        &format!(
            "Generated {} rows for {} tables with seed {}",
            script.row_count,
            script.tables.len(),
            script.seed
        ),
    );
    for diagnostic in &script.diagnostics {
        eprintln!("{diagnostic}");
    }
    eprintln!("-- seed: {}", script.seed);
    print!("{}", script.sql);
    if !script.sql.ends_with('\n') {
        println!();
    }

    Ok(())
}
