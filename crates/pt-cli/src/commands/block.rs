//! Block command implementation

use anyhow::{Context, Result};
use pt_sql::BlockTransformer;

use crate::cli::{BlockArgs, GlobalArgs};
use crate::commands::common::{load_config, read_input, verbose};

/// Execute the block command
pub async fn execute(args: &BlockArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let transformer =
        BlockTransformer::with_helpers(&config.error_log_helpers, &config.status_helpers)
            .context("Invalid helper configuration")?;
    verbose(
        global,
        &format!(
            "Rewriting {} ({} error helpers, {} status helpers)",
            args.procedure,
            config.error_log_helpers.len(),
            config.status_helpers.len()
        ),
    );

    let source = read_input(&args.procedure, "procedure")?;
    println!("{}", transformer.transform(&source));
    Ok(())
}
