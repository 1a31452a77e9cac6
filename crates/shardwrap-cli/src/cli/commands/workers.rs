use anyhow::Context as _;
use shardwrap_core::{resolve_workers, WrapperConfig};

use crate::cli::args::WorkersArgs;
use crate::exit_codes::SUCCESS;

pub fn run(args: WorkersArgs, config: &WrapperConfig) -> anyhow::Result<i32> {
    let cores = config.core_count();
    let resolved = resolve_workers(&args.spec, &*cores)
        .with_context(|| format!("failed to resolve --workers={}", args.spec))?;
    println!("{resolved}");
    Ok(SUCCESS)
}
