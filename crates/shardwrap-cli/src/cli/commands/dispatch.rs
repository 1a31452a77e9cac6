use anyhow::Context as _;
use shardwrap_core::WrapperConfig;

use super::super::args::*;
use crate::exit_codes::SUCCESS;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    if let Command::Version = cli.cmd {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    let config = WrapperConfig::load_or_default(cli.config.as_deref())
        .context("failed to load shardwrap config")?;

    match cli.cmd {
        Command::Plan(args) => super::plan::run(args, &config),
        Command::Workers(args) => super::workers::run(args, &config),
        Command::Version => Ok(SUCCESS),
    }
}
