use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;


#[derive(Parser)]
#[command(
    name = "shardwrap",
    version,
    about = "Translate CI test invocations into gtest-parallel command lines"
)]
pub struct Cli {
    /// shardwrap.yaml with runner path, shard variable names and core override
    #[arg(long, global = true, env = "SHARDWRAP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Translate wrapper arguments and print the gtest-parallel invocation
    Plan(PlanArgs),
    /// Resolve a --workers spec (N or <factor>x) against the core count
    Workers(WorkersArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PlanArgs {
    #[arg(long, value_enum, default_value_t = PlanFormat::Text)]
    pub format: PlanFormat,

    /// Wrapper arguments, passed after `--`
    #[arg(last = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanFormat {
    Text,
    Json,
}

#[derive(clap::Args, Debug, Clone)]
pub struct WorkersArgs {
    /// e.g. `8`, `2x`, `0.5x`
    pub spec: String,
}
